//! Authentication session layer.
//!
//! Talks to the hosted auth provider over its REST endpoints, caches the
//! resulting [`Session`](schema::Session), and broadcasts state changes to
//! any part of the app that subscribes. All credential validation and the
//! sign-in attempt limiter live in front of the network calls, so invalid
//! input never reaches the wire.

#[macro_use]
extern crate serde;

extern crate tracing as log;

pub mod api;
pub mod error;
pub mod events;
pub mod manager;

pub use api::{AuthApi, SignUpResponse};
pub use error::Error;
pub use events::{SessionChange, SessionEvents};
pub use manager::{SessionManager, SignOut};
