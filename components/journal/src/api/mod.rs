//! User-facing operations, one module per feature.

pub mod account;
pub mod deeds;
pub mod entries;
pub mod history;
pub mod inspiration;
pub mod letters;
pub mod stats;
