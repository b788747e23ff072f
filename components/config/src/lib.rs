pub extern crate paste;
pub extern crate serde;
pub extern crate tracing;

pub mod util;

pub mod account;
pub mod limits;
pub mod provider;

#[macro_export]
macro_rules! section {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {$(
            $(#[$field_meta:meta])*
            $field_vis:vis $field_name:ident : $field_ty:ty = $field_default:expr
                $(=> $field_env:literal
                    $(| $func:path
                        $([  $($param:expr),* ])?
                    )?
                )?
        ),*$(,)?}

        $(impl Extra { $($extra:tt)+ })?
    ) => { $crate::paste::paste! {
        #[derive(Debug, $crate::serde::Serialize, $crate::serde::Deserialize)]
        $(#[$meta])*
        #[serde(deny_unknown_fields)]
        $vis struct $name {$(
            $(#[$field_meta])*
            $(
                #[doc = ""]
                #[doc = "**Overridden by the `" $field_env "` environment variable.**"]
            )?
            $field_vis $field_name: $field_ty,
        )*}

        impl Default for $name {
            #[inline]
            fn default() -> Self {
                $name {$(
                    $field_name: $field_default,
                )*}
            }
        }

        impl $crate::ConfigExtra for $name {
            $($($extra)+)?
        }

        impl $crate::Configuration for $name {
            fn configure(&mut self) {
                $($(
                    if let Ok(value) = std::env::var($field_env) {
                        $crate::tracing::debug!("Applying environment overwrite for {}.{}=>{}", stringify!($name), stringify!($field_name), $field_env);
                        self.$field_name = ($($func(&value $( $(,$param)* )? ),)? value , ).0.into();
                    }
                )?)*

                $crate::ConfigExtra::configure(self);
            }
        }
    }};
}

#[macro_export]
macro_rules! config {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {$(
            $(#[$field_meta:meta])*
            $field:ident: $field_ty:ty
        ),*$(,)?}
    ) => {
        $(#[$meta])*
        #[derive(Default, Debug, $crate::serde::Serialize, $crate::serde::Deserialize)]
        #[serde(deny_unknown_fields)]
        #[cfg_attr(not(feature = "strict"), serde(default))]
        pub struct $name {
            $($(#[$field_meta])* pub $field: $field_ty,)*
        }

        impl $crate::Configuration for $name {
            fn configure(&mut self) {
                $($crate::Configuration::configure(&mut self.$field);)*
            }
        }
    };
}

pub trait ConfigExtra: Configuration {
    fn configure(&mut self) {}
}

pub trait Configuration: serde::de::DeserializeOwned {
    /// Applies any environmental overrides and adjustments
    fn configure(&mut self);
}

config! {
    /// Root configuration object
    ///
    /// Call [`Configuration::configure`] after loading to apply
    /// environment overrides.
    pub struct Config {
        /// Hosted provider endpoints and credentials
        provider: provider::Provider,
        /// Account and session rules
        account: account::Account,
        /// Input-size and rate limits
        limits: limits::Limits,
    }
}

use std::path::Path;

enum Format {
    TOML,
    JSON,
}

fn get_format(path: &Path) -> Format {
    let mut format = Format::TOML;
    if let Some(ext) = path.extension() {
        if ext.eq_ignore_ascii_case("toml") {
            format = Format::TOML;
        } else if ext.eq_ignore_ascii_case("json") {
            format = Format::JSON;
        }
    }
    format
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO Error: {0}")]
    IOError(#[from] std::io::Error),

    #[error("TOML Parse Error: {0}")]
    TomlDeError(#[from] toml::de::Error),
    #[error("TOML Format Error: {0}")]
    TomlSeError(#[from] toml::ser::Error),

    #[error("JSON Error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl Config {
    pub async fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let path = path.as_ref();

        let file: String = tokio::fs::read_to_string(path).await?;

        Ok(match get_format(path) {
            Format::TOML => toml::from_str(&file)?,
            Format::JSON => serde_json::from_str(&file)?,
        })
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        let file = match get_format(path) {
            Format::TOML => toml::to_string(self)?,
            Format::JSON => serde_json::to_string(self)?,
        };

        tokio::fs::write(path, file).await?;

        Ok(())
    }
}
