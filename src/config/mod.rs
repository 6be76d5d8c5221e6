mod basic;
mod map;

pub use basic::BasicConfig;
pub use map::{MapCenter, MapConfig, SizeOverride};

use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, sync::LazyLock};

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Core server configuration (see `basic` table in config.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Map widget and geocoder settings (see `map` table in config.toml).
    #[serde(default)]
    pub map: MapConfig,
}

const DEFAULT_CONFIG_FILE: &str = "config.toml";

impl Config {
    /// Builds a Figment that merges defaults and a config TOML file.
    pub fn figment() -> Figment {
        let figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            figment.merge(Toml::file(DEFAULT_CONFIG_FILE))
        } else {
            figment
        }
    }

    /// Loads configuration by merging defaults and `config.toml` if present.
    ///
    /// Does not validate `basic.admin_key`; the binary goes through [`Config::validate`].
    pub fn from_optional_toml() -> Self {
        Self::figment().extract().unwrap_or_else(|err| {
            panic!("failed to extract configuration (defaults + optional config.toml): {err}")
        })
    }

    /// Rejects configurations the server must not start with.
    pub fn validate(&self) -> Result<(), String> {
        if self.basic.admin_key.trim().is_empty() {
            return Err("basic.admin_key must be set and non-empty".to_string());
        }
        if self.map.content_types.is_empty() {
            return Err("map.content_types must list at least one content type".to_string());
        }
        Ok(())
    }
}

/// Global, lazily-initialized configuration instance.
pub static CONFIG: LazyLock<Config> = LazyLock::new(Config::from_optional_toml);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fail_validation_without_admin_key() {
        let cfg = Config::default();
        assert!(cfg.validate().is_err());
        assert!(!cfg.basic.insecure_cookie);
    }

    #[test]
    fn toml_overrides_merge_over_defaults() {
        let cfg: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::string(
                r#"
                [basic]
                admin_key = 12345
                listen_port = 9000
                insecure_cookie = true

                [map]
                content_types = ["post", "event"]

                [map.size_override]
                height = "320px"
                "#,
            ))
            .extract()
            .unwrap();

        assert_eq!(cfg.basic.admin_key, "12345");
        assert_eq!(cfg.basic.listen_port, 9000);
        assert!(cfg.basic.insecure_cookie);
        assert_eq!(cfg.map.content_types, vec!["post", "event"]);
        assert_eq!(cfg.map.street_zoom, 16);
        assert!(cfg.validate().is_ok());
        let size = cfg.map.size_override.as_ref().unwrap();
        assert_eq!(size.height.as_deref(), Some("320px"));
        assert_eq!(size.width, None);
    }
}
