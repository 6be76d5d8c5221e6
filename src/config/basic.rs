use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::net::{IpAddr, Ipv4Addr};

/// Process-level settings: where geomark listens, where item metadata lives,
/// and how the admin surface is protected.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BasicConfig {
    /// `basic.listen_addr`, default `0.0.0.0`.
    #[serde(default = "default_listen_ip")]
    pub listen_addr: IpAddr,

    /// `basic.listen_port`, default `8188`.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// SQLite file backing the `item_meta` table.
    #[serde(default)]
    pub database_url: String,

    /// Fallback `EnvFilter` directive when `RUST_LOG` is unset.
    #[serde(default)]
    pub loglevel: String,

    /// Shared secret for the editor, the save form and address search.
    /// Accepts a bare TOML integer as well as a string.
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_string_lax")]
    pub admin_key: String,

    /// Issue the editor session cookie without `Secure`, for plain-HTTP hosts.
    #[serde(default)]
    pub insecure_cookie: bool,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_ip(),
            listen_port: default_listen_port(),
            database_url: "sqlite://geomark.db".to_string(),
            loglevel: "info".to_string(),
            admin_key: String::new(),
            insecure_cookie: false,
        }
    }
}

fn deserialize_string_lax<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(serde::de::Error::custom(
            "basic.admin_key must be a string or an integer",
        )),
    }
}

fn default_listen_ip() -> IpAddr {
    Ipv4Addr::UNSPECIFIED.into()
}

fn default_listen_port() -> u16 {
    8188
}
