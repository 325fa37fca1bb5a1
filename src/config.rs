use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATABASE_PATH: &str = "data/fitme.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub database_path: PathBuf,
    /// Base URL the client uses to reach the API, including the `/api` prefix.
    pub api_base_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Unparsable values fall
    /// back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("HOST")
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let database_path = lookup("FITME_DATABASE_PATH")
            .or_else(|| lookup("DATABASE_PATH"))
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));
        let api_base_url = lookup("FITME_API_URL")
            .filter(|value| !value.is_empty())
            .map(|value| value.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://127.0.0.1:{port}/api"));

        Self {
            host,
            port,
            database_path,
            api_base_url,
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config(&[]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.database_path, PathBuf::from(DEFAULT_DATABASE_PATH));
        assert_eq!(config.api_base_url, "http://127.0.0.1:8080/api");
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = config(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "3001"),
            ("DATABASE_PATH", "/tmp/legacy.db"),
            ("FITME_API_URL", "http://tracker.local/api/"),
        ]);
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3001");
        assert_eq!(config.database_path, PathBuf::from("/tmp/legacy.db"));
        assert_eq!(config.api_base_url, "http://tracker.local/api");
    }

    #[test]
    fn prefixed_database_path_wins() {
        let config = config(&[
            ("DATABASE_PATH", "/tmp/legacy.db"),
            ("FITME_DATABASE_PATH", "/tmp/fitme.db"),
        ]);
        assert_eq!(config.database_path, PathBuf::from("/tmp/fitme.db"));
    }

    #[test]
    fn bad_port_falls_back() {
        let config = config(&[("PORT", "http")]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.api_base_url, "http://127.0.0.1:8080/api");
    }
}
