use std::env;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub cors_extra_origins: Vec<String>,

    /// Postgres connection string. Unset means the in-memory store.
    pub database_url: Option<String>,
    pub database_max_connections: u32,

    /// Bearer token accepted by the admin gate. Unset locks the admin routes.
    pub admin_api_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            frontend_url: "http://localhost:3000".into(),
            cors_extra_origins: Vec::new(),
            database_url: None,
            database_max_connections: 20,
            admin_api_token: None,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a number, got '{raw}'"))?,
            None => defaults.port,
        };
        let database_max_connections = match get("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw.trim().parse().with_context(|| {
                format!("DATABASE_MAX_CONNECTIONS must be a number, got '{raw}'")
            })?,
            None => defaults.database_max_connections,
        };

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port,
            frontend_url: get("FRONTEND_URL").unwrap_or(defaults.frontend_url),
            cors_extra_origins: get("CORS_EXTRA_ORIGINS")
                .map(|extra| {
                    extra
                        .split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            database_url: get("DATABASE_URL"),
            database_max_connections,
            admin_api_token: get("ADMIN_API_TOKEN"),
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config(&[]).unwrap();
        assert_eq!(config.listen_addr(), "0.0.0.0:8080");
        assert_eq!(config.database_url, None);
        assert_eq!(config.admin_api_token, None);
        assert_eq!(config.database_max_connections, 20);
    }

    #[test]
    fn values_are_read_and_lists_split() {
        let config = config(&[
            ("PORT", "9090"),
            ("DATABASE_URL", "postgres://localhost/jurnal"),
            ("CORS_EXTRA_ORIGINS", "http://a.test, ,http://b.test"),
            ("ADMIN_API_TOKEN", "rahasia"),
        ])
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/jurnal"));
        assert_eq!(config.cors_extra_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.admin_api_token.as_deref(), Some("rahasia"));
    }

    #[test]
    fn empty_values_count_as_unset() {
        let config = config(&[("ADMIN_API_TOKEN", ""), ("DATABASE_URL", "  ")]).unwrap();
        assert_eq!(config.admin_api_token, None);
        assert_eq!(config.database_url, None);
    }

    #[test]
    fn bad_numbers_are_errors() {
        let err = config(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
