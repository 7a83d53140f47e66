//! Server settings
//!
//! Everything the binary reads from the environment, parsed in one place.

use std::net::SocketAddr;
use std::time::Duration;

use platform::config::{ConfigError, ConfigSource};

pub const BIND_ADDR: &str = "CHIRPR_BIND_ADDR";
pub const BACKEND: &str = "CHIRPR_BACKEND";
pub const FIREBASE_API_KEY: &str = "FIREBASE_API_KEY";
pub const FIREBASE_PROJECT_ID: &str = "FIREBASE_PROJECT_ID";
pub const DEFAULT_AVATAR_URL: &str = "CHIRPR_DEFAULT_AVATAR_URL";
pub const HTTP_TIMEOUT_SECS: &str = "CHIRPR_HTTP_TIMEOUT_SECS";
pub const ALLOWED_ORIGINS: &str = "CHIRPR_ALLOWED_ORIGINS";

const DEFAULT_ORIGINS: [&str; 2] = ["http://localhost:40922", "http://127.0.0.1:40922"];

/// Which services the provider runs on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// Process-local services; state is lost on exit
    Memory,
    Firebase { api_key: String, project_id: String },
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub backend: Backend,
    pub default_avatar_url: Option<String>,
    pub http_timeout: Option<Duration>,
    pub allowed_origins: Vec<String>,
}

impl Settings {
    pub fn load<F>(source: &ConfigSource<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = source
            .parse::<SocketAddr>(BIND_ADDR)?
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 31113)));

        let backend = match source.or(BACKEND, "memory").to_ascii_lowercase().as_str() {
            "memory" => Backend::Memory,
            "firebase" => Backend::Firebase {
                api_key: source.required(FIREBASE_API_KEY)?,
                project_id: source.required(FIREBASE_PROJECT_ID)?,
            },
            other => {
                return Err(ConfigError::Invalid {
                    key: BACKEND.to_string(),
                    value: other.to_string(),
                    reason: "expected `memory` or `firebase`".to_string(),
                });
            }
        };

        let mut allowed_origins = source.list(ALLOWED_ORIGINS);
        if allowed_origins.is_empty() {
            allowed_origins = DEFAULT_ORIGINS.iter().map(|o| o.to_string()).collect();
        }

        Ok(Self {
            bind_addr,
            backend,
            default_avatar_url: source.optional(DEFAULT_AVATAR_URL),
            http_timeout: source.parse::<u64>(HTTP_TIMEOUT_SECS)?.map(Duration::from_secs),
            allowed_origins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::load(&ConfigSource::new(move |key: &str| map.get(key).cloned()))
    }

    #[test]
    fn test_defaults() {
        let settings = load(&[]).unwrap();
        assert_eq!(settings.bind_addr.to_string(), "127.0.0.1:31113");
        assert_eq!(settings.backend, Backend::Memory);
        assert_eq!(settings.http_timeout, None);
        assert_eq!(settings.default_avatar_url, None);
        assert_eq!(settings.allowed_origins.len(), 2);
    }

    #[test]
    fn test_firebase_requires_credentials() {
        let err = load(&[(BACKEND, "firebase"), (FIREBASE_API_KEY, "k")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing(FIREBASE_PROJECT_ID.to_string()));

        let settings = load(&[
            (BACKEND, "Firebase"),
            (FIREBASE_API_KEY, "k"),
            (FIREBASE_PROJECT_ID, "chirpr-dev"),
            (HTTP_TIMEOUT_SECS, "15"),
        ])
        .unwrap();
        assert_eq!(
            settings.backend,
            Backend::Firebase {
                api_key: "k".into(),
                project_id: "chirpr-dev".into()
            }
        );
        assert_eq!(settings.http_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[(BACKEND, "postgres")]),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            load(&[(BIND_ADDR, "localhost")]),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            load(&[(HTTP_TIMEOUT_SECS, "soon")]),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_origins_list() {
        let settings = load(&[(ALLOWED_ORIGINS, "https://chirpr.app, ,https://beta.chirpr.app")]).unwrap();
        assert_eq!(
            settings.allowed_origins,
            vec!["https://chirpr.app", "https://beta.chirpr.app"]
        );
    }
}
