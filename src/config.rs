use std::env;
use std::path::PathBuf;

/// Fallback signing secret for local development. Startup warns when it is in use.
pub const DEFAULT_JWT_SECRET: &str = "local-dev-secret-change-me";

pub const DEFAULT_DATABASE: &str = "dbPBOMMO";

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub database_name: String,
    pub user_collection: String,
    pub meeting_collection: String,
    pub jwt_secret: String,
    /// Root of the static upload tree, served under `/uploads`.
    pub upload_dir: PathBuf,
    pub cors_origin: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Optional (with defaults)
    /// - `HOST` (`0.0.0.0`), `PORT` (`8080`)
    /// - `MONGOSTRING` or `MONGODB_URI` (`mongodb://localhost:27017`)
    /// - `DB_NAME` or `MONGODB_DATABASE` (`dbPBOMMO`)
    /// - `USER_COLLECTION` (`users`), `MEETING_COLLECTION` (`meetings`)
    /// - `JWT_SECRET` (development fallback)
    /// - `UPLOAD_DIR` (`./uploads`), `CORS_ORIGIN` (`http://localhost:5173`)
    pub fn from_env() -> Result<Self, String> {
        Self::from_source(|key| env::var(key).ok())
    }

    fn from_source<F>(get: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| get(key).filter(|v| !v.trim().is_empty());
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        // first non-blank of several names
        let var_any = |keys: &[&str], default: &str| {
            keys.iter()
                .find_map(|key| lookup(*key))
                .unwrap_or_else(|| default.to_string())
        };

        let port = var("PORT", "8080")
            .parse::<u16>()
            .map_err(|_| "PORT must be a valid port number".to_string())?;

        Ok(Self {
            host: var("HOST", "0.0.0.0"),
            port,
            mongodb_uri: var_any(&["MONGOSTRING", "MONGODB_URI"], "mongodb://localhost:27017"),
            database_name: var_any(&["DB_NAME", "MONGODB_DATABASE"], DEFAULT_DATABASE),
            user_collection: var("USER_COLLECTION", "users"),
            meeting_collection: var("MEETING_COLLECTION", "meetings"),
            jwt_secret: var("JWT_SECRET", DEFAULT_JWT_SECRET),
            upload_dir: PathBuf::from(var("UPLOAD_DIR", "./uploads")),
            cors_origin: var("CORS_ORIGIN", "http://localhost:5173"),
        })
    }

    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_source(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.mongodb_uri, "mongodb://localhost:27017");
        assert_eq!(config.database_name, "dbPBOMMO");
        assert_eq!(config.user_collection, "users");
        assert_eq!(config.meeting_collection, "meetings");
        assert!(config.uses_default_secret());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = load(&[
            ("PORT", "9001"),
            ("MONGODB_DATABASE", "calendar"),
            ("JWT_SECRET", "s3cr3t"),
            ("UPLOAD_DIR", "/var/lib/meetings/uploads"),
        ])
        .unwrap();
        assert_eq!(config.port, 9001);
        assert_eq!(config.database_name, "calendar");
        assert!(!config.uses_default_secret());
        assert_eq!(config.upload_dir, PathBuf::from("/var/lib/meetings/uploads"));
    }

    #[test]
    fn deployment_variable_names_are_read() {
        let config = load(&[
            ("MONGOSTRING", "mongodb://prod-db:27017"),
            ("DB_NAME", "dbPBOMMO_prod"),
            ("USER_COLLECTION", "akun"),
        ])
        .unwrap();
        assert_eq!(config.mongodb_uri, "mongodb://prod-db:27017");
        assert_eq!(config.database_name, "dbPBOMMO_prod");
        assert_eq!(config.user_collection, "akun");
    }

    #[test]
    fn deployment_names_win_over_alternatives() {
        let config = load(&[
            ("MONGOSTRING", "mongodb://prod-db:27017"),
            ("MONGODB_URI", "mongodb://other:27017"),
            ("MONGODB_DATABASE", "fallback_db"),
        ])
        .unwrap();
        assert_eq!(config.mongodb_uri, "mongodb://prod-db:27017");
        assert_eq!(config.database_name, "fallback_db");
    }

    #[test]
    fn blank_values_fall_back() {
        let config = load(&[("JWT_SECRET", "   ")]).unwrap();
        assert!(config.uses_default_secret());
    }

    #[test]
    fn invalid_port_is_rejected() {
        assert!(load(&[("PORT", "eighty")]).is_err());
    }
}
