use smcd_cloud::MediaConfig;

use crate::auth::jwt::JwtConfig;

/// Default body limit: large enough for a 500 MB video plus form fields.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 550 * 1024 * 1024;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `120`, video uploads are slow).
    pub request_timeout_secs: u64,
    /// Maximum request body size in bytes.
    pub max_upload_bytes: usize,
    /// Public site URL, used to build links in emails.
    pub frontend_url: String,
    /// Mailbox receiving contact-form messages.
    pub contact_email: String,
    /// Bootstrap super-admin account seeded at startup.
    pub admin_email: String,
    pub admin_password: String,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Media backend selection.
    pub media: MediaConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                        |
    /// |------------------------|------------------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                                      |
    /// | `PORT`                 | `8080`                                         |
    /// | `CORS_ORIGINS`         | `http://localhost:3000,http://127.0.0.1:3000`  |
    /// | `REQUEST_TIMEOUT_SECS` | `120`                                          |
    /// | `MAX_UPLOAD_BYTES`     | `576716800` (550 MiB)                          |
    /// | `FRONTEND_URL`         | `http://localhost:3000`                        |
    /// | `CONTACT_EMAIL`        | `contact@smcd.ma`                              |
    /// | `ADMIN_EMAIL`          | `admin@smcd.ma`                                |
    /// | `ADMIN_PASSWORD`       | `Admin123!`                                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .map(|v| v.parse().expect("MAX_UPLOAD_BYTES must be a valid usize"))
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        let frontend_url = std::env::var("FRONTEND_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            frontend_url,
            contact_email: std::env::var("CONTACT_EMAIL")
                .unwrap_or_else(|_| "contact@smcd.ma".into()),
            admin_email: std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@smcd.ma".into()),
            admin_password: std::env::var("ADMIN_PASSWORD")
                .unwrap_or_else(|_| "Admin123!".into()),
            jwt: JwtConfig::from_env(),
            media: MediaConfig::from_env(),
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        let origins = parse_origins(" http://a.ma , ,http://b.ma,");
        assert_eq!(origins, vec!["http://a.ma", "http://b.ma"]);
    }
}
