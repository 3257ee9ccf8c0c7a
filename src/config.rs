//! Configuration for the report service
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BASE_PATH: &str = "/quran-teacher-report";

/// Teacher grading and app-install reporting API
#[derive(Parser, Debug, Clone)]
#[command(name = "teacher-report")]
#[command(about = "Reporting API for teacher grading activity and app install attribution")]
#[command(version)]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8585")]
    pub listen: SocketAddr,

    /// Port override (replaces the port of LISTEN)
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// MongoDB connection URI
    #[arg(long, env = "MONGO_URI")]
    pub mongo_uri: Option<String>,

    /// MongoDB database name (defaults to the database in MONGO_URI)
    #[arg(long, env = "MONGODB_DB")]
    pub mongodb_db: Option<String>,

    /// JWT secret for token signing (required in production)
    #[arg(long, env = "JWT_SECRET")]
    pub jwt_secret: Option<String>,

    /// JWT token expiry in seconds
    #[arg(long, env = "JWT_EXPIRY_SECONDS", default_value = "3600")]
    pub jwt_expiry_seconds: u64,

    /// JSON credential list: [{username, passwordHash, role}]
    #[arg(long, env = "USERS_FILE")]
    pub users_file: Option<PathBuf>,

    /// JSON agent roster: {"<agentId>": "<name>"}
    #[arg(long, env = "AGENT_ROSTER_FILE")]
    pub agent_roster_file: Option<PathBuf>,

    /// JSON array of teacher names included in the grading report
    #[arg(long, env = "TEACHER_ALLOWLIST_FILE")]
    pub teacher_allowlist_file: Option<PathBuf>,

    /// Path prefix for the report endpoints
    #[arg(long, env = "BASE_PATH", default_value = DEFAULT_BASE_PATH)]
    pub base_path: String,

    /// Value of Access-Control-Allow-Origin
    #[arg(long, env = "CORS_ORIGIN", default_value = "*")]
    pub cors_origin: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format (text, json)
    #[arg(long, env = "LOG_FORMAT", default_value = "text")]
    pub log_format: String,

    /// Enable development mode (insecure JWT secret allowed, empty credential list allowed)
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,
}

impl Args {
    /// Effective listen address after applying PORT
    pub fn listen_addr(&self) -> SocketAddr {
        let mut addr = self.listen;
        if let Some(port) = self.port {
            addr.set_port(port);
        }
        addr
    }

    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.mongo_uri.as_deref().map_or(true, |u| u.trim().is_empty()) {
            return Err("MONGO_URI is required".to_string());
        }

        if !self.dev_mode {
            match self.jwt_secret.as_deref() {
                None | Some("") => {
                    return Err("JWT_SECRET is required in production mode".to_string())
                }
                Some(s) if s.len() < 32 => {
                    return Err("JWT_SECRET must be at least 32 characters".to_string())
                }
                _ => {}
            }

            if self.users_file.is_none() {
                return Err("USERS_FILE is required in production mode".to_string());
            }
        }

        if self.jwt_expiry_seconds == 0 {
            return Err("JWT_EXPIRY_SECONDS must be greater than zero".to_string());
        }

        if !matches!(self.log_format.to_ascii_lowercase().as_str(), "text" | "json") {
            return Err(format!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            ));
        }

        Ok(())
    }
}

/// Base path normalized to a leading slash and no trailing slash
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["teacher-report", "--mongo-uri", "mongodb://localhost/tabsera"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_port_override() {
        let a = args(&["--listen", "127.0.0.1:9000", "--port", "7000"]);
        assert_eq!(a.listen_addr(), "127.0.0.1:7000".parse().unwrap());
    }

    #[test]
    fn test_base_path_normalization() {
        assert_eq!(normalize_base_path("/quran-teacher-report/"), "/quran-teacher-report");
        assert_eq!(normalize_base_path("reports"), "/reports");
        assert_eq!(normalize_base_path("/"), "");
    }

    #[test]
    fn test_validate() {
        let secret = "a-production-secret-of-at-least-32-chars";
        assert!(args(&["--dev-mode"]).validate().is_ok());
        assert!(args(&[]).validate().is_err());
        assert!(args(&["--jwt-secret", "short", "--users-file", "u.json"])
            .validate()
            .is_err());
        assert!(args(&["--jwt-secret", secret, "--users-file", "u.json"])
            .validate()
            .is_ok());
        assert!(args(&["--dev-mode", "--log-format", "xml"]).validate().is_err());
    }
}
