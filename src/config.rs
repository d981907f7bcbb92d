use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "TunsAdmission";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Passphrase accepted until a deployment configures its own.
/// Kept for continuity with earlier admission years; override it.
pub const DEFAULT_ADMIN_PASSPHRASE: &str = "tunsadmin2569";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "info,tuns_admission=debug"
}

/// Get the application data directory.
/// ~/TunsAdmission/ unless TUNS_DATA_DIR points elsewhere.
pub fn app_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("TUNS_DATA_DIR") {
        return PathBuf::from(dir);
    }
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("TunsAdmission")
}

/// Get the SQLite database path.
pub fn database_path() -> PathBuf {
    app_data_dir().join("admission.db")
}

/// Runtime settings read from the environment at startup.
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub admin_passphrase: String,
    /// External allocation plan file; the bundled plan when unset.
    pub plan_path: Option<PathBuf>,
    /// Directory the built front end is served from.
    pub static_dir: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let bind_addr = env_or("TUNS_BIND_ADDR", DEFAULT_BIND_ADDR)
            .parse()
            .expect("TUNS_BIND_ADDR is not a valid socket address");

        let admin_passphrase = match std::env::var("TUNS_ADMIN_PASSPHRASE") {
            Ok(p) if !p.is_empty() => p,
            _ => {
                tracing::warn!(
                    "TUNS_ADMIN_PASSPHRASE not set, using the default staff passphrase"
                );
                DEFAULT_ADMIN_PASSPHRASE.to_string()
            }
        };

        Self {
            bind_addr,
            admin_passphrase,
            plan_path: std::env::var("TUNS_PLAN_PATH").ok().map(PathBuf::from),
            static_dir: PathBuf::from(env_or("TUNS_STATIC_DIR", "public")),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => {
            tracing::info!("{key} not set, using default: {default}");
            default.to_string()
        }
    }
}
