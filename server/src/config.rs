use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use tracing::{info, warn};

/// Which backend serves the pages, chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    Mock,
    Remote,
}

impl FromStr for BackendMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mock" => Ok(Self::Mock),
            "remote" => Ok(Self::Remote),
            other => Err(format!("expected \"mock\" or \"remote\", got \"{other}\"")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub mode: BackendMode,
    pub backend_url: String,
    pub backend_anon_key: String,
    /// Service credential for server-side writes. Only read in remote mode.
    pub backend_service_key: Option<String>,
    pub completion_url: String,
}

impl Config {
    pub fn load() -> Self {
        let mode: BackendMode = try_load("ARCHIVE_MODE", "mock");

        Self {
            port: try_load("RUST_PORT", "1111"),
            backend_url: try_load("BACKEND_URL", "http://localhost:54321"),
            backend_anon_key: try_load("BACKEND_ANON_KEY", "demo-anon-key"),
            backend_service_key: match mode {
                BackendMode::Remote => Some(read_secret("BACKEND_SERVICE_KEY")),
                BackendMode::Mock => None,
            },
            completion_url: try_load(
                "COMPLETION_URL",
                "https://api.openai.com/v1/chat/completions",
            ),
            mode,
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

fn read_secret(secret_name: &str) -> String {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("Failed to read {secret_name} from file: {e}");
        })
        .expect("Secrets misconfigured!")
}
