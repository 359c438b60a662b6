use std::sync::Arc;

use archive::credentials::{CredentialStore, MemoryCredentialStore, RemoteCredentialStore};
use archive::{Backend, MockBackend, RemoteBackend, Store};
use tracing::info;

use crate::auth::{AuthProvider, MockAuth, RemoteAuth};
use crate::config::{BackendMode, Config};
use crate::error::AppError;

/// The adapter pair behind every page. Which variant exists is decided
/// once, from configuration; handlers only ever see `dyn Backend`.
pub enum BackendProvider {
    Mock(Arc<MockBackend>),
    /// Session-less template; each request clones it with the caller's
    /// token attached.
    Remote(RemoteBackend),
}

impl BackendProvider {
    pub fn for_session(&self, session: Option<&str>) -> Result<Arc<dyn Backend>, AppError> {
        match self {
            Self::Mock(backend) => Ok(backend.clone()),
            Self::Remote(template) => {
                let token = session.ok_or(AppError::Unauthorized)?;
                Ok(Arc::new(template.clone().with_session(token)))
            }
        }
    }
}

pub struct AppState {
    pub config: Config,
    pub backend: BackendProvider,
    pub auth: Arc<dyn AuthProvider>,
    pub credentials: Arc<dyn CredentialStore>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::from_config(Config::load()))
    }

    pub fn from_config(config: Config) -> Self {
        let (backend, auth, credentials): (
            BackendProvider,
            Arc<dyn AuthProvider>,
            Arc<dyn CredentialStore>,
        ) = match config.mode {
            BackendMode::Mock => {
                info!("Serving the embedded demo dataset");
                (
                    BackendProvider::Mock(Arc::new(MockBackend::new(Arc::new(Store::demo())))),
                    Arc::new(MockAuth),
                    Arc::new(MemoryCredentialStore::default()),
                )
            }
            BackendMode::Remote => {
                info!("Serving rows from {}", config.backend_url);
                let service_key = config
                    .backend_service_key
                    .clone()
                    .expect("remote mode requires the service key");
                (
                    BackendProvider::Remote(RemoteBackend::new(
                        &config.backend_url,
                        &config.backend_anon_key,
                    )),
                    Arc::new(RemoteAuth::new(&config.backend_url, &config.backend_anon_key)),
                    Arc::new(RemoteCredentialStore::new(&config.backend_url, service_key)),
                )
            }
        };

        Self {
            config,
            backend,
            auth,
            credentials,
            http: reqwest::Client::new(),
        }
    }
}
