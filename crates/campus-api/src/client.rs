//! CampusClient: the composition root.
//!
//! Owns one session per client and injects it, with the locale store and
//! transport, into every collaborator.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use campus_core::errors::{CampusResult, StorageError};
use campus_core::models::{Locale, SessionSnapshot};
use campus_core::traits::{KeyValueStore, Transport};
use campus_core::ClientConfig;
use campus_session::{resolve_route, RouteDecision, SessionController};
use campus_storage::{LocaleStore, SqliteStore, TokenStore};
use campus_transport::{AuthApi, HttpClient, ReqwestTransport};

use crate::notices::NoticeBoard;
use crate::resources::ResourceApi;

pub struct CampusClient<T: Transport> {
    config: ClientConfig,
    session: Arc<SessionController>,
    http: Arc<HttpClient<T>>,
    auth: AuthApi<T>,
    resources: ResourceApi<T>,
    notices: NoticeBoard,
    locale: LocaleStore,
}

impl CampusClient<ReqwestTransport> {
    /// Client over HTTP, persisting local state in a SQLite file.
    pub fn open(config: ClientConfig, state_path: &Path) -> CampusResult<Self> {
        config.validate()?;
        let store = SqliteStore::open(state_path)?;
        let transport = ReqwestTransport::new(&config)?;
        info!(path = %state_path.display(), base_url = %config.base_url, "client: opened");
        Ok(Self::new(config, Arc::new(store), transport))
    }
}

impl<T: Transport> CampusClient<T> {
    /// Assemble a client and initialize its session from `store`.
    pub fn new(config: ClientConfig, store: Arc<dyn KeyValueStore>, transport: T) -> Self {
        let locale = LocaleStore::new(store.clone(), Locale::new(config.default_locale.as_str()));
        let session = Arc::new(SessionController::new(TokenStore::new(store)));
        session.initialize();

        let http = Arc::new(HttpClient::new(
            transport,
            config.clone(),
            Arc::clone(&session),
            locale.clone(),
        ));
        Self {
            auth: AuthApi::new(Arc::clone(&http)),
            resources: ResourceApi::new(Arc::clone(&http)),
            notices: NoticeBoard::new(config.notice_ttl()),
            config,
            session,
            http,
            locale,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionController> {
        &self.session
    }

    pub fn http(&self) -> &Arc<HttpClient<T>> {
        &self.http
    }

    pub fn auth(&self) -> &AuthApi<T> {
        &self.auth
    }

    pub fn resources(&self) -> &ResourceApi<T> {
        &self.resources
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    /// What to render for a browser path right now.
    pub fn route(&self, path: &str) -> RouteDecision {
        resolve_route(path, &self.session.snapshot())
    }

    pub fn locale(&self) -> Locale {
        self.locale.get()
    }

    /// Persist the locale preference. Takes effect on the next request.
    pub fn set_locale(&self, locale: &Locale) -> Result<(), StorageError> {
        self.locale.set(locale)
    }
}
