//! Composition root of a console host.

use std::sync::Arc;

use kinit_auth::{GuardDecision, RouteGuard, RouteTable, SessionStore};

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::debounce::Debouncer;
use crate::error::ClientError;
use crate::http::HttpTransport;
use crate::notice::{LogNotifier, Notice, Notifier};
use crate::services::{AuthService, DeptService, MenuService, Reporter, RoleService, UserService};
use crate::transport::Transport;

/// Wires configuration, the session, the route guard, the API client and the
/// notice sink together, and hands out page services that share them.
#[derive(Clone)]
pub struct Console {
    config: ClientConfig,
    session: SessionStore,
    guard: RouteGuard,
    api: ApiClient,
    notifier: Arc<dyn Notifier>,
}

impl Console {
    /// Console over HTTP, notices going to the log.
    pub fn connect(config: ClientConfig) -> Result<Self, ClientError> {
        let transport = HttpTransport::new(&config)?;
        let notifier = LogNotifier {
            locale: config.locale,
        };
        Ok(Self::new(config, Arc::new(transport), Arc::new(notifier)))
    }

    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::with_session(config, transport, notifier, SessionStore::new())
    }

    /// Same as [`new`](Self::new), resuming an existing session.
    pub fn with_session(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        notifier: Arc<dyn Notifier>,
        session: SessionStore,
    ) -> Self {
        let guard = RouteGuard::new(RouteTable::admin_console())
            .with_paths(
                config.login_path.clone(),
                config.landing_path.clone(),
                config.forbidden_path.clone(),
            )
            .with_locale(config.locale);
        let api = ApiClient::new(transport, session.clone());
        tracing::debug!(
            base_url = %config.base_url,
            locale = ?config.locale,
            "console initialised"
        );

        Self {
            config,
            session,
            guard,
            api,
            notifier,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Evaluate a navigation attempt; a denial raises its notice.
    pub fn navigate(&self, path: &str) -> GuardDecision {
        let decision = self.guard.check(&self.session.snapshot(), path);
        if let Some(message) = decision.notice() {
            self.notifier.notify(Notice::warning(message));
        }
        decision
    }

    /// Browser-tab title for `path`.
    pub fn page_title(&self, path: &str) -> String {
        self.guard.table().page_title(path)
    }

    /// Debouncer for keyword inputs, using the configured quiet period.
    pub fn search_debouncer(&self) -> Debouncer {
        Debouncer::new(self.config.search_debounce)
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.api.clone(), self.reporter(), self.config.landing_path.clone())
    }

    pub fn departments(&self) -> DeptService {
        DeptService::new(self.api.clone(), self.reporter())
    }

    pub fn menus(&self) -> MenuService {
        MenuService::new(self.api.clone(), self.reporter())
    }

    pub fn roles(&self) -> RoleService {
        RoleService::new(self.api.clone(), self.reporter())
    }

    pub fn users(&self) -> UserService {
        UserService::new(self.api.clone(), self.reporter())
    }

    fn reporter(&self) -> Reporter {
        Reporter::new(self.notifier.clone())
    }
}
