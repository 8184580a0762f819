//! Route guard: decides, per navigation attempt, whether a route may render.
//!
//! Routes are declared in a typed [`RouteTable`]; the guard keeps no state of
//! its own and re-evaluates the session on every call.

use std::collections::HashMap;

use crate::{AuthzError, Evaluator, Locale, Message, Requirement, Session};

pub const APP_TITLE: &str = "Kinit React Admin";

/// Who may enter a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess {
    /// No guard at all (error pages).
    Public,
    /// Only for logged-out users (login page); logged-in users go to the landing route.
    GuestOnly,
    /// Requires a session, plus every listed requirement.
    Protected(Vec<Requirement>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    pub path: String,
    pub title: Option<String>,
    pub access: RouteAccess,
}

impl RouteRule {
    pub fn new(path: impl Into<String>, access: RouteAccess) -> Self {
        Self {
            path: path.into(),
            title: None,
            access,
        }
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Declarative mapping from path to access rule, plus alias redirects.
#[derive(Debug, Clone)]
pub struct RouteTable {
    rules: HashMap<String, RouteRule>,
    aliases: HashMap<String, String>,
    not_found: String,
}

impl RouteTable {
    pub fn new(not_found: impl Into<String>) -> Self {
        Self {
            rules: HashMap::new(),
            aliases: HashMap::new(),
            not_found: normalize(&not_found.into()),
        }
    }

    pub fn route(mut self, rule: RouteRule) -> Self {
        let path = normalize(&rule.path);
        self.rules.insert(path.clone(), RouteRule { path, ..rule });
        self
    }

    pub fn alias(mut self, from: &str, to: &str) -> Self {
        self.aliases.insert(normalize(from), normalize(to));
        self
    }

    /// The admin console's routes.
    pub fn admin_console() -> Self {
        fn screen(resource: &str) -> RouteAccess {
            RouteAccess::Protected(vec![Requirement::any_of([
                format!("{resource}:view"),
                format!("system:{resource}"),
            ])])
        }
        let signed_in = || RouteAccess::Protected(vec![]);

        Self::new("/404")
            .route(RouteRule::new("/login", RouteAccess::GuestOnly).titled("登录"))
            .route(RouteRule::new("/dashboard/workplace", signed_in()).titled("工作台"))
            .route(RouteRule::new("/dashboard/analysis", signed_in()).titled("分析页"))
            .route(RouteRule::new("/dashboard/map", signed_in()).titled("地图"))
            .route(RouteRule::new("/system/user", screen("user")).titled("用户管理"))
            .route(RouteRule::new("/system/role", screen("role")).titled("角色管理"))
            .route(RouteRule::new("/system/dept", screen("dept")).titled("部门管理"))
            .route(RouteRule::new("/system/menu", screen("menu")).titled("菜单管理"))
            .route(RouteRule::new("/reset", signed_in()).titled("重置密码"))
            .route(RouteRule::new("/403", RouteAccess::Public))
            .route(RouteRule::new("/404", RouteAccess::Public))
            .route(RouteRule::new("/500", RouteAccess::Public))
            .alias("/", "/dashboard/workplace")
            .alias("/dashboard", "/dashboard/workplace")
            .alias("/system", "/system/user")
    }

    /// Resolve a requested location to its rule. Unknown paths land on the not-found rule.
    pub fn resolve(&self, requested: &str) -> Option<&RouteRule> {
        let path = normalize(requested);
        let path = self.aliases.get(&path).unwrap_or(&path);
        self.rules.get(path).or_else(|| self.rules.get(&self.not_found))
    }

    /// Browser title for a location.
    pub fn page_title(&self, requested: &str) -> String {
        match self.resolve(requested).and_then(|r| r.title.as_deref()) {
            Some(title) => format!("{title} - {APP_TITLE}"),
            None => APP_TITLE.to_string(),
        }
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::admin_console()
    }
}

/// Outcome of one navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the (canonical) route.
    Allowed { path: String },
    /// Not logged in: go to login, remember where the user wanted to go.
    RedirectToLogin { login: String, return_to: String },
    /// Logged in but not permitted: show the notice, go to the forbidden view.
    Forbidden {
        redirect: String,
        notice: Message,
        reason: AuthzError,
    },
    /// Logged-in user hit a guest-only route.
    RedirectToLanding { landing: String },
}

impl GuardDecision {
    /// Where the router should end up.
    pub fn target(&self) -> &str {
        match self {
            GuardDecision::Allowed { path } => path,
            GuardDecision::RedirectToLogin { login, .. } => login,
            GuardDecision::Forbidden { redirect, .. } => redirect,
            GuardDecision::RedirectToLanding { landing } => landing,
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allowed { .. })
    }

    pub fn notice(&self) -> Option<Message> {
        match self {
            GuardDecision::Forbidden { notice, .. } => Some(*notice),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouteGuard {
    table: RouteTable,
    login_path: String,
    landing_path: String,
    forbidden_path: String,
    locale: Locale,
}

impl RouteGuard {
    pub fn new(table: RouteTable) -> Self {
        Self {
            table,
            login_path: "/login".to_string(),
            landing_path: "/dashboard/workplace".to_string(),
            forbidden_path: "/403".to_string(),
            locale: Locale::default(),
        }
    }

    pub fn with_paths(
        mut self,
        login: impl Into<String>,
        landing: impl Into<String>,
        forbidden: impl Into<String>,
    ) -> Self {
        self.login_path = login.into();
        self.landing_path = landing.into();
        self.forbidden_path = forbidden.into();
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Evaluate a navigation attempt against the current session.
    pub fn check(&self, session: &Session, requested: &str) -> GuardDecision {
        let Some(rule) = self.table.resolve(requested) else {
            // A table without a not-found rule: nothing to guard.
            return GuardDecision::Allowed {
                path: normalize(requested),
            };
        };

        match &rule.access {
            RouteAccess::Public => GuardDecision::Allowed {
                path: rule.path.clone(),
            },
            RouteAccess::GuestOnly if session.is_logged_in() => GuardDecision::RedirectToLanding {
                landing: self.landing_path.clone(),
            },
            RouteAccess::GuestOnly => GuardDecision::Allowed {
                path: rule.path.clone(),
            },
            RouteAccess::Protected(_) if !session.is_logged_in() => {
                tracing::debug!(path = %rule.path, "navigation requires login");
                GuardDecision::RedirectToLogin {
                    login: self.login_path.clone(),
                    return_to: requested.to_string(),
                }
            }
            RouteAccess::Protected(requirements) => {
                // Permission requirements are reported before role requirements.
                let (roles, permissions): (Vec<_>, Vec<_>) = requirements
                    .iter()
                    .cloned()
                    .partition(Requirement::is_role_requirement);

                let evaluator = Evaluator::new(session);
                let outcome = evaluator
                    .permits(&permissions)
                    .map_err(|e| (e, Message::PageForbidden))
                    .and_then(|()| {
                        evaluator
                            .permits(&roles)
                            .map_err(|e| (e, Message::RoleForbidden))
                    });

                match outcome {
                    Ok(()) => GuardDecision::Allowed {
                        path: rule.path.clone(),
                    },
                    Err((reason, notice)) => {
                        tracing::debug!(path = %rule.path, %reason, "navigation denied");
                        GuardDecision::Forbidden {
                            redirect: self.forbidden_path.clone(),
                            notice,
                            reason,
                        }
                    }
                }
            }
        }
    }

    /// Text of a decision's notice in the guard's locale.
    pub fn notice_text(&self, decision: &GuardDecision) -> Option<&'static str> {
        decision.notice().map(|m| m.text(self.locale))
    }
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new(RouteTable::admin_console())
    }
}

/// Strip query/fragment and trailing slashes; the root stays `/`.
fn normalize(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
