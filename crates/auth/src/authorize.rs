use serde::Serialize;
use thiserror::Error;

use crate::{Permission, Role, Session, UserInfo};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("not authenticated")]
    NotAuthenticated,

    #[error("forbidden: requires {0}")]
    MissingPermission(String),

    #[error("forbidden: requires {0}")]
    MissingRole(String),
}

/// A boolean predicate over the current user's roles/permissions.
///
/// Requirements are evaluated, never stored on the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "codes", rename_all = "snake_case")]
pub enum Requirement {
    /// Satisfied if the user holds at least one of the permissions.
    AnyOf(Vec<Permission>),
    /// Satisfied only if the user holds every permission.
    AllOf(Vec<Permission>),
    /// Satisfied if the user has at least one of the roles.
    AnyRole(Vec<Role>),
}

impl Requirement {
    pub fn any_of<I, P>(codes: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        Self::AnyOf(codes.into_iter().map(Into::into).collect())
    }

    pub fn all_of<I, P>(codes: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        Self::AllOf(codes.into_iter().map(Into::into).collect())
    }

    pub fn any_role<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        Self::AnyRole(roles.into_iter().map(Into::into).collect())
    }

    /// An empty list declares "no requirement" when attached to a route or element.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::AnyOf(codes) | Self::AllOf(codes) => codes.is_empty(),
            Self::AnyRole(roles) => roles.is_empty(),
        }
    }

    pub fn is_role_requirement(&self) -> bool {
        matches!(self, Self::AnyRole(_))
    }

    fn denial(&self) -> AuthzError {
        if self.is_role_requirement() {
            AuthzError::MissingRole(self.to_string())
        } else {
            AuthzError::MissingPermission(self.to_string())
        }
    }
}

impl core::fmt::Display for Requirement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        fn join<T: core::fmt::Display>(items: &[T]) -> String {
            items.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
        }

        match self {
            Self::AnyOf(codes) => write!(f, "any permission of [{}]", join(codes)),
            Self::AllOf(codes) => write!(f, "all permissions of [{}]", join(codes)),
            Self::AnyRole(roles) => write!(f, "any role of [{}]", join(roles)),
        }
    }
}

/// Permission evaluator over a session snapshot.
///
/// - No IO
/// - No panics
/// - A logged-out session satisfies nothing
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    user: Option<&'a UserInfo>,
}

impl<'a> Evaluator<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self {
            user: session.user(),
        }
    }

    pub fn for_user(user: &'a UserInfo) -> Self {
        Self { user: Some(user) }
    }

    pub fn is_super_admin(&self) -> bool {
        self.user.is_some_and(|u| u.has_role(&Role::SUPER_ADMIN))
    }

    /// Wildcard permission or super-admin role.
    fn bypasses_permissions(&self) -> bool {
        self.is_super_admin() || self.user.is_some_and(UserInfo::has_wildcard)
    }

    pub fn has_permission(&self, code: &Permission) -> bool {
        self.bypasses_permissions() || self.user.is_some_and(|u| u.holds(code))
    }

    pub fn has_any_permission(&self, codes: &[Permission]) -> bool {
        if self.bypasses_permissions() {
            return true;
        }
        self.user.is_some_and(|u| codes.iter().any(|c| u.holds(c)))
    }

    /// Vacuously true for an empty list.
    pub fn has_all_permissions(&self, codes: &[Permission]) -> bool {
        if self.bypasses_permissions() {
            return true;
        }
        codes.iter().all(|c| self.user.is_some_and(|u| u.holds(c)))
    }

    /// Plain membership check: a wildcard permission does not pass role checks.
    pub fn has_role(&self, role: &Role) -> bool {
        self.user.is_some_and(|u| u.has_role(role))
    }

    /// Plain intersection check, same rule as [`has_role`](Self::has_role).
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|r| self.has_role(r))
    }

    pub fn satisfies(&self, requirement: &Requirement) -> bool {
        match requirement {
            Requirement::AnyOf(codes) => self.has_any_permission(codes),
            Requirement::AllOf(codes) => self.has_all_permissions(codes),
            Requirement::AnyRole(roles) => self.has_any_role(roles),
        }
    }

    /// Check a conjunction of requirements.
    ///
    /// Super-admins pass unconditionally; empty requirements are skipped.
    /// The error names the first requirement that failed.
    pub fn permits(&self, requirements: &[Requirement]) -> Result<(), AuthzError> {
        if self.user.is_none() {
            return Err(AuthzError::NotAuthenticated);
        }
        if self.is_super_admin() {
            return Ok(());
        }

        match requirements
            .iter()
            .filter(|r| !r.is_empty())
            .find(|r| !self.satisfies(r))
        {
            Some(failed) => Err(failed.denial()),
            None => Ok(()),
        }
    }

    /// Explain why a requirement is (or would be) granted or denied.
    pub fn explain(&self, requirement: &Requirement) -> AccessExplanation {
        let Some(user) = self.user else {
            return AccessExplanation {
                requirement: requirement.to_string(),
                granted: false,
                reason: "no user is signed in".to_string(),
                missing: Vec::new(),
                super_admin: false,
                has_wildcard: false,
            };
        };

        let super_admin = self.is_super_admin();
        let has_wildcard = user.has_wildcard();
        let granted = self.satisfies(requirement);

        let missing: Vec<String> = match requirement {
            Requirement::AnyOf(codes) | Requirement::AllOf(codes) if !granted => codes
                .iter()
                .filter(|c| !user.holds(c))
                .map(ToString::to_string)
                .collect(),
            Requirement::AnyRole(roles) if !granted => {
                roles.iter().map(ToString::to_string).collect()
            }
            _ => Vec::new(),
        };

        let reason = match (granted, requirement) {
            (true, Requirement::AnyRole(_)) => "user has one of the required roles".to_string(),
            (true, _) if super_admin => "user has the super-admin role".to_string(),
            (true, _) if has_wildcard => "user holds the wildcard permission '*'".to_string(),
            (true, _) => "user holds the required permissions".to_string(),
            (false, Requirement::AnyRole(_)) if has_wildcard => {
                "wildcard permission does not grant roles; user has none of the required roles"
                    .to_string()
            }
            (false, Requirement::AnyRole(_)) => "user has none of the required roles".to_string(),
            (false, _) => format!("user is missing {}", missing.join(", ")),
        };

        AccessExplanation {
            requirement: requirement.to_string(),
            granted,
            reason,
            missing,
            super_admin,
            has_wildcard,
        }
    }
}

/// Detailed, serializable explanation of an access decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessExplanation {
    pub requirement: String,
    pub granted: bool,
    pub reason: String,
    pub missing: Vec<String>,
    pub super_admin: bool,
    pub has_wildcard: bool,
}

/// Element-level visibility rule (buttons, table actions).
///
/// A denied element is simply hidden or disabled; no navigation happens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementGuard {
    pub permissions: Vec<Permission>,
    pub roles: Vec<Role>,
    /// Require every permission instead of any one.
    pub match_all: bool,
}

impl ElementGuard {
    pub fn permissions<I, P>(codes: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        Self {
            permissions: codes.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_roles<I, R>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    pub fn match_all(mut self) -> Self {
        self.match_all = true;
        self
    }

    pub fn requirements(&self) -> Vec<Requirement> {
        let permissions = if self.match_all {
            Requirement::AllOf(self.permissions.clone())
        } else {
            Requirement::AnyOf(self.permissions.clone())
        };
        vec![permissions, Requirement::AnyRole(self.roles.clone())]
    }

    pub fn is_visible(&self, evaluator: &Evaluator<'_>) -> bool {
        evaluator.permits(&self.requirements()).is_ok()
    }
}
