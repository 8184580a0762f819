//! `kinit-auth`: session state, permission evaluation and route guarding.
//!
//! This crate is intentionally decoupled from HTTP and storage: it only reads
//! the injected [`SessionStore`].

pub mod authorize;
pub mod guard;
pub mod messages;
pub mod permissions;
pub mod principal;
pub mod roles;
pub mod session;

pub use authorize::{AccessExplanation, AuthzError, ElementGuard, Evaluator, Requirement};
pub use guard::{GuardDecision, RouteAccess, RouteGuard, RouteRule, RouteTable};
pub use messages::{Locale, Message};
pub use permissions::Permission;
pub use principal::UserInfo;
pub use roles::Role;
pub use session::{Session, SessionStore};
