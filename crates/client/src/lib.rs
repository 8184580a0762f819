//! `kinit-client`: the console's side of the backend contract.
//!
//! - [`transport`] / [`http`]: how a request leaves the process.
//! - [`api`]: typed endpoints and envelope unwrapping.
//! - [`services`]: per-page flows (validate, call, notify, re-fetch).
//! - [`console`]: wiring of all of the above around one session.

pub mod api;
pub mod config;
pub mod console;
pub mod debounce;
pub mod envelope;
pub mod error;
pub mod http;
pub mod notice;
pub mod services;
pub mod transport;

pub use api::{ApiClient, LoginRequest, LoginResponse, MobileLoginRequest, TokenResponse};
pub use config::ClientConfig;
pub use console::Console;
pub use debounce::Debouncer;
pub use envelope::{Envelope, Page};
pub use error::{ClientError, TransportError};
pub use http::HttpTransport;
pub use notice::{LogNotifier, Notice, NoticeLevel, NoticeLog, Notifier};
pub use services::{
    AuthService, DeptService, ListView, MenuService, RoleService, TreeView, UserService,
};
pub use transport::{ApiRequest, ApiResponse, Method, Transport};
