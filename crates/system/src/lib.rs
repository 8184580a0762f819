//! `kinit-system`: records and forms of the system management pages.
//!
//! Departments and menus are tree nodes (see `kinit-hierarchy`); roles and
//! users are flat, paginated records. Every form is validated locally before
//! anything is sent to the backend.

pub mod catalog;
pub mod department;
pub mod menu;
pub mod role;
pub mod user;
pub mod validation;

pub use catalog::{ApiPermission, PermissionNode, all_keys, api_permissions, permission_tree};
pub use department::{Department, DepartmentForm, DeptQuery};
pub use menu::{Menu, MenuForm, MenuType, ensure_can_parent};
pub use role::{PermissionAssignment, RoleForm, RoleQuery, RoleRecord};
pub use user::{BOOTSTRAP_ADMIN, UserForm, UserQuery, UserRecord};
pub use validation::{FieldError, FormErrors, RecordForm};
