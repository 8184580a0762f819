use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use kinit_core::EntityId;

use crate::{Permission, Role};

/// Identity of the signed-in user, as returned by `/auth/login` and `/auth/info`.
///
/// `roles` and `permissions` are sets; the backend may omit `permissions`
/// entirely, which is treated as "no permissions".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: EntityId,
    pub username: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub roles: HashSet<Role>,
    #[serde(default)]
    pub permissions: HashSet<Permission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dept_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dept_name: Option<String>,
}

impl UserInfo {
    /// Minimal identity (used by tests and by hosts that build sessions locally).
    pub fn new(
        id: EntityId,
        username: impl Into<String>,
        roles: impl IntoIterator<Item = Role>,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Self {
        let username = username.into();
        Self {
            id,
            nickname: username.clone(),
            username,
            avatar: None,
            email: None,
            phone: None,
            roles: roles.into_iter().collect(),
            permissions: permissions.into_iter().collect(),
            dept_id: None,
            dept_name: None,
        }
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }

    pub fn holds(&self, permission: &Permission) -> bool {
        self.permissions.contains(permission)
    }

    pub fn has_wildcard(&self) -> bool {
        self.permissions.contains(&Permission::WILDCARD)
    }

    /// Display name: nickname when present, username otherwise.
    pub fn display_name(&self) -> &str {
        if self.nickname.is_empty() {
            &self.username
        } else {
            &self.nickname
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_login_payload_without_permissions() {
        let json = r#"{
            "id": "7",
            "username": "alice",
            "nickname": "Alice",
            "roles": ["user"]
        }"#;

        let user: UserInfo = serde_json::from_str(json).unwrap();
        assert!(user.has_role(&Role::new("user")));
        assert!(user.permissions.is_empty());
        assert_eq!(user.display_name(), "Alice");
    }

    #[test]
    fn decodes_camel_case_dept_fields() {
        let json = r#"{
            "id": 1,
            "username": "admin",
            "roles": ["super_admin"],
            "permissions": ["*"],
            "deptId": "1",
            "deptName": "HQ"
        }"#;

        let user: UserInfo = serde_json::from_str(json).unwrap();
        assert!(user.has_wildcard());
        assert_eq!(user.dept_id.as_ref().map(EntityId::as_str), Some("1"));
        assert_eq!(user.display_name(), "admin");
    }
}
