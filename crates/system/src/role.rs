use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use kinit_auth::{Permission, Role};
use kinit_core::{DomainError, Entity, EntityId, Status};

use crate::validation::{self, FormErrors, RecordForm, rule};

/// A role as listed by the role management page.
///
/// `code` is the value carried in a user's role set; the bootstrap
/// `super_admin` role is protected from edit, delete and disable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRecord {
    pub id: EntityId,
    pub name: String,
    pub code: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub sort: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default)]
    pub user_count: u32,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl Entity for RoleRecord {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl RoleRecord {
    pub fn is_protected(&self) -> bool {
        self.code.is_super_admin()
    }

    /// Fails for the bootstrap super-admin role.
    pub fn ensure_mutable(&self) -> Result<(), DomainError> {
        if self.is_protected() {
            Err(DomainError::protected(format!("role '{}'", self.code)))
        } else {
            Ok(())
        }
    }

    /// Fails when `status` would disable the bootstrap super-admin role.
    pub fn ensure_status_change(&self, status: Status) -> Result<(), DomainError> {
        if status.is_enabled() {
            Ok(())
        } else {
            self.ensure_mutable()
        }
    }
}

/// Query of the role list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleQuery {
    pub page: u32,
    pub page_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl Default for RoleQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
            keyword: None,
            status: None,
        }
    }
}

/// Create/edit payload of a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RoleForm {
    #[validate(length(min = 1, max = 50, message = "请输入角色名称（不超过50个字符）"))]
    pub name: String,

    #[validate(length(min = 1, max = 50, message = "请输入角色编码（不超过50个字符）"))]
    #[validate(custom(function = "role_code"))]
    pub code: String,

    #[validate(range(min = 0, max = 9999, message = "排序序号必须在0到9999之间"))]
    pub sort: i32,

    pub status: Status,

    #[validate(length(max = 200, message = "描述不能超过200个字符"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn role_code(code: &str) -> Result<(), ValidationError> {
    if code.is_empty() || validation::is_identifier(code) {
        Ok(())
    } else {
        Err(rule("code", "角色编码只能包含字母、数字和下划线"))
    }
}

impl Default for RoleForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            code: String::new(),
            sort: 0,
            status: Status::Enabled,
            description: None,
        }
    }
}

impl RoleForm {
    pub fn from_record(role: &RoleRecord) -> Self {
        Self {
            name: role.name.clone(),
            code: role.code.to_string(),
            sort: role.sort,
            status: role.status,
            description: role.description.clone(),
        }
    }
}

impl RecordForm for RoleForm {
    type Record = RoleRecord;

    fn check_update(&self, current: &RoleRecord) -> Result<(), FormErrors> {
        validation::all([
            validation::check(self),
            validation::unchanged(
                "code",
                "编辑时不能修改角色编码",
                &current.code.as_str(),
                &self.code.as_str(),
            ),
        ])
    }
}

/// Replacement permission list of a role: menu-tree keys plus API codes,
/// de-duplicated with first occurrence kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionAssignment {
    pub permissions: Vec<Permission>,
}

impl PermissionAssignment {
    pub fn new<I, P>(keys: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        let mut permissions: Vec<Permission> = Vec::new();
        for key in keys {
            let key = key.into();
            if !permissions.contains(&key) {
                permissions.push(key);
            }
        }
        Self { permissions }
    }

    /// Merge the checked menu keys with the selected API codes.
    pub fn merged(menu_keys: &[Permission], api_codes: &[Permission]) -> Self {
        Self::new(menu_keys.iter().chain(api_codes).cloned())
    }

    /// Split an existing list into (menu keys, API codes) for editing.
    pub fn split(permissions: &[Permission]) -> (Vec<Permission>, Vec<Permission>) {
        permissions
            .iter()
            .cloned()
            .partition(|p| !p.as_str().starts_with("api:"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(code: &'static str) -> RoleRecord {
        serde_json::from_value(serde_json::json!({
            "id": "1",
            "name": "角色",
            "code": code,
            "status": 1,
            "sort": 0,
            "userCount": 1,
            "permissions": ["*"]
        }))
        .unwrap()
    }

    #[test]
    fn super_admin_role_is_protected() {
        let root = role("super_admin");
        assert!(root.ensure_mutable().is_err());
        assert!(root.ensure_status_change(Status::Disabled).is_err());
        assert!(root.ensure_status_change(Status::Enabled).is_ok());

        let editor = role("editor");
        assert!(editor.ensure_mutable().is_ok());
        assert!(editor.ensure_status_change(Status::Disabled).is_ok());
    }

    #[test]
    fn code_rules() {
        let mut form = RoleForm {
            name: "审计员".into(),
            code: "auditor-1".into(),
            ..RoleForm::default()
        };
        assert!(form.check_create().unwrap_err().has("code"));

        form.code = "auditor_1".into();
        assert!(form.check_create().is_ok());
    }

    #[test]
    fn code_is_read_only_in_edit_mode() {
        let editor = role("editor");
        let mut form = RoleForm::from_record(&editor);
        assert!(form.check_update(&editor).is_ok());

        form.code = "writer".into();
        assert!(form.check_update(&editor).unwrap_err().has("code"));
    }

    #[test]
    fn assignment_merges_and_dedups() {
        let menu = [Permission::from("user:view"), Permission::from("api:user:*")];
        let api = [Permission::from("api:user:*"), Permission::from("api:role:*")];

        let assignment = PermissionAssignment::merged(&menu, &api);
        let codes: Vec<&str> = assignment.permissions.iter().map(Permission::as_str).collect();
        assert_eq!(codes, vec!["user:view", "api:user:*", "api:role:*"]);

        let (menu_keys, api_codes) = PermissionAssignment::split(&assignment.permissions);
        assert_eq!(menu_keys.len(), 1);
        assert_eq!(api_codes.len(), 2);
    }
}
