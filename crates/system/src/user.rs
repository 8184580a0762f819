use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use kinit_core::{DomainError, Entity, EntityId, Status};

use crate::validation::{self, FormErrors, RecordForm, rule};

/// Username of the bootstrap administrator account.
pub const BOOTSTRAP_ADMIN: &str = "admin";

/// A user account as listed by the user management page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: EntityId,
    pub username: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub dept_id: Option<EntityId>,
    #[serde(default)]
    pub dept_name: String,
    #[serde(default)]
    pub role_ids: Vec<EntityId>,
    #[serde(default)]
    pub role_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_time: Option<String>,
}

impl Entity for UserRecord {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl UserRecord {
    pub fn is_protected(&self) -> bool {
        self.username == BOOTSTRAP_ADMIN
    }

    /// Fails for the bootstrap administrator account.
    pub fn ensure_mutable(&self) -> Result<(), DomainError> {
        if self.is_protected() {
            Err(DomainError::protected(format!("user '{}'", self.username)))
        } else {
            Ok(())
        }
    }

    pub fn ensure_status_change(&self, status: Status) -> Result<(), DomainError> {
        if status.is_enabled() {
            Ok(())
        } else {
            self.ensure_mutable()
        }
    }
}

/// Query of the user list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub page: u32,
    pub page_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dept_id: Option<EntityId>,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
            keyword: None,
            status: None,
            dept_id: None,
        }
    }
}

/// Create/edit payload of a user account.
///
/// `password` is only sent (and required) on create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "account_rules", skip_on_field_errors = false))]
pub struct UserForm {
    #[validate(length(min = 3, max = 20, message = "用户名长度为3到20个字符"))]
    #[validate(custom(function = "username"))]
    pub username: String,

    #[validate(length(min = 1, max = 50, message = "请输入昵称（不超过50个字符）"))]
    pub nickname: String,

    #[validate(length(min = 6, max = 20, message = "密码长度为6到20个字符"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default)]
    pub dept_id: Option<EntityId>,

    #[serde(default)]
    pub role_ids: Vec<EntityId>,

    #[validate(custom(function = "phone"))]
    pub phone: String,

    #[validate(email(message = "请输入正确的邮箱地址"))]
    pub email: String,

    pub status: Status,

    #[validate(length(max = 200, message = "备注不能超过200个字符"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

fn username(value: &str) -> Result<(), ValidationError> {
    if validation::is_identifier(value) {
        Ok(())
    } else {
        Err(rule("username", "用户名只能包含字母、数字和下划线"))
    }
}

fn phone(value: &str) -> Result<(), ValidationError> {
    if validation::is_phone(value) {
        Ok(())
    } else {
        Err(rule("phone", "请输入正确的手机号"))
    }
}

fn account_rules(form: &UserForm) -> Result<(), ValidationError> {
    if form.dept_id.is_none() {
        return Err(rule("deptId", "请选择所属部门"));
    }
    if form.role_ids.is_empty() {
        return Err(rule("roleIds", "请选择角色"));
    }
    Ok(())
}

impl Default for UserForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            nickname: String::new(),
            password: None,
            dept_id: None,
            role_ids: Vec::new(),
            phone: String::new(),
            email: String::new(),
            status: Status::Enabled,
            remark: None,
        }
    }
}

impl UserForm {
    /// Form pre-filled from an existing account; the password is never pre-filled.
    pub fn from_record(user: &UserRecord) -> Self {
        Self {
            username: user.username.clone(),
            nickname: user.nickname.clone(),
            password: None,
            dept_id: user.dept_id.clone(),
            role_ids: user.role_ids.clone(),
            phone: user.phone.clone(),
            email: user.email.clone(),
            status: user.status,
            remark: None,
        }
    }
}

impl RecordForm for UserForm {
    type Record = UserRecord;

    fn check_create(&self) -> Result<(), FormErrors> {
        let password = match self.password.as_deref() {
            None | Some("") => Err(FormErrors::single("password", "请输入初始密码")),
            Some(_) => Ok(()),
        };
        validation::all([validation::check(self), password])
    }

    fn check_update(&self, current: &UserRecord) -> Result<(), FormErrors> {
        validation::all([
            validation::check(self),
            validation::unchanged(
                "username",
                "编辑时不能修改用户名",
                &current.username,
                &self.username,
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(username: &str) -> UserRecord {
        serde_json::from_value(serde_json::json!({
            "id": 2,
            "username": username,
            "nickname": "测试",
            "email": "test@kinit.dev",
            "phone": "13900139000",
            "status": 1,
            "deptId": "1-1",
            "deptName": "技术部",
            "roleIds": ["2"],
            "roleNames": ["系统管理员"]
        }))
        .unwrap()
    }

    fn create_form() -> UserForm {
        UserForm {
            username: "zhang_san".into(),
            nickname: "张三".into(),
            password: Some("123456".into()),
            dept_id: Some(EntityId::from("1-1")),
            role_ids: vec![EntityId::from("2")],
            phone: "13800138000".into(),
            email: "zhangsan@kinit.dev".into(),
            ..UserForm::default()
        }
    }

    #[test]
    fn numeric_ids_decode() {
        assert_eq!(record("test").id, EntityId::from("2"));
    }

    #[test]
    fn bootstrap_admin_is_protected() {
        assert!(record(BOOTSTRAP_ADMIN).ensure_mutable().is_err());
        assert!(record(BOOTSTRAP_ADMIN).ensure_status_change(Status::Disabled).is_err());
        assert!(record("test").ensure_mutable().is_ok());
    }

    #[test]
    fn create_requires_password_and_assignments() {
        assert!(create_form().check_create().is_ok());

        let form = UserForm {
            password: None,
            dept_id: None,
            username: "ab".into(),
            phone: "110".into(),
            ..create_form()
        };
        let errors = form.check_create().unwrap_err();
        for field in ["password", "deptId", "username", "phone"] {
            assert!(errors.has(field), "missing error for {field}: {errors}");
        }

        let no_roles = UserForm {
            role_ids: Vec::new(),
            ..create_form()
        };
        assert!(no_roles.check_create().unwrap_err().has("roleIds"));
    }

    #[test]
    fn update_skips_password_but_locks_username() {
        let current = record("test");
        let mut form = UserForm::from_record(&current);
        assert!(form.check_update(&current).is_ok());

        form.username = "renamed".into();
        assert!(form.check_update(&current).unwrap_err().has("username"));
    }
}
