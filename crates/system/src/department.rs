use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use kinit_core::{Entity, EntityId, Status};
use kinit_hierarchy::TreeNode;

use crate::validation::{self, FormErrors, RecordForm, rule};

/// Department node of the organization tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: EntityId,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub parent_id: Option<EntityId>,
    #[serde(default)]
    pub sort: i32,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Department>>,
}

impl Entity for Department {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl TreeNode for Department {
    fn parent_id(&self) -> Option<&EntityId> {
        self.parent_id.as_ref()
    }

    fn sort_key(&self) -> i32 {
        self.sort
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.code]
    }

    fn children(&self) -> Option<&[Self]> {
        self.children.as_deref()
    }

    fn children_mut(&mut self) -> &mut Option<Vec<Self>> {
        &mut self.children
    }
}

/// Query of the department tree endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeptQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl DeptQuery {
    pub fn keyword(keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        Self {
            keyword: (!keyword.is_empty()).then_some(keyword),
            status: None,
        }
    }
}

/// Create/edit payload of a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "contact_rules", skip_on_field_errors = false))]
pub struct DepartmentForm {
    #[validate(length(min = 1, max = 50, message = "请输入部门名称（不超过50个字符）"))]
    pub name: String,

    #[validate(length(min = 1, max = 50, message = "请输入部门编码（不超过50个字符）"))]
    #[validate(custom(function = "dept_code"))]
    pub code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<EntityId>,

    #[validate(range(min = 0, max = 9999, message = "排序序号必须在0到9999之间"))]
    pub sort: i32,

    pub status: Status,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[validate(email(message = "请输入正确的邮箱地址"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[validate(length(max = 200, message = "备注不能超过200个字符"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

fn dept_code(code: &str) -> Result<(), ValidationError> {
    if code.is_empty() || validation::is_dept_code(code) {
        Ok(())
    } else {
        Err(rule("code", "部门编码只能包含字母、数字、下划线和横线"))
    }
}

fn contact_rules(form: &DepartmentForm) -> Result<(), ValidationError> {
    match form.phone.as_deref() {
        Some(phone) if !phone.is_empty() && !validation::is_phone(phone) => {
            Err(rule("phone", "请输入正确的手机号码"))
        }
        _ => Ok(()),
    }
}

impl Default for DepartmentForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            code: String::new(),
            parent_id: None,
            sort: 0,
            status: Status::Enabled,
            leader: None,
            phone: None,
            email: None,
            remark: None,
        }
    }
}

impl DepartmentForm {
    /// Blank form for a new child of `parent`; the parent is fixed.
    pub fn child_of(parent: &Department) -> Self {
        Self {
            parent_id: Some(parent.id.clone()),
            ..Self::default()
        }
    }

    /// Form pre-filled from an existing department (edit mode).
    pub fn from_record(dept: &Department) -> Self {
        Self {
            name: dept.name.clone(),
            code: dept.code.clone(),
            parent_id: dept.parent_id.clone(),
            sort: dept.sort,
            status: dept.status,
            leader: dept.leader.clone(),
            phone: dept.phone.clone(),
            email: dept.email.clone(),
            remark: dept.remark.clone(),
        }
    }
}

impl RecordForm for DepartmentForm {
    type Record = Department;

    fn check_update(&self, current: &Department) -> Result<(), FormErrors> {
        validation::all([
            validation::check(self),
            validation::unchanged(
                "parentId",
                "编辑时不能修改上级部门",
                &current.parent_id,
                &self.parent_id,
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headquarter() -> Department {
        serde_json::from_value(serde_json::json!({
            "id": "1",
            "name": "总公司",
            "code": "headquarter",
            "parentId": null,
            "sort": 0,
            "status": 1,
            "leader": "张三",
            "createTime": "2024-01-01 00:00:00",
            "children": [{
                "id": "1-1",
                "name": "技术部",
                "code": "tech",
                "parentId": "1",
                "sort": 0,
                "status": 1
            }]
        }))
        .unwrap()
    }

    fn valid_form() -> DepartmentForm {
        DepartmentForm {
            name: "测试部".into(),
            code: "qa-team".into(),
            ..DepartmentForm::default()
        }
    }

    #[test]
    fn decodes_backend_tree() {
        let dept = headquarter();
        assert_eq!(dept.children().map(<[_]>::len), Some(1));
        assert!(dept.children.as_ref().unwrap()[0].children.is_none());
        assert_eq!(dept.search_fields(), vec!["总公司", "headquarter"]);
    }

    #[test]
    fn accepts_a_valid_form() {
        assert!(valid_form().check_create().is_ok());

        let with_contact = DepartmentForm {
            phone: Some("13800138000".into()),
            email: Some("qa@kinit.dev".into()),
            ..valid_form()
        };
        assert!(with_contact.check_create().is_ok());
    }

    #[test]
    fn reports_each_broken_field() {
        let form = DepartmentForm {
            name: String::new(),
            code: "bad code".into(),
            sort: 10_000,
            phone: Some("123".into()),
            email: Some("not-an-email".into()),
            remark: Some("x".repeat(201)),
            ..DepartmentForm::default()
        };

        let errors = form.check_create().unwrap_err();
        for field in ["name", "code", "sort", "phone", "email", "remark"] {
            assert!(errors.has(field), "missing error for {field}: {errors}");
        }
        assert_eq!(errors.message_for("phone"), Some("请输入正确的手机号码"));
    }

    #[test]
    fn child_form_fixes_parent_in_edit_mode() {
        let parent = headquarter();
        let child = DepartmentForm::child_of(&parent);
        assert_eq!(child.parent_id, Some(EntityId::from("1")));

        let tech = parent.children.as_ref().unwrap()[0].clone();
        let mut edit = DepartmentForm::from_record(&tech);
        assert!(edit.check_update(&tech).is_ok());

        edit.parent_id = None;
        let errors = edit.check_update(&tech).unwrap_err();
        assert!(errors.has("parentId"));
    }
}
