//! User-visible notice texts, per locale.

use serde::{Deserialize, Serialize};

/// UI language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "en-US")]
    EnUs,
}

impl Locale {
    /// Parse a BCP-47-ish tag (`zh-CN`, `en_US`, `en`...). Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim().to_ascii_lowercase().replace('_', "-");
        match tag.as_str() {
            "zh" | "zh-cn" => Some(Locale::ZhCn),
            "en" | "en-us" => Some(Locale::EnUs),
            _ => None,
        }
    }
}

/// Every notice the console can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message {
    PageForbidden,
    RoleForbidden,
    InvalidCredentials,
    SessionExpired,
    LoginSucceeded,
    LoggedOut,
    Created,
    Updated,
    Deleted,
    BatchDeleted,
    StatusUpdated,
    PermissionsUpdated,
    NothingSelected,
    LoadFailed,
    CreateFailed,
    UpdateFailed,
    DeleteFailed,
    StatusUpdateFailed,
    RequestFailed,
    AccessDenied,
    ResourceNotFound,
    ServerError,
    NetworkError,
    ProtectedRecord,
    HasChildren,
}

impl Message {
    pub fn text(self, locale: Locale) -> &'static str {
        match locale {
            Locale::ZhCn => self.zh_cn(),
            Locale::EnUs => self.en_us(),
        }
    }

    fn zh_cn(self) -> &'static str {
        match self {
            Message::PageForbidden => "您没有权限访问该页面",
            Message::RoleForbidden => "您的角色无法访问该页面",
            Message::InvalidCredentials => "用户名或密码错误",
            Message::SessionExpired => "未授权",
            Message::LoginSucceeded => "登录成功",
            Message::LoggedOut => "登出成功",
            Message::Created => "创建成功",
            Message::Updated => "更新成功",
            Message::Deleted => "删除成功",
            Message::BatchDeleted => "批量删除成功",
            Message::StatusUpdated => "状态更新成功",
            Message::PermissionsUpdated => "权限已更新",
            Message::NothingSelected => "请选择要删除的记录",
            Message::LoadFailed => "加载数据失败",
            Message::CreateFailed => "创建失败",
            Message::UpdateFailed => "更新失败",
            Message::DeleteFailed => "删除失败",
            Message::StatusUpdateFailed => "状态更新失败",
            Message::RequestFailed => "请求失败",
            Message::AccessDenied => "没有权限访问",
            Message::ResourceNotFound => "请求的资源不存在",
            Message::ServerError => "服务器错误",
            Message::NetworkError => "网络错误",
            Message::ProtectedRecord => "超级管理员不可修改",
            Message::HasChildren => "存在下级节点，无法删除",
        }
    }

    fn en_us(self) -> &'static str {
        match self {
            Message::PageForbidden => "You do not have permission to access this page",
            Message::RoleForbidden => "Your role cannot access this page",
            Message::InvalidCredentials => "Incorrect username or password",
            Message::SessionExpired => "Unauthorized",
            Message::LoginSucceeded => "Signed in",
            Message::LoggedOut => "Signed out",
            Message::Created => "Created",
            Message::Updated => "Updated",
            Message::Deleted => "Deleted",
            Message::BatchDeleted => "Batch delete succeeded",
            Message::StatusUpdated => "Status updated",
            Message::PermissionsUpdated => "Permissions updated",
            Message::NothingSelected => "Select the records to delete",
            Message::LoadFailed => "Failed to load data",
            Message::CreateFailed => "Create failed",
            Message::UpdateFailed => "Update failed",
            Message::DeleteFailed => "Delete failed",
            Message::StatusUpdateFailed => "Status update failed",
            Message::RequestFailed => "Request failed",
            Message::AccessDenied => "Access denied",
            Message::ResourceNotFound => "The requested resource does not exist",
            Message::ServerError => "Server error",
            Message::NetworkError => "Network error",
            Message::ProtectedRecord => "The super administrator cannot be modified",
            Message::HasChildren => "The node has children and cannot be deleted",
        }
    }
}
