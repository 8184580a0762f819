//! Transient user notices (toasts).

use std::sync::{Arc, Mutex};

use kinit_auth::{Locale, Message};

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: Message,
    /// Backend-provided text shown instead of the generic message.
    pub detail: Option<String>,
}

impl Notice {
    pub fn success(message: Message) -> Self {
        Self {
            level: NoticeLevel::Success,
            message,
            detail: None,
        }
    }

    pub fn warning(message: Message) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message,
            detail: None,
        }
    }

    /// Error notice for `err`; `fallback` names the failed operation.
    pub fn from_error(err: &ClientError, fallback: Message) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: err.notice(fallback),
            detail: err.detail().map(str::to_string),
        }
    }

    pub fn text(&self, locale: Locale) -> String {
        match &self.detail {
            Some(detail) => detail.clone(),
            None => self.message.text(locale).to_string(),
        }
    }
}

/// Receives notices raised by the orchestration layer.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Writes notices to the log only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier {
    pub locale: Locale,
}

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        let text = notice.text(self.locale);
        match notice.level {
            NoticeLevel::Error => tracing::warn!(message = ?notice.message, %text, "notice"),
            _ => tracing::info!(message = ?notice.message, %text, "notice"),
        }
    }
}

/// Keeps every notice in memory, for hosts that render them later.
#[derive(Debug, Clone, Default)]
pub struct NoticeLog {
    inner: Arc<Mutex<Vec<Notice>>>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notice> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn last(&self) -> Option<Notice> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).last().cloned()
    }

    /// Remove and return the pending notices.
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.inner.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, notice: Notice) {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_detail_wins_over_generic_text() {
        let err = ClientError::Rejected {
            code: 400,
            message: "部门编码已存在".into(),
        };
        let notice = Notice::from_error(&err, Message::CreateFailed);
        assert_eq!(notice.text(Locale::EnUs), "部门编码已存在");

        let reset = ClientError::Network("reset".into());
        let generic = Notice::from_error(&reset, Message::LoadFailed);
        assert_eq!(generic.text(Locale::EnUs), "Network error");
    }

    #[test]
    fn log_keeps_order_and_drains() {
        let log = NoticeLog::new();
        log.notify(Notice::success(Message::Created));
        log.notify(Notice::warning(Message::NothingSelected));

        assert_eq!(log.last().map(|n| n.message), Some(Message::NothingSelected));
        assert_eq!(log.drain().len(), 2);
        assert!(log.all().is_empty());
    }
}
