//! Toasts — transient, auto-dismissing notifications.

use std::time::Duration;

/// How long a toast stays visible.
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Shown for any request that produced no response.
pub const CONNECTION_ERROR: &str = "Connection error";

/// Visual flavour of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// One notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub text: String,
}

impl Toast {
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            text: text.into(),
        }
    }

    /// The generic toast for a request that never got an answer.
    #[must_use]
    pub fn connection_error() -> Self {
        Self::error(CONNECTION_ERROR)
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == ToastKind::Error
    }

    /// CSS class list for a visible toast element.
    #[must_use]
    pub fn css_class(&self) -> String {
        format!("toast show {}", self.kind.as_str())
    }
}

impl std::fmt::Display for Toast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
