use std::time::Duration;

/// How long a toast stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Visual style of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    /// Confirmation.
    Success,
    /// Failure the operator should notice.
    Error,
}

impl ToastKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
        }
    }
}

/// Short-lived notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Text shown to the operator.
    pub message: String,
    /// Style.
    pub kind: ToastKind,
    /// Time until the toast is removed.
    pub duration: Duration,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Success,
            duration: TOAST_DURATION,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Error,
            duration: TOAST_DURATION,
        }
    }
}
