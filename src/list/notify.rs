use std::fmt;

use serde::Serialize;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl ToastLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastLevel::Success => "success",
            ToastLevel::Info => "info",
            ToastLevel::Warning => "warning",
            ToastLevel::Error => "error",
        }
    }
}

/// A transient notification shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Toast { level: ToastLevel::Success, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Toast { level: ToastLevel::Info, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Toast { level: ToastLevel::Warning, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Toast { level: ToastLevel::Error, message: message.into() }
    }

    /// CSS class used by the panel.
    pub fn css_class(&self) -> &'static str {
        self.level.as_str()
    }
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

pub type ToastReceiver = mpsc::UnboundedReceiver<Toast>;

/// Sending half of a toast channel. Sending never blocks and never fails
/// loudly: a toast nobody listens to is dropped.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: Option<mpsc::UnboundedSender<Toast>>,
}

impl Notifier {
    pub fn channel() -> (Notifier, ToastReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Notifier { tx: Some(tx) }, rx)
    }

    /// A notifier that discards everything.
    pub fn silent() -> Notifier {
        Notifier { tx: None }
    }

    pub fn send(&self, toast: Toast) {
        if let Some(tx) = &self.tx {
            if tx.send(toast).is_err() {
                tracing::debug!("Toast dropped; receiver gone");
            }
        }
    }

    pub fn error(&self, message: impl Into<String>) {
        self.send(Toast::error(message));
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.send(Toast::warning(message));
    }
}
