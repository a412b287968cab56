use std::sync::atomic::{AtomicU64, Ordering};

use futures_signals::signal::{Mutable, Signal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    /// Bootstrap contextual background class.
    pub fn class(&self) -> &'static str {
        match self {
            ToastKind::Success => "bg-success",
            ToastKind::Error => "bg-danger",
            ToastKind::Info => "bg-primary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ToastId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub message: String,
    /// Bootstrap icon class shown before the message.
    pub icon: Option<&'static str>,
}

/// Holds the one toast currently on screen. A new toast replaces the old one.
pub struct Notifier {
    current: Mutable<Option<Toast>>,
    next_id: AtomicU64,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self {
            current: Mutable::new(None),
            next_id: AtomicU64::new(0),
        }
    }

    pub fn show(&self, kind: ToastKind, message: impl Into<String>) -> ToastId {
        self.show_with_icon(kind, message, None)
    }

    pub fn show_with_icon(
        &self,
        kind: ToastKind,
        message: impl Into<String>,
        icon: Option<&'static str>,
    ) -> ToastId {
        let id = ToastId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.current.set(Some(Toast {
            id,
            kind,
            message: message.into(),
            icon,
        }));

        id
    }

    pub fn success(&self, message: impl Into<String>) -> ToastId {
        self.show(ToastKind::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> ToastId {
        self.show(ToastKind::Error, message)
    }

    /// Removes the toast only if it is still the one on screen.
    pub fn dismiss(&self, id: ToastId) {
        let mut current = self.current.lock_mut();
        if current.as_ref().map(|toast| toast.id) == Some(id) {
            *current = None;
        }
    }

    pub fn current(&self) -> Option<Toast> {
        self.current.get_cloned()
    }

    pub fn signal(&self) -> impl Signal<Item = Option<Toast>> + use<> {
        self.current.signal_cloned()
    }
}
