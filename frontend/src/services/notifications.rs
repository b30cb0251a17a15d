//! Transient user notifications ("toasts").
//!
//! Views push toasts after every user-visible outcome; the terminal front
//! end drains and prints them after each command.

use std::time::{Duration, Instant};

use uuid::Uuid;

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub variant: ToastVariant,
    /// `None` keeps the toast until it is dismissed
    pub duration: Option<Duration>,
    pub created_at: Instant,
}

impl Toast {
    pub fn new(title: impl Into<String>, description: Option<String>, variant: ToastVariant) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description,
            variant,
            duration: Some(DEFAULT_TOAST_DURATION),
            created_at: Instant::now(),
        }
    }

    pub fn sticky(mut self) -> Self {
        self.duration = None;
        self
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        match self.duration {
            Some(duration) => now.saturating_duration_since(self.created_at) >= duration,
            None => false,
        }
    }
}

#[derive(Debug, Default)]
pub struct Toaster {
    toasts: Vec<Toast>,
}

impl Toaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, toast: Toast) -> Uuid {
        let id = toast.id;
        self.toasts.push(toast);
        id
    }

    pub fn success(&mut self, title: &str, description: impl Into<String>) -> Uuid {
        self.push(Toast::new(title, Some(description.into()), ToastVariant::Default))
    }

    pub fn error(&mut self, title: &str, description: impl Into<String>) -> Uuid {
        self.push(Toast::new(title, Some(description.into()), ToastVariant::Destructive))
    }

    /// Returns whether a toast with that id was showing
    pub fn dismiss(&mut self, id: Uuid) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        self.toasts.len() != before
    }

    pub fn prune_expired(&mut self, now: Instant) {
        self.toasts.retain(|toast| !toast.is_expired(now));
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Remove and return every toast, oldest first
    pub fn drain(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }

    pub fn last(&self) -> Option<&Toast> {
        self.toasts.last()
    }
}
