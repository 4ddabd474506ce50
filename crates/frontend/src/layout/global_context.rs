use std::time::Duration;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::shared::error::AppError;
use crate::shared::realtime::ConnectionState;

const ALERT_TIMEOUT: Duration = Duration::from_secs(6);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Error,
    Success,
    Info,
}

impl AlertKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            AlertKind::Error => "alert alert--error",
            AlertKind::Success => "alert alert--success",
            AlertKind::Info => "alert alert--info",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub id: u64,
    pub kind: AlertKind,
    pub text: String,
}

/// Shell-wide UI state shared by every dashboard
#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    /// Mirrors the realtime channel of the current session
    pub connection: RwSignal<ConnectionState>,
    pub alert: RwSignal<Option<Alert>>,
    /// Active dashboard section key; `None` means the role's first section
    pub section: RwSignal<Option<String>>,
    pub left_open: RwSignal<bool>,
    next_alert: StoredValue<u64>,
}

impl AppGlobalContext {
    pub fn new() -> Self {
        Self {
            connection: RwSignal::new(ConnectionState::Inactive),
            alert: RwSignal::new(None),
            section: RwSignal::new(None),
            left_open: RwSignal::new(true),
            next_alert: StoredValue::new(0),
        }
    }

    pub fn show_error(&self, error: &AppError) {
        log::warn!("[ui] {}", error);
        self.push(AlertKind::Error, error.user_message());
    }

    pub fn show_success(&self, text: &str) {
        self.push(AlertKind::Success, text.to_string());
    }

    pub fn show_message(&self, text: &str) {
        self.push(AlertKind::Info, text.to_string());
    }

    pub fn dismiss(&self) {
        self.alert.set(None);
    }

    pub fn toggle_left(&self) {
        self.left_open.update(|open| *open = !*open);
    }

    pub fn set_section(&self, key: &str) {
        self.section.set(Some(key.to_string()));
    }

    pub fn is_disconnected(&self) -> bool {
        self.connection.get() == ConnectionState::Reconnecting
    }

    fn push(&self, kind: AlertKind, text: String) {
        let id = self.next_alert.get_value() + 1;
        self.next_alert.set_value(id);
        self.alert.set(Some(Alert { id, kind, text }));

        // A newer alert keeps its own timer
        let alert = self.alert;
        spawn_local(async move {
            gloo_timers::future::sleep(ALERT_TIMEOUT).await;
            if alert.try_get_untracked().flatten().map(|a| a.id) == Some(id) {
                alert.set(None);
            }
        });
    }
}

impl Default for AppGlobalContext {
    fn default() -> Self {
        Self::new()
    }
}
