use std::cell::RefCell;

use web_sys::window;

use super::session::Session;
use crate::shared::error::AppError;

const SESSION_KEY: &str = "workshop_session";

/// Persistent slot for the current session
pub trait SessionStore {
    fn load(&self) -> Option<Session>;
    fn save(&self, session: &Session) -> Result<(), AppError>;
    fn clear(&self);
}

/// Session kept in `localStorage` as JSON
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserSessionStore;

fn get_local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

impl SessionStore for BrowserSessionStore {
    fn load(&self) -> Option<Session> {
        let raw = get_local_storage()?.get_item(SESSION_KEY).ok()??;
        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                log::warn!("[auth] stored session is unreadable, discarding: {}", e);
                self.clear();
                None
            }
        }
    }

    fn save(&self, session: &Session) -> Result<(), AppError> {
        let storage = get_local_storage()
            .ok_or_else(|| AppError::fetch("localStorage", "not available"))?;
        let raw = serde_json::to_string(session)
            .map_err(|e| AppError::MappingError(e.to_string()))?;
        storage
            .set_item(SESSION_KEY, &raw)
            .map_err(|_| AppError::fetch("localStorage", "write rejected"))
    }

    fn clear(&self) {
        if let Some(storage) = get_local_storage() {
            let _ = storage.remove_item(SESSION_KEY);
        }
    }
}

/// In-memory store, used where no browser storage exists
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: RefCell<Option<Session>>,
}

impl MemorySessionStore {
    pub fn with_session(session: Session) -> Self {
        Self {
            slot: RefCell::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<Session> {
        self.slot.borrow().clone()
    }

    fn save(&self, session: &Session) -> Result<(), AppError> {
        *self.slot.borrow_mut() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) {
        self.slot.borrow_mut().take();
    }
}

/// False in private modes or sandboxed frames where `localStorage` throws
pub fn browser_storage_available() -> bool {
    get_local_storage().is_some()
}
