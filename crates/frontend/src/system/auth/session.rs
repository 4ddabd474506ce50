use chrono::{DateTime, Utc};
use contracts::enums::user_role::UserRole;
use contracts::system::auth::UserInfo;
use serde::{Deserialize, Serialize};

/// Authenticated session: bearer token plus the identity it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: UserInfo,
    pub token: String,
    pub issued_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user: UserInfo, token: String) -> Self {
        Self {
            user,
            token,
            issued_at: Utc::now(),
        }
    }

    pub fn role(&self) -> UserRole {
        self.user.role
    }

    pub fn user_id(&self) -> i64 {
        self.user.id
    }
}
