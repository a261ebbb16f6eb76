//! User model as exposed by the identity service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity record for a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Identity service user ID (also the `uid` foreign key in Firestore)
    pub id: String,
    /// Email address, if the account has one
    pub email: Option<String>,
    /// Display name, if set
    pub display_name: Option<String>,
    /// When the account was created
    pub created_at: Option<DateTime<Utc>>,
    /// Last sign-in
    pub last_login_at: Option<DateTime<Utc>>,
    /// Last token refresh (closest thing to "last seen")
    pub last_refresh_at: Option<DateTime<Utc>>,
}

impl UserRecord {
    /// A record with only an ID set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            display_name: None,
            created_at: None,
            last_login_at: None,
            last_refresh_at: None,
        }
    }
}

/// One page of users returned by a list source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPage {
    pub users: Vec<UserRecord>,
    /// Present when more users follow this page
    pub next_page_token: Option<String>,
}
