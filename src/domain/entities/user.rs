//! Admin user entity.

use serde::{Deserialize, Serialize};

/// Authenticated console administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    id: u64,
    email: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    is_staff: bool,
    #[serde(default)]
    is_superuser: bool,
}

impl AdminUser {
    /// Creates a new admin user.
    #[must_use]
    pub fn new(
        id: u64,
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        is_staff: bool,
        is_superuser: bool,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            is_staff,
            is_superuser,
        }
    }

    /// Returns the user id.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Returns the login email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the full display name, falling back to the email.
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }

    /// Whether the account has staff privileges.
    #[must_use]
    pub const fn is_staff(&self) -> bool {
        self.is_staff
    }

    /// Whether the account has superuser privileges.
    #[must_use]
    pub const fn is_superuser(&self) -> bool {
        self.is_superuser
    }
}
