//! User persistence.
//!
//! Stores expose whole-collection reads and writes; lookups are full scans over
//! [`UserStore::read_all`]. Callers that read, modify and write back are
//! responsible for serializing those sequences (see `auth::AuthService`).

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryUserStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("user store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("user store encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// League level a team competes in.
///
/// Registration only accepts the known leagues. Records written by earlier
/// releases may carry any label; those load as [`Division::Other`] and are
/// written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Division {
    #[default]
    NcaaD1,
    NcaaD2,
    NcaaD3,
    Naia,
    Juco,
    Uscaa,
    Pro,
    Other(String),
}

impl Division {
    pub const ALL: [Self; 7] = [
        Self::NcaaD1,
        Self::NcaaD2,
        Self::NcaaD3,
        Self::Naia,
        Self::Juco,
        Self::Uscaa,
        Self::Pro,
    ];

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::NcaaD1 => "NCAA D1",
            Self::NcaaD2 => "NCAA D2",
            Self::NcaaD3 => "NCAA D3",
            Self::Naia => "NAIA",
            Self::Juco => "JUCO",
            Self::Uscaa => "USCAA",
            Self::Pro => "Pro",
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown division: {0}")]
pub struct UnknownDivision(pub String);

impl FromStr for Division {
    type Err = UnknownDivision;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .find(|division| division.as_str().eq_ignore_ascii_case(wanted))
            .cloned()
            .ok_or_else(|| UnknownDivision(s.to_string()))
    }
}

impl From<String> for Division {
    fn from(label: String) -> Self {
        label.parse().unwrap_or(Self::Other(label))
    }
}

impl From<Division> for String {
    fn from(division: Division) -> Self {
        match division {
            Division::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

/// A persisted account.
///
/// The field names match the on-disk JSON layout, so the password hash is
/// serialized under `password`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    #[serde(default)]
    pub full_name: String,
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    #[serde(default)]
    pub team_name: String,
    #[serde(default)]
    pub division: Division,
    #[serde(default)]
    pub offensive_system: String,
    #[serde(default)]
    pub defensive_system: String,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password_hash", &"***")
            .field("team_name", &self.team_name)
            .field("division", &self.division)
            .field("offensive_system", &self.offensive_system)
            .field("defensive_system", &self.defensive_system)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Backing medium for user records.
#[async_trait]
pub trait UserStore: Send + Sync + fmt::Debug {
    /// Return every stored record.
    ///
    /// # Errors
    /// Backends that cannot fall back to an empty collection return an error.
    async fn read_all(&self) -> Result<Vec<UserRecord>, Error>;

    /// Replace the whole collection.
    ///
    /// # Errors
    /// Returns an error if the collection cannot be written.
    async fn write_all(&self, records: &[UserRecord]) -> Result<(), Error>;

    /// Full-scan lookup by already-normalized email.
    ///
    /// # Errors
    /// Propagates [`UserStore::read_all`] failures.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, Error> {
        Ok(self
            .read_all()
            .await?
            .into_iter()
            .find(|record| record.email == email))
    }

    /// Full-scan lookup by id.
    ///
    /// # Errors
    /// Propagates [`UserStore::read_all`] failures.
    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, Error> {
        Ok(self
            .read_all()
            .await?
            .into_iter()
            .find(|record| record.id == id))
    }
}

#[cfg(test)]
pub(crate) fn test_record(id: &str, email: &str) -> UserRecord {
    UserRecord {
        id: id.to_string(),
        full_name: "Coach Test".to_string(),
        email: email.to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
        team_name: "Tigers".to_string(),
        division: Division::default(),
        offensive_system: "Five-Out".to_string(),
        defensive_system: "Pack Line".to_string(),
        created_at: Utc::now(),
    }
}
