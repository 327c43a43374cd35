//! Persisted authentication session

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::paths::LibroPaths;
use crate::error::{LibroError, LibroResult};
use crate::storage::file_io::{read_json_required, write_json_atomic};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Tokens returned by a successful sign-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: SessionUser,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Time left before expiry, zero once expired
    pub fn remaining(&self) -> Duration {
        (self.expires_at - Utc::now()).max(Duration::zero())
    }
}

/// Reads and writes `session.json`
pub struct SessionStore {
    paths: LibroPaths,
}

impl SessionStore {
    pub fn new(paths: LibroPaths) -> Self {
        Self { paths }
    }

    pub fn load(&self) -> LibroResult<Option<Session>> {
        let path = self.paths.session_file();
        if !path.exists() {
            return Ok(None);
        }
        read_json_required(&path)
            .map(Some)
            .map_err(|e| LibroError::Auth(format!("Stored session is unreadable: {}", e)))
    }

    pub fn save(&self, session: &Session) -> LibroResult<()> {
        self.paths.ensure_directories()?;
        write_json_atomic(self.paths.session_file(), session)
    }

    /// Remove the stored session; returns whether one existed
    pub fn clear(&self) -> LibroResult<bool> {
        let path = self.paths.session_file();
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path)
            .map_err(|e| LibroError::Io(format!("Failed to remove session: {}", e)))?;
        Ok(true)
    }
}
