//! Local user profiles shown by the "my profile" command.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::errors::ConfigError;

/// A patient profile keyed by the chat platform's account id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub phone: String,
}

/// Load the user list (a JSON array) from `path`
pub fn load_user_data(path: &Path) -> Result<Vec<UserProfile>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Result of looking a user up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileLookup<'a> {
    Found(&'a UserProfile),
    NotFound,
    /// The user file could not be loaded at startup
    Unavailable,
}

/// Profiles loaded once at startup and read-only afterwards
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Option<Vec<UserProfile>>,
}

impl UserDirectory {
    pub fn new(users: Vec<UserProfile>) -> Self {
        Self { users: Some(users) }
    }

    /// A directory whose source could not be read; every lookup reports it
    pub fn unavailable() -> Self {
        Self { users: None }
    }

    /// Load the directory from `path`.
    ///
    /// A missing or malformed file is not fatal: it is logged and the
    /// directory answers [`ProfileLookup::Unavailable`].
    pub fn load(path: &Path) -> Self {
        match load_user_data(path) {
            Ok(users) => {
                info!(path = %path.display(), users = users.len(), "Loaded user profiles");
                Self::new(users)
            }
            Err(e) => {
                error!(error = %e, "Failed to load user profiles, profile lookups will fail");
                Self::unavailable()
            }
        }
    }

    pub fn lookup(&self, user_id: i64) -> ProfileLookup<'_> {
        match &self.users {
            None => ProfileLookup::Unavailable,
            Some(users) => users
                .iter()
                .find(|user| user.id == user_id)
                .map_or(ProfileLookup::NotFound, ProfileLookup::Found),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_and_lookup() {
        let file = write_temp(
            r#"[{"id": 42, "name": "Иванов Иван", "phone": "+79990000000"},
                {"id": 7, "name": "Петров Пётр", "phone": "+79991111111"}]"#,
        );
        let directory = UserDirectory::load(file.path());

        match directory.lookup(7) {
            ProfileLookup::Found(user) => assert_eq!(user.name, "Петров Пётр"),
            other => panic!("unexpected lookup result: {other:?}"),
        }
        assert_eq!(directory.lookup(1), ProfileLookup::NotFound);
    }

    #[test]
    fn test_missing_file_is_not_fatal() {
        let directory = UserDirectory::load(Path::new("/nonexistent/name.json"));
        assert_eq!(directory.lookup(42), ProfileLookup::Unavailable);
    }

    #[test]
    fn test_malformed_file_is_reported() {
        let file = write_temp(r#"{"id": 42}"#);
        assert!(matches!(load_user_data(file.path()), Err(ConfigError::Parse { .. })));
        assert_eq!(UserDirectory::load(file.path()).lookup(42), ProfileLookup::Unavailable);
    }
}
