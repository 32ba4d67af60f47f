//! Import service - loads users into the local directory
//!
//! Accepts a JSON array of users (document-store exports with `_id` work
//! too) or a CSV file with the header `id,rank,name,email,image,friends`,
//! friends separated by `;`.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::adapters::duckdb::DuckDbDirectoryStore;
use crate::domain::result::Error;
use crate::domain::User;

/// Separator between friend ids in the CSV `friends` column
const CSV_FRIEND_SEPARATOR: char = ';';

/// Input file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Json,
    Csv,
}

impl ImportFormat {
    /// Guess the format from the file extension, defaulting to JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => ImportFormat::Csv,
            _ => ImportFormat::Json,
        }
    }
}

/// Import options
#[derive(Debug, Default, Clone)]
pub struct ImportOptions {
    /// Remove existing users before importing
    pub replace: bool,
    /// Validate and report without writing
    pub preview: bool,
}

#[derive(Debug, Serialize)]
pub struct ImportResult {
    pub imported: usize,
    /// Users removed because of `replace`
    pub removed: usize,
    pub preview: bool,
    /// Friend ids that match no user after the import, sorted
    pub dangling_friend_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CsvUser {
    id: String,
    rank: i64,
    name: String,
    email: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    friends: String,
}

impl From<CsvUser> for User {
    fn from(row: CsvUser) -> Self {
        let friends = row
            .friends
            .split(CSV_FRIEND_SEPARATOR)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();

        User {
            id: row.id,
            rank: row.rank,
            name: row.name,
            email: row.email,
            image: row.image,
            friends,
        }
    }
}

/// Import service for user files
pub struct ImportService {
    store: Arc<DuckDbDirectoryStore>,
}

impl ImportService {
    pub fn new(store: Arc<DuckDbDirectoryStore>) -> Self {
        Self { store }
    }

    /// Import users from a file, format picked by extension
    pub fn import_file(&self, path: &Path, options: &ImportOptions) -> Result<ImportResult> {
        let users = read_users(path, ImportFormat::from_path(path))?;
        self.import_users(users, options)
    }

    /// Validate then write users
    ///
    /// Nothing is written if validation fails, and a store error rolls back
    /// the whole batch.
    pub fn import_users(&self, users: Vec<User>, options: &ImportOptions) -> Result<ImportResult> {
        validate_users(&users)?;

        if options.preview {
            let existing = if options.replace {
                Vec::new()
            } else {
                self.store.get_users()?
            };
            return Ok(ImportResult {
                imported: users.len(),
                removed: 0,
                preview: true,
                dangling_friend_ids: dangling_after(&existing, &users),
            });
        }

        let removed = self
            .store
            .write_users(&users, options.replace)
            .context("Import failed, no users were changed")?;

        Ok(ImportResult {
            imported: users.len(),
            removed,
            preview: false,
            dangling_friend_ids: self.store.find_dangling_friend_ids()?,
        })
    }
}

/// Parse a users file
pub fn read_users(path: &Path, format: ImportFormat) -> Result<Vec<User>> {
    match format {
        ImportFormat::Json => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&content).context("Expected a JSON array of users")
        }
        ImportFormat::Csv => {
            let mut reader = csv::ReaderBuilder::new()
                .trim(csv::Trim::All)
                .from_path(path)
                .context("Failed to read CSV file")?;
            let mut users = Vec::new();
            for (line, row) in reader.deserialize::<CsvUser>().enumerate() {
                // Line 1 is the header
                let row = row.with_context(|| format!("Invalid CSV row at line {}", line + 2))?;
                users.push(User::from(row));
            }
            Ok(users)
        }
    }
}

/// Reject blank ids, blank names and duplicate ids
pub fn validate_users(users: &[User]) -> std::result::Result<(), Error> {
    let mut seen = HashSet::new();
    for user in users {
        if user.id.trim().is_empty() {
            return Err(Error::validation("user with an empty id"));
        }
        if user.name.trim().is_empty() {
            return Err(Error::validation(format!("user {} has an empty name", user.id)));
        }
        if !seen.insert(user.id.as_str()) {
            return Err(Error::validation(format!("duplicate user id {}", user.id)));
        }
    }
    Ok(())
}

/// Dangling friend ids once `incoming` is merged over `existing`
fn dangling_after(existing: &[User], incoming: &[User]) -> Vec<String> {
    let incoming_ids: HashSet<&str> = incoming.iter().map(|u| u.id.as_str()).collect();
    let merged: Vec<&User> = existing
        .iter()
        .filter(|u| !incoming_ids.contains(u.id.as_str()))
        .chain(incoming.iter())
        .collect();

    let known: HashSet<&str> = merged.iter().map(|u| u.id.as_str()).collect();
    let mut dangling: Vec<String> = merged
        .iter()
        .flat_map(|u| u.friends.iter())
        .filter(|id| !known.contains(id.as_str()))
        .cloned()
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    dangling.sort();
    dangling
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn service() -> (ImportService, Arc<DuckDbDirectoryStore>) {
        let store = Arc::new(DuckDbDirectoryStore::in_memory().unwrap());
        store.ensure_schema().unwrap();
        (ImportService::new(Arc::clone(&store)), store)
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ImportFormat::from_path(Path::new("users.CSV")), ImportFormat::Csv);
        assert_eq!(ImportFormat::from_path(Path::new("users.json")), ImportFormat::Json);
        assert_eq!(ImportFormat::from_path(Path::new("users")), ImportFormat::Json);
    }

    #[test]
    fn test_validation_rejects_duplicates() {
        let users = vec![
            User::new("1", 1, "One", "1@example.com"),
            User::new("1", 2, "Other One", "1b@example.com"),
        ];
        let err = validate_users(&users).unwrap_err();
        assert!(err.to_string().contains("duplicate user id 1"));
    }

    #[test]
    fn test_validation_rejects_blank_fields() {
        assert!(validate_users(&[User::new(" ", 1, "Name", "e")]).is_err());
        assert!(validate_users(&[User::new("1", 1, "", "e")]).is_err());
        assert!(validate_users(&[]).is_ok());
    }

    #[test]
    fn test_invalid_import_writes_nothing() {
        let (service, store) = service();
        let users = vec![
            User::new("1", 1, "One", "1@example.com"),
            User::new("1", 2, "Dup", "d@example.com"),
        ];

        assert!(service.import_users(users, &ImportOptions::default()).is_err());
        assert_eq!(store.count_users().unwrap(), 0);
    }

    #[test]
    fn test_import_json_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(
            &path,
            r#"[
                {"_id": "1", "rank": 1, "name": "John Doe", "email": "john@example.com", "friends": ["2", "9"]},
                {"id": "2", "rank": 2, "name": "Jane Smith", "email": "jane@example.com"}
            ]"#,
        )
        .unwrap();

        let (service, store) = service();
        let result = service.import_file(&path, &ImportOptions::default()).unwrap();

        assert_eq!(result.imported, 2);
        assert_eq!(result.dangling_friend_ids, vec!["9"]);
        assert_eq!(store.get_user_by_id("1").unwrap().unwrap().friends, vec!["2", "9"]);
    }

    #[test]
    fn test_import_csv_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.csv");
        std::fs::write(
            &path,
            "id,rank,name,email,image,friends\n\
             1,1,John Doe,john@example.com,,2;3\n\
             2,2,Jane Smith,jane@example.com,https://picsum.photos/200,\n",
        )
        .unwrap();

        let users = read_users(&path, ImportFormat::Csv).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].friends, vec!["2", "3"]);
        assert!(users[1].friends.is_empty());
        assert_eq!(users[1].image, "https://picsum.photos/200");
    }

    #[test]
    fn test_replace_and_preview() {
        let (service, store) = service();
        store.upsert_user(&User::new("old", 1, "Old", "old@example.com")).unwrap();

        let incoming = vec![User::new("new", 1, "New", "new@example.com").with_friends(["old"])];

        let preview = service
            .import_users(incoming.clone(), &ImportOptions { replace: false, preview: true })
            .unwrap();
        assert!(preview.preview);
        assert!(preview.dangling_friend_ids.is_empty());
        assert_eq!(store.count_users().unwrap(), 1);

        let result = service
            .import_users(incoming, &ImportOptions { replace: true, preview: false })
            .unwrap();
        assert_eq!(result.removed, 1);
        assert_eq!(result.dangling_friend_ids, vec!["old"]);
        assert_eq!(store.count_users().unwrap(), 1);
    }
}
