//! Loading and saving the user and question banks.
//!
//! Saves rewrite the whole file in place. A crash halfway through a save can
//! leave a truncated users file behind.

use crate::prelude::*;
use crate::questions::QuestionBank;
use crate::source::{QuestionSource, SourceError};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("{}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("{}: {source}", .path.display())]
    Json { path: PathBuf, source: serde_json::Error },
    #[error("failed to fetch new questions: {0}")]
    Source(#[from] SourceError),
}

pub trait Storage {
    fn load_users(&mut self) -> Result<UserRecords, StorageError>;
    fn save_users(&mut self, users: &UserRecords) -> Result<(), StorageError>;
    fn load_questions(&mut self) -> Result<QuestionBank, StorageError>;
}

#[derive(Debug, Clone)]
pub struct JsonStorage {
    users: PathBuf,
    questions: PathBuf,
}
impl JsonStorage {
    pub fn new(users: impl Into<PathBuf>, questions: impl Into<PathBuf>) -> Self {
        Self {
            users: users.into(),
            questions: questions.into(),
        }
    }

    /// Restores the users file from `backup` and replaces the question bank
    /// with `count` questions from `source`.
    pub fn reset(&mut self, backup: &Path, source: &mut dyn QuestionSource, count: usize) -> Result<(), StorageError> {
        let users: UserRecords = read_json(backup)?;
        self.save_users(&users)?;
        let questions = source.fetch(count)?;
        write_json(&self.questions, &questions)?;
        log::info!("reset {} users and {} questions", users.len(), questions.len());
        Ok(())
    }
}
impl Storage for JsonStorage {
    fn load_users(&mut self) -> Result<UserRecords, StorageError> {
        read_json(&self.users)
    }
    fn save_users(&mut self, users: &UserRecords) -> Result<(), StorageError> {
        write_json(&self.users, users)
    }
    fn load_questions(&mut self) -> Result<QuestionBank, StorageError> {
        read_json(&self.questions)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let bytes = std::fs::read(path).map_err(|source| StorageError::Io { path: path.into(), source })?;
    serde_json::from_slice(&bytes).map_err(|source| StorageError::Json { path: path.into(), source })
}
fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|source| StorageError::Json { path: path.into(), source })?;
    std::fs::write(path, bytes).map_err(|source| StorageError::Io { path: path.into(), source })
}

/// Keeps everything in memory. Each save is counted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    pub users: UserRecords,
    pub questions: QuestionBank,
    pub saves: usize,
}
impl MemoryStorage {
    pub fn new(users: UserRecords, questions: QuestionBank) -> Self {
        Self { users, questions, saves: 0 }
    }
}
impl Storage for MemoryStorage {
    fn load_users(&mut self) -> Result<UserRecords, StorageError> {
        Ok(self.users.clone())
    }
    fn save_users(&mut self, users: &UserRecords) -> Result<(), StorageError> {
        self.users = users.clone();
        self.saves += 1;
        Ok(())
    }
    fn load_questions(&mut self) -> Result<QuestionBank, StorageError> {
        Ok(self.questions.clone())
    }
}
