//! Import of validation history exported from the hosted candidate store.

mod parser;

use crate::workflows::candidates::domain::{CandidateId, ValidationRecord};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum ValidationImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: usize, reason: String },
}

impl std::fmt::Display for ValidationImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationImportError::Io(err) => {
                write!(f, "failed to read validation export: {}", err)
            }
            ValidationImportError::Csv(err) => write!(f, "invalid validation CSV data: {}", err),
            ValidationImportError::InvalidRow { line, reason } => {
                write!(f, "invalid validation row on line {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for ValidationImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ValidationImportError::Io(err) => Some(err),
            ValidationImportError::Csv(err) => Some(err),
            ValidationImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for ValidationImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ValidationImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Validation histories keyed by candidate, in file order within each candidate.
pub type ValidationHistories = BTreeMap<CandidateId, Vec<ValidationRecord>>;

pub struct ValidationExportImporter;

impl ValidationExportImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<ValidationHistories, ValidationImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<ValidationHistories, ValidationImportError> {
        let mut histories = ValidationHistories::new();
        for record in parser::parse_records(reader)? {
            histories
                .entry(record.candidate_id.clone())
                .or_default()
                .push(record);
        }
        Ok(histories)
    }
}
