use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use std::io::Read;

use crate::workflows::candidates::domain::{
    CandidateId, ReviewTrack, ReviewerId, ValidationDecision, ValidationId, ValidationRecord,
};

use super::ValidationImportError;

pub(crate) fn parse_records<R: Read>(
    reader: R,
) -> Result<Vec<ValidationRecord>, ValidationImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut records = Vec::new();

    for row in csv_reader.records() {
        let row = row?;
        // Quoted fields may span lines, so report where the record starts.
        let line = row.position().map_or(0, |position| position.line() as usize);
        let export: ExportRow = row.deserialize(Some(&headers))?;
        records.push(export.into_record(line)?);
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct ExportRow {
    id: String,
    candidate_id: String,
    user_id: String,
    #[serde(rename = "type")]
    track: String,
    status: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    justification: Option<String>,
    created_at: String,
}

impl ExportRow {
    fn into_record(self, line: usize) -> Result<ValidationRecord, ValidationImportError> {
        let track = ReviewTrack::parse(&self.track).ok_or_else(|| {
            ValidationImportError::InvalidRow {
                line,
                reason: format!("unknown validation type '{}'", self.track),
            }
        })?;
        let decision = ValidationDecision::parse(&self.status).ok_or_else(|| {
            ValidationImportError::InvalidRow {
                line,
                reason: format!("unknown validation status '{}'", self.status),
            }
        })?;
        let created_at =
            parse_timestamp(&self.created_at).ok_or_else(|| ValidationImportError::InvalidRow {
                line,
                reason: format!("unparseable created_at '{}'", self.created_at),
            })?;

        Ok(ValidationRecord {
            id: ValidationId(self.id),
            candidate_id: CandidateId(self.candidate_id),
            reviewer_id: ReviewerId(self.user_id),
            track,
            decision,
            justification: self.justification,
            created_at,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
pub(crate) fn parse_timestamp_for_tests(value: &str) -> Option<DateTime<Utc>> {
    parse_timestamp(value)
}
