//! Bulk roster import. The registrar's office exports one CSV per batch;
//! each row becomes a student. Bad rows are reported and skipped rather
//! than aborting the whole file, so a re-run with a corrected sheet only
//! adds what is missing.

use std::io::Read;

use serde::{Deserialize, Deserializer, Serialize};

use super::domain::NewStudent;
use super::repository::PlacementStore;
use super::service::{PlacementService, PlacementServiceError};

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "Roll Number")]
    roll_number: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Department")]
    department: String,
    #[serde(rename = "Batch")]
    batch: String,
    #[serde(rename = "Section", default, deserialize_with = "empty_string_as_none")]
    section: Option<String>,
    #[serde(rename = "Email", default, deserialize_with = "empty_string_as_none")]
    email: Option<String>,
    #[serde(rename = "Mobile", default, deserialize_with = "empty_string_as_none")]
    mobile: Option<String>,
    #[serde(rename = "CGPA", default, deserialize_with = "empty_string_as_none")]
    cgpa: Option<String>,
    #[serde(
        rename = "Current Arrears",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    current_arrears: Option<String>,
    #[serde(
        rename = "History of Arrears",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    history_of_arrears: Option<String>,
}

impl RosterRow {
    fn into_new_student(self) -> Result<NewStudent, String> {
        let cgpa = match self.cgpa.as_deref() {
            Some(raw) => Some(
                raw.parse::<f64>()
                    .map_err(|_| format!("CGPA '{raw}' is not a number"))?,
            ),
            None => None,
        };
        let current_arrears = match self.current_arrears.as_deref() {
            Some(raw) => raw
                .parse::<u32>()
                .map_err(|_| format!("current arrears '{raw}' is not a count"))?,
            None => 0,
        };

        Ok(NewStudent {
            roll_number: self.roll_number,
            name: self.name,
            department: self.department,
            batch: self.batch,
            section: self.section,
            email: self.email,
            mobile: self.mobile,
            cgpa,
            current_arrears,
            history_of_arrears: self.history_of_arrears,
        })
    }
}

/// One rejected row and why it was left out.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterSkip {
    pub line: usize,
    pub roll_number: String,
    pub reason: String,
}

/// Outcome of one import run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterImportSummary {
    pub imported: usize,
    pub skipped: Vec<RosterSkip>,
}

pub fn import_roster<S, R>(
    service: &PlacementService<S>,
    reader: R,
) -> Result<RosterImportSummary, PlacementServiceError>
where
    S: PlacementStore + 'static,
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut summary = RosterImportSummary::default();

    for (index, record) in csv_reader.deserialize::<RosterRow>().enumerate() {
        // Header occupies the first line of the sheet.
        let line = index + 2;

        let row = match record {
            Ok(row) => row,
            Err(err) => {
                summary.skipped.push(RosterSkip {
                    line,
                    roll_number: String::new(),
                    reason: err.to_string(),
                });
                continue;
            }
        };

        let roll_number = row.roll_number.clone();
        let new_student = match row.into_new_student() {
            Ok(new_student) => new_student,
            Err(reason) => {
                summary.skipped.push(RosterSkip {
                    line,
                    roll_number,
                    reason,
                });
                continue;
            }
        };

        match service.register_student(new_student) {
            Ok(_) => summary.imported += 1,
            Err(PlacementServiceError::Validation(reason)) => {
                summary.skipped.push(RosterSkip {
                    line,
                    roll_number,
                    reason,
                });
            }
            Err(other) => return Err(other),
        }
    }

    Ok(summary)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::InMemoryPlacementStore;
    use std::io::Cursor;
    use std::sync::Arc;

    fn service() -> PlacementService<InMemoryPlacementStore> {
        PlacementService::new(Arc::new(InMemoryPlacementStore::default()))
    }

    const HEADER: &str = "Roll Number,Name,Department,Batch,Section,Email,Mobile,CGPA,Current Arrears,History of Arrears\n";

    #[test]
    fn imports_well_formed_rows() {
        let service = service();
        let csv = format!(
            "{HEADER}21CS007,Asha Verma,CSE,2026,A,asha@example.edu,,8.4,0,\n\
             21EC019,Vikram Rao,ECE,2026,B,,,7.1,1,2 cleared\n"
        );

        let summary = import_roster(&service, Cursor::new(csv)).expect("import runs");
        assert_eq!(summary.imported, 2);
        assert!(summary.skipped.is_empty());
    }

    #[test]
    fn duplicate_roll_numbers_are_skipped_with_a_reason() {
        let service = service();
        let csv = format!(
            "{HEADER}21CS007,Asha Verma,CSE,2026,,,,,,\n\
             21CS007,Asha Verma,CSE,2026,,,,,,\n"
        );

        let summary = import_roster(&service, Cursor::new(csv)).expect("import runs");
        assert_eq!(summary.imported, 1);
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].line, 3);
        assert!(summary.skipped[0].reason.contains("already on the roster"));
    }

    #[test]
    fn unparseable_numbers_skip_the_row() {
        let service = service();
        let csv = format!("{HEADER}21CS007,Asha Verma,CSE,2026,,,,eight,0,\n");

        let summary = import_roster(&service, Cursor::new(csv)).expect("import runs");
        assert_eq!(summary.imported, 0);
        assert_eq!(summary.skipped.len(), 1);
        assert!(summary.skipped[0].reason.contains("not a number"));
    }
}
