//! CSV writer with per-kind column mappings.

use crate::model::birth::BirthRecord;
use crate::model::death::DeathRecord;
use crate::model::record::{Record, RecordKind};
use chrono::{NaiveDate, Utc};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter, Write as _};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Default date rendering for exported cells.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

const BIRTH_HEADERS: &[&str] = &[
    "First Name",
    "Middle Name",
    "Last Name",
    "Date of Birth",
    "Gender",
    "Father Name",
    "Mother Name",
    "Registration Date",
    "Place of Birth",
    "Weight",
    "Address",
];

const DEATH_HEADERS: &[&str] = &[
    "First Name",
    "Middle Name",
    "Last Name",
    "Date of Birth",
    "Date of Death",
    "Gender",
    "Cause of Death",
    "Registration Date",
    "Place of Death",
    "Address",
    "ID Proof Number",
];

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug)]
pub enum ExportError {
    Io(io::Error),
    Csv(csv::Error),
    InvalidDateFormat(String),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Csv(err) => write!(f, "{err}"),
            Self::InvalidDateFormat(format) => write!(f, "invalid export date format `{format}`"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Csv(err) => Some(err),
            Self::InvalidDateFormat(_) => None,
        }
    }
}

impl From<io::Error> for ExportError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for ExportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

/// Export rendering options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// `chrono` strftime pattern applied to every date cell.
    pub date_format: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// Checks that `format` is a usable strftime pattern.
pub fn validate_date_format(format: &str) -> ExportResult<()> {
    if format.trim().is_empty() {
        return Err(ExportError::InvalidDateFormat(format.to_string()));
    }
    // Time and zone specifiers parse fine but fail on a bare date.
    render_date(Utc::now().date_naive(), format).map(|_| ())
}

/// Record kinds with a spreadsheet layout.
pub trait ExportRow: Record {
    fn headers() -> &'static [&'static str];
    fn row(&self, options: &ExportOptions) -> ExportResult<Vec<String>>;
}

impl ExportRow for BirthRecord {
    fn headers() -> &'static [&'static str] {
        BIRTH_HEADERS
    }

    fn row(&self, options: &ExportOptions) -> ExportResult<Vec<String>> {
        let fields = &self.fields;
        Ok(vec![
            fields.first_name.clone(),
            fields.middle_name.clone(),
            fields.last_name.clone(),
            format_date(fields.date_of_birth, options)?,
            fields.gender.clone(),
            fields.father_name.clone(),
            fields.mother_name.clone(),
            format_date(Some(self.registration_date.date_naive()), options)?,
            fields.place_of_birth.clone(),
            fields.birth_weight.clone(),
            fields.permanent_address.clone(),
        ])
    }
}

impl ExportRow for DeathRecord {
    fn headers() -> &'static [&'static str] {
        DEATH_HEADERS
    }

    fn row(&self, options: &ExportOptions) -> ExportResult<Vec<String>> {
        let fields = &self.fields;
        Ok(vec![
            fields.first_name.clone(),
            fields.middle_name.clone(),
            fields.last_name.clone(),
            format_date(fields.date_of_birth, options)?,
            format_date(fields.date_of_death, options)?,
            fields.gender.clone(),
            self.effective_cause_of_death().to_string(),
            format_date(Some(self.registration_date.date_naive()), options)?,
            fields.place_of_death.clone(),
            fields.permanent_address.clone(),
            fields.id_proof_number.clone(),
        ])
    }
}

/// Writes a header row followed by one row per record.
pub fn write_csv<R: ExportRow, W: Write>(
    records: &[R],
    writer: W,
    options: &ExportOptions,
) -> ExportResult<()> {
    validate_date_format(&options.date_format)?;

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(R::headers())?;
    for record in records {
        csv_writer.write_record(record.row(options)?)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// `birth_records_2024-01-05.csv` style name for an export taken on `on`.
pub fn export_file_name(kind: RecordKind, on: NaiveDate) -> String {
    format!("{kind}_records_{}.csv", on.format(DEFAULT_DATE_FORMAT))
}

/// Writes `records` into `dir` under the dated default file name.
///
/// Creates `dir` when missing and overwrites an export from the same day.
pub fn export_to_dir<R: ExportRow>(
    records: &[R],
    dir: &Path,
    options: &ExportOptions,
) -> ExportResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(R::KIND, Utc::now().date_naive()));
    let file = File::create(&path)?;
    write_csv(records, file, options)?;
    info!(
        "event=records_export module=export status=ok kind={} rows={} path={}",
        R::KIND,
        records.len(),
        path.display()
    );
    Ok(path)
}

/// Absent dates from older documents export as empty cells.
fn format_date(date: Option<NaiveDate>, options: &ExportOptions) -> ExportResult<String> {
    match date {
        Some(date) => render_date(date, &options.date_format),
        None => Ok(String::new()),
    }
}

fn render_date(date: NaiveDate, format: &str) -> ExportResult<String> {
    let mut rendered = String::new();
    write!(rendered, "{}", date.format(format))
        .map_err(|_| ExportError::InvalidDateFormat(format.to_string()))?;
    Ok(rendered)
}
