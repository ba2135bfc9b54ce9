//! Drug reference table: loading, the built-in fallback set, and display labels.

use crate::config::ColumnKeys;
use crate::error::{PKError, PKResult};
use crate::extract::RawValue;
use crate::record::DrugRecord;
use log::{info, warn};
use std::collections::HashSet;
use std::path::Path;

pub const NAME_COLUMN: &str = "Name";
pub const CLASS_COLUMN: &str = "Class";
pub const DEFAULT_CLASS: &str = "Uncategorized";

/// Identifier columns that are never shown as parameters.
const ID_COLUMNS: [&str; 2] = ["id", "ID"];

#[derive(Debug, Clone, Default)]
pub struct DrugCatalog {
    records: Vec<DrugRecord>,
}

/// Display label mapped to the position of its record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrugLabel {
    pub label: String,
    pub index: usize,
}

impl DrugCatalog {
    pub fn new(records: Vec<DrugRecord>) -> Self {
        Self { records }
    }

    /// Loads a `.csv` or `.json` table depending on the file extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> PKResult<Self> {
        let path = path.as_ref();
        let catalog = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::from_csv(path)?,
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json(path)?,
            _ => {
                return Err(PKError::InvalidInput(format!(
                    "Unsupported data file {:?}: expected .csv or .json",
                    path
                )))
            },
        };
        info!("Loaded {} drug records from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    pub fn from_csv<P: AsRef<Path>>(path: P) -> PKResult<Self> {
        let reader = csv::Reader::from_path(path)?;
        Self::from_csv_reader(reader)
    }

    pub fn from_csv_reader<R: std::io::Read>(mut reader: csv::Reader<R>) -> PKResult<Self> {
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        require_name_column(headers.iter().map(String::as_str))?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let cells = headers
                .iter()
                .zip(row.iter())
                .map(|(header, cell)| (header.clone(), RawValue::from_cell(cell)));
            records.push(build_record(cells));
        }

        Ok(Self::new(records))
    }

    /// A JSON array of objects, one per drug.
    pub fn from_json<P: AsRef<Path>>(path: P) -> PKResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> PKResult<Self> {
        let rows: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_str(content)?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            require_name_column(row.keys().map(String::as_str))?;
            let cells = row.into_iter().map(|(key, value)| (key, raw_from_json(value)));
            records.push(build_record(cells));
        }

        Ok(Self::new(records))
    }

    /// The reference set shown when no data file is available.
    pub fn reference() -> Self {
        const AUC: &str = "Area Under the Curve (AUC) [ng.hr/mL]";
        Self::new(vec![
            DrugRecord::new("Lisinopril", "ACE Inhibitor")
                .with_parameter("Half-Life", "12h")
                .with_parameter("Cmax", "40 ng/mL")
                .with_parameter(AUC, "500 ng·h/mL")
                .with_parameter("Bioavailability", "25%")
                .with_parameter("Clearance", "50 mL/min"),
            DrugRecord::new("Atorvastatin", "Statin")
                .with_parameter("Half-Life", "14h")
                .with_parameter("Cmax", "20 ng/mL")
                .with_parameter(AUC, "200 ng·h/mL")
                .with_parameter("Bioavailability", "14%")
                .with_parameter("Clearance", "N/A"),
            DrugRecord::new("Metoprolol", "Beta Blocker")
                .with_parameter("Half-Life", "3-7h")
                .with_parameter("Cmax", "100 ng/mL")
                .with_parameter(AUC, "1200 ng·h/mL")
                .with_parameter("Bioavailability", "50%")
                .with_parameter("Clearance", "1 L/min"),
        ])
    }

    /// Loads `path` when given, otherwise falls back to [`DrugCatalog::reference`].
    pub fn load_or_reference<P: AsRef<Path>>(path: Option<P>) -> PKResult<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => {
                warn!("No drug data file supplied. Using the built-in reference set.");
                Ok(Self::reference())
            },
        }
    }

    pub fn records(&self) -> &[DrugRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&DrugRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// One unique label per record, rebuilt on every call.
    ///
    /// The label is the drug name, followed by ` - <dose>` when the first
    /// dose-like column has a value. Repeats get ` (2)`, ` (3)`, ... appended.
    pub fn labels(&self, columns: &ColumnKeys) -> Vec<DrugLabel> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut labels = Vec::with_capacity(self.records.len());

        for (index, record) in self.records.iter().enumerate() {
            let mut base = record.name.clone();
            if let Some(dose) = dose_value(record, columns) {
                base = format!("{} - {}", base, dose);
            }

            let mut label = base.clone();
            let mut count = 1;
            while seen.contains(&label) {
                count += 1;
                label = format!("{} ({})", base, count);
            }

            seen.insert(label.clone());
            labels.push(DrugLabel { label, index });
        }

        labels
    }

    pub fn find_by_label(&self, label: &str, columns: &ColumnKeys) -> Option<&DrugRecord> {
        self.labels(columns)
            .into_iter()
            .find(|l| l.label == label)
            .and_then(|l| self.records.get(l.index))
    }
}

fn require_name_column<'a>(mut headers: impl Iterator<Item = &'a str>) -> PKResult<()> {
    if headers.any(|h| h == NAME_COLUMN) {
        Ok(())
    } else {
        Err(PKError::MissingData(format!(
            "The drug table must have a column labeled '{}'",
            NAME_COLUMN
        )))
    }
}

fn build_record(cells: impl Iterator<Item = (String, RawValue)>) -> DrugRecord {
    let mut record = DrugRecord::new("", DEFAULT_CLASS);
    for (header, value) in cells {
        match header.as_str() {
            NAME_COLUMN => record.name = value.to_string(),
            CLASS_COLUMN if !value.is_missing() => record.class = value.to_string(),
            CLASS_COLUMN => {},
            h if ID_COLUMNS.contains(&h) => {},
            _ => {
                let label = unique_label(&record, &header);
                record.parameters.push((label, value));
            },
        }
    }
    record
}

/// Repeated headers become `Cmax.1`, `Cmax.2`, ... so no column is lost.
fn unique_label(record: &DrugRecord, header: &str) -> String {
    if record.get(header).is_none() {
        return header.to_string();
    }
    (1..)
        .map(|n| format!("{}.{}", header, n))
        .find(|candidate| record.get(candidate).is_none())
        .unwrap_or_else(|| header.to_string())
}

/// Scalars keep their type; booleans, arrays and objects are kept as text.
fn raw_from_json(value: serde_json::Value) -> RawValue {
    use serde_json::Value;
    match value {
        Value::Null => RawValue::Missing,
        Value::Number(n) => match n.as_f64() {
            Some(f) => RawValue::Number(f),
            None => RawValue::Text(n.to_string()),
        },
        Value::String(s) => RawValue::Text(s),
        other => RawValue::Text(other.to_string()),
    }
}

/// Value of the first parameter whose label contains any dose keyword.
fn dose_value<'a>(record: &'a DrugRecord, columns: &ColumnKeys) -> Option<&'a RawValue> {
    record
        .parameters
        .iter()
        .find(|(label, _)| {
            let label = label.to_lowercase();
            columns.dose.iter().any(|k| label.contains(&k.to_lowercase()))
        })
        .map(|(_, value)| value)
        .filter(|value| !value.is_missing())
}
