use crate::extract::{extract_numeric, RawValue};
use serde::{Deserialize, Serialize};

/// One row of the drug reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugRecord {
    pub name: String,
    pub class: String,
    /// Parameter label -> raw cell, in table column order.
    pub parameters: Vec<(String, RawValue)>,
}

/// A raw parameter together with its extracted magnitude.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterValue {
    pub label: String,
    pub raw: RawValue,
    pub value: Option<f64>,
}

impl ParameterValue {
    pub fn new(label: impl Into<String>, raw: RawValue) -> Self {
        let value = extract_numeric(&raw);
        Self {
            label: label.into(),
            raw,
            value,
        }
    }
}

impl DrugRecord {
    pub fn new(name: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class: class.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, label: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.set_parameter(label, value);
        self
    }

    /// Replaces the value under an existing label, or appends a new column.
    pub fn set_parameter(&mut self, label: impl Into<String>, value: impl Into<RawValue>) {
        let label = label.into();
        let value = value.into();
        match self.parameters.iter_mut().find(|(l, _)| *l == label) {
            Some(slot) => slot.1 = value,
            None => self.parameters.push((label, value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&RawValue> {
        self.parameters
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v)
    }

    /// First column whose label contains `keyword`, case-insensitively.
    pub fn find_column(&self, keyword: &str) -> Option<(&str, &RawValue)> {
        let keyword = keyword.to_lowercase();
        self.parameters
            .iter()
            .find(|(label, _)| label.to_lowercase().contains(&keyword))
            .map(|(label, value)| (label.as_str(), value))
    }

    /// Extracted magnitude of the first column matching `keyword`.
    pub fn numeric(&self, keyword: &str) -> Option<f64> {
        self.find_column(keyword)
            .and_then(|(_, value)| extract_numeric(value))
    }

    /// Every parameter with its magnitude, recomputed on each call.
    pub fn parameter_values(&self) -> Vec<ParameterValue> {
        self.parameters
            .iter()
            .map(|(label, raw)| ParameterValue::new(label.clone(), raw.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lisinopril() -> DrugRecord {
        DrugRecord::new("Lisinopril", "ACE Inhibitor")
            .with_parameter("Half-Life", "12h")
            .with_parameter("Cmax", "40 ng/mL")
            .with_parameter("Area Under the Curve (AUC) [ng.hr/mL]", "500 ng·h/mL")
            .with_parameter("Clearance", "N/A")
    }

    #[test]
    fn test_keyword_lookup_is_case_insensitive() {
        let record = lisinopril();
        let (label, _) = record.find_column("auc").unwrap();
        assert_eq!(label, "Area Under the Curve (AUC) [ng.hr/mL]");
        assert_eq!(record.numeric("HALF"), Some(12.0));
        assert_eq!(record.numeric("cmax"), Some(40.0));
        assert_eq!(record.numeric("clearance"), None);
        assert!(record.find_column("volume").is_none());
    }

    #[test]
    fn test_first_matching_column_wins() {
        let record = DrugRecord::new("X", "Y")
            .with_parameter("Cmax (ng/mL)", 10.0)
            .with_parameter("Cmax ss", 20.0);
        assert_eq!(record.numeric("cmax"), Some(10.0));
    }

    #[test]
    fn test_extraction_follows_raw_value() {
        let mut record = lisinopril();
        assert_eq!(record.parameter_values()[0].value, Some(12.0));

        record.set_parameter("Half-Life", "8 h");
        let values = record.parameter_values();
        assert_eq!(values.len(), 4);
        assert_eq!(values[0].value, Some(8.0));
        assert_eq!(record.get("Half-Life"), Some(&RawValue::from("8 h")));
    }
}
