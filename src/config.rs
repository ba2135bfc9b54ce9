use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::curve::DEFAULT_SAMPLE_COUNT;
use crate::error::{PKError, PKResult};
use crate::resolver::CmaxMode;

/// Shortest and longest plotting window offered for a curve [h].
pub const MIN_DURATION_HOURS: f64 = 6.0;
pub const MAX_DURATION_HOURS: f64 = 72.0;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub curve: CurveConfig,
    pub columns: ColumnKeys,
    pub cmax_mode: CmaxMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    pub duration_hours: f64,
    pub sample_count: usize,
}

/// Keywords locating parameters in a table with free-form headers.
///
/// A column matches when its label contains the keyword, ignoring case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnKeys {
    pub cmax: String,
    pub half_life: String,
    pub auc: String,
    pub dose: Vec<String>,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            duration_hours: 24.0,
            sample_count: DEFAULT_SAMPLE_COUNT,
        }
    }
}

impl Default for ColumnKeys {
    fn default() -> Self {
        Self {
            cmax: "cmax".to_string(),
            half_life: "half".to_string(),
            auc: "auc".to_string(),
            dose: vec!["dose".to_string(), "strength".to_string(), "mg".to_string()],
        }
    }
}

impl EngineConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> PKResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PKResult<()> {
        self.curve.validate()?;
        self.validate_columns()?;
        Ok(())
    }

    fn validate_columns(&self) -> PKResult<()> {
        let keys = [
            ("cmax", &self.columns.cmax),
            ("half_life", &self.columns.half_life),
            ("auc", &self.columns.auc),
        ];
        for (name, keyword) in keys {
            if keyword.trim().is_empty() {
                return Err(PKError::Config(format!("Column keyword '{}' must not be empty", name)));
            }
        }

        if self.columns.dose.iter().any(|k| k.trim().is_empty()) {
            return Err(PKError::Config("Dose column keywords must not be empty".to_string()));
        }

        Ok(())
    }
}

impl CurveConfig {
    pub fn validate(&self) -> PKResult<()> {
        if !(MIN_DURATION_HOURS..=MAX_DURATION_HOURS).contains(&self.duration_hours) {
            return Err(PKError::Config(format!(
                "Plot duration must be between {} and {} hours (got {})",
                MIN_DURATION_HOURS, MAX_DURATION_HOURS, self.duration_hours
            )));
        }

        if self.sample_count < 2 {
            return Err(PKError::Config(
                "A curve needs at least two samples".to_string()
            ));
        }

        Ok(())
    }
}
