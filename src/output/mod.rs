use crate::curve::{CurveSample, PlottedCurve};
use crate::error::PKResult;
use crate::extract::AmbiguousValue;
use crate::resolver::{CmaxOrigin, ResolutionWarning};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

pub const CURVE_FILE: &str = "curve.csv";
pub const REPORT_FILE: &str = "curve_report.json";

/// Plotting parameters shown alongside a curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveReport {
    pub drug: String,
    pub generated_at: DateTime<Utc>,
    pub cmax: f64,
    pub cmax_origin: CmaxOrigin,
    pub warning: Option<String>,
    pub half_life: f64,
    pub elimination_constant: f64,
    pub duration_hours: f64,
    pub sample_count: usize,
    /// Source cells that held a range; the first number was plotted
    pub ambiguous: Vec<AmbiguousValue>,
    /// Set whenever Cmax came from `C0 = AUC · k`
    pub assumption: Option<String>,
}

impl CurveReport {
    pub fn from_curve(curve: &PlottedCurve) -> Self {
        let assumption = (curve.cmax.origin == CmaxOrigin::DerivedFromAuc).then(|| {
            "C0 = AUC · k assumes one-compartment kinetics with instantaneous input".to_string()
        });

        Self {
            drug: curve.drug.clone(),
            generated_at: Utc::now(),
            cmax: curve.cmax.value,
            cmax_origin: curve.cmax.origin,
            warning: curve.cmax.warning.map(|w: ResolutionWarning| w.to_string()),
            half_life: curve.half_life,
            elimination_constant: curve.elimination_constant,
            duration_hours: curve.duration_hours,
            sample_count: curve.samples.len(),
            ambiguous: curve.ambiguous.clone(),
            assumption,
        }
    }
}

/// One line per non-fatal note on a curve: the Cmax fallback, then ranges.
pub fn curve_warnings(curve: &PlottedCurve) -> Vec<String> {
    curve
        .cmax
        .warning
        .iter()
        .map(|w| w.to_string())
        .chain(curve.ambiguous.iter().map(|a| a.to_string()))
        .collect()
}

pub fn save_curve_results<P: AsRef<Path>>(curve: &PlottedCurve, output_dir: P) -> PKResult<()> {
    let output_path = output_dir.as_ref();

    save_curve_samples(&curve.samples, &output_path.join(CURVE_FILE))?;

    let report = CurveReport::from_curve(curve);
    save_report(&report, &output_path.join(REPORT_FILE))?;

    info!("Curve for {} saved to {:?}", curve.drug, output_path);
    Ok(())
}

pub fn save_curve_samples<P: AsRef<Path>>(samples: &[CurveSample], path: P) -> PKResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    write_curve_samples(&mut writer, samples)?;
    Ok(())
}

pub fn write_curve_samples<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    samples: &[CurveSample],
) -> PKResult<()> {
    writer.write_record(["TIME", "CONCENTRATION"])?;

    for sample in samples {
        writer.write_record(&[
            sample.time.to_string(),
            sample.concentration.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn save_report<P: AsRef<Path>>(report: &CurveReport, path: P) -> PKResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, report)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DrugCatalog;
    use crate::config::ColumnKeys;
    use crate::curve::plot_record;
    use crate::record::DrugRecord;
    use crate::resolver::CmaxMode;

    fn plotted(mode: CmaxMode) -> PlottedCurve {
        let record = DrugRecord::new("Lisinopril", "ACE Inhibitor")
            .with_parameter("Half-Life", "12h")
            .with_parameter("Cmax", "40 ng/mL");
        plot_record(&record, mode, &ColumnKeys::default(), 24.0, 5).unwrap()
    }

    #[test]
    fn test_curve_csv_layout() {
        let curve = plotted(CmaxMode::Reported);
        let mut writer = csv::Writer::from_writer(Vec::new());
        write_curve_samples(&mut writer, &curve.samples).unwrap();

        let bytes = writer.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "TIME,CONCENTRATION");
        assert_eq!(lines[1], "0,40");
        assert!(lines[5].starts_with("24,"));
    }

    #[test]
    fn test_report_carries_warning() {
        let report = CurveReport::from_curve(&plotted(CmaxMode::DerivedFromAuc));
        assert_eq!(report.cmax_origin, CmaxOrigin::Reported);
        assert!(report.warning.is_some());
        assert!(report.assumption.is_none());
        assert_eq!(report.sample_count, 5);
        assert_eq!(report.duration_hours, 24.0);
        assert!(report.ambiguous.is_empty());
    }

    #[test]
    fn test_fallback_warning_listed_once() {
        let warnings = curve_warnings(&plotted(CmaxMode::DerivedFromAuc));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("No valid AUC"));

        assert!(curve_warnings(&plotted(CmaxMode::Reported)).is_empty());
    }

    #[test]
    fn test_range_warning_follows_fallback() {
        let record = DrugRecord::new("Metoprolol", "Beta Blocker")
            .with_parameter("Half-Life", "3-7h")
            .with_parameter("Cmax", "100 ng/mL");
        let columns = ColumnKeys::default();
        let curve = plot_record(&record, CmaxMode::DerivedFromAuc, &columns, 24.0, 5).unwrap();

        let warnings = curve_warnings(&curve);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].starts_with("No valid AUC"));
        assert!(warnings[1].contains("3-7h"));
    }

    #[test]
    fn test_report_lists_range_half_life() {
        let catalog = DrugCatalog::reference();
        let columns = ColumnKeys::default();
        let metoprolol = &catalog.records()[2];
        let curve = plot_record(metoprolol, CmaxMode::Reported, &columns, 24.0, 5).unwrap();
        let report = CurveReport::from_curve(&curve);

        let json = serde_json::to_value(&report).unwrap();
        let flagged = &json["ambiguous"][0];
        assert_eq!(flagged["label"], "Half-Life");
        assert_eq!(flagged["text"], "3-7h");
        assert_eq!(flagged["candidates"], serde_json::json!([3.0, 7.0]));
        assert_eq!(flagged["used"], 3.0);
    }
}
