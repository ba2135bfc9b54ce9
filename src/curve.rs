//! Single-exponential concentration-time curves for plotting.

use crate::config::ColumnKeys;
use crate::error::{PKError, PKResult};
use crate::extract::{find_ambiguity, AmbiguousValue};
use crate::record::DrugRecord;
use crate::resolver::{CmaxMode, CmaxResolver, ResolvedCmax};
use log::{debug, info};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SAMPLE_COUNT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveSample {
    /// Time after peak [h]
    pub time: f64,
    pub concentration: f64,
}

/// `concentration(t) = Cmax · e^(-k·t)` at `sample_count` evenly spaced
/// times over `[0, duration_hours]`, both ends included.
///
/// A single sample sits at t = 0; zero samples give an empty curve.
pub fn generate_curve(
    cmax: f64,
    k: f64,
    duration_hours: f64,
    sample_count: usize,
) -> Vec<CurveSample> {
    let step = if sample_count > 1 {
        duration_hours / (sample_count - 1) as f64
    } else {
        0.0
    };

    (0..sample_count)
        .map(|i| {
            let time = if i + 1 == sample_count && sample_count > 1 {
                duration_hours
            } else {
                i as f64 * step
            };
            CurveSample {
                time,
                concentration: cmax * (-k * time).exp(),
            }
        })
        .collect()
}

/// A resolved peak together with the curve drawn from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlottedCurve {
    pub drug: String,
    pub cmax: ResolvedCmax,
    pub half_life: f64,
    pub elimination_constant: f64,
    pub duration_hours: f64,
    /// Half-life, Cmax and AUC cells that held more than one number
    pub ambiguous: Vec<AmbiguousValue>,
    pub samples: Vec<CurveSample>,
}

/// Record -> extracted half-life -> resolved Cmax -> curve.
///
/// A record without a positive half-life cannot be plotted in either mode
/// and reports `MissingData` before Cmax is looked at. Range-like source
/// cells are plotted from their first number and listed in `ambiguous`.
pub fn plot_record(
    record: &DrugRecord,
    mode: CmaxMode,
    columns: &ColumnKeys,
    duration_hours: f64,
    sample_count: usize,
) -> PKResult<PlottedCurve> {
    let half_life = record
        .numeric(&columns.half_life)
        .filter(|&t| t > 0.0)
        .ok_or_else(|| {
            PKError::MissingData(format!(
                "Could not extract a valid numerical half-life for {}",
                record.name
            ))
        })?;

    let ambiguous = ambiguous_inputs(record, columns);
    for entry in &ambiguous {
        debug!("{}: {}", record.name, entry);
    }

    let mut resolver = CmaxResolver::new(mode, columns.clone());
    let cmax = resolver.resolve(record)?;
    let k = cmax.elimination_constant.ok_or_else(|| {
        PKError::MissingData(format!("No elimination constant for {}", record.name))
    })?;

    debug!(
        "Plotting {}: Cmax = {:.2} ({}), k = {:.4} /h",
        record.name, cmax.value, cmax.origin, k
    );
    let samples = generate_curve(cmax.value, k, duration_hours, sample_count);
    info!(
        "Generated {} samples over {} h for {}",
        samples.len(),
        duration_hours,
        record.name
    );

    Ok(PlottedCurve {
        drug: record.name.clone(),
        cmax,
        half_life,
        elimination_constant: k,
        duration_hours,
        ambiguous,
        samples,
    })
}

/// Half-life, Cmax and AUC cells whose text holds several numbers.
fn ambiguous_inputs(record: &DrugRecord, columns: &ColumnKeys) -> Vec<AmbiguousValue> {
    [&columns.half_life, &columns.cmax, &columns.auc]
        .into_iter()
        .filter_map(|keyword| record.find_column(keyword))
        .filter_map(|(label, value)| find_ambiguity(label, value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DrugCatalog;
    use crate::resolver::{CmaxOrigin, ResolutionWarning};
    use approx::assert_relative_eq;
    use std::f64::consts::LN_2;

    #[test]
    fn test_default_curve_shape() {
        let k = LN_2 / 12.0;
        let curve = generate_curve(100.0, k, 24.0, DEFAULT_SAMPLE_COUNT);

        assert_eq!(curve.len(), 100);
        assert_eq!(curve[0].time, 0.0);
        assert_eq!(curve[0].concentration, 100.0);
        assert_eq!(curve[99].time, 24.0);
        assert_relative_eq!(curve[99].concentration, 25.0, epsilon = 1e-9);
        assert!(curve.windows(2).all(|w| w[1].concentration <= w[0].concentration));
        assert!(curve.windows(2).all(|w| w[1].time > w[0].time));
    }

    #[test]
    fn test_even_spacing() {
        let curve = generate_curve(10.0, 0.1, 10.0, 11);
        for (i, sample) in curve.iter().enumerate() {
            assert_relative_eq!(sample.time, i as f64, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_regeneration_is_identical() {
        let first = generate_curve(42.0, 0.2, 36.0, 50);
        let second = generate_curve(42.0, 0.2, 36.0, 50);
        assert_eq!(first, second);
    }

    #[test]
    fn test_degenerate_sample_counts() {
        assert!(generate_curve(100.0, 0.1, 24.0, 0).is_empty());
        let single = generate_curve(100.0, 0.1, 24.0, 1);
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].time, 0.0);
    }

    #[test]
    fn test_plot_record_from_auc() {
        let record = DrugRecord::new("Lisinopril", "ACE Inhibitor")
            .with_parameter("Half-Life", "12h")
            .with_parameter("Cmax", "40 ng/mL")
            .with_parameter("Area Under the Curve (AUC) [ng.hr/mL]", "500 ng·h/mL");

        let columns = ColumnKeys::default();
        let plotted = plot_record(&record, CmaxMode::DerivedFromAuc, &columns, 24.0, 100).unwrap();
        assert_eq!(plotted.cmax.origin, CmaxOrigin::DerivedFromAuc);
        assert!(plotted.ambiguous.is_empty());

        let peak = plotted.samples[0].concentration;
        assert_relative_eq!(peak, 500.0 * LN_2 / 12.0, epsilon = 1e-9);
        let last = plotted.samples[99].concentration;
        assert_relative_eq!(last, plotted.cmax.value / 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_plot_record_fallback_keeps_warning() {
        let record = DrugRecord::new("Atorvastatin", "Statin")
            .with_parameter("Half-Life", "14h")
            .with_parameter("Cmax", "20 ng/mL");

        let columns = ColumnKeys::default();
        let plotted = plot_record(&record, CmaxMode::DerivedFromAuc, &columns, 24.0, 10).unwrap();
        assert_eq!(plotted.cmax.warning, Some(ResolutionWarning::AucUnavailable));
        assert_eq!(plotted.samples[0].concentration, 20.0);
    }

    #[test]
    fn test_plot_record_flags_range_half_life() {
        let catalog = DrugCatalog::reference();
        let metoprolol = &catalog.records()[2];
        assert_eq!(metoprolol.name, "Metoprolol");

        let columns = ColumnKeys::default();
        let plotted = plot_record(metoprolol, CmaxMode::Reported, &columns, 24.0, 100).unwrap();
        assert_eq!(plotted.half_life, 3.0);
        assert_eq!(plotted.ambiguous.len(), 1);

        let flagged = &plotted.ambiguous[0];
        assert_eq!(flagged.label, "Half-Life");
        assert_eq!(flagged.text, "3-7h");
        assert_eq!(flagged.candidates, vec![3.0, 7.0]);
        assert_eq!(flagged.used, 3.0);
    }

    #[test]
    fn test_plot_record_flags_range_cmax_and_auc() {
        let record = DrugRecord::new("Digoxin", "Cardiac Glycoside")
            .with_parameter("Half-Life", "36h")
            .with_parameter("Cmax", "1-2 ng/mL")
            .with_parameter("AUC", "20-30");

        let columns = ColumnKeys::default();
        let plotted = plot_record(&record, CmaxMode::DerivedFromAuc, &columns, 24.0, 10).unwrap();
        let labels: Vec<&str> = plotted.ambiguous.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, vec!["Cmax", "AUC"]);
    }

    #[test]
    fn test_plot_record_requires_half_life() {
        let record = DrugRecord::new("Unknown", "Uncategorized")
            .with_parameter("Half-Life", "N/A")
            .with_parameter("Cmax", "20");

        let result = plot_record(&record, CmaxMode::Reported, &ColumnKeys::default(), 24.0, 100);
        assert!(matches!(result, Err(PKError::MissingData(_))));
    }

    #[test]
    fn test_plot_record_surfaces_unresolvable() {
        let record = DrugRecord::new("Unknown", "Uncategorized")
            .with_parameter("Half-Life", "6h")
            .with_parameter("Cmax", "N/A");

        let result = plot_record(&record, CmaxMode::Reported, &ColumnKeys::default(), 24.0, 100);
        assert!(matches!(result, Err(PKError::Unresolvable(_))));
    }
}
