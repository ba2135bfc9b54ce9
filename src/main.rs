use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use cardiokinetics::calculators::{
    BioavailabilityRequest, CminRequest, ClearanceRequest, HalfLifeFromK, KFromHalfLife,
};
use cardiokinetics::{plot_record, Calculation, CmaxMode, DrugCatalog, EngineConfig};

#[derive(Parser)]
#[command(name = "cardiokinetics")]
#[command(about = "Drug pharmacokinetic reference data and one-compartment PK calculators")]
struct Cli {
    /// Engine configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Absolute bioavailability from oral and IV exposure
    Bioavailability {
        #[arg(long)]
        auc_oral: f64,
        #[arg(long)]
        dose_oral: f64,
        #[arg(long)]
        auc_iv: f64,
        #[arg(long)]
        dose_iv: f64,
    },

    /// Trough concentration after a dosing interval
    Cmin {
        #[arg(long, default_value = "100")]
        cmax: f64,
        /// Half-life [h]
        #[arg(long, default_value = "12")]
        t_half: f64,
        /// Time since peak / dosing interval [h]
        #[arg(long, default_value = "24")]
        interval: f64,
    },

    /// Total clearance from dose, bioavailability and AUC
    Clearance {
        #[arg(long, default_value = "500")]
        dose: f64,
        /// Bioavailability fraction, 1.0 for IV
        #[arg(long, default_value = "1.0")]
        f: f64,
        #[arg(long, default_value = "100")]
        auc: f64,
    },

    /// Half-life from the elimination constant
    HalfLife {
        /// Elimination constant [1/h]
        #[arg(long)]
        k: f64,
    },

    /// Elimination constant from the half-life
    EliminationConstant {
        /// Half-life [h]
        #[arg(long)]
        t_half: f64,
    },

    /// List drugs with their display labels
    Drugs {
        /// Drug table (.csv or .json); the built-in reference set otherwise
        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    /// Concentration-time curve for one drug
    Curve {
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Display label as shown by `drugs`
        #[arg(long)]
        drug: String,

        /// Source for the peak concentration
        #[arg(short, long, value_enum)]
        mode: Option<CmaxMode>,

        /// Time to plot [h]
        #[arg(long)]
        duration: Option<f64>,

        #[arg(long)]
        samples: Option<usize>,

        /// Directory for curve.csv and curve_report.json
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let config = match &cli.config {
        Some(path) => {
            let config = EngineConfig::from_file(path)
                .with_context(|| format!("loading configuration from {:?}", path))?;
            info!("Loaded configuration from {:?}", path);
            config
        },
        None => EngineConfig::default(),
    };

    match cli.command {
        Command::Bioavailability { auc_oral, dose_oral, auc_iv, dose_iv } => {
            let request = BioavailabilityRequest { auc_oral, dose_oral, auc_iv, dose_iv };
            let result = run(&request)?;
            println!("Bioavailability (F): {:.4} ({:.2}%)", result.f, result.f_percent);
        },
        Command::Cmin { cmax, t_half, interval } => {
            let result = run(&CminRequest { cmax, t_half, interval_hours: interval })?;
            println!("Elimination Rate Constant (k): {:.4} /h", result.k);
            println!("Estimated Trough (Cmin): {:.2}", result.cmin);
        },
        Command::Clearance { dose, f, auc } => {
            let result = run(&ClearanceRequest { dose, f, auc })?;
            println!("Clearance (CL): {:.2} L/h", result.cl);
        },
        Command::HalfLife { k } => {
            let result = run(&HalfLifeFromK { k })?;
            println!("Half-Life: {:.2} hours", result.t_half);
        },
        Command::EliminationConstant { t_half } => {
            let result = run(&KFromHalfLife { t_half })?;
            println!("Elimination Constant (k): {:.4} /h", result.k);
        },
        Command::Drugs { data } => {
            let catalog = DrugCatalog::load_or_reference(data.as_ref())?;
            for label in catalog.labels(&config.columns) {
                if let Some(record) = catalog.get(label.index) {
                    println!("{}\t{}", label.label, record.class);
                }
            }
        },
        Command::Curve { data, drug, mode, duration, samples, output } => {
            let mut curve_config = config.curve.clone();
            if let Some(d) = duration {
                curve_config.duration_hours = d;
            }
            if let Some(n) = samples {
                curve_config.sample_count = n;
            }
            curve_config.validate()?;

            let catalog = DrugCatalog::load_or_reference(data.as_ref())?;
            let record = catalog
                .find_by_label(&drug, &config.columns)
                .with_context(|| format!("no drug labeled '{}'", drug))?;

            let mode = mode.unwrap_or(config.cmax_mode);
            let curve = plot_record(
                record,
                mode,
                &config.columns,
                curve_config.duration_hours,
                curve_config.sample_count,
            )?;

            for warning in cardiokinetics::output::curve_warnings(&curve) {
                println!("Warning: {}", warning);
            }
            println!(
                "Plotting Parameters: Cmax ({}) = {:.2}, Half-Life = {}h",
                curve.cmax.origin, curve.cmax.value, curve.half_life
            );

            match output {
                Some(dir) => {
                    std::fs::create_dir_all(&dir)?;
                    cardiokinetics::output::save_curve_results(&curve, &dir)?;
                },
                None => {
                    for sample in &curve.samples {
                        println!("{:.3}\t{:.3}", sample.time, sample.concentration);
                    }
                },
            }
        },
    }

    Ok(())
}

fn run<C: Calculation>(calculation: &C) -> anyhow::Result<C::Output> {
    let output = calculation
        .calculate()
        .with_context(|| format!("calculating {}", calculation.name()))?;
    info!("{}: {}", calculation.name(), serde_json::to_string(&output)?);
    Ok(output)
}
