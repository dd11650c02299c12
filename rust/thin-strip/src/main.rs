//! thin-strip CLI: constants, threshold T0 and margin for one parameter set.
//!
//! Options:
//!   --c=<x>              Window height factor (default: 0.25)
//!   --kappa=<x>          Strip width factor (default: 2.0)
//!   --R0=<x>             Disc radius (default: 0.125)
//!   --T=<x>              Evaluation height (default: 1e12)
//!   --method=<name>      current/huxley/bourgain/hypothetical/custom (default: current)
//!   --custom-exp=<x>     Exponent for --method=custom (default: 0.15)
//!   --model=<name>       toy/realistic/conservative (default: realistic)
//!   --C_right=<x>        Right-edge constant (default: 0.569961)
//!   --C_thin=<x>         Use this C_thin* for the threshold instead of the derived one
//!   --margin-floor=<x>   OK/MARGINAL boundary in percent (default: 20)
//!   --samples=<N>        Monte-Carlo samples (default: 1000)
//!   --seed=<N>           Monte-Carlo seed (default: 42)
//!   --simulate           Run the Monte-Carlo strip simulation
//!   --compare            Compare the reference parameter sets
//!   --analyze            Exponent impact, R0 sweep and sensitivity tables
//!   --out=<dir>          Output directory (default: data)

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::json;

use certificate_core::params::{
    DEFAULT_C, DEFAULT_CUSTOM_EXPONENT, DEFAULT_C_RIGHT, DEFAULT_HEIGHT, DEFAULT_KAPPA, DEFAULT_R0,
};
use certificate_core::{ExponentTable, MethodChoice, ParameterSet, Result};
use thin_strip::analysis::{
    compare_parameter_sets, default_r0_values, exponent_impact, impact_exponents,
    literature_parameter_sets, r0_sweep, sensitivity, ComparisonTable,
};
use thin_strip::simulation::{DEFAULT_SAMPLES, DEFAULT_SEED};
use thin_strip::threshold::compute_threshold_with_c_thin;
use thin_strip::{
    analyze_margin, compute_threshold, simulate_strip, AveragingModel, DerivedQuantities,
    MarginThresholds, VERIFIED_HEIGHT,
};

struct CliConfig {
    c: f64,
    kappa: f64,
    r0: f64,
    height: f64,
    method: String,
    custom_exp: f64,
    model: String,
    c_right: f64,
    c_thin: Option<f64>,
    margin_floor: f64,
    samples: usize,
    seed: u64,
    simulate: bool,
    compare: bool,
    analyze: bool,
    out_dir: String,
}

fn parse_args() -> CliConfig {
    let mut config = CliConfig {
        c: DEFAULT_C,
        kappa: DEFAULT_KAPPA,
        r0: DEFAULT_R0,
        height: DEFAULT_HEIGHT,
        method: "current".to_string(),
        custom_exp: DEFAULT_CUSTOM_EXPONENT,
        model: "realistic".to_string(),
        c_right: DEFAULT_C_RIGHT,
        c_thin: None,
        margin_floor: MarginThresholds::default().floor_percent,
        samples: DEFAULT_SAMPLES,
        seed: DEFAULT_SEED,
        simulate: false,
        compare: false,
        analyze: false,
        out_dir: "data".to_string(),
    };

    for arg in std::env::args().skip(1) {
        if let Some(v) = arg.strip_prefix("--c=") {
            config.c = v.parse().unwrap_or(config.c);
        } else if let Some(v) = arg.strip_prefix("--kappa=") {
            config.kappa = v.parse().unwrap_or(config.kappa);
        } else if let Some(v) = arg.strip_prefix("--R0=") {
            config.r0 = v.parse().unwrap_or(config.r0);
        } else if let Some(v) = arg.strip_prefix("--T=") {
            config.height = v.parse().unwrap_or(config.height);
        } else if let Some(v) = arg.strip_prefix("--method=") {
            config.method = v.to_string();
        } else if let Some(v) = arg.strip_prefix("--custom-exp=") {
            config.custom_exp = v.parse().unwrap_or(config.custom_exp);
        } else if let Some(v) = arg.strip_prefix("--model=") {
            config.model = v.to_string();
        } else if let Some(v) = arg.strip_prefix("--C_right=") {
            config.c_right = v.parse().unwrap_or(config.c_right);
        } else if let Some(v) = arg.strip_prefix("--C_thin=") {
            config.c_thin = v.parse().ok();
        } else if let Some(v) = arg.strip_prefix("--margin-floor=") {
            config.margin_floor = v.parse().unwrap_or(config.margin_floor);
        } else if let Some(v) = arg.strip_prefix("--samples=") {
            config.samples = v.parse().unwrap_or(config.samples);
        } else if let Some(v) = arg.strip_prefix("--seed=") {
            config.seed = v.parse().unwrap_or(config.seed);
        } else if let Some(v) = arg.strip_prefix("--out=") {
            config.out_dir = v.to_string();
        } else if arg == "--simulate" {
            config.simulate = true;
        } else if arg == "--compare" {
            config.compare = true;
        } else if arg == "--analyze" {
            config.analyze = true;
        } else {
            eprintln!("  Warning: ignoring unknown argument {}", arg);
        }
    }
    config
}

fn save_json<T: Serialize>(path: &str, data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => {
            if let Err(e) = std::fs::write(path, &json) {
                eprintln!("  Warning: failed to write {}: {}", path, e);
            } else {
                println!("\nDetailed results saved to: {}", path);
            }
        }
        Err(e) => eprintln!("  Warning: failed to serialize {}: {}", path, e),
    }
}

fn run(config: &CliConfig) -> Result<serde_json::Value> {
    let table = ExponentTable::standard();
    let choice = MethodChoice::from_flags(&config.method, Some(config.custom_exp));
    let exponent = table.resolve(&choice)?;
    let model: AveragingModel = config.model.parse()?;
    let params = ParameterSet::new(config.c, config.kappa, config.r0, exponent, config.c_right)?;
    let thresholds = MarginThresholds::new(config.margin_floor)?;

    let derived = DerivedQuantities::at(&params, config.height)?;
    let margin = analyze_margin(&derived, model, &thresholds);
    let threshold = match config.c_thin {
        Some(c_thin) => compute_threshold_with_c_thin(&params, c_thin)?,
        None => compute_threshold(&params)?,
    };
    let coverage = threshold.coverage(VERIFIED_HEIGHT);

    println!("{}", "=".repeat(60));
    println!("THIN-STRIP MEASUREMENT - {} method", params.exponent().method.to_uppercase());
    println!("{}", "=".repeat(60));
    println!("\nParameters:");
    println!("  T = {:.2e}, R0 = {}", config.height, params.r0());
    println!("  c = {}, kappa = {}", params.c(), params.kappa());
    println!("  h = {:.6}, delta = {:.6}", derived.h, derived.delta);
    println!("\nConstants:");
    println!("  Sub-Weyl exponent = {:.6}", params.exponent().value);
    println!("  alpha_star(R0) = {:.6}", derived.alpha_star);
    println!("  C_thin*(R0) = {:.4}", derived.c_thin_star);
    println!("\nMeasurements:");
    println!("{}", margin);
    println!();
    println!("{}", threshold);
    if coverage.covered {
        println!(
            "\n[SUCCESS] T0 = {:.2e} << T* = {:.2e} (safety factor {:.2e})",
            threshold.t0, coverage.verified_height, coverage.safety_factor
        );
    } else {
        println!(
            "\n[WARNING] T0 = {:.2e} >= T* = {:.2e}, parameters need adjustment",
            threshold.t0, coverage.verified_height
        );
    }

    let mut extra: BTreeMap<&str, serde_json::Value> = BTreeMap::new();

    if config.simulate {
        let sim = simulate_strip(&derived, config.samples, config.seed, &thresholds)?;
        println!("\n--- Monte-Carlo strip average ({} samples, seed {}) ---", sim.samples, sim.seed);
        println!("  Average proxy = {:.6e} +/- {:.6e}", sim.avg_proxy, sim.std_proxy);
        if let Some(p) = sim.margin_percent {
            println!("  Margin = {:.6e} ({:.1}% of RHS) [{}]", sim.margin, p, sim.status);
        }
        extra.insert("simulation", json!(sim));
    }

    if config.compare {
        let rows = compare_parameter_sets(&literature_parameter_sets(&table, config.c_right)?)?;
        println!("\nCOMPARISON OF PARAMETER SETS");
        println!("{}", "=".repeat(60));
        println!("{}", ComparisonTable(&rows));
        extra.insert("comparison", json!(rows));
    }

    if config.analyze {
        let impact = exponent_impact(&params, &impact_exponents(&table))?;
        println!("\nImpact of sub-Weyl exponents (c={}, kappa={}, R0={})", params.c(), params.kappa(), params.r0());
        println!("{:<28} {:<10} {:<10} {:<10} {:<12}", "Method", "Exponent", "C_thin*", "log T0", "T0");
        println!("{}", "-".repeat(72));
        for row in &impact {
            println!(
                "{:<28} {:<10.6} {:<10.4} {:<10.4} {:<12.2e}",
                row.name, row.exponent, row.c_thin_star, row.log_t0, row.t0
            );
        }

        let sweep = r0_sweep(&params, &default_r0_values())?;
        println!("\nOptimization over R0:");
        println!("  Optimal R0 = {:.4}", sweep.best_r0);
        println!("  Optimal log T0 = {:.4}", sweep.best_log_t0);
        println!("  Improvement over R0={}: {:.4}", params.r0(), sweep.improvement);

        let sens = sensitivity(&params)?;
        println!("\nSensitivity (10% increase):");
        for s in &sens {
            println!("  {:<10} -> log T0 change: {:+.4} ({:+.2}%)", s.parameter, s.change, s.percent);
        }
        extra.insert("exponent_impact", json!(impact));
        extra.insert("r0_sweep", json!(sweep));
        extra.insert("sensitivity", json!(sens));
    }

    Ok(json!({
        "parameters": params,
        "model": model,
        "height": config.height,
        "derived": derived,
        "margin": margin,
        "threshold": threshold,
        "coverage": coverage,
        "analyses": extra,
    }))
}

fn main() {
    env_logger::init();
    let config = parse_args();

    let payload = match run(&config) {
        Ok(payload) => payload,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = std::fs::create_dir_all(&config.out_dir) {
        eprintln!("  Warning: cannot create {}: {}", config.out_dir, e);
    }
    let path = format!(
        "{}/C_thin_measurement_{}_R0_{:.3}.json",
        config.out_dir, config.method, config.r0
    );
    save_json(&path, &payload);
}
