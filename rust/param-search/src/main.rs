//! param-search CLI: find (c, kappa, R0) with the smallest T0 above a margin floor.
//!
//! Options:
//!   --min-margin=<x>     Minimum margin percent (default: 25)
//!   --T=<x>              Height for the margin model (default: 1e12)
//!   --approx-log         Use ln T = 30 instead of ln of --T
//!   --model=<name>       toy/realistic/conservative (default: realistic)
//!   --methods=<a,b,..>   Methods to scan (default: current)
//!   --custom-exp=<x>     Exponent used for the method name "custom"
//!   --C_right=<x>        Right-edge constant (default: 0.569961)
//!   --quick              Coarse 5 x 5 grid
//!   --per-method         Best tuple for each method separately
//!   --test=<c,kappa,R0>  Evaluate one tuple against the default
//!   --top=<N>            Number of runners-up to print (default: 5)
//!   --out=<dir>          Output directory (default: data)

use std::time::Instant;

use serde::Serialize;

use certificate_core::params::{DEFAULT_CUSTOM_EXPONENT, DEFAULT_C_RIGHT, DEFAULT_HEIGHT};
use certificate_core::{ExponentTable, MethodChoice, ParameterSet, Result};
use param_search::{best_per_method, probe, search, MarginHeight, SearchConfig, SearchGrid};
use thin_strip::AveragingModel;

struct CliConfig {
    min_margin: f64,
    height: f64,
    approx_log: bool,
    model: String,
    methods: Vec<String>,
    custom_exp: f64,
    c_right: f64,
    quick: bool,
    per_method: bool,
    test: Option<(f64, f64, f64)>,
    top: usize,
    out_dir: String,
}

fn parse_triple(v: &str) -> Option<(f64, f64, f64)> {
    let parts: Vec<f64> = v.split(',').filter_map(|p| p.trim().parse().ok()).collect();
    match parts.as_slice() {
        [c, kappa, r0] => Some((*c, *kappa, *r0)),
        _ => None,
    }
}

fn parse_args() -> CliConfig {
    let mut config = CliConfig {
        min_margin: SearchConfig::default().min_margin,
        height: DEFAULT_HEIGHT,
        approx_log: false,
        model: "realistic".to_string(),
        methods: vec!["current".to_string()],
        custom_exp: DEFAULT_CUSTOM_EXPONENT,
        c_right: DEFAULT_C_RIGHT,
        quick: false,
        per_method: false,
        test: None,
        top: 5,
        out_dir: "data".to_string(),
    };
    for arg in std::env::args().skip(1) {
        if let Some(v) = arg.strip_prefix("--min-margin=") {
            config.min_margin = v.parse().unwrap_or(config.min_margin);
        } else if let Some(v) = arg.strip_prefix("--T=") {
            config.height = v.parse().unwrap_or(config.height);
        } else if let Some(v) = arg.strip_prefix("--model=") {
            config.model = v.to_string();
        } else if let Some(v) = arg.strip_prefix("--methods=") {
            config.methods = v.split(',').map(|m| m.trim().to_string()).collect();
        } else if let Some(v) = arg.strip_prefix("--custom-exp=") {
            config.custom_exp = v.parse().unwrap_or(config.custom_exp);
        } else if let Some(v) = arg.strip_prefix("--C_right=") {
            config.c_right = v.parse().unwrap_or(config.c_right);
        } else if let Some(v) = arg.strip_prefix("--test=") {
            config.test = parse_triple(v);
            if config.test.is_none() {
                eprintln!("  Warning: --test expects c,kappa,R0");
            }
        } else if let Some(v) = arg.strip_prefix("--top=") {
            config.top = v.parse().unwrap_or(config.top);
        } else if let Some(v) = arg.strip_prefix("--out=") {
            config.out_dir = v.to_string();
        } else if arg == "--approx-log" {
            config.approx_log = true;
        } else if arg == "--quick" {
            config.quick = true;
        } else if arg == "--per-method" {
            config.per_method = true;
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
                println!("\nResults saved to: {}", path);
            }
        }
        Err(e) => eprintln!("  Warning: failed to serialize {}: {}", path, e),
    }
}

fn run(cli: &CliConfig) -> Result<()> {
    let table = ExponentTable::standard();
    let config = SearchConfig {
        min_margin: cli.min_margin,
        height: if cli.approx_log {
            MarginHeight::approximate()
        } else {
            MarginHeight::Exact(cli.height)
        },
        model: cli.model.parse::<AveragingModel>()?,
        c_right: cli.c_right,
        ..SearchConfig::default()
    };
    let methods: Vec<MethodChoice> = cli
        .methods
        .iter()
        .map(|m| MethodChoice::from_flags(m, Some(cli.custom_exp)))
        .collect();

    if let Some((c, kappa, r0)) = cli.test {
        let exponent = table.resolve(&methods[0])?;
        let params = ParameterSet::new(c, kappa, r0, exponent, cli.c_right)?;
        let p = probe(params, &config)?;
        println!("{}", "=".repeat(70));
        println!("TESTING SPECIFIC PARAMETERS");
        println!("{}", "=".repeat(70));
        println!("\nParameters: {}", p.candidate.params);
        println!("\nResults:");
        println!("  C_thin* = {:.4}", p.candidate.derived.c_thin_star);
        println!("  Margin = {:.1}% [{}]", p.candidate.margin_percent(), p.candidate.margin.status);
        println!("  log T0 = {:.4}", p.candidate.log_t0());
        println!("  T0 = {:.2e}", p.candidate.threshold.t0);
        println!("\nComparison with paper default:");
        println!("  Margin: {:.1}% -> {:.1}%", p.baseline.margin_percent(), p.candidate.margin_percent());
        println!("  log T0: {:.2} -> {:.2}", p.baseline.log_t0(), p.candidate.log_t0());
        save_json(&format!("{}/parameter_probe.json", cli.out_dir), &p);
        return Ok(());
    }

    let base = if cli.quick { SearchGrid::quick() } else { SearchGrid::default() };
    let grid = base.with_methods(methods);

    println!("{}", "=".repeat(70));
    println!("GRID SEARCH (minimum margin = {}%, {} tuples)", config.min_margin, grid.len());
    println!("{}", "=".repeat(70));

    if cli.per_method {
        let rows = best_per_method(&grid, &table, &config)?;
        println!("\nOptimal parameters by method:");
        println!("{:<10} {:<6} {:<6} {:<6} {:<10} {:<8} {:<10}", "Method", "c", "kappa", "R0", "Margin %", "log T0", "T0");
        println!("{}", "-".repeat(70));
        for row in &rows {
            match &row.best {
                Some(b) => println!("{}", b),
                None => println!("{:<10} no valid parameters found", row.method.to_string()),
            }
        }
        save_json(&format!("{}/optimization_per_method.json", cli.out_dir), &rows);
        return Ok(());
    }

    let start = Instant::now();
    let outcome = search(&grid, &table, &config)?;
    let elapsed = start.elapsed();

    match &outcome.best {
        Some(best) => {
            println!("\nBest parameters found:");
            println!("  c = {:.3}", best.params.c());
            println!("  kappa = {:.3}", best.params.kappa());
            println!("  R0 = {:.3}", best.params.r0());
            println!("  Margin = {:.1}%", best.margin_percent());
            println!("  log T0 = {:.2}", best.log_t0());
            println!("  T0 = {:.2e}", best.threshold.t0);

            println!("\nTop {} configurations:", cli.top);
            println!("{:<10} {:<6} {:<6} {:<6} {:<10} {:<8} {:<10}", "Method", "c", "kappa", "R0", "Margin %", "log T0", "T0");
            println!("{}", "-".repeat(70));
            for c in outcome.top(cli.top) {
                println!("{}", c);
            }
        }
        None => println!("\nNo valid parameters found with margin >= {}%", config.min_margin),
    }
    println!(
        "\n{} evaluated, {} feasible, {} rejected in {:.2?}",
        outcome.candidates.len(),
        outcome.feasible_count(),
        outcome.rejected.len(),
        elapsed
    );

    save_json(&format!("{}/optimization.json", cli.out_dir), &outcome);
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = parse_args();
    if let Err(e) = std::fs::create_dir_all(&cli.out_dir) {
        eprintln!("  Warning: cannot create {}: {}", cli.out_dir, e);
    }
    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
