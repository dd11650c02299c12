//! right-edge CLI: bound C_right = -zeta'(2)/zeta(2).
//!
//! Options:
//!   --P=<N>              Prime cutoff (default: 2000000)
//!   --level=<name>       Cutoff preset: quick/medium/high/ultra (overrides --P)
//!   --reference=<x>      Value the interval must contain
//!   --backend=<name>     Precision backend: none/euler-maclaurin (default: none)
//!   --digits=<N>         Digits requested from the backend (default: 50)
//!   --verify             Also run the convergence sweep over P = 1e3..1e6
//!   --out=<dir>          Output directory for the JSON payload (default: data)

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use certificate_core::{EulerMaclaurin, PrecisionProvider, Unavailable};
use right_edge::convergence::{convergence_study, DEFAULT_CUTOFFS};
use right_edge::{compute_right_edge, RightEdgeConfig, SieveLevel};

struct CliConfig {
    run: RightEdgeConfig,
    backend: String,
    verify: bool,
    out_dir: String,
}

fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    let prefix = format!("--{}=", name);
    args.iter().find_map(|a| a.strip_prefix(prefix.as_str()))
}

fn parse_args() -> CliConfig {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut run = RightEdgeConfig::default();

    if let Some(p) = flag_value(&args, "P").and_then(|v| v.parse::<f64>().ok()) {
        run.cutoff = p as u64;
    }
    if let Some(level) = flag_value(&args, "level") {
        match level.parse::<SieveLevel>() {
            Ok(level) => run.cutoff = level.cutoff(),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(2);
            }
        }
    }
    if let Some(r) = flag_value(&args, "reference").and_then(|v| v.parse().ok()) {
        run.reference = r;
    }
    if let Some(d) = flag_value(&args, "digits").and_then(|v| v.parse().ok()) {
        run.digits = d;
    }

    CliConfig {
        run,
        backend: flag_value(&args, "backend").unwrap_or("none").to_string(),
        verify: args.iter().any(|a| a == "--verify"),
        out_dir: flag_value(&args, "out").unwrap_or("data").to_string(),
    }
}

fn save_json<T: Serialize>(path: &str, data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => {
            if let Err(e) = std::fs::write(path, &json) {
                eprintln!("  Warning: failed to write {}: {}", path, e);
            } else {
                println!("Detailed results saved to: {}", path);
            }
        }
        Err(e) => eprintln!("  Warning: failed to serialize {}: {}", path, e),
    }
}

fn main() {
    env_logger::init();
    let config = parse_args();

    let provider: Box<dyn PrecisionProvider> = match config.backend.as_str() {
        "euler-maclaurin" | "em" => Box::new(EulerMaclaurin::default()),
        _ => Box::new(Unavailable),
    };

    println!("========================================");
    println!("  C_right = -zeta'(2)/zeta(2)");
    println!("========================================");
    println!();

    if config.verify {
        println!("--- Convergence with increasing P ---");
        match convergence_study(&DEFAULT_CUTOFFS) {
            Ok(study) => {
                println!("  {:<10} {:<15} {:<15} {:<15}", "P", "Lower", "Upper", "Width");
                println!("  {}", "-".repeat(55));
                for b in &study.intervals {
                    println!(
                        "  {:<10} {:<15.9} {:<15.9} {:<15.2e}",
                        b.cutoff,
                        b.lower,
                        b.upper,
                        b.width()
                    );
                }
                if let Some(ratio) = study.final_ratio() {
                    println!("  Convergence rate: {:.3}", ratio);
                }
            }
            Err(e) => eprintln!("  Error: {}", e),
        }
        println!();
    }

    let report = match compute_right_edge(&config.run, provider.as_ref()) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    println!("{}", report);
    println!();

    if let Err(e) = std::fs::create_dir_all(&config.out_dir) {
        eprintln!("  Warning: cannot create {}: {}", config.out_dir, e);
    }
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let path = format!(
        "{}/C_right_computation_P{}_{}.json",
        config.out_dir, config.run.cutoff, stamp
    );
    save_json(&path, &report);

    if !report.is_valid() {
        std::process::exit(1);
    }
}
