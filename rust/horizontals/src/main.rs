//! horizontals CLI: bound the phase change across horizontal segments.
//!
//! Options:
//!   --T=<x>            Height (default: 1e12)
//!   --c=<x>            Window height factor (default: 0.25)
//!   --kappa=<x>        Strip width factor (default: 2.0)
//!   --digits=<N>       Digits requested for the numerical check (default: 50)
//!   --backend=<name>   none/euler-maclaurin (default: none)
//!   --multiple         Envelope bound at T = 1e10 .. 1e14
//!   --out=<dir>        Output directory (default: data)

use std::f64::consts::PI;

use serde::Serialize;
use serde_json::json;

use certificate_core::params::{DEFAULT_C, DEFAULT_HEIGHT, DEFAULT_KAPPA};
use certificate_core::{EulerMaclaurin, PrecisionProvider, Unavailable};
use horizontals::{validate_heights, validate_horizontals, HorizontalConfig, DEFAULT_HEIGHTS};

struct CliConfig {
    height: f64,
    c: f64,
    kappa: f64,
    digits: u32,
    backend: String,
    multiple: bool,
    out_dir: String,
}

fn parse_args() -> CliConfig {
    let mut config = CliConfig {
        height: DEFAULT_HEIGHT,
        c: DEFAULT_C,
        kappa: DEFAULT_KAPPA,
        digits: HorizontalConfig::default().digits,
        backend: "none".to_string(),
        multiple: false,
        out_dir: "data".to_string(),
    };
    for arg in std::env::args().skip(1) {
        if let Some(v) = arg.strip_prefix("--T=") {
            config.height = v.parse().unwrap_or(config.height);
        } else if let Some(v) = arg.strip_prefix("--c=") {
            config.c = v.parse().unwrap_or(config.c);
        } else if let Some(v) = arg.strip_prefix("--kappa=") {
            config.kappa = v.parse().unwrap_or(config.kappa);
        } else if let Some(v) = arg.strip_prefix("--digits=") {
            config.digits = v.parse().unwrap_or(config.digits);
        } else if let Some(v) = arg.strip_prefix("--backend=") {
            config.backend = v.to_string();
        } else if let Some(v) = arg.strip_prefix("--out=") {
            config.out_dir = v.to_string();
        } else if arg == "--multiple" {
            config.multiple = true;
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

fn main() {
    env_logger::init();
    let config = parse_args();
    let horizontal = HorizontalConfig {
        digits: config.digits,
        ..HorizontalConfig::default()
    };
    let provider: Box<dyn PrecisionProvider> = match config.backend.as_str() {
        "euler-maclaurin" | "em" => Box::new(EulerMaclaurin::default()),
        _ => Box::new(Unavailable),
    };

    println!("HORIZONTAL BOUND VALIDATION");
    println!("{}", "=".repeat(60));

    let payload = if config.multiple {
        let rows = match validate_heights(&DEFAULT_HEIGHTS, config.c, config.kappa, &horizontal) {
            Ok(rows) => rows,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        };
        println!("Parameters: c = {}, kappa = {}", config.c, config.kappa);
        println!(
            "\n{:<15} {:<15} {:<15} {:<15} {:<15}",
            "T", "h", "delta", "Bound", "Bound/pi"
        );
        println!("{}", "-".repeat(75));
        for (w, env) in &rows {
            println!(
                "{:<15.2e} {:<15.6} {:<15.6} {:<15.6e} {:<15.6}",
                w.t,
                w.h,
                w.delta,
                env.refined_bound,
                env.refined_bound / PI
            );
        }
        json!({ "multiple": rows })
    } else {
        let report = match validate_horizontals(
            config.height,
            config.c,
            config.kappa,
            provider.as_ref(),
            &horizontal,
        ) {
            Ok(report) => report,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        };
        println!("{}", report);
        json!(report)
    };

    if let Err(e) = std::fs::create_dir_all(&config.out_dir) {
        eprintln!("  Warning: cannot create {}: {}", config.out_dir, e);
    }
    save_json(&format!("{}/horizontal_validation.json", config.out_dir), &payload);

    println!("\nSUMMARY");
    println!("{}", "=".repeat(60));
    println!("Horizontal segments contribute O(h/T) to the total bound.");
}
