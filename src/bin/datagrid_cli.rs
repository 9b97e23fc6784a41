//! CLI tool for datagrid - exports rows and computes virtual windows
//!
//! Usage:
//!   datagrid_cli export <config.json> <rows.json>              # CSV to stdout
//!   datagrid_cli export <config.json> <rows.json> --json       # JSON to stdout
//!   datagrid_cli export <config.json> <rows.json> -o out.csv   # Write to file
//!   datagrid_cli window <scrollTop> <containerHeight> <rowHeight> <totalRows> [overscan]
//!
//! Set `DATAGRID_LOG=debug` for store and export logging on stderr.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use datagrid::export::{to_csv, to_json};
use datagrid::layout::{RowViewport, DEFAULT_OVERSCAN};
use datagrid::{GridConfig, GridStore, Row};
use log::LevelFilter;
use simplelog::{Config, WriteLogger};

const USAGE: &str = "Usage:
  datagrid_cli export <config.json> <rows.json> [--json] [-o output]
  datagrid_cli window <scrollTop> <containerHeight> <rowHeight> <totalRows> [overscan]";

fn main() {
    init_logging();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("{USAGE}");
        std::process::exit(1);
    }

    let output = match args[1].as_str() {
        "export" => export(&args[2..]),
        "window" => window(&args[2..]),
        other => {
            eprintln!("Unknown command: {other}\n{USAGE}");
            std::process::exit(1);
        }
    };

    match output {
        Ok((text, Some(path))) => {
            if let Err(e) = fs::write(&path, &text) {
                eprintln!("Error writing {path}: {e}");
                std::process::exit(1);
            }
            eprintln!("Written: {path}");
        }
        Ok((text, None)) => {
            io::stdout().write_all(text.as_bytes()).unwrap();
            println!();
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn init_logging() {
    let level = match env::var("DATAGRID_LOG").as_deref() {
        Ok("trace") => LevelFilter::Trace,
        Ok("debug") => LevelFilter::Debug,
        Ok("info") => LevelFilter::Info,
        _ => LevelFilter::Warn,
    };
    let _ = WriteLogger::init(level, Config::default(), io::stderr());
}

/// Load config and rows, run them through a store, export the displayed rows.
fn export(args: &[String]) -> Result<(String, Option<String>), String> {
    if args.len() < 2 {
        return Err(USAGE.to_string());
    }
    let config_json =
        fs::read_to_string(&args[0]).map_err(|e| format!("reading {}: {e}", args[0]))?;
    let rows_json = fs::read_to_string(&args[1]).map_err(|e| format!("reading {}: {e}", args[1]))?;

    let config = GridConfig::from_json(&config_json).map_err(|e| e.to_string())?;
    let rows: Vec<Row> = serde_json::from_str(&rows_json).map_err(|e| format!("rows: {e}"))?;

    let store = GridStore::from_config(&config);
    let total = rows.len();
    store.set_rows(rows);
    store.set_total_rows(total);

    let mut as_json = false;
    let mut output_path = None;
    let mut rest = args[2..].iter();
    while let Some(flag) = rest.next() {
        match flag.as_str() {
            "--json" => as_json = true,
            "-o" => output_path = rest.next().cloned(),
            other => return Err(format!("unknown option {other}")),
        }
    }
    if let Some(path) = &output_path {
        as_json |= path.ends_with(".json");
    }

    let displayed = store.displayed_rows();
    let text = if as_json {
        to_json(&displayed).map_err(|e| e.to_string())?
    } else {
        let columns: Vec<_> = store.visible_columns().into_iter().cloned().collect();
        to_csv(&displayed, &columns)
    };
    Ok((text, output_path))
}

fn window(args: &[String]) -> Result<(String, Option<String>), String> {
    if args.len() < 4 {
        return Err(USAGE.to_string());
    }
    let number = |i: usize| -> Result<f64, String> {
        args[i]
            .parse::<f64>()
            .map_err(|e| format!("{}: {e}", args[i]))
    };
    let total_rows = args[3]
        .parse::<usize>()
        .map_err(|e| format!("{}: {e}", args[3]))?;
    let overscan = match args.get(4) {
        Some(s) => s.parse::<u32>().map_err(|e| format!("{s}: {e}"))?,
        None => DEFAULT_OVERSCAN,
    };

    let viewport = RowViewport::new(number(1)?, number(2)?, overscan).map_err(|e| e.to_string())?;
    let range = viewport.window(number(0)?, total_rows);
    let text = serde_json::to_string_pretty(&range).map_err(|e| e.to_string())?;
    Ok((text, None))
}
