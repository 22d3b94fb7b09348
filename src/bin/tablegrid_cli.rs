//! CLI tool for tablegrid - lays out and paginates a table document
//!
//! Usage:
//!   tablegrid_cli <table.json>                             # Report JSON to stdout
//!   tablegrid_cli <table.json> --first-page 700 --other-pages 900
//!   tablegrid_cli <table.json> --merge A1:B2 --merge C3:C5
//!   tablegrid_cli <table.json> -o report.json              # Report JSON to file
//!
//! Set `RUST_LOG=tablegrid=debug` for layout and merge logging on stderr.

#![allow(clippy::exit)]

use std::env;
use std::fs;
use std::io::{self, Write};

use serde::Serialize;
use tablegrid::cell_ref::{parse_cell_range, range_ref};
use tablegrid::{MonospaceMeasurer, OperationResult, Table, TablePageLayout};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: tablegrid_cli <table.json> [--first-page H] [--other-pages H] [--merge A1:B2]... [-o output.json]";

/// Default printable height per page, in table units
const DEFAULT_PAGE_HEIGHT: f32 = 1000.0;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MergeReport {
    range: String,
    #[serde(flatten)]
    result: OperationResult,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    rows: usize,
    columns: usize,
    width: f32,
    height: f32,
    row_heights: Vec<f32>,
    merges: Vec<MergeReport>,
    pages: TablePageLayout,
}

struct Args {
    input: String,
    output: Option<String>,
    first_page: f32,
    other_pages: f32,
    merges: Vec<String>,
}

fn fail(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

fn parse_height(flag: &str, value: Option<String>) -> f32 {
    match value.as_deref().map(str::parse::<f32>) {
        Some(Ok(h)) if h > 0.0 => h,
        _ => fail(&format!("{flag} expects a positive number\n{USAGE}")),
    }
}

fn parse_args() -> Args {
    let mut args = env::args().skip(1);
    let mut input = None;
    let mut parsed = Args {
        input: String::new(),
        output: None,
        first_page: DEFAULT_PAGE_HEIGHT,
        other_pages: DEFAULT_PAGE_HEIGHT,
        merges: Vec::new(),
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-o" => parsed.output = Some(args.next().unwrap_or_else(|| fail(USAGE))),
            "--first-page" => parsed.first_page = parse_height(&arg, args.next()),
            "--other-pages" => parsed.other_pages = parse_height(&arg, args.next()),
            "--merge" => parsed.merges.push(args.next().unwrap_or_else(|| fail(USAGE))),
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            _ if input.is_none() => input = Some(arg),
            _ => fail(&format!("Unexpected argument: {arg}\n{USAGE}")),
        }
    }

    parsed.input = input.unwrap_or_else(|| fail(USAGE));
    parsed
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = parse_args();

    // Read input file
    let json = match fs::read_to_string(&args.input) {
        Ok(j) => j,
        Err(e) => fail(&format!("Error reading {}: {}", args.input, e)),
    };

    // Load table
    let mut table = match Table::from_json(&json) {
        Ok(t) => t,
        Err(e) => fail(&format!("Error loading table: {e}")),
    };

    // Apply merges
    let mut merges = Vec::new();
    for text in &args.merges {
        let range = match parse_cell_range(text) {
            Ok(r) => r,
            Err(e) => fail(&format!("Error in --merge {text}: {e}")),
        };
        let result = table.merge_cells(range);
        if let Some(error) = result.error {
            eprintln!("Merge {text} refused: {error}");
        }
        merges.push(MergeReport {
            range: range_ref(range),
            result,
        });
    }

    // Layout and paginate
    let measurer = MonospaceMeasurer::default();
    let pages = table.calculate_page_layout(&measurer, args.first_page, args.other_pages);
    let report = Report {
        rows: table.row_count(),
        columns: table.column_count(),
        width: table.width(),
        height: table.height(),
        row_heights: table.layout().row_heights().to_vec(),
        merges,
        pages,
    };

    let json = match serde_json::to_string_pretty(&report) {
        Ok(j) => j,
        Err(e) => fail(&format!("Error serializing JSON: {e}")),
    };

    // Output
    match args.output {
        Some(path) => {
            if let Err(e) = fs::write(&path, &json) {
                fail(&format!("Error writing {path}: {e}"));
            }
            eprintln!("Written: {path}");
        }
        None => {
            if let Err(e) = writeln!(io::stdout(), "{json}") {
                fail(&format!("Error writing report: {e}"));
            }
        }
    }
}
