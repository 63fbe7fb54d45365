//! Maintenance entry point over `shelfmark_core`.
//!
//! # Responsibility
//! - Expose seeding, CSV import/export and a text report for one database
//!   file.
//! - Hold no library logic; every command is a single core call.
//!
//! Optional environment:
//! - `SHELFMARK_CONFIG`: path to a JSON `LibraryConfig` document.
//! - `SHELFMARK_LOG_DIR`: enables rolling file logs in that directory.

use log::error;
use shelfmark_core::db::open_db;
use shelfmark_core::{
    init_logging, LibraryConfig, LocationService, MergeImporter, ReportService,
    SqliteLocationRepository, SqliteReportRepository, SqliteTitleRepository,
};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::process::ExitCode;

const USAGE: &str = "usage: shelfmark <command>

commands:
  ping
  version
  seed <db> [count]
  import <db> <csv>
  export <db> <csv>
  report <db>";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_command module=cli status=error error={message}");
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let config = load_config()?;
    if let Ok(log_dir) = std::env::var("SHELFMARK_LOG_DIR") {
        init_logging(&config, &log_dir).map_err(|err| err.to_string())?;
    }

    let command: Vec<&str> = args.iter().map(String::as_str).collect();
    match command.as_slice() {
        ["ping"] => {
            println!("shelfmark_core ping={}", shelfmark_core::ping());
            Ok(())
        }
        ["version"] => {
            println!("shelfmark_core version={}", shelfmark_core::core_version());
            Ok(())
        }
        ["seed", db] => seed(db, config.default_slot_count),
        ["seed", db, count] => {
            let count = count
                .parse::<u32>()
                .map_err(|_| format!("count must be a non-negative integer, got `{count}`"))?;
            seed(db, count)
        }
        ["import", db, csv] => import(db, csv),
        ["export", db, csv] => export(db, csv),
        ["report", db] => report(db),
        _ => Err(USAGE.to_string()),
    }
}

fn load_config() -> Result<LibraryConfig, String> {
    let Ok(path) = std::env::var("SHELFMARK_CONFIG") else {
        return Ok(LibraryConfig::default());
    };
    let raw = std::fs::read_to_string(&path)
        .map_err(|err| format!("cannot read config `{path}`: {err}"))?;
    LibraryConfig::from_json_str(&raw).map_err(|err| format!("invalid config `{path}`: {err}"))
}

fn seed(db: &str, count: u32) -> Result<(), String> {
    let conn = open_db(db).map_err(|err| err.to_string())?;
    let repo = SqliteLocationRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let created = LocationService::new(repo)
        .seed_range(count)
        .map_err(|err| err.to_string())?;
    println!("seeded {created} of {count} slots");
    Ok(())
}

fn import(db: &str, csv_path: &str) -> Result<(), String> {
    let conn = open_db(db).map_err(|err| err.to_string())?;
    let repo = SqliteTitleRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let file = File::open(csv_path).map_err(|err| format!("cannot open `{csv_path}`: {err}"))?;
    let report = MergeImporter::new(repo)
        .import_csv(BufReader::new(file))
        .map_err(|err| err.to_string())?;

    let counts = report.counts;
    println!(
        "inserted={} updated={} unchanged={} skipped={}",
        counts.inserted, counts.updated, counts.unchanged, counts.skipped
    );
    for skipped in &report.skipped_rows {
        println!("skipped row {}: {:?}", skipped.row, skipped.reason);
    }
    Ok(())
}

fn export(db: &str, csv_path: &str) -> Result<(), String> {
    let conn = open_db(db).map_err(|err| err.to_string())?;
    let repo = SqliteTitleRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let file =
        File::create(csv_path).map_err(|err| format!("cannot create `{csv_path}`: {err}"))?;
    let written = MergeImporter::new(repo)
        .export_csv(BufWriter::new(file))
        .map_err(|err| err.to_string())?;
    println!("exported {written} titles");
    Ok(())
}

fn report(db: &str) -> Result<(), String> {
    let conn = open_db(db).map_err(|err| err.to_string())?;
    let repo = SqliteReportRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let reports = ReportService::new(repo);

    let totals = reports.totals().map_err(|err| err.to_string())?;
    println!(
        "titles={} copies={} open_entries={}",
        totals.titles, totals.copies, totals.open_entries
    );

    println!("\ncategories:");
    for row in reports.category_breakdown().map_err(|err| err.to_string())? {
        println!(
            "  {}: titles={} issued_now={}",
            row.category, row.titles, row.issued_now
        );
    }

    println!("\nlocations:");
    for row in reports.occupancy_summary().map_err(|err| err.to_string())? {
        if row.titles == 0 && row.copies == 0 {
            continue;
        }
        println!(
            "  {}: titles={} copies={}",
            row.location, row.titles, row.copies
        );
    }
    Ok(())
}
