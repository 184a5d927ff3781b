//! Seed import command
//!
//! Usage: vista seed <PATH> [--db <PATH>]

use clap::Args;
use std::path::{Path, PathBuf};
use vista_store::schema::civic_schema;
use vista_store::seed::{import_fixture, parse_fixture};

#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Fixture file (.yaml, .yml or .json) or a directory of them
    pub path: PathBuf,
}

/// Execute seed import
///
/// Directories are imported file by file in name order; each file is its
/// own transaction.
pub fn execute(db: &Path, args: SeedArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = vista_store::db::open_ready(db)?;
    let schema = civic_schema();

    let files = if args.path.is_dir() {
        let mut files: Vec<PathBuf> = std::fs::read_dir(&args.path)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.extension()
                    .map(|ext| ext == "yaml" || ext == "yml" || ext == "json")
                    .unwrap_or(false)
            })
            .collect();
        files.sort();
        files
    } else {
        vec![args.path]
    };

    for file in files {
        println!("Importing {}...", file.display());
        let fixture = parse_fixture(&file)?;
        let summary = import_fixture(&mut conn, &schema, &fixture)?;
        for (table, count) in &summary.counts {
            println!("  {}: {}", table, count);
        }
        println!("✓ Imported {} rows", summary.total());
    }

    Ok(())
}
