//! Migrate command
//!
//! Usage: vista migrate [--db <PATH>]

use std::path::Path;
use vista_store::migrations::applied_migrations;

/// Execute migrate command
pub fn execute(db: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let conn = vista_store::db::open_ready(db)?;
    for id in applied_migrations(&conn)? {
        println!("✓ {}", id);
    }
    Ok(())
}
