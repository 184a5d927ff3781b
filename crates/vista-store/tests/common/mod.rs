use rusqlite::Connection;
use std::path::PathBuf;
use vista_store::schema::civic_schema;
use vista_store::seed::{import_fixture, parse_fixture};

#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Migrated in-memory database without data
#[allow(dead_code)]
pub fn migrated() -> Connection {
    let mut conn = vista_store::db::open_in_memory().expect("Failed to create in-memory database");
    vista_store::db::configure(&conn).unwrap();
    vista_store::migrations::apply_migrations(&mut conn).unwrap();
    conn
}

/// Migrated in-memory database loaded with `fixtures/civic_small.yaml`
#[allow(dead_code)]
pub fn seeded() -> Connection {
    let mut conn = migrated();
    let fixture = parse_fixture(&fixtures_dir().join("civic_small.yaml")).unwrap();
    import_fixture(&mut conn, &civic_schema(), &fixture).unwrap();
    conn
}
