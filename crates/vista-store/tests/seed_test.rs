// Integration tests for fixture parsing and import

mod common;

use vista_core::errors::ExErrorKind;
use vista_store::schema::civic_schema;
use vista_store::seed::{import_fixture, parse_fixture};

#[test]
fn test_import_yaml_fixture() {
    let mut conn = common::migrated();
    let fixture = parse_fixture(&common::fixtures_dir().join("civic_small.yaml")).unwrap();

    let summary = import_fixture(&mut conn, &civic_schema(), &fixture).unwrap();

    assert_eq!(summary.counts.get("organizations"), Some(&3));
    assert_eq!(summary.counts.get("people"), Some(&3));
    assert_eq!(summary.counts.get("memberships"), Some(&4));
    assert_eq!(summary.total(), 10);
}

#[test]
fn test_import_json_fixture_alongside_yaml() {
    let mut conn = common::seeded();
    let fixture = parse_fixture(&common::fixtures_dir().join("civic_small.json")).unwrap();

    let summary = import_fixture(&mut conn, &civic_schema(), &fixture).unwrap();
    assert_eq!(summary.total(), 3);

    let people: i64 = conn
        .query_row("SELECT COUNT(*) FROM people", [], |row| row.get(0))
        .unwrap();
    assert_eq!(people, 4);
}

#[test]
fn test_reimport_is_rejected_atomically() {
    let mut conn = common::seeded();
    let fixture = parse_fixture(&common::fixtures_dir().join("civic_small.yaml")).unwrap();

    let err = import_fixture(&mut conn, &civic_schema(), &fixture).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Persistence);

    let memberships: i64 = conn
        .query_row("SELECT COUNT(*) FROM memberships", [], |row| row.get(0))
        .unwrap();
    assert_eq!(memberships, 4);
}

#[test]
fn test_missing_fixture_file_is_io_error() {
    let err = parse_fixture(&common::fixtures_dir().join("does_not_exist.yaml")).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Io);
}

#[test]
fn test_import_logs_start_and_end() {
    let capture = vista_core::logging_facility::test_capture::init_test_capture();
    let mut conn = common::migrated();
    let fixture = parse_fixture(&common::fixtures_dir().join("civic_small.yaml")).unwrap();

    import_fixture(&mut conn, &civic_schema(), &fixture).unwrap();

    capture.assert_event_exists("seed_import", "start");
    capture.assert_event_exists("seed_import", "end");
    let ends = capture.count_events(|e| {
        e.op.as_deref() == Some("seed_import")
            && e.event.as_deref() == Some("end")
            && e.fields.get("rows").map(String::as_str) == Some("10")
    });
    assert!(ends >= 1);
}
