mod common;

use common::*;
use eemap_lib::{build_from_source, Error, Result, SecurityTier, SqliteSource, StarmapSource};
use rusqlite::Connection;
use tempfile::NamedTempFile;

#[test]
fn load_fixture_into_multigraph() -> Result<()> {
    let env = FixtureEnv::new();
    let source = SqliteSource::open(&env.db_path)?;
    let starmap = build_from_source(&source)?;

    assert_eq!(starmap.node_count(), 7, "fixture should have 7 systems");
    assert_eq!(starmap.edge_count(), FIXTURE_EDGES);
    assert_eq!(starmap.edges_between(JITA, PERIMETER).count(), 2);
    assert_eq!(starmap.edges_between(PERIMETER, JITA).count(), 1);

    let keys: Vec<u64> = starmap.edges().iter().map(|edge| edge.key).collect();
    let mut unique = keys.clone();
    unique.dedup();
    assert_eq!(keys, unique, "edge keys are unique and in insertion order");

    let jita = starmap.system(JITA).expect("Jita present");
    assert_eq!(jita.region(), "The Forge");
    assert_eq!(jita.constellation(), "Kimotoro");
    assert_eq!(starmap.degree(ISOLATED), 0);
    Ok(())
}

#[test]
fn neighbour_rows_run_from_nid_to_sid() -> Result<()> {
    let env = FixtureEnv::new();
    let source = SqliteSource::open(&env.db_path)?;
    let rows = source.neighbors()?;

    let first = rows.first().expect("neighbour rows");
    assert_eq!((first.from, first.to), (JITA, PERIMETER));
    assert_eq!(first.security, 0.9);
    Ok(())
}

#[test]
fn edge_costs_follow_lower_endpoint_security() -> Result<()> {
    let env = FixtureEnv::new();
    let starmap = build_from_source(&SqliteSource::open(&env.db_path)?)?;

    let high = starmap.edges_between(PERIMETER, ASHAB).next().expect("edge");
    assert_eq!(high.tier(), SecurityTier::HighSec);
    assert_eq!(high.risk_cost, 1.0);
    assert_eq!(high.hop_cost, 1);

    // Niyabainen -> Jita carries Jita's 0.9 on the row but touches low-sec.
    let low = starmap.edges_between(NIYABAINEN, JITA).next().expect("edge");
    assert_eq!(low.security_level, 0.9);
    assert_eq!(low.tier(), SecurityTier::LowSec);
    assert_eq!(low.risk_cost, 1_000.0);
    assert_eq!(low.highsec_cost, 1_000_000.0);
    Ok(())
}

#[test]
fn low_row_security_between_high_sec_systems_stays_high_sec() -> Result<()> {
    let env = FixtureEnv::with_sql(
        "INSERT INTO systems VALUES (1, 'R', 'C', 'Dodixie', 0.9);
         INSERT INTO systems VALUES (2, 'R', 'C', 'Botane', 0.9);
         INSERT INTO neighbors VALUES (2, 1, 0.1);
         INSERT INTO neighbors VALUES (1, 2, NULL);",
    );
    let starmap = build_from_source(&SqliteSource::open(&env.db_path)?)?;

    let forward = starmap.edges_between(1, 2).next().expect("edge");
    assert_eq!(forward.security_level, 0.1);
    assert_eq!(forward.risk_cost, 1.0);
    assert_eq!(forward.tier(), SecurityTier::HighSec);

    let back = starmap.edges_between(2, 1).next().expect("edge");
    assert!(back.security_level.is_nan());
    assert_eq!(back.risk_cost, 1.0);
    Ok(())
}

#[test]
fn production_rows_are_ordered_by_planet() -> Result<()> {
    let env = FixtureEnv::new();
    let source = SqliteSource::open(&env.db_path)?;

    let perimeter = source.production(PERIMETER)?;
    let resources: Vec<&str> = perimeter.iter().map(|row| row.resource.as_str()).collect();
    assert_eq!(resources, vec!["Pyerite", "Tritanium"]);

    assert!(source.production(TAMA)?.is_empty());
    assert!(source.production(9_999)?.is_empty());
    Ok(())
}

#[test]
fn dangling_neighbour_is_integrity_error() {
    let env = FixtureEnv::with_sql(
        "INSERT INTO systems VALUES (1, 'R', 'C', 'Jita', 0.9);
         INSERT INTO neighbors VALUES (1, 42, 0.9);",
    );
    let source = SqliteSource::open(&env.db_path).expect("schema is valid");
    let err = build_from_source(&source).expect_err("neighbour 42 is unknown");

    match err {
        Error::DataIntegrity { from, to, missing } => {
            assert_eq!((from, to, missing), (42, 1, 42));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_tables_are_rejected() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let conn = Connection::open(tmp.path()).expect("open temp db");
    conn.execute_batch("CREATE TABLE systems(sid INTEGER PRIMARY KEY, name TEXT);")
        .expect("create partial schema");
    drop(conn);

    let err = SqliteSource::open(tmp.path()).expect_err("schema should be rejected");
    assert!(matches!(err, Error::UnsupportedSchema));
}

#[test]
fn missing_database_file_is_an_error() {
    let env = FixtureEnv::new();
    let missing = env.temp_path().join("absent.db");
    assert!(matches!(
        SqliteSource::open(&missing),
        Err(Error::Sqlite(_))
    ));
}
