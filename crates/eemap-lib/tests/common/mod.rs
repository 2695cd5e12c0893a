//! Common test utilities and fixture helpers.
//!
//! Integration tests build a small map database in a temporary directory
//! using the same schema as the production store.
//!
//! Layout (edges run `nid -> sid`, both directions listed):
//!
//! ```text
//! The Forge:   Jita(1, 0.9) - Perimeter(2, 0.9) - Niyabainen(3, 0.3)
//! Domain:      Amarr(4, 1.0) - Ashab(5, 0.6)
//! The Citadel: Tama(6, 0.3)
//! Void:        Isolated(7, -0.2)   no gates
//!
//! Jita - Perimeter (listed twice in one direction), Perimeter - Ashab,
//! Ashab - Amarr, Jita - Niyabainen, Niyabainen - Amarr, Niyabainen - Tama
//! ```

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tempfile::TempDir;

pub const JITA: i64 = 1;
pub const PERIMETER: i64 = 2;
pub const NIYABAINEN: i64 = 3;
pub const AMARR: i64 = 4;
pub const ASHAB: i64 = 5;
pub const TAMA: i64 = 6;
pub const ISOLATED: i64 = 7;

/// Neighbour rows in the fixture, parallel listing included.
pub const FIXTURE_EDGES: usize = 13;

const SCHEMA: &str = "
    CREATE TABLE systems(sid INTEGER NOT NULL PRIMARY KEY, region TEXT, constellation TEXT, name TEXT, security REAL);
    CREATE TABLE neighbors(sid INTEGER, nid INTEGER, s_security REAL);
    CREATE TABLE systemplanets(sid INTEGER, pid INTEGER);
    CREATE TABLE planetary_production_data(pid INTEGER NOT NULL, name TEXT, type TEXT, resource TEXT, richness TEXT, output REAL);
";

const DATA: &str = "
    INSERT INTO systems VALUES (1, 'The Forge', 'Kimotoro', 'Jita', 0.9);
    INSERT INTO systems VALUES (2, 'The Forge', 'Kimotoro', 'Perimeter', 0.9);
    INSERT INTO systems VALUES (3, 'The Forge', 'Kimotoro', 'Niyabainen', 0.3);
    INSERT INTO systems VALUES (4, 'Domain', 'Throne Worlds', 'Amarr', 1.0);
    INSERT INTO systems VALUES (5, 'Domain', 'Throne Worlds', 'Ashab', 0.6);
    INSERT INTO systems VALUES (6, 'The Citadel', 'Okkamon', 'Tama', 0.3);
    INSERT INTO systems VALUES (7, 'Void', 'Nowhere', 'Isolated', -0.2);

    INSERT INTO neighbors VALUES (2, 1, 0.9);
    INSERT INTO neighbors VALUES (2, 1, 0.9);
    INSERT INTO neighbors VALUES (1, 2, 0.9);
    INSERT INTO neighbors VALUES (5, 2, 0.6);
    INSERT INTO neighbors VALUES (2, 5, 0.9);
    INSERT INTO neighbors VALUES (4, 5, 1.0);
    INSERT INTO neighbors VALUES (5, 4, 0.6);
    INSERT INTO neighbors VALUES (3, 1, 0.3);
    INSERT INTO neighbors VALUES (1, 3, 0.9);
    INSERT INTO neighbors VALUES (4, 3, 1.0);
    INSERT INTO neighbors VALUES (3, 4, 0.3);
    INSERT INTO neighbors VALUES (6, 3, 0.3);
    INSERT INTO neighbors VALUES (3, 6, 0.3);

    INSERT INTO systemplanets VALUES (1, 101);
    INSERT INTO systemplanets VALUES (1, 102);
    INSERT INTO systemplanets VALUES (2, 201);
    INSERT INTO systemplanets VALUES (4, 401);

    INSERT INTO planetary_production_data VALUES (101, 'Jita I', 'Barren', 'Tritanium', 'Rich', 10.0);
    INSERT INTO planetary_production_data VALUES (102, 'Jita II', 'Ice', 'Tritanium', 'Poor', 5.0);
    INSERT INTO planetary_production_data VALUES (201, 'Perimeter I', 'Lava', 'Tritanium', 'Rich', 30.0);
    INSERT INTO planetary_production_data VALUES (201, 'Perimeter I', 'Lava', 'Pyerite', 'Poor', 4.0);
    INSERT INTO planetary_production_data VALUES (401, 'Amarr I', 'Oceanic', 'Mexallon', 'Medium', 8.0);
";

/// Temporary directory holding a fixture database and a cache directory.
pub struct FixtureEnv {
    _temp_dir: TempDir,
    pub db_path: PathBuf,
    pub cache_dir: PathBuf,
}

impl FixtureEnv {
    /// Create the standard fixture database.
    pub fn new() -> Self {
        Self::with_sql(DATA)
    }

    /// Create a fixture database with custom rows on top of the schema.
    pub fn with_sql(data: &str) -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let db_path = temp_dir.path().join("ee_map.db");
        let cache_dir = temp_dir.path().join("cache");
        create_database(&db_path, data);

        Self {
            _temp_dir: temp_dir,
            db_path,
            cache_dir,
        }
    }

    pub fn temp_path(&self) -> &Path {
        self._temp_dir.path()
    }
}

impl Default for FixtureEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Write the schema plus `data` into a new database at `path`.
pub fn create_database(path: &Path, data: &str) {
    let connection = Connection::open(path).expect("create fixture database");
    connection
        .execute_batch(SCHEMA)
        .expect("create fixture schema");
    connection.execute_batch(data).expect("insert fixture rows");
}
