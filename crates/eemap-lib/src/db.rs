use std::path::Path;

use rusqlite::{Connection, OpenFlags, Row};
use tracing::debug;

use crate::error::{Error, Result};
use crate::starmap::SystemId;

/// One row of the system relation.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemRow {
    pub id: SystemId,
    pub region: String,
    pub constellation: String,
    pub name: String,
    pub security: f64,
}

/// One directed adjacency row of the neighbour relation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborRow {
    pub from: SystemId,
    pub to: SystemId,
    pub security: f64,
}

/// One planet production row for a system.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionRow {
    pub planet_id: i64,
    pub resource: String,
    pub output: f64,
}

/// Read-only access to the relations the starmap is built from.
pub trait StarmapSource {
    /// Every system row.
    fn systems(&self) -> Result<Vec<SystemRow>>;

    /// Every neighbour row, parallel listings included.
    fn neighbors(&self) -> Result<Vec<NeighborRow>>;

    /// Production rows for one system. An unknown system yields no rows.
    fn production(&self, system: SystemId) -> Result<Vec<ProductionRow>>;
}

impl<T: StarmapSource + ?Sized> StarmapSource for &T {
    fn systems(&self) -> Result<Vec<SystemRow>> {
        (**self).systems()
    }

    fn neighbors(&self) -> Result<Vec<NeighborRow>> {
        (**self).neighbors()
    }

    fn production(&self, system: SystemId) -> Result<Vec<ProductionRow>> {
        (**self).production(system)
    }
}

const REQUIRED_TABLES: [(&str, &[&str]); 4] = [
    (
        "systems",
        &["sid", "region", "constellation", "name", "security"],
    ),
    ("neighbors", &["sid", "nid", "s_security"]),
    ("systemplanets", &["sid", "pid"]),
    ("planetary_production_data", &["pid", "resource", "output"]),
];

/// SQLite-backed data source using the map database schema.
///
/// The connection is opened read-only and closed when the source is dropped.
#[derive(Debug)]
pub struct SqliteSource {
    connection: Connection,
}

impl SqliteSource {
    /// Open a database file and verify that the expected tables exist.
    pub fn open(db_path: &Path) -> Result<Self> {
        let connection = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        debug!(path = %db_path.display(), "opened starmap database");
        Self::from_connection(connection)
    }

    /// Wrap an existing connection, verifying the schema.
    pub fn from_connection(connection: Connection) -> Result<Self> {
        for (table, columns) in REQUIRED_TABLES {
            if !table_exists(&connection, table)? || !table_has_columns(&connection, table, columns)? {
                debug!(table, "required table or columns missing");
                return Err(Error::UnsupportedSchema);
            }
        }
        Ok(Self { connection })
    }
}

impl StarmapSource for SqliteSource {
    fn systems(&self) -> Result<Vec<SystemRow>> {
        let mut stmt = self.connection.prepare(
            "SELECT sid, region, constellation, name, security FROM systems ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], row_to_system)?;

        let mut systems = Vec::new();
        for row in rows {
            systems.push(row?);
        }
        debug!(count = systems.len(), "read system rows");
        Ok(systems)
    }

    /// Rows are read as `nid -> sid`: each system lists the systems that
    /// connect into it, with its own security value.
    fn neighbors(&self) -> Result<Vec<NeighborRow>> {
        let mut stmt = self
            .connection
            .prepare("SELECT nid, sid, s_security FROM neighbors ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| {
            Ok(NeighborRow {
                from: row.get(0)?,
                to: row.get(1)?,
                security: row.get::<_, Option<f64>>(2)?.unwrap_or(f64::NAN),
            })
        })?;

        let mut neighbors = Vec::new();
        for row in rows {
            neighbors.push(row?);
        }
        debug!(count = neighbors.len(), "read neighbour rows");
        Ok(neighbors)
    }

    fn production(&self, system: SystemId) -> Result<Vec<ProductionRow>> {
        let mut stmt = self.connection.prepare_cached(
            "SELECT p.pid, p.resource, p.output \
             FROM systemplanets sp \
             JOIN planetary_production_data p ON sp.pid = p.pid \
             WHERE sp.sid = ?1 \
             ORDER BY p.pid, p.resource, p.rowid",
        )?;
        let rows = stmt.query_map([system], |row| {
            Ok(ProductionRow {
                planet_id: row.get(0)?,
                resource: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                output: row.get::<_, Option<f64>>(2)?.unwrap_or(0.0),
            })
        })?;

        let mut production = Vec::new();
        for row in rows {
            production.push(row?);
        }
        Ok(production)
    }
}

fn row_to_system(row: &Row<'_>) -> rusqlite::Result<SystemRow> {
    Ok(SystemRow {
        id: row.get(0)?,
        region: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        constellation: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        name: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        security: row.get::<_, Option<f64>>(4)?.unwrap_or(f64::NAN),
    })
}

fn table_exists(connection: &Connection, table: &str) -> Result<bool> {
    let mut stmt = connection
        .prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 LIMIT 1")?;
    let mut rows = stmt.query([table])?;
    Ok(rows.next()?.is_some())
}

fn table_has_columns(connection: &Connection, table: &str, required: &[&str]) -> Result<bool> {
    let pragma = format!("PRAGMA table_info('{table}')");
    let mut stmt = connection.prepare(&pragma)?;
    let mut rows = stmt.query([])?;

    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        columns.push(name);
    }

    Ok(required.iter().all(|required| {
        columns
            .iter()
            .any(|column| column.eq_ignore_ascii_case(required))
    }))
}
