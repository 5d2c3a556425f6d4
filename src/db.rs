use anyhow::{Context, Result};
use rusqlite::Connection;
use std::collections::HashMap;
use std::{fs, path::Path};
use tracing::{info, warn};

use crate::picker::FieldCatalog;

pub fn open(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let conn = Connection::open(path)?;
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS catalog_items (
            field    TEXT    NOT NULL,
            position INTEGER NOT NULL,
            value    TEXT    NOT NULL,
            PRIMARY KEY (field, value)
         );",
    )?;
    Ok(conn)
}

pub fn load_catalog(conn: &Connection) -> Result<FieldCatalog> {
    let mut stmt =
        conn.prepare("SELECT field, value FROM catalog_items ORDER BY field, position")?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
    for (field, value) in rows {
        grouped.entry(field).or_default().push(value);
    }

    let mut catalog = FieldCatalog::default();
    for (field, values) in grouped {
        info!(field = %field, items = values.len(), "loaded catalog field");
        catalog.insert(field, values);
    }
    Ok(catalog)
}

/// Replaces all items of `field`, keeping the given order. Duplicates keep
/// their first position; returns how many were dropped.
pub fn replace_catalog_field(conn: &Connection, field: &str, values: &[String]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM catalog_items WHERE field = ?1", [field])?;
    let mut dropped = 0;
    {
        let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO catalog_items (field, position, value) VALUES (?1, ?2, ?3)",
        )?;
        for (position, value) in values.iter().enumerate() {
            if stmt.execute(rusqlite::params![field, position as i64, value])? == 0 {
                dropped += 1;
            }
        }
    }
    tx.commit()?;
    if dropped > 0 {
        warn!(field, dropped, "duplicate catalog values dropped");
    }
    Ok(dropped)
}

/// Imports a JSON object of `field -> [values]` into the catalog table.
/// Returns the number of fields replaced.
pub fn seed_catalog(conn: &Connection, path: &Path) -> Result<usize> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading catalog seed {}", path.display()))?;
    let seed: HashMap<String, Vec<String>> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing catalog seed {}", path.display()))?;
    for (field, values) in &seed {
        replace_catalog_field(conn, field, values)?;
    }
    info!(path = %path.display(), fields = seed.len(), "catalog seeded");
    Ok(seed.len())
}
