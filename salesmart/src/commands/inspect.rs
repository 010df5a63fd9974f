// salesmart/src/commands/inspect.rs
//
// USE CASE: Inspect a warehouse table (schema + sample rows).

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, ContentArrangement, Table};
use duckdb::types::Value;
use duckdb::{Connection, Row};
use salesmart_core::infrastructure::adapters::duckdb::to_sql_value;
use std::path::Path;

pub fn execute(db_path: String, table: String, limit: usize) -> anyhow::Result<()> {
    if !Path::new(&db_path).exists() {
        anyhow::bail!(
            "❌ Database not found at: {}\n👉 Have you run 'salesmart run'?",
            db_path
        );
    }

    let conn = Connection::open(&db_path)?;
    let ident = quote_ident(&table);

    println!("\n🔍 Inspecting Table: '{}'", table);

    // Column names and declared types
    let mut stmt_cols = conn.prepare(&format!("PRAGMA table_info({})", ident))?;
    let columns: Vec<(String, String)> = stmt_cols
        .query_map([], |row: &Row| Ok((row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    if columns.is_empty() {
        anyhow::bail!("❌ Table '{}' not found in {}", table, db_path);
    }

    let total: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", ident), [], |r| r.get(0))?;
    println!("   Shape: {} rows x {} columns", total, columns.len());

    let mut grid = Table::new();
    grid.load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            columns
                .iter()
                .map(|(name, ty)| Cell::new(format!("{}\n{}", name, ty))),
        );

    let mut stmt = conn.prepare(&format!("SELECT * FROM {} LIMIT {}", ident, limit))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let mut cells = Vec::with_capacity(columns.len());
        for i in 0..columns.len() {
            cells.push(to_sql_value(row.get::<_, Value>(i)?).to_string());
        }
        grid.add_row(cells);
    }

    println!("{grid}");
    Ok(())
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
