// salesmart/src/summary.rs
//
// Human-readable rendering of a run. Logs carry the same data for machines.

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use salesmart_core::application::RunResult;
use salesmart_core::domain::integrity::ReferenceViolations;
use salesmart_core::domain::transform::TableStats;

pub fn print_run_summary(result: &RunResult) {
    println!("\n📊 Load summary ({} -> {})", result.source, result.engine);
    println!("{}", counts_table(result));

    let transform = &result.transform;
    if transform.total_unknown_fills() > 0 {
        println!("   🩹 'Unknown' fills: {}", transform.total_unknown_fills());
    }
    if transform.divisions_derived > 0 {
        println!("   🏭 Divisions derived from factory: {}", transform.divisions_derived);
    }
    if let Some(price) = transform.imputed_unit_price {
        println!(
            "   💲 Unit prices imputed: {} (filled with {})",
            transform.unit_prices_imputed, price
        );
    }
    if transform.unparseable_dates > 0 {
        println!("   📅 Unparseable order dates: {}", transform.unparseable_dates);
    }

    let integrity = &result.load.integrity;
    if integrity.has_violations() {
        println!(
            "\n⚠️  {} of {} fact rows excluded by referential integrity",
            integrity.excluded, integrity.total
        );
        println!("{}", violations_table(&[&integrity.customer, &integrity.product]));
    }
}

fn counts_table(result: &RunResult) -> Table {
    let mut table = styled_table();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Extracted"),
        header_cell("Duplicates"),
        header_cell("Loaded"),
    ]);

    let transform = &result.transform;
    let counts = &result.load.counts;
    table.add_row(stats_row("dim_customers", &transform.customers, counts.customers));
    table.add_row(stats_row("dim_products", &transform.products, counts.products));
    table.add_row(stats_row("fact_orders", &transform.orders, counts.facts));

    for idx in 1..=3 {
        if let Some(column) = table.column_mut(idx) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    table
}

fn violations_table(violations: &[&ReferenceViolations]) -> Table {
    let mut table = styled_table();
    table.set_header(vec![
        header_cell("Reference"),
        header_cell("Rows"),
        header_cell("Samples (transaction_id -> key)"),
    ]);

    for v in violations.iter().filter(|v| v.count > 0) {
        let samples = v
            .samples
            .iter()
            .map(|s| {
                format!(
                    "{} -> {}",
                    s.transaction_id,
                    s.key.as_deref().unwrap_or("NULL")
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        table.add_row(vec![
            Cell::new(format!("{:?}", v.reference)),
            Cell::new(v.count).fg(Color::Yellow),
            Cell::new(samples),
        ]);
    }
    table
}

fn stats_row(name: &str, stats: &TableStats, loaded: u64) -> Vec<Cell> {
    vec![
        Cell::new(name),
        Cell::new(stats.input_rows),
        Cell::new(stats.duplicates_removed),
        Cell::new(loaded).add_attribute(Attribute::Bold),
    ]
}

fn styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .add_attribute(Attribute::Bold)
        .fg(Color::Cyan)
}
