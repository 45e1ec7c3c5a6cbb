use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::{FilterArgs, Session};
use crate::kpi;
use crate::models::{Dimension, Measure};

pub fn run(
    file: Option<&str>,
    filter: &FilterArgs,
    rows: Dimension,
    cols: Dimension,
    measure: Measure,
) -> anyhow::Result<()> {
    let session = Session::open(file)?;
    let view = session.view(filter)?;

    // Calendar dimensions get their calendar order, the rest store order.
    let row_order = rows
        .canonical_order()
        .unwrap_or_else(|| session.store.distinct(rows));
    let col_order = cols
        .canonical_order()
        .unwrap_or_else(|| session.store.distinct(cols));
    let map = kpi::cross_heatmap(&view, rows, cols, measure, &row_order, &col_order);

    let mut header = vec![format!("{} \\ {}", rows.label(), cols.label())];
    header.extend(map.cols.iter().cloned());
    let mut table = Table::new();
    table.set_header(header);
    for (label, cells) in map.rows.iter().zip(&map.cells) {
        let mut row = vec![Cell::new(label)];
        row.extend(cells.iter().map(|cell| match cell {
            Some(v) => Cell::new(session.measure_value(measure, *v)),
            None => Cell::new("—".dimmed()),
        }));
        table.add_row(row);
    }
    println!("{} by {} and {}\n{table}", measure.label(), rows.label(), cols.label());
    Ok(())
}
