use comfy_table::{Cell, Table};

use crate::cli::{FilterArgs, Session};
use crate::export::TIMESTAMP_FORMAT;
use crate::fmt::number;

pub fn run(file: Option<&str>, filter: &FilterArgs, limit: Option<usize>) -> anyhow::Result<()> {
    let session = Session::open(file)?;
    let view = session.view(filter)?;

    if view.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Timestamp", "Category", "Payment", "Location", "Channel", "Qty", "Unit Price", "Total", "Discount",
    ]);
    let shown = limit.unwrap_or(view.len()).min(view.len());
    for t in view.iter().take(shown) {
        table.add_row(vec![
            Cell::new(t.raw.timestamp.format(TIMESTAMP_FORMAT)),
            Cell::new(&t.raw.category),
            Cell::new(&t.raw.payment_method),
            Cell::new(&t.raw.location),
            Cell::new(t.derived.channel.label()),
            Cell::new(number(t.raw.quantity)),
            Cell::new(session.money(t.raw.unit_price)),
            Cell::new(session.money(t.raw.total_spent)),
            Cell::new(if t.derived.has_discount { "Yes" } else { "No" }),
        ]);
    }
    println!("Transactions\n{table}");
    if shown < view.len() {
        println!("Showing {shown} of {} transactions.", view.len());
    } else {
        println!("{} transactions.", view.len());
    }
    Ok(())
}
