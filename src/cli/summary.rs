use comfy_table::{Cell, Table};

use crate::cli::{FilterArgs, Session};
use crate::fmt::{number, pct};
use crate::kpi;

pub fn run(file: Option<&str>, filter: &FilterArgs) -> anyhow::Result<()> {
    let session = Session::open(file)?;
    let view = session.view(filter)?;
    let s = kpi::summarize(&view);

    let mut table = Table::new();
    table.set_header(vec!["KPI", "Value"]);
    table.add_row(vec![Cell::new("Total Sales"), Cell::new(session.money(s.total_sales))]);
    table.add_row(vec![Cell::new("Transactions"), Cell::new(s.transactions)]);
    table.add_row(vec![Cell::new("Units Sold"), Cell::new(number(s.units))]);
    table.add_row(vec![Cell::new("Average Ticket"), Cell::new(session.money(s.avg_ticket))]);
    table.add_row(vec![Cell::new("Discount Rate"), Cell::new(pct(s.discount_rate))]);
    table.add_row(vec![Cell::new("Online Share"), Cell::new(pct(s.online_share))]);

    println!("Sales Summary\n{table}");
    Ok(())
}
