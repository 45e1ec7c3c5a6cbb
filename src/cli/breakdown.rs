use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::{FilterArgs, Session};
use crate::fmt::pct;
use crate::kpi;
use crate::models::{Dimension, Measure};

pub fn run(
    file: Option<&str>,
    filter: &FilterArgs,
    by: Dimension,
    measure: Measure,
    top: Option<Option<usize>>,
    pareto: bool,
) -> anyhow::Result<()> {
    let session = Session::open(file)?;
    let view = session.view(filter)?;
    let top = top.map(|n| n.unwrap_or(session.settings.top_n));
    let grand = kpi::total(&view, measure);

    let mut table = Table::new();
    if pareto {
        let mut rows = kpi::pareto(&view, by, measure);
        if let Some(n) = top {
            rows.truncate(n);
        }
        if rows.is_empty() {
            println!("No transactions found.");
            return Ok(());
        }
        table.set_header(vec![by.label(), measure.label(), "Cumulative %"]);
        for r in &rows {
            table.add_row(vec![
                Cell::new(&r.value),
                Cell::new(session.measure_value(measure, r.total)),
                Cell::new(format!("{:.1}%", r.cumulative_pct)),
            ]);
        }
    } else {
        let groups = match top {
            Some(n) => kpi::top_n(&view, by, measure, n),
            None => kpi::group_total(&view, by, measure),
        };
        if groups.is_empty() {
            println!("No transactions found.");
            return Ok(());
        }
        table.set_header(vec![by.label(), measure.label(), "%"]);
        for g in &groups {
            let share = if grand != 0.0 { g.total / grand } else { 0.0 };
            table.add_row(vec![
                Cell::new(&g.value),
                Cell::new(session.measure_value(measure, g.total)),
                Cell::new(pct(share)),
            ]);
        }
    }
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(session.measure_value(measure, grand)),
        Cell::new(""),
    ]);

    println!("{} by {}\n{table}", measure.label(), by.label());
    Ok(())
}

pub fn counts(file: Option<&str>, filter: &FilterArgs, by: Dimension) -> anyhow::Result<()> {
    let session = Session::open(file)?;
    let view = session.view(filter)?;
    let groups = kpi::group_count(&view, by);
    if groups.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    let n = view.len() as f64;
    let mut table = Table::new();
    table.set_header(vec![by.label(), "Count", "%"]);
    for g in &groups {
        table.add_row(vec![
            Cell::new(&g.value),
            Cell::new(g.count),
            Cell::new(pct(g.count as f64 / n)),
        ]);
    }
    println!("Transactions by {}\n{table}", by.label());
    Ok(())
}

pub fn channels(file: Option<&str>, filter: &FilterArgs, measure: Measure) -> anyhow::Result<()> {
    let session = Session::open(file)?;
    let view = session.view(filter)?;
    let groups = kpi::group_total(&view, Dimension::Channel, measure);
    let counts = kpi::group_count(&view, Dimension::Channel);

    let mut table = Table::new();
    table.set_header(vec!["Channel", measure.label(), "Transactions"]);
    for label in Dimension::Channel.canonical_order().unwrap_or_default() {
        let total = groups.iter().find(|g| g.value == label).map(|g| g.total);
        let count = counts.iter().find(|c| c.value == label).map_or(0, |c| c.count);
        let value = match total {
            Some(t) => session.measure_value(measure, t),
            None => "—".dimmed().to_string(),
        };
        table.add_row(vec![Cell::new(&label), Cell::new(value), Cell::new(count)]);
    }
    println!("Sales by Channel\n{table}");
    Ok(())
}
