use comfy_table::{Cell, Table};

use crate::aggregate::{self, Granularity};
use crate::cli::{FilterArgs, Session};
use crate::models::{Dimension, Measure};

pub fn run(
    file: Option<&str>,
    filter: &FilterArgs,
    granularity: Option<Granularity>,
    measures: &[Measure],
    by: Option<Dimension>,
) -> anyhow::Result<()> {
    let session = Session::open(file)?;
    let view = session.view(filter)?;
    let granularity = granularity.unwrap_or_else(|| session.settings.granularity());
    let measures: Vec<Measure> = if measures.is_empty() {
        vec![Measure::TotalSpent]
    } else {
        measures.to_vec()
    };

    if let Some(dimension) = by {
        // One measure per cross-tab; extra --measure flags are ignored here.
        let measure = measures[0];
        let cells = aggregate::bucket_by(&view, granularity, dimension, measure);
        if cells.is_empty() {
            println!("No transactions found.");
            return Ok(());
        }
        let mut table = Table::new();
        table.set_header(vec!["Period", dimension.label(), measure.label()]);
        for c in &cells {
            table.add_row(vec![
                Cell::new(c.period),
                Cell::new(&c.value),
                Cell::new(session.measure_value(measure, c.sum)),
            ]);
        }
        println!("{} {} by {}\n{table}", granularity.label(), measure.label(), dimension.label());
        return Ok(());
    }

    let buckets = aggregate::bucket(&view, granularity, &measures);
    if buckets.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }
    let mut header = vec!["Period".to_string()];
    header.extend(measures.iter().map(|m| m.label().to_string()));
    let mut table = Table::new();
    table.set_header(header);
    for b in &buckets {
        let mut row = vec![Cell::new(b.period)];
        row.extend(b.sums.iter().map(|(m, v)| Cell::new(session.measure_value(*m, *v))));
        table.add_row(row);
    }
    println!("{} Trend\n{table}", granularity.label());
    Ok(())
}
