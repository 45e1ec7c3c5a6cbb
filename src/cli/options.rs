use crate::cli::Session;
use crate::models::Dimension;

pub fn run(file: Option<&str>) -> anyhow::Result<()> {
    let session = Session::open(file)?;
    let store = &session.store;

    match store.date_bounds() {
        Some((first, last)) => println!("Dates:            {first} .. {last}"),
        None => println!("Dates:            (no transactions)"),
    }
    for dimension in [Dimension::Category, Dimension::PaymentMethod, Dimension::Location] {
        let values = store.distinct(dimension);
        println!("{:<17} {}", format!("{}:", dimension.label()), values.join(", "));
    }
    Ok(())
}
