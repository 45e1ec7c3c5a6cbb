use crate::importer::load_file;
use crate::settings::{load_settings, settings_path};

pub fn run(file: Option<&str>) -> anyhow::Result<()> {
    let settings = load_settings();
    let data_file = file.map(str::to_string).or_else(|| settings.data_file.clone());

    println!("Settings:     {}", settings_path().display());
    println!("Data file:    {}", data_file.as_deref().unwrap_or("(not set)"));
    println!("Granularity:  {}", settings.granularity());
    println!("Top N:        {}", settings.top_n);
    println!("Currency:     {}", settings.currency_symbol);

    let Some(path) = data_file else {
        println!();
        println!("No data file. Run `shopscope config use <file>` or pass --file.");
        return Ok(());
    };
    let path = std::path::PathBuf::from(path);
    if !path.exists() {
        println!();
        println!("Data file not found.");
        return Ok(());
    }

    let store = load_file(&path)?;
    let report = store.report();
    println!();
    println!("Loaded:       {}", report.loaded);
    println!("Skipped:      {} (unparseable timestamp)", report.skipped);
    if let Some((first, last)) = store.date_bounds() {
        println!("Date span:    {first} .. {last}");
    }
    Ok(())
}
