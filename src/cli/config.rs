use std::path::PathBuf;

use crate::aggregate::Granularity;
use crate::error::AppError;
use crate::settings::{load_settings, save_settings, settings_path, shellexpand_path};

pub fn show() -> anyhow::Result<()> {
    let settings = load_settings();
    let json = serde_json::to_string_pretty(&settings)?;
    println!("{}\n{json}", settings_path().display());
    Ok(())
}

pub fn use_file(path: &str) -> anyhow::Result<()> {
    let resolved = PathBuf::from(shellexpand_path(path));
    if !resolved.is_file() {
        return Err(AppError::Settings(format!("No sales file found at {}", resolved.display())).into());
    }

    let mut settings = load_settings();
    settings.data_file = Some(resolved.to_string_lossy().to_string());
    save_settings(&settings)?;

    println!("Using {}", resolved.display());
    Ok(())
}

pub fn set(
    granularity: Option<Granularity>,
    top_n: Option<usize>,
    currency: Option<String>,
) -> anyhow::Result<()> {
    let mut settings = load_settings();
    if let Some(g) = granularity {
        settings.default_granularity = g.key().to_string();
    }
    if let Some(n) = top_n {
        settings.top_n = n;
    }
    if let Some(symbol) = currency {
        settings.currency_symbol = symbol;
    }
    save_settings(&settings)?;
    println!("Settings saved.");
    Ok(())
}
