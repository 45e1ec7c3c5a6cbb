use std::path::PathBuf;

use anyhow::Context;

use crate::cli::{FilterArgs, Session};
use crate::export::write_csv;

pub fn run(file: Option<&str>, filter: &FilterArgs, output: Option<String>) -> anyhow::Result<()> {
    let session = Session::open(file)?;
    let view = session.view(filter)?;

    match output.map(PathBuf::from) {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let out = std::fs::File::create(&path)
                .with_context(|| format!("cannot create {}", path.display()))?;
            let written = write_csv(&view, std::io::BufWriter::new(out))?;
            println!("Wrote {written} transactions to {}", path.display());
        }
        None => {
            write_csv(&view, std::io::stdout().lock())?;
        }
    }
    Ok(())
}
