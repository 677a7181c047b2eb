use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use xplan_io::importers::import_results_csv;

use xplan_cli::cli::ImportCommands;

pub fn handle(command: &ImportCommands) -> Result<()> {
    match command {
        ImportCommands::Csv { input, output } => import_csv(input, output),
    }
}

fn import_csv(input: &Path, output: &Path) -> Result<()> {
    if !input.is_file() {
        bail!("input file {} does not exist", input.display());
    }
    info!("Importing results CSV from {} to {}", input.display(), output.display());

    let import = import_results_csv(input)
        .with_context(|| format!("importing {}", input.display()))?;

    for issue in &import.diagnostics.issues {
        match issue.line {
            Some(line) => warn!("line {}: [{}] {}", line, issue.category, issue.message),
            None => warn!("[{}] {}", issue.category, issue.message),
        }
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {}", parent.display()))?;
    }
    import
        .write_json(output)
        .with_context(|| format!("writing {}", output.display()))?;

    println!(
        "Imported {} records to {} ({})",
        import.records.len(),
        output.display(),
        import.diagnostics.summary()
    );
    Ok(())
}
