//! Path checks shared by the subcommands.
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Dataset flavours accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Csv,
    Tsv,
}

pub fn data_format(path: &Path) -> Option<DataFormat> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "csv" => Some(DataFormat::Csv),
        "tsv" => Some(DataFormat::Tsv),
        _ => None,
    }
}

/// Check that `path` names an existing `.csv` or `.tsv` file.
pub fn validate_tsv_or_csv_file(path: &str) -> Result<DataFormat> {
    let pb = Path::new(path);
    let Some(format) = data_format(pb) else {
        anyhow::bail!("File must have a .tsv or .csv extension: {}", path);
    };
    if !pb.is_file() {
        anyhow::bail!("File does not exist: {}", path);
    }
    Ok(format)
}

/// Create the parent directory of an output file if it is missing.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            log::debug!("Created output directory {}", parent.display());
            Ok(())
        }
        _ => Ok(()),
    }
}
