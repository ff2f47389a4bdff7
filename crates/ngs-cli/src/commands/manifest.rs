//! Implementation of the `new-go-server manifest` command.

use serde::Serialize;

use ngs_core::{
    domain::{Manifest, ManifestEntry},
    error::NgsError,
};

use crate::{
    cli::{ManifestArgs, ManifestFormat},
    error::{CliError, CliResult},
    output::OutputManager,
};

/// One manifest row as printed by `--format json`.
#[derive(Debug, Serialize)]
struct EntryDto<'a> {
    source: &'a str,
    target: &'a str,
}

impl<'a> From<&'a ManifestEntry> for EntryDto<'a> {
    fn from(entry: &'a ManifestEntry) -> Self {
        Self {
            source: entry.source_id(),
            target: entry.target().as_str(),
        }
    }
}

pub fn execute(args: ManifestArgs, output: OutputManager) -> CliResult<()> {
    let manifest = Manifest::builtin().map_err(NgsError::from)?;

    match args.format {
        ManifestFormat::Table => {
            output.header(&format!("Built-in manifest ({} files):", manifest.len()))?;
            let width = manifest
                .iter()
                .map(|e| e.source_id().len())
                .max()
                .unwrap_or(0);
            for entry in manifest.iter() {
                output.data(&format!(
                    "  {:<width$}  ->  {}",
                    entry.source_id(),
                    entry.target()
                ))?;
            }
        }

        ManifestFormat::List => {
            for entry in manifest.iter() {
                output.data(entry.target().as_str())?;
            }
        }

        ManifestFormat::Json => {
            output.data(&to_json(&manifest)?)?;
        }
    }

    Ok(())
}

fn to_json(manifest: &Manifest) -> CliResult<String> {
    let rows: Vec<EntryDto<'_>> = manifest.iter().map(EntryDto::from).collect();
    serde_json::to_string_pretty(&rows).map_err(|e| CliError::IoError {
        message: format!("Failed to serialise manifest: {e}"),
        source: e.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_lists_every_entry_in_order() {
        let manifest = Manifest::builtin().unwrap();
        let json = to_json(&manifest).unwrap();
        let rows: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();

        assert_eq!(rows.len(), manifest.len());
        assert_eq!(rows[0]["target"], "main.go");
        assert!(
            rows.iter()
                .any(|r| r["target"] == ".github/workflows/ci.yml")
        );
    }
}
