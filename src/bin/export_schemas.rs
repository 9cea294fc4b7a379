//! Prints JSON Schemas for the report and error record.
//!
//! ```text
//! export_schemas            # both schemas to stdout
//! export_schemas schemas/   # one file per schema
//! ```

use anyhow::{Context, Result};
use equity_valuation::application::error::ErrorRecord;
use equity_valuation::domain::entities::ValuationReport;
use schemars::schema::RootSchema;
use schemars::schema_for;
use std::path::PathBuf;

fn schemas() -> [(&'static str, RootSchema); 2] {
    [
        ("valuation_report", schema_for!(ValuationReport)),
        ("error_record", schema_for!(ErrorRecord)),
    ]
}

fn main() -> Result<()> {
    let out_dir = std::env::args_os().nth(1).map(PathBuf::from);

    match out_dir {
        Some(dir) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("cannot create {}", dir.display()))?;
            for (name, schema) in schemas() {
                let path = dir.join(format!("{name}.schema.json"));
                let body = serde_json::to_string_pretty(&schema)?;
                std::fs::write(&path, body)
                    .with_context(|| format!("cannot write {}", path.display()))?;
                println!("{}", path.display());
            }
        }
        None => {
            let all: serde_json::Map<String, serde_json::Value> = schemas()
                .into_iter()
                .map(|(name, schema)| -> Result<(String, serde_json::Value)> {
                    Ok((name.to_string(), serde_json::to_value(schema)?))
                })
                .collect::<Result<_>>()?;
            println!("{}", serde_json::to_string_pretty(&all)?);
        }
    }
    Ok(())
}
