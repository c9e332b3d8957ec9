//! Input file loading shared by every command.

use std::path::Path;

use crewpay_bonus::{load_jobs_json, EmployeeDirectory, FinanceConfig, JobRecord};

use crate::CliError;

pub fn load_finance(path: &Path) -> Result<FinanceConfig, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::config(format!("cannot read {}: {e}", path.display())))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config = if is_json {
        FinanceConfig::from_json(&text)
    } else {
        FinanceConfig::from_toml(&text)
    };
    config.map_err(|e| {
        CliError::config(format!("{}: {e}", path.display()))
            .with_hint("check the file with `crewpay validate`")
    })
}

pub fn load_jobs(path: &Path) -> Result<Vec<JobRecord>, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::input(format!("cannot read {}: {e}", path.display())))?;
    let jobs = load_jobs_json(&text)
        .map_err(|e| CliError::input(format!("{}: {e}", path.display())))?;
    log::debug!("loaded {} job(s) from {}", jobs.len(), path.display());
    Ok(jobs)
}

/// Empty directory when no path is given; every name then stays raw.
pub fn load_directory(path: Option<&Path>) -> Result<EmployeeDirectory, CliError> {
    let Some(path) = path else {
        return Ok(EmployeeDirectory::default());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::input(format!("cannot read {}: {e}", path.display())))?;
    EmployeeDirectory::from_json(&text)
        .map_err(|e| CliError::input(format!("{}: {e}", path.display())))
}

/// Pretty JSON, optionally written to `output`, printed to stdout when `json`.
pub fn emit_json<T: serde::Serialize>(
    value: &T,
    json: bool,
    output: Option<&Path>,
) -> Result<(), CliError> {
    let json_str = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;

    if let Some(path) = output {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::io(format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json {
        println!("{json_str}");
    }
    Ok(())
}
