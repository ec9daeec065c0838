use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub fn pesa_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".pesa"))
}

pub fn ensure_pesa_home() -> Result<PathBuf> {
    let dir = pesa_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn default_ledger_path() -> Result<PathBuf> {
    Ok(pesa_home()?.join("ledger.jsonl"))
}

/// Expand a leading `~/` against HOME.
pub fn expand_home(path: &str) -> Result<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => {
            let home = std::env::var("HOME").context("HOME is not set")?;
            Ok(PathBuf::from(home).join(rest))
        }
        None => Ok(PathBuf::from(path)),
    }
}
