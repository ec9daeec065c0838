use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::{default_ledger_path, ensure_pesa_home, expand_home, pesa_home};

/// Environment variable that overrides `[ledger].path`
pub const LEDGER_ENV: &str = "PESA_LEDGER";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ledger: LedgerSection,
    #[serde(default)]
    pub logging: LoggingSection,
    #[serde(default)]
    pub report: ReportSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerSection {
    /// JSON-lines ledger file (default: ~/.pesa/ledger.jsonl)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// tracing filter directive, e.g. "info" or "pesa_ingest=debug"
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSection {
    pub top_limit: usize,
    pub page_size: usize,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            top_limit: 10,
            page_size: 20,
        }
    }
}

impl Config {
    /// Ledger location: env override, then config, then the default under ~/.pesa.
    pub fn ledger_path(&self, env_override: Option<String>) -> Result<PathBuf> {
        if let Some(p) = env_override.filter(|p| !p.trim().is_empty()) {
            return expand_home(p.trim());
        }
        match self.ledger.path.as_deref() {
            Some(p) if !p.trim().is_empty() => expand_home(p.trim()),
            _ => default_ledger_path(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(pesa_home()?.join("config.toml"))
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = ensure_pesa_home()?.join("config.toml");
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let cfg = Config::default();
    save_config(&cfg)?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.report.top_limit, 10);
        assert_eq!(cfg.report.page_size, 20);
        assert!(cfg.ledger.path.is_none());
    }

    #[test]
    fn test_partial_sections() {
        let cfg = parse_config(
            r#"
[ledger]
path = "/tmp/pesa/ledger.jsonl"

[report]
top_limit = 5
"#,
        )
        .unwrap();
        assert_eq!(cfg.report.top_limit, 5);
        assert_eq!(cfg.report.page_size, 20);
        assert_eq!(
            cfg.ledger_path(None).unwrap(),
            PathBuf::from("/tmp/pesa/ledger.jsonl")
        );
    }

    #[test]
    fn test_env_override_wins() {
        let cfg = parse_config("[ledger]\npath = \"/tmp/a.jsonl\"\n").unwrap();
        assert_eq!(
            cfg.ledger_path(Some("/tmp/b.jsonl".into())).unwrap(),
            PathBuf::from("/tmp/b.jsonl")
        );
        assert_eq!(
            cfg.ledger_path(Some("  ".into())).unwrap(),
            PathBuf::from("/tmp/a.jsonl")
        );
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let cfg = Config::default();
        let s = toml::to_string_pretty(&cfg).unwrap();
        let back = parse_config(&s).unwrap();
        assert_eq!(back.report.top_limit, cfg.report.top_limit);
        assert_eq!(back.logging.level, cfg.logging.level);
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        assert!(parse_config("[report]\ntop_limit = \"ten\"").is_err());
    }
}
