// src/config.rs

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};

use crate::db::{Store, Stores};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub tree_db: PathBuf,
    pub events_db: PathBuf,
    pub raw_db: PathBuf,
    pub store_timeout: Duration,
    pub template_dir: PathBuf,
    pub static_dir: PathBuf,
}

impl Config {
    /// Read from the process environment (after `.env` has been loaded).
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let path = |key: &str, default: &str| PathBuf::from(lookup(key).unwrap_or_else(|| default.into()));

        let port: u16 = match lookup("PORT") {
            Some(s) => s.trim().parse().with_context(|| format!("PORT={s:?} is not a port number"))?,
            None => 8080,
        };

        let timeout_secs: u64 = match lookup("STORE_TIMEOUT_SECS") {
            Some(s) => s
                .trim()
                .parse()
                .with_context(|| format!("STORE_TIMEOUT_SECS={s:?} is not a whole number of seconds"))?,
            None => 5,
        };
        if timeout_secs == 0 {
            bail!("STORE_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Self {
            port,
            tree_db: path("TREE_DB_PATH", "Tree.db"),
            events_db: path("EVENTS_DB_PATH", "NPSData2.db"),
            raw_db: path("RAW_DB_PATH", "data.db"),
            store_timeout: Duration::from_secs(timeout_secs),
            template_dir: path("TEMPLATE_DIR", "templates"),
            static_dir: path("STATIC_DIR", "static"),
        })
    }

    pub fn stores(&self) -> Stores {
        Stores {
            tree: Store::new(&self.tree_db, self.store_timeout),
            events: Store::new(&self.events_db, self.store_timeout),
            raw: Store::new(&self.raw_db, self.store_timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = from_pairs(&[]).unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.tree_db, PathBuf::from("Tree.db"));
        assert_eq!(cfg.events_db, PathBuf::from("NPSData2.db"));
        assert_eq!(cfg.raw_db, PathBuf::from("data.db"));
        assert_eq!(cfg.store_timeout, Duration::from_secs(5));
    }

    #[test]
    fn overrides_are_read() {
        let cfg = from_pairs(&[("PORT", "5000"), ("TREE_DB_PATH", "/srv/t.db"), ("STORE_TIMEOUT_SECS", "2")]).unwrap();
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.tree_db, PathBuf::from("/srv/t.db"));
        assert_eq!(cfg.store_timeout, Duration::from_secs(2));
    }

    #[test]
    fn bad_values_are_errors() {
        assert!(from_pairs(&[("PORT", "eighty")]).is_err());
        assert!(from_pairs(&[("STORE_TIMEOUT_SECS", "0")]).is_err());
        assert!(from_pairs(&[("STORE_TIMEOUT_SECS", "-1")]).is_err());
    }
}
