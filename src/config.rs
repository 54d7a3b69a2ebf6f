// src/config.rs
// Source endpoints and fetch settings. Defaults live in code; a TOML file
// (FEEDS_CONFIG_PATH) and FEEDS_* env vars override them, in that order.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::fetch::{BROWSER_USER_AGENT, DEFAULT_TIMEOUT_SECS};

const ENV_PATH: &str = "FEEDS_CONFIG_PATH";

#[derive(Debug, Clone)]
pub struct FeedsConfig {
    /// ACN NIS2 announcements page (HTML).
    pub nis2_page_url: String,
    /// Origin used to resolve relative links on the NIS2 page.
    pub nis2_base_url: String,
    /// Primary CSIRT Italia advisory feed (RSS).
    pub csirt_rss_url: String,
    /// ACN index page scanned for feed links when the primary fails.
    pub acn_index_url: String,
    /// Origin used to resolve relative links on the index page.
    pub acn_base_url: String,
    /// CVE-severity feed (RSS).
    pub cve_rss_url: String,
    /// EPSS predictions page (HTML cards).
    pub epss_page_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            nis2_page_url: "https://www.acn.gov.it/portale/nis/notizie".into(),
            nis2_base_url: "https://www.acn.gov.it".into(),
            csirt_rss_url: "https://www.csirt.gov.it/contenuti/feed/rss.xml".into(),
            acn_index_url: "https://www.acn.gov.it/portale/tutte-le-notizie".into(),
            acn_base_url: "https://www.acn.gov.it".into(),
            cve_rss_url: "https://cvefeed.io/rssfeed/severity/high.xml".into(),
            epss_page_url: "https://cvefeed.io/epss".into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: BROWSER_USER_AGENT.into(),
        }
    }
}

// TOML shape: every key optional so partial files work.
#[derive(Debug, Deserialize, Default)]
struct FileOverrides {
    nis2_page_url: Option<String>,
    nis2_base_url: Option<String>,
    csirt_rss_url: Option<String>,
    acn_index_url: Option<String>,
    acn_base_url: Option<String>,
    cve_rss_url: Option<String>,
    epss_page_url: Option<String>,
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
}

impl FeedsConfig {
    /// Load from an explicit TOML file, layering onto the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading feeds config from {}", path.display()))?;
        let overrides: FileOverrides =
            toml::from_str(&content).context("parsing feeds config toml")?;
        let mut cfg = Self::default();
        cfg.apply(overrides);
        Ok(cfg)
    }

    /// Load using env + fallbacks:
    /// 1) $FEEDS_CONFIG_PATH (must exist if set)
    /// 2) config/feeds.toml
    /// 3) built-in defaults
    /// FEEDS_* env vars always win over file values.
    pub fn load_default() -> Result<Self> {
        let mut cfg = if let Ok(p) = std::env::var(ENV_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("FEEDS_CONFIG_PATH points to non-existent path"));
            }
            Self::load_from(&pb)?
        } else {
            let default_p = PathBuf::from("config/feeds.toml");
            if default_p.exists() {
                Self::load_from(&default_p)?
            } else {
                Self::default()
            }
        };
        cfg.apply_env();
        Ok(cfg)
    }

    fn apply(&mut self, o: FileOverrides) {
        if let Some(v) = o.nis2_page_url {
            self.nis2_page_url = v;
        }
        if let Some(v) = o.nis2_base_url {
            self.nis2_base_url = v;
        }
        if let Some(v) = o.csirt_rss_url {
            self.csirt_rss_url = v;
        }
        if let Some(v) = o.acn_index_url {
            self.acn_index_url = v;
        }
        if let Some(v) = o.acn_base_url {
            self.acn_base_url = v;
        }
        if let Some(v) = o.cve_rss_url {
            self.cve_rss_url = v;
        }
        if let Some(v) = o.epss_page_url {
            self.epss_page_url = v;
        }
        if let Some(v) = o.timeout_secs {
            self.timeout_secs = v;
        }
        if let Some(v) = o.user_agent {
            self.user_agent = v;
        }
    }

    fn apply_env(&mut self) {
        let mut set = |key: &str, slot: &mut String| {
            if let Ok(v) = std::env::var(key) {
                if !v.trim().is_empty() {
                    *slot = v;
                }
            }
        };
        set("FEEDS_NIS2_URL", &mut self.nis2_page_url);
        set("FEEDS_NIS2_BASE_URL", &mut self.nis2_base_url);
        set("FEEDS_CSIRT_RSS_URL", &mut self.csirt_rss_url);
        set("FEEDS_ACN_INDEX_URL", &mut self.acn_index_url);
        set("FEEDS_ACN_BASE_URL", &mut self.acn_base_url);
        set("FEEDS_CVE_RSS_URL", &mut self.cve_rss_url);
        set("FEEDS_EPSS_URL", &mut self.epss_page_url);
        if let Ok(v) = std::env::var("FEEDS_TIMEOUT_SECS") {
            if let Ok(n) = v.trim().parse() {
                self.timeout_secs = n;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn defaults_point_at_the_expected_sources() {
        let cfg = FeedsConfig::default();
        assert!(cfg.csirt_rss_url.ends_with(".xml"));
        assert!(cfg.nis2_page_url.starts_with(cfg.nis2_base_url.as_str()));
        assert_eq!(cfg.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[serial_test::serial]
    #[test]
    fn env_overrides_win() {
        env::set_var("FEEDS_CVE_RSS_URL", "https://example.test/cve.xml");
        env::set_var("FEEDS_TIMEOUT_SECS", "3");
        let cfg = FeedsConfig::load_default().expect("load");
        assert_eq!(cfg.cve_rss_url, "https://example.test/cve.xml");
        assert_eq!(cfg.timeout_secs, 3);
        env::remove_var("FEEDS_CVE_RSS_URL");
        env::remove_var("FEEDS_TIMEOUT_SECS");
    }

    #[serial_test::serial]
    #[test]
    fn toml_overlays_defaults() {
        let dir = env::temp_dir().join("secfeed-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let p = dir.join("feeds.toml");
        std::fs::write(&p, r#"epss_page_url = "https://example.test/epss""#).unwrap();

        let cfg = FeedsConfig::load_from(&p).expect("load toml");
        assert_eq!(cfg.epss_page_url, "https://example.test/epss");
        // untouched keys keep their defaults
        assert_eq!(cfg.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }
}
