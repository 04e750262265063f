use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub mount: MountConfig,

    #[serde(default)]
    pub walk: WalkConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MountConfig {
    /// Mount partitions read-only unless --rw is given.
    pub read_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkConfig {
    /// Glob-style name patterns skipped by archive, copy and md5 walks
    /// (e.g. "*.tmp", "lost+found"). A `*` is honored at either end.
    pub exclude: Vec<String>,
}

/// True when `name` matches any of the patterns. A trailing `*` makes the
/// pattern a prefix match, a leading `*` a suffix match; anything else must
/// match exactly.
pub fn excluded(patterns: &[String], name: &str) -> bool {
    patterns.iter().any(|pat| {
        if let Some(p) = pat.strip_suffix('*') {
            name.starts_with(p)
        } else if let Some(s) = pat.strip_prefix('*') {
            name.ends_with(s)
        } else {
            pat == name
        }
    })
}

// ── Defaults ─────────────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        Self {
            mount: MountConfig::default(),
            walk:  WalkConfig::default(),
        }
    }
}

impl Default for MountConfig {
    fn default() -> Self {
        Self { read_only: true }
    }
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self { exclude: vec!["lost+found".into()] }
    }
}

// ── Load / Save ───────────────────────────────────────────────────────

impl Config {
    pub fn load() -> Self {
        match try_load() {
            Ok(c)  => c,
            Err(_) => {
                // Write defaults on first run (best-effort)
                debug!("no usable config file, writing defaults");
                let _ = try_write_defaults();
                Config::default()
            }
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("fskit").join("fskit.toml"))
    }
}

fn try_load() -> Result<Config> {
    let path = Config::config_path().ok_or_else(|| anyhow::anyhow!("no config dir"))?;
    let text = fs::read_to_string(path)?;
    let cfg: Config = toml::from_str(&text)?;
    Ok(cfg)
}

fn try_write_defaults() -> Result<()> {
    let path = Config::config_path().ok_or_else(|| anyhow::anyhow!("no config dir"))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let text = toml::to_string_pretty(&Config::default())?;
    fs::write(path, format!("# fskit configuration\n# Generated on first run — edit freely\n\n{}", text))?;
    Ok(())
}
