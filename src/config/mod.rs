//! Config-file handling: the TOML file, the profile set, and the
//! per-profile discovery-payload cache paths.
//!
//! Writes go through an advisory file lock plus a temp-file rename so a
//! concurrent shell never reads a half-written config.

pub mod models;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use fs2::FileExt;
use tracing::debug;

use crate::constants::{
    CACHE_SUFFIX, CONFIG_FILENAME, ENV_CONFIG_DIR, HISTORY_FILENAME, LOCK_FILENAME, PROFILE_DIR,
};
use crate::error::Error;
use crate::render::OutputFormat;
use models::{ConfigFile, CoreSettings, ServerProfile};

/// Prompt glyphs picked from on `set prompt random`.
const PROMPT_GLYPHS: &[&str] = &["☁", "⛅", "🌩"];

#[derive(Debug)]
pub struct Config {
    dir: PathBuf,
    pub core: CoreSettings,
    pub profiles: BTreeMap<String, ServerProfile>,
}

impl Config {
    /// Resolves the config directory, honoring the env override.
    ///
    /// # Errors
    /// Fails when no home directory can be determined.
    pub fn default_dir() -> Result<PathBuf, Error> {
        if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
            return Ok(PathBuf::from(dir));
        }
        dirs::home_dir()
            .map(|home| home.join(".cumulus"))
            .ok_or_else(|| Error::Config("cannot determine home directory".to_string()))
    }

    /// Loads (or creates) the config rooted at `dir`.
    ///
    /// The active profile is guaranteed to have a profile table after
    /// this returns; a missing one is created with defaults and saved.
    ///
    /// # Errors
    /// Fails on unreadable directories or an unparseable config file.
    pub fn load(dir: PathBuf) -> Result<Self, Error> {
        fs::create_dir_all(dir.join(PROFILE_DIR))?;
        let path = dir.join(CONFIG_FILENAME);
        let mut file = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            toml::from_str::<ConfigFile>(&raw)?
        } else {
            debug!(target: "cumulus::config", "writing default config to {}", path.display());
            ConfigFile::default()
        };
        file.profiles
            .entry(file.core.profile.clone())
            .or_default();
        let config = Self {
            dir,
            core: file.core,
            profiles: file.profiles,
        };
        config.save()?;
        Ok(config)
    }

    /// Persists the config atomically under the advisory lock.
    ///
    /// # Errors
    /// Fails when the file cannot be locked or written.
    pub fn save(&self) -> Result<(), Error> {
        let file = ConfigFile {
            core: self.core.clone(),
            profiles: self.profiles.clone(),
        };
        let rendered = toml::to_string_pretty(&file)?;
        let lock = fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.dir.join(LOCK_FILENAME))?;
        lock.lock_exclusive()?;
        let result = write_atomic(&self.config_path(), &rendered);
        let _ = FileExt::unlock(&lock);
        result
    }

    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILENAME)
    }

    #[must_use]
    pub fn history_path(&self) -> PathBuf {
        self.dir.join(HISTORY_FILENAME)
    }

    /// Discovery-payload cache file for the active profile.
    #[must_use]
    pub fn cache_path(&self) -> PathBuf {
        self.dir
            .join(PROFILE_DIR)
            .join(format!("{}{CACHE_SUFFIX}", self.core.profile))
    }

    #[must_use]
    pub fn active_profile(&self) -> &ServerProfile {
        static FALLBACK: OnceLock<ServerProfile> = OnceLock::new();
        self.profiles
            .get(&self.core.profile)
            .unwrap_or_else(|| FALLBACK.get_or_init(ServerProfile::default))
    }

    #[must_use]
    pub fn profile_names(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }

    /// Shell prompt, `(profile) glyph `.
    #[must_use]
    pub fn prompt(&self) -> String {
        format!("({}) {} > ", self.core.profile, self.core.prompt)
    }

    /// Applies one `set <key> <value>` update and persists it.
    ///
    /// # Errors
    /// Fails on unknown keys, unparseable values, or a failed save.
    pub fn update(&mut self, key: &str, value: &str) -> Result<(), Error> {
        match key {
            "prompt" => {
                self.core.prompt = if value == "random" {
                    PROMPT_GLYPHS[fastrand::usize(..PROMPT_GLYPHS.len())].to_string()
                } else {
                    value.to_string()
                };
            }
            "asyncblock" => self.core.asyncblock = parse_bool(key, value)?,
            "verifycert" => self.core.verifycert = parse_bool(key, value)?,
            "paramcompletion" => self.core.paramcompletion = parse_bool(key, value)?,
            "timeout" => {
                self.core.timeout = value
                    .parse()
                    .map_err(|_| Error::Config(format!("invalid timeout '{value}'")))?;
            }
            "output" => self.core.output = value.parse::<OutputFormat>()?,
            "profile" => {
                if value.is_empty() {
                    return Err(Error::Config("profile name cannot be empty".to_string()));
                }
                self.core.profile = value.to_string();
                self.profiles.entry(value.to_string()).or_default();
            }
            "url" | "username" | "password" | "domain" | "apikey" | "secretkey" => {
                let profile = self
                    .profiles
                    .entry(self.core.profile.clone())
                    .or_default();
                match key {
                    "url" => profile.url = value.to_string(),
                    "username" => profile.username = value.to_string(),
                    "password" => profile.password = value.to_string(),
                    "domain" => profile.domain = value.to_string(),
                    "apikey" => profile.apikey = value.to_string(),
                    _ => profile.secretkey = value.to_string(),
                }
            }
            other => return Err(Error::Config(format!("invalid option '{other}'"))),
        }
        self.save()
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, Error> {
    match value {
        "true" | "on" => Ok(true),
        "false" | "off" => Ok(false),
        other => Err(Error::Config(format!(
            "invalid value '{other}' for {key}, expected true or false"
        ))),
    }
}

/// Writes via a sibling temp file and rename, so readers only ever see
/// a complete file.
fn write_atomic(path: &Path, contents: &str) -> Result<(), Error> {
    let parent = path
        .parent()
        .ok_or_else(|| Error::Config(format!("no parent directory for {}", path.display())))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("config");
    let tmp = parent.join(format!(".{name}.tmp"));
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
