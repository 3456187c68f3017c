use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::render::OutputFormat;

/// Common options shared by every profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreSettings {
    pub prompt: String,
    /// Block on asynchronous jobs until they finish.
    pub asyncblock: bool,
    /// Overall timeout in seconds for a remote call, including job polling.
    pub timeout: u64,
    pub output: OutputFormat,
    pub verifycert: bool,
    /// Live argument-value completion; when off, value completion makes
    /// no network calls and offers nothing.
    pub paramcompletion: bool,
    /// Name of the active server profile.
    pub profile: String,
}

impl Default for CoreSettings {
    fn default() -> Self {
        Self {
            prompt: "☁".to_string(),
            asyncblock: true,
            timeout: 1800,
            output: OutputFormat::Json,
            verifycert: true,
            paramcompletion: true,
            profile: "localcloud".to_string(),
        }
    }
}

/// One management server entry in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerProfile {
    pub url: String,
    pub username: String,
    pub password: String,
    pub domain: String,
    pub apikey: String,
    pub secretkey: String,
}

impl Default for ServerProfile {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080/client/api".to_string(),
            username: "admin".to_string(),
            password: "password".to_string(),
            domain: "/".to_string(),
            apikey: String::new(),
            secretkey: String::new(),
        }
    }
}

impl ServerProfile {
    /// Key-pair auth takes precedence over password auth.
    #[must_use]
    pub fn has_key_auth(&self) -> bool {
        !self.apikey.is_empty() && !self.secretkey.is_empty()
    }

    #[must_use]
    pub fn has_password_auth(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

/// On-disk layout of `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub core: CoreSettings,
    pub profiles: BTreeMap<String, ServerProfile>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        let core = CoreSettings::default();
        let mut profiles = BTreeMap::new();
        profiles.insert(core.profile.clone(), ServerProfile::default());
        Self { core, profiles }
    }
}
