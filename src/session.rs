//! Per-process session state: the config, the catalog, the lazily
//! derived verb index, and the remote invoker.
//!
//! The catalog is rebuilt wholesale (never mutated in place) and every
//! rebuild invalidates the derived verb index, so readers always see a
//! consistent pair.

use std::fs;
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::catalog::verbs::VerbIndex;
use crate::catalog::{builtin, ingest, ApiCatalog};
use crate::client::{HttpInvoker, RemoteInvoker};
use crate::commands;
use crate::complete::{self, CompleteContext, Completion};
use crate::config::Config;
use crate::error::Error;
use crate::spinner::{BusyIndicator, TerminalSpinner};

pub struct Session {
    pub config: Config,
    catalog: ApiCatalog,
    verb_index: Option<Arc<VerbIndex>>,
    invoker: Box<dyn RemoteInvoker>,
    indicator: Box<dyn BusyIndicator>,
}

impl Session {
    /// Builds a session with the production HTTP invoker and loads the
    /// cached catalog for the active profile.
    ///
    /// # Errors
    /// Fails when the invoker cannot be constructed.
    pub fn new(config: Config) -> Result<Self, Error> {
        let invoker = HttpInvoker::new(config.active_profile().clone(), &config.core)?;
        Ok(Self::with_parts(
            config,
            Box::new(invoker),
            Box::new(TerminalSpinner::new()),
        ))
    }

    /// Dependency-injected constructor, used directly by tests.
    #[must_use]
    pub fn with_parts(
        config: Config,
        invoker: Box<dyn RemoteInvoker>,
        indicator: Box<dyn BusyIndicator>,
    ) -> Self {
        let mut session = Self {
            config,
            catalog: ApiCatalog::empty(),
            verb_index: None,
            invoker,
            indicator,
        };
        session.reload_catalog();
        session
    }

    #[must_use]
    pub const fn catalog(&self) -> &ApiCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn invoker(&self) -> &dyn RemoteInvoker {
        self.invoker.as_ref()
    }

    /// Loads the active profile's cached discovery payload, falling
    /// back to the built-in payload when no usable cache exists.
    pub fn reload_catalog(&mut self) {
        let cached: Option<Value> = fs::read_to_string(self.config.cache_path())
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok());
        let payload = cached.unwrap_or_else(|| {
            info!(
                target: "cumulus::session",
                "no API cache for profile '{}', using built-in catalog; run 'sync'",
                self.config.core.profile
            );
            builtin::fallback_payload()
        });
        self.install_catalog(&payload);
    }

    /// Replaces the catalog from a discovery payload in one step and
    /// invalidates the verb index. A payload that cannot be ingested at
    /// all falls back to the built-in catalog.
    pub fn install_catalog(&mut self, payload: &Value) {
        match ingest::ingest(payload) {
            Ok(catalog) => self.catalog = catalog,
            Err(err) => {
                warn!(target: "cumulus::session", "discarding unusable discovery payload: {err}");
                if let Ok(catalog) = ingest::ingest(&builtin::fallback_payload()) {
                    self.catalog = catalog;
                }
            }
        }
        self.verb_index = None;
    }

    /// Writes the raw discovery payload to the active profile's cache.
    ///
    /// # Errors
    /// Fails when the cache file cannot be written.
    pub fn save_cache(&self, payload: &Value) -> Result<(), Error> {
        fs::write(self.config.cache_path(), serde_json::to_string(payload)?)?;
        Ok(())
    }

    /// The verb index derived from the current catalog, built on first
    /// use after each invalidation.
    pub fn verb_index(&mut self) -> Arc<VerbIndex> {
        if let Some(index) = &self.verb_index {
            return Arc::clone(index);
        }
        let locals = commands::local_command_specs(&self.config);
        let index = Arc::new(VerbIndex::build(&self.catalog, &locals));
        self.verb_index = Some(Arc::clone(&index));
        index
    }

    /// Completion entry point for the shell helper.
    pub fn complete_line(&mut self, line: &str, pos: usize) -> Completion {
        let index = self.verb_index();
        let ctx = CompleteContext {
            index: &index,
            live_values: self.config.core.paramcompletion,
            invoker: self.invoker.as_ref(),
            indicator: self.indicator.as_ref(),
        };
        complete::complete(line, pos, &ctx)
    }

    /// Applies one `set` update, then refreshes whatever it touched:
    /// the invoker for connection settings, the catalog for a profile
    /// switch, and always the derived index.
    ///
    /// # Errors
    /// Fails on invalid keys/values or when persisting the config fails.
    pub fn apply_setting(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.config.update(key, value)?;
        self.verb_index = None;
        match key {
            "profile" => {
                self.rebuild_invoker()?;
                self.reload_catalog();
            }
            "url" | "username" | "password" | "domain" | "apikey" | "secretkey" | "timeout"
            | "verifycert" | "asyncblock" => self.rebuild_invoker()?,
            _ => {}
        }
        Ok(())
    }

    fn rebuild_invoker(&mut self) -> Result<(), Error> {
        self.invoker = Box::new(HttpInvoker::new(
            self.config.active_profile().clone(),
            &self.config.core,
        )?);
        Ok(())
    }
}

#[cfg(test)]
impl Session {
    /// Session over a temp config dir and an empty canned invoker.
    pub fn for_tests() -> (tempfile::TempDir, Self) {
        Self::for_tests_with_invoker(Box::new(crate::client::mock::StaticInvoker::new()))
    }

    pub fn for_tests_with_invoker(
        invoker: Box<dyn RemoteInvoker>,
    ) -> (tempfile::TempDir, Self) {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let config = Config::load(dir.path().to_path_buf()).expect("config");
        let session = Self::with_parts(config, invoker, Box::new(crate::spinner::NoopIndicator));
        (dir, session)
    }
}
