//! Remote invocation: signed or session-authenticated HTTP calls plus
//! the blocking poll loop for asynchronous jobs.
//!
//! From the dispatcher's and completer's point of view this is one
//! synchronous, potentially slow, potentially failing call behind the
//! [`RemoteInvoker`] trait. The production implementation owns a tokio
//! runtime and blocks on an async `reqwest` client internally.

pub mod mock;
pub mod sign;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::debug;

use crate::config::models::{CoreSettings, ServerProfile};
use crate::constants::{
    JOB_POLL_INTERVAL_SECS, OP_LOGIN, OP_QUERY_ASYNC_JOB, PARAM_COMMAND, PARAM_RESPONSE,
    PARAM_SESSION_KEY,
};
use crate::error::Error;
use crate::spinner::{BusyIndicator, TerminalSpinner};

/// Executes one named remote operation with raw `key=value` argument
/// tokens, blocking until completion (including async-job polling when
/// `is_async` and the session requests blocking behavior).
pub trait RemoteInvoker {
    /// # Errors
    /// Network, auth, decode, and remote-reported failures all surface
    /// as error values; a decoded partial body rides along where one
    /// exists.
    fn invoke(&self, operation: &str, args: &[String], is_async: bool) -> Result<Value, Error>;
}

struct AuthSession {
    client: reqwest::Client,
    session_key: String,
}

pub struct HttpInvoker {
    runtime: tokio::runtime::Runtime,
    profile: ServerProfile,
    timeout_secs: u64,
    verify_cert: bool,
    async_block: bool,
    indicator: Box<dyn BusyIndicator>,
    session: RefCell<Option<AuthSession>>,
}

impl HttpInvoker {
    /// # Errors
    /// Fails when the tokio runtime cannot be created.
    pub fn new(profile: ServerProfile, core: &CoreSettings) -> Result<Self, Error> {
        Self::with_indicator(profile, core, Box::new(TerminalSpinner::new()))
    }

    /// # Errors
    /// Fails when the tokio runtime cannot be created.
    pub fn with_indicator(
        profile: ServerProfile,
        core: &CoreSettings,
        indicator: Box<dyn BusyIndicator>,
    ) -> Result<Self, Error> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            runtime,
            profile,
            timeout_secs: core.timeout,
            verify_cert: core.verifycert,
            async_block: core.asyncblock,
            indicator,
            session: RefCell::new(None),
        })
    }

    /// Async core of [`RemoteInvoker::invoke`]; exposed for tests that
    /// already run inside a runtime.
    ///
    /// # Errors
    /// See [`RemoteInvoker::invoke`].
    pub async fn invoke_async(
        &self,
        operation: &str,
        args: &[String],
        is_async: bool,
    ) -> Result<Value, Error> {
        let mut response = self.call(operation, args).await;

        // One re-authentication retry on an expired or rejected session.
        if matches!(&response, Err(Error::Auth(_)))
            && !self.profile.has_key_auth()
            && self.profile.has_password_auth()
        {
            debug!(target: "cumulus::client", "re-authenticating after auth failure");
            *self.session.borrow_mut() = None;
            response = self.call(operation, args).await;
        }
        let body = response?;

        if is_async && self.async_block {
            if let Some(job_id) = body.get("jobid").and_then(Value::as_str) {
                let job_id = job_id.to_string();
                self.indicator.start("polling for async job result");
                let polled = self.poll_job(&job_id).await;
                self.indicator.stop();
                return polled;
            }
        }
        Ok(body)
    }

    async fn call(&self, operation: &str, args: &[String]) -> Result<Value, Error> {
        let mut params = BTreeMap::new();
        params.insert(PARAM_COMMAND.to_string(), operation.to_string());
        for arg in args {
            if let Some((key, value)) = arg.split_once('=') {
                params.insert(key.to_string(), value.to_string());
            }
        }
        params.insert(PARAM_RESPONSE.to_string(), "json".to_string());

        let (status, text) = if self.profile.has_key_auth() {
            self.signed_call(&params).await?
        } else if self.profile.has_password_auth() {
            self.session_call(&mut params).await?
        } else {
            return Err(Error::Auth(
                "provide either apikey/secretkey or username/password to make API calls"
                    .to_string(),
            ));
        };

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Auth(format!(
                "server rejected the {operation} request (HTTP 401)"
            )));
        }

        let data: Value = serde_json::from_str(&text).map_err(|_| Error::Remote {
            message: format!("failed to decode response (HTTP {status})"),
            partial: None,
        })?;
        let payload = response_payload(&data).ok_or_else(|| Error::Remote {
            message: format!("no response payload in reply (HTTP {status})"),
            partial: Some(data.clone()),
        })?;

        if let Some(code) = payload.get("errorcode") {
            let cs_code = payload
                .get("cserrorcode")
                .map(crate::utils::scalar_to_string)
                .unwrap_or_default();
            let message = payload
                .get("errortext")
                .map(crate::utils::scalar_to_string)
                .unwrap_or_default();
            return Err(Error::Remote {
                message: format!(
                    "(HTTP {}, error code {cs_code}) {message}",
                    crate::utils::scalar_to_string(code)
                ),
                partial: Some(payload),
            });
        }
        Ok(payload)
    }

    async fn signed_call(
        &self,
        params: &BTreeMap<String, String>,
    ) -> Result<(reqwest::StatusCode, String), Error> {
        let query = sign::signed_query(params, &self.profile.apikey, &self.profile.secretkey)?;
        let client = self.build_client(false)?;
        let url = format!("{}?{query}", self.profile.url);
        debug!(target: "cumulus::client", "GET {} ({})", self.profile.url, params["command"]);
        let response = client.get(&url).send().await?;
        let status = response.status();
        let text = response.text().await?;
        Ok((status, text))
    }

    async fn session_call(
        &self,
        params: &mut BTreeMap<String, String>,
    ) -> Result<(reqwest::StatusCode, String), Error> {
        if self.session.borrow().is_none() {
            let session = self.login().await?;
            *self.session.borrow_mut() = Some(session);
        }
        let (client, key) = {
            let borrowed = self.session.borrow();
            match borrowed.as_ref() {
                Some(session) => (session.client.clone(), session.session_key.clone()),
                None => return Err(Error::Auth("no active session".to_string())),
            }
        };
        params.insert(PARAM_SESSION_KEY.to_string(), key);
        let url = format!("{}?{}", self.profile.url, sign::encode_params(params));
        debug!(target: "cumulus::client", "GET {} ({})", self.profile.url, params["command"]);
        let response = client.get(&url).send().await?;
        let status = response.status();
        let text = response.text().await?;
        Ok((status, text))
    }

    async fn login(&self) -> Result<AuthSession, Error> {
        let client = self.build_client(true)?;
        let form = [
            (PARAM_COMMAND, OP_LOGIN),
            ("username", self.profile.username.as_str()),
            ("password", self.profile.password.as_str()),
            ("domain", self.profile.domain.as_str()),
            (PARAM_RESPONSE, "json"),
        ];
        debug!(target: "cumulus::client", "POST {} (login)", self.profile.url);
        let response = client.post(&self.profile.url).form(&form).send().await?;
        if !response.status().is_success() {
            return Err(Error::Auth(format!(
                "failed to authenticate with the management server (HTTP {})",
                response.status()
            )));
        }
        let cookie_key = response
            .cookies()
            .find(|cookie| cookie.name() == PARAM_SESSION_KEY)
            .map(|cookie| cookie.value().to_string());
        let session_key = match cookie_key {
            Some(key) => key,
            None => {
                let body: Value = response.json().await?;
                response_payload(&body)
                    .and_then(|payload| {
                        payload
                            .get(PARAM_SESSION_KEY)
                            .and_then(Value::as_str)
                            .map(str::to_string)
                    })
                    .ok_or_else(|| {
                        Error::Auth("login reply carried no session key".to_string())
                    })?
            }
        };
        Ok(AuthSession {
            client,
            session_key,
        })
    }

    async fn poll_job(&self, job_id: &str) -> Result<Value, Error> {
        let deadline = Instant::now() + Duration::from_secs(self.timeout_secs);
        loop {
            let query = self
                .call(OP_QUERY_ASYNC_JOB, &[format!("jobid={job_id}")])
                .await?;
            match query.get("jobstatus").and_then(Value::as_i64).unwrap_or(0) {
                0 => {
                    if Instant::now() >= deadline {
                        return Err(Error::JobTimeout {
                            job_id: job_id.to_string(),
                            seconds: self.timeout_secs,
                        });
                    }
                    tokio::time::sleep(Duration::from_secs(JOB_POLL_INTERVAL_SECS)).await;
                }
                1 => {
                    return Ok(query
                        .get("jobresult")
                        .cloned()
                        .unwrap_or(query));
                }
                _ => {
                    return Err(Error::JobFailed {
                        job_id: job_id.to_string(),
                        partial: Some(query),
                    });
                }
            }
        }
    }

    fn build_client(&self, cookies: bool) -> Result<reqwest::Client, Error> {
        let mut builder =
            reqwest::Client::builder().danger_accept_invalid_certs(!self.verify_cert);
        // A zero timeout means "no per-request timeout"; the job-poll
        // deadline still applies.
        if self.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(self.timeout_secs));
        }
        if cookies {
            builder = builder.cookie_store(true);
        }
        builder.build().map_err(Error::Network)
    }
}

impl RemoteInvoker for HttpInvoker {
    fn invoke(&self, operation: &str, args: &[String], is_async: bool) -> Result<Value, Error> {
        self.runtime
            .block_on(self.invoke_async(operation, args, is_async))
    }
}

/// Finds the `*response` wrapper the server nests every reply in.
#[must_use]
pub fn response_payload(data: &Value) -> Option<Value> {
    data.as_object()?
        .iter()
        .find(|(key, _)| key.ends_with("response"))
        .map(|(_, value)| value.clone())
}
