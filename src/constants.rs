//! Centralized string constants for the cumulus CLI.

// Environment variables
pub const ENV_CONFIG_DIR: &str = "CUMULUS_CONFIG_DIR";
pub const ENV_LOG: &str = "CUMULUS_LOG";
pub const ENV_LOG_FORMAT: &str = "CUMULUS_LOG_FORMAT";

// Well-known request parameters
pub const PARAM_COMMAND: &str = "command";
pub const PARAM_RESPONSE: &str = "response";
pub const PARAM_SESSION_KEY: &str = "sessionkey";
pub const PARAM_SIGNATURE: &str = "signature";
pub const PARAM_API_KEY: &str = "apiKey";

// Well-known operations
pub const OP_LOGIN: &str = "login";
pub const OP_LIST_APIS: &str = "listApis";
pub const OP_QUERY_ASYNC_JOB: &str = "queryAsyncJobResult";

// The CLI-only response-filter pseudo-argument; sorts alphabetically
// with the real arguments.
pub const FILTER_ARG: &str = "filter=";

// Async job polling
pub const JOB_POLL_INTERVAL_SECS: u64 = 1;

// File names under the config directory
pub const CONFIG_FILENAME: &str = "config.toml";
pub const HISTORY_FILENAME: &str = "history";
pub const LOCK_FILENAME: &str = "lock";
pub const PROFILE_DIR: &str = "profiles";
pub const CACHE_SUFFIX: &str = ".cache.json";
