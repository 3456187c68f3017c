//! Built-in minimal discovery payload.
//!
//! Used when no per-profile cache exists yet, so the shell can complete
//! and run the handful of operations needed to bootstrap (notably
//! `listApis` via `sync`). A real catalog replaces this on first sync.

use serde_json::Value;

const BUILTIN_DISCOVERY: &str = r#"{
  "count": 6,
  "api": [
    {
      "name": "listApis",
      "isasync": false,
      "description": "lists all available apis on the server",
      "params": [
        {"name": "name", "type": "string", "required": false, "description": "API name"}
      ],
      "response": [{"name": "name"}, {"name": "description"}, {"name": "isasync"}]
    },
    {
      "name": "queryAsyncJobResult",
      "isasync": false,
      "description": "Retrieves the current status of asynchronous job",
      "params": [
        {"name": "jobid", "type": "uuid", "required": true, "description": "the ID of the asynchronous job"}
      ],
      "response": [{"name": "jobid"}, {"name": "jobstatus"}, {"name": "jobresult"}]
    },
    {
      "name": "listZones",
      "isasync": false,
      "description": "Lists zones",
      "params": [
        {"name": "id", "type": "uuid", "required": false, "description": "the ID of the zone"},
        {"name": "available", "type": "boolean", "required": false, "description": "true if the zone is available for deployment"}
      ],
      "response": [{"name": "id"}, {"name": "name"}, {"name": "networktype"}]
    },
    {
      "name": "listServiceOfferings",
      "isasync": false,
      "description": "Lists all available service offerings",
      "params": [
        {"name": "id", "type": "uuid", "required": false, "description": "ID of the service offering"},
        {"name": "name", "type": "string", "required": false, "description": "name of the service offering"}
      ],
      "response": [{"name": "id"}, {"name": "name"}, {"name": "cpunumber"}, {"name": "memory"}]
    },
    {
      "name": "listTemplates",
      "isasync": false,
      "description": "List all public, private, and privileged templates",
      "params": [
        {"name": "templatefilter", "type": "string", "required": true, "description": "possible values are featured, self, selfexecutable, sharedexecutable, executable, and community"},
        {"name": "zoneid", "type": "uuid", "required": false, "description": "list templates by zoneid"}
      ],
      "response": [{"name": "id"}, {"name": "name"}, {"name": "displaytext"}, {"name": "hypervisor"}]
    },
    {
      "name": "listVirtualMachines",
      "isasync": false,
      "description": "List the virtual machines owned by the account",
      "params": [
        {"name": "id", "type": "uuid", "required": false, "description": "the ID of the virtual machine"},
        {"name": "zoneid", "type": "uuid", "required": false, "description": "the availability zone ID"},
        {"name": "state", "type": "string", "required": false, "description": "state of the virtual machine"}
      ],
      "response": [{"name": "id"}, {"name": "name"}, {"name": "displayname"}, {"name": "state"}, {"name": "zonename"}]
    }
  ]
}"#;

/// Parses the embedded fallback payload.
#[must_use]
pub fn fallback_payload() -> Value {
    serde_json::from_str(BUILTIN_DISCOVERY).unwrap_or_else(|_| Value::Null)
}
