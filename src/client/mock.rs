//! Canned-response invoker for completion and dispatch tests.

use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::Value;

use super::RemoteInvoker;
use crate::error::Error;

/// Serves fixed responses keyed by lower-cased operation name and
/// records every call it receives.
#[derive(Debug, Default)]
pub struct StaticInvoker {
    responses: HashMap<String, Value>,
    calls: RefCell<Vec<(String, Vec<String>)>>,
}

impl StaticInvoker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_response(mut self, operation: &str, response: Value) -> Self {
        self.responses.insert(operation.to_lowercase(), response);
        self
    }

    /// Operations and argument lists received so far, in order.
    #[must_use]
    pub fn recorded(&self) -> Vec<(String, Vec<String>)> {
        self.calls.borrow().clone()
    }
}

impl RemoteInvoker for StaticInvoker {
    fn invoke(&self, operation: &str, args: &[String], _is_async: bool) -> Result<Value, Error> {
        self.calls
            .borrow_mut()
            .push((operation.to_string(), args.to_vec()));
        self.responses
            .get(&operation.to_lowercase())
            .cloned()
            .ok_or_else(|| Error::Remote {
                message: format!("no canned response for {operation}"),
                partial: None,
            })
    }
}

// Lets a test keep a handle to the recorder after handing the invoker
// to a session.
impl RemoteInvoker for std::rc::Rc<StaticInvoker> {
    fn invoke(&self, operation: &str, args: &[String], is_async: bool) -> Result<Value, Error> {
        self.as_ref().invoke(operation, args, is_async)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_static_invoker_serves_and_records() {
        let invoker =
            StaticInvoker::new().with_response("listZones", json!({"zone": [{"id": "z-1"}]}));
        let body = invoker
            .invoke("listZones", &["listall=true".to_string()], false)
            .unwrap();
        assert_eq!(body["zone"][0]["id"], "z-1");
        assert_eq!(invoker.recorded().len(), 1);
        assert_eq!(invoker.recorded()[0].0, "listZones");
    }

    #[test]
    fn test_static_invoker_unknown_operation_errors() {
        let invoker = StaticInvoker::new();
        assert!(invoker.invoke("listZones", &[], false).is_err());
    }
}
