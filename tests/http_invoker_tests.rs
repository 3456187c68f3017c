//! HTTP invoker behavior against a mock management server.
//!
//! The invoker owns its own runtime, so these tests stay synchronous
//! and drive wiremock from a separate multi-thread runtime.

use cumulus_cli::client::{HttpInvoker, RemoteInvoker};
use cumulus_cli::config::models::{CoreSettings, ServerProfile};
use cumulus_cli::error::Error;
use cumulus_cli::spinner::NoopIndicator;
use serde_json::json;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct TestServer {
    runtime: tokio::runtime::Runtime,
    server: MockServer,
}

impl TestServer {
    fn start() -> Self {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let server = runtime.block_on(MockServer::start());
        Self { runtime, server }
    }

    fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    fn uri(&self) -> String {
        self.server.uri()
    }
}

fn key_profile(url: &str) -> ServerProfile {
    ServerProfile {
        url: url.to_string(),
        username: String::new(),
        password: String::new(),
        domain: "/".to_string(),
        apikey: "AKEY".to_string(),
        secretkey: "SKEY".to_string(),
    }
}

fn password_profile(url: &str) -> ServerProfile {
    ServerProfile {
        url: url.to_string(),
        username: "admin".to_string(),
        password: "password".to_string(),
        domain: "/".to_string(),
        apikey: String::new(),
        secretkey: String::new(),
    }
}

fn core(timeout: u64) -> CoreSettings {
    CoreSettings {
        timeout,
        ..CoreSettings::default()
    }
}

fn invoker(profile: ServerProfile, settings: &CoreSettings) -> HttpInvoker {
    HttpInvoker::with_indicator(profile, settings, Box::new(NoopIndicator)).unwrap()
}

#[test]
fn signed_call_unwraps_the_response_payload() {
    let ts = TestServer::start();
    ts.mount(
        Mock::given(method("GET"))
            .and(query_param("command", "listZones"))
            .and(query_param("apiKey", "AKEY"))
            .and(query_param("response", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "listzonesresponse": {"count": 1, "zone": [{"id": "z-1", "name": "dev"}]}
            }))),
    );

    let invoker = invoker(key_profile(&ts.uri()), &core(30));
    let body = invoker.invoke("listZones", &[], false).unwrap();
    assert_eq!(body["count"], 1);
    assert_eq!(body["zone"][0]["id"], "z-1");
}

#[test]
fn signed_call_carries_a_signature() {
    let ts = TestServer::start();
    ts.mount(
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "listzonesresponse": {"count": 0}
            }))),
    );
    let invoker = invoker(key_profile(&ts.uri()), &core(30));
    invoker
        .invoke("listZones", &["available=true".to_string()], false)
        .unwrap();

    let requests = ts
        .runtime
        .block_on(ts.server.received_requests())
        .unwrap_or_default();
    assert_eq!(requests.len(), 1);
    let query = requests[0].url.query().unwrap_or_default().to_string();
    assert!(query.contains("signature="));
    assert!(query.contains("available=true"));
}

#[test]
fn remote_error_body_becomes_an_error_with_partial() {
    let ts = TestServer::start();
    ts.mount(Mock::given(method("GET")).respond_with(
        ResponseTemplate::new(431).set_body_json(json!({
            "deployvirtualmachineresponse": {
                "errorcode": 431,
                "cserrorcode": 4350,
                "errortext": "Unable to find zone"
            }
        })),
    ));
    let invoker = invoker(key_profile(&ts.uri()), &core(30));
    let err = invoker.invoke("deployVirtualMachine", &[], false).unwrap_err();
    match &err {
        Error::Remote { message, partial } => {
            assert!(message.contains("431"));
            assert!(message.contains("Unable to find zone"));
            assert!(partial.is_some());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn async_operation_polls_until_the_job_finishes() {
    let ts = TestServer::start();
    ts.mount(
        Mock::given(method("GET"))
            .and(query_param("command", "startVirtualMachine"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "startvirtualmachineresponse": {"jobid": "job-1"}
            }))),
    );
    // First poll: still running. Second: done.
    ts.mount(
        Mock::given(method("GET"))
            .and(query_param("command", "queryAsyncJobResult"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "queryasyncjobresultresponse": {"jobid": "job-1", "jobstatus": 0}
            })))
            .up_to_n_times(1),
    );
    ts.mount(
        Mock::given(method("GET"))
            .and(query_param("command", "queryAsyncJobResult"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "queryasyncjobresultresponse": {
                    "jobid": "job-1",
                    "jobstatus": 1,
                    "jobresult": {"virtualmachine": {"id": "vm-1", "state": "Running"}}
                }
            }))),
    );

    let invoker = invoker(key_profile(&ts.uri()), &core(30));
    let body = invoker.invoke("startVirtualMachine", &[], true).unwrap();
    assert_eq!(body["virtualmachine"]["id"], "vm-1");
}

#[test]
fn failed_job_reports_a_distinct_error() {
    let ts = TestServer::start();
    ts.mount(
        Mock::given(method("GET"))
            .and(query_param("command", "startVirtualMachine"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "startvirtualmachineresponse": {"jobid": "job-9"}
            }))),
    );
    ts.mount(
        Mock::given(method("GET"))
            .and(query_param("command", "queryAsyncJobResult"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "queryasyncjobresultresponse": {"jobid": "job-9", "jobstatus": 2}
            }))),
    );
    let invoker = invoker(key_profile(&ts.uri()), &core(30));
    let err = invoker.invoke("startVirtualMachine", &[], true).unwrap_err();
    assert!(matches!(err, Error::JobFailed { ref job_id, .. } if job_id == "job-9"));
}

#[test]
fn job_poll_times_out_with_its_own_error() {
    let ts = TestServer::start();
    ts.mount(
        Mock::given(method("GET"))
            .and(query_param("command", "startVirtualMachine"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "startvirtualmachineresponse": {"jobid": "job-5"}
            }))),
    );
    ts.mount(
        Mock::given(method("GET"))
            .and(query_param("command", "queryAsyncJobResult"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "queryasyncjobresultresponse": {"jobid": "job-5", "jobstatus": 0}
            }))),
    );
    // Zero overall timeout: the first pending poll already exceeds it.
    let invoker = invoker(key_profile(&ts.uri()), &core(0));
    let err = invoker.invoke("startVirtualMachine", &[], true).unwrap_err();
    assert!(matches!(err, Error::JobTimeout { .. }));
}

#[test]
fn password_auth_logs_in_and_passes_the_session_key() {
    let ts = TestServer::start();
    ts.mount(
        Mock::given(method("POST")).respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "sessionkey=SK123; Path=/")
                .set_body_json(json!({"loginresponse": {"username": "admin"}})),
        ),
    );
    ts.mount(
        Mock::given(method("GET"))
            .and(query_param("sessionkey", "SK123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "listzonesresponse": {"count": 0}
            }))),
    );

    let invoker = invoker(password_profile(&ts.uri()), &core(30));
    let body = invoker.invoke("listZones", &[], false).unwrap();
    assert_eq!(body["count"], 0);
}

#[test]
fn auth_failure_triggers_exactly_one_relogin_retry() {
    let ts = TestServer::start();
    ts.mount(
        Mock::given(method("POST")).respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "sessionkey=SK456; Path=/")
                .set_body_json(json!({"loginresponse": {}})),
        ),
    );
    // First authenticated GET is rejected, the retry succeeds.
    ts.mount(
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .up_to_n_times(1),
    );
    ts.mount(
        Mock::given(method("GET")).respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"listzonesresponse": {"count": 2}}),
        )),
    );

    let invoker = invoker(password_profile(&ts.uri()), &core(30));
    let body = invoker.invoke("listZones", &[], false).unwrap();
    assert_eq!(body["count"], 2);

    let requests = ts
        .runtime
        .block_on(ts.server.received_requests())
        .unwrap_or_default();
    let posts = requests
        .iter()
        .filter(|r| r.method.to_string() == "POST")
        .count();
    assert_eq!(posts, 2, "one login per attempt");
}

#[test]
fn missing_credentials_fail_without_a_network_call() {
    let profile = ServerProfile {
        url: "http://localhost:1".to_string(),
        username: String::new(),
        password: String::new(),
        domain: String::new(),
        apikey: String::new(),
        secretkey: String::new(),
    };
    let invoker = invoker(profile, &core(5));
    let err = invoker.invoke("listZones", &[], false).unwrap_err();
    assert!(matches!(err, Error::Auth(_)));
}
