//! End-to-end completion walks over a realistic catalog: every stage of
//! the verb → noun → argument → value machine, including the
//! operation-specific fetch overrides.

use cumulus_cli::catalog::ingest::ingest;
use cumulus_cli::catalog::verbs::VerbIndex;
use cumulus_cli::client::mock::StaticInvoker;
use cumulus_cli::complete::{complete, CompleteContext, Completion};
use cumulus_cli::spinner::NoopIndicator;
use serde_json::json;

fn api(name: &str, params: serde_json::Value) -> serde_json::Value {
    json!({
        "name": name,
        "isasync": false,
        "description": "",
        "params": params,
        "response": [{"name": "id"}, {"name": "name"}]
    })
}

fn uuid_param(name: &str) -> serde_json::Value {
    json!({"name": name, "type": "uuid", "required": false, "description": ""})
}

fn build_index() -> VerbIndex {
    let payload = json!({
        "count": 9,
        "api": [
            api("listZones", json!([uuid_param("id")])),
            api("listTemplates", json!([uuid_param("zoneid")])),
            api("listHosts", json!([uuid_param("id")])),
            api("listSystemVms", json!([uuid_param("id")])),
            api("listVirtualMachines", json!([uuid_param("id")])),
            api("listPublicIpAddresses", json!([uuid_param("id")])),
            api("migrateSystemVm", json!([uuid_param("virtualmachineid"), uuid_param("hostid")])),
            api("deployVirtualMachine", json!([uuid_param("zoneid"), uuid_param("templateid"), uuid_param("hostid"), uuid_param("ipaddressid")])),
            api("uploadCustomCertificate", json!([uuid_param("hostid")]))
        ]
    });
    let catalog = ingest(&payload).unwrap();
    VerbIndex::build(&catalog, &[])
}

fn run(invoker: &StaticInvoker, index: &VerbIndex, line: &str) -> Completion {
    let ctx = CompleteContext {
        index,
        live_values: true,
        invoker,
        indicator: &NoopIndicator,
    };
    complete(line, line.len(), &ctx)
}

#[test]
fn completion_prefix_law_holds_for_every_stage() {
    let index = build_index();
    let invoker = StaticInvoker::new();

    // Any strict prefix of "deploy " completes back to the full token
    // plus separator when spliced onto the typed text.
    for (typed, token) in [
        ("d", "deploy "),
        ("dep", "deploy "),
        ("deploy", "deploy "),
        ("deploy virtual", "virtualmachine "),
        ("deploy virtualmachine zone", "zoneid="),
    ] {
        let out = run(&invoker, &index, typed);
        let last = typed.rsplit(' ').next().unwrap();
        let suffix = out
            .candidates
            .iter()
            .find(|c| format!("{last}{c}").starts_with(token.trim_end()))
            .unwrap_or_else(|| panic!("no candidate for {typed:?}"));
        assert_eq!(format!("{last}{suffix}"), token, "typed {typed:?}");
        assert_eq!(out.offset, last.len(), "typed {typed:?}");
    }
}

#[test]
fn template_values_fetch_with_executable_filter() {
    let index = build_index();
    let invoker = StaticInvoker::new().with_response(
        "listTemplates",
        json!({"template": [{"id": "t-1", "name": "centos"}]}),
    );
    let out = run(&invoker, &index, "deploy virtualmachine templateid=");
    assert_eq!(out.candidates, vec!["t-1"]);
    let calls = invoker.recorded();
    assert_eq!(calls[0].0, "listTemplates");
    assert!(calls[0].1.contains(&"listall=true".to_string()));
    assert!(calls[0].1.contains(&"templatefilter=executable".to_string()));
}

#[test]
fn host_values_fetch_restricts_to_routing_hosts() {
    let index = build_index();
    let invoker = StaticInvoker::new()
        .with_response("listHosts", json!({"host": [{"id": "h-1", "name": "kvm-1"}]}));
    let _ = run(&invoker, &index, "deploy virtualmachine hostid=");
    let calls = invoker.recorded();
    assert_eq!(calls[0].0, "listHosts");
    assert!(calls[0].1.contains(&"type=routing".to_string()));
}

#[test]
fn certificate_host_lookup_skips_type_filter() {
    let index = build_index();
    let invoker = StaticInvoker::new()
        .with_response("listHosts", json!({"host": [{"id": "h-1", "name": "kvm-1"}]}));
    let _ = run(&invoker, &index, "upload customcertificate hostid=");
    let calls = invoker.recorded();
    assert_eq!(calls[0].0, "listHosts");
    assert!(!calls[0].1.contains(&"type=routing".to_string()));
}

#[test]
fn migrate_system_vm_retargets_to_system_vm_listing() {
    let index = build_index();
    let invoker = StaticInvoker::new().with_response(
        "listSystemVms",
        json!({"systemvm": [{"id": "s-1", "name": "v-1-VM"}]}),
    );
    let out = run(&invoker, &index, "migrate systemvm virtualmachineid=");
    assert_eq!(out.candidates, vec!["s-1"]);
    assert_eq!(invoker.recorded()[0].0, "listSystemVms");
}

#[test]
fn ip_address_lookup_includes_unallocated() {
    let index = build_index();
    let invoker = StaticInvoker::new().with_response(
        "listPublicIpAddresses",
        json!({"publicipaddress": [{"id": "ip-1", "ipaddress": "10.0.0.1"}]}),
    );
    let out = run(&invoker, &index, "deploy virtualmachine ipaddressid=");
    assert_eq!(out.candidates, vec!["ip-1"]);
    let calls = invoker.recorded();
    assert_eq!(calls[0].0, "listPublicIpAddresses");
    assert!(calls[0].1.contains(&"allocatedonly=false".to_string()));
}

#[test]
fn ambiguous_candidates_are_annotated_with_details() {
    let index = build_index();
    let invoker = StaticInvoker::new().with_response(
        "listZones",
        json!({"zone": [
            {"id": "z-1", "name": "dev", "displaytext": "development"},
            {"id": "z-2", "name": "prod", "displaytext": "production"}
        ]}),
    );
    let out = run(&invoker, &index, "deploy virtualmachine zoneid=");
    assert_eq!(out.candidates.len(), 2);
    assert!(out.candidates[0].contains("(development)"));
    assert!(out.candidates[1].contains("(production)"));

    // A narrowed prefix that leaves one candidate drops the annotation.
    let out = run(&invoker, &index, "deploy virtualmachine zoneid=z-1");
    assert!(out.candidates.is_empty() || !out.candidates[0].contains('('));
}

#[test]
fn disabled_live_values_never_call_the_remote() {
    let index = build_index();
    let invoker = StaticInvoker::new()
        .with_response("listZones", json!({"zone": [{"id": "z-1", "name": "dev"}]}));
    let ctx = CompleteContext {
        index: &index,
        live_values: false,
        invoker: &invoker,
        indicator: &NoopIndicator,
    };
    let line = "deploy virtualmachine zoneid=";
    let out = complete(line, line.len(), &ctx);
    assert!(out.candidates.is_empty());
    assert!(invoker.recorded().is_empty());
}

#[test]
fn unresolvable_argument_offers_nothing_and_stays_offline() {
    // No list operation matches "datadiskofferings" and the substring
    // fallback finds nothing either.
    let invoker = StaticInvoker::new();
    let payload = json!({
        "count": 1,
        "api": [api("deployVirtualMachine", json!([uuid_param("datadiskofferingid")]))]
    });
    let catalog = ingest(&payload).unwrap();
    let index = VerbIndex::build(&catalog, &[]);
    let ctx = CompleteContext {
        index: &index,
        live_values: true,
        invoker: &invoker,
        indicator: &NoopIndicator,
    };
    let line = "deploy virtualmachine datadiskofferingid=";
    let out = complete(line, line.len(), &ctx);
    assert!(out.candidates.is_empty());
    assert!(invoker.recorded().is_empty());
}
