//! Verb-keyed view of the catalog, merged with local CLI commands.
//!
//! Local sub-commands are normalized into the same completion-facing
//! `Operation` shape as remote operations, tagged with their origin so
//! dispatch and help can still tell them apart. The completer never
//! needs to.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::models::{ArgKind, ArgumentSpec, Operation};
use super::ApiCatalog;

/// Where a verb-index entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOrigin {
    Remote,
    Local,
}

#[derive(Debug, Clone)]
pub struct VerbEntry {
    pub op: Arc<Operation>,
    pub origin: EntryOrigin,
}

/// Statically declared local command, fed into the index alongside the
/// catalog. `values` holds the enumerated completions for a sub-command;
/// an empty sub-command list means the command takes none.
#[derive(Debug, Clone)]
pub struct LocalCommandSpec {
    pub name: String,
    pub subcommands: Vec<SubCommandSpec>,
}

#[derive(Debug, Clone)]
pub struct SubCommandSpec {
    pub name: String,
    pub values: Vec<String>,
}

/// Catalog grouped by verb for completion and dispatch.
#[derive(Debug, Default)]
pub struct VerbIndex {
    buckets: BTreeMap<String, Vec<VerbEntry>>,
}

impl VerbIndex {
    /// Builds the index from a catalog plus the local command set.
    ///
    /// Rebuilding from the same inputs yields the same index in the
    /// same order: buckets sort by noun (ties by name) and verb keys
    /// iterate ascending.
    #[must_use]
    pub fn build(catalog: &ApiCatalog, locals: &[LocalCommandSpec]) -> Self {
        let mut buckets: BTreeMap<String, Vec<VerbEntry>> = BTreeMap::new();

        for op in catalog.operations() {
            buckets.entry(op.verb.clone()).or_default().push(VerbEntry {
                op: Arc::clone(op),
                origin: EntryOrigin::Remote,
            });
        }

        for local in locals {
            let bucket = buckets.entry(local.name.clone()).or_default();
            if local.subcommands.is_empty() {
                bucket.push(VerbEntry {
                    op: Arc::new(pseudo_operation(&local.name, "", &[])),
                    origin: EntryOrigin::Local,
                });
            } else {
                for sub in &local.subcommands {
                    bucket.push(VerbEntry {
                        op: Arc::new(pseudo_operation(&local.name, &sub.name, &sub.values)),
                        origin: EntryOrigin::Local,
                    });
                }
            }
        }

        for bucket in buckets.values_mut() {
            bucket.sort_by(|a, b| {
                a.op.noun
                    .cmp(&b.op.noun)
                    .then_with(|| a.op.name.cmp(&b.op.name))
            });
        }

        Self { buckets }
    }

    /// Verb keys in ascending order.
    pub fn verbs(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    #[must_use]
    pub fn bucket(&self, verb: &str) -> &[VerbEntry] {
        self.buckets.get(verb).map_or(&[], Vec::as_slice)
    }

    /// The single operation with the given noun under a verb, if any.
    #[must_use]
    pub fn find(&self, verb: &str, noun: &str) -> Option<&VerbEntry> {
        self.bucket(verb).iter().find(|entry| entry.op.noun == noun)
    }
}

fn pseudo_operation(verb: &str, sub: &str, values: &[String]) -> Operation {
    let args = values
        .iter()
        .map(|value| ArgumentSpec {
            // Bare value token; no `=` marker, so the argument-value
            // machinery never engages for local entries.
            name: value.clone(),
            kind: ArgKind::String,
            related: vec![],
            required: false,
            description: String::new(),
        })
        .collect();
    Operation {
        name: sub.to_string(),
        verb: verb.to_string(),
        noun: sub.to_lowercase(),
        args,
        required_args: vec![],
        is_async: false,
        description: String::new(),
        response_keys: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ingest;
    use serde_json::json;

    fn catalog() -> ApiCatalog {
        ingest::ingest(&json!({
            "count": 3,
            "api": [
                {"name": "listZones", "isasync": false, "description": "", "params": [], "response": []},
                {"name": "listVirtualMachines", "isasync": false, "description": "", "params": [], "response": []},
                {"name": "deployVirtualMachine", "isasync": true, "description": "", "params": [], "response": []}
            ]
        }))
        .unwrap()
    }

    fn locals() -> Vec<LocalCommandSpec> {
        vec![
            LocalCommandSpec {
                name: "set".to_string(),
                subcommands: vec![
                    SubCommandSpec {
                        name: "output".to_string(),
                        values: vec!["json".to_string(), "table".to_string()],
                    },
                    SubCommandSpec {
                        name: "profile".to_string(),
                        values: vec!["localcloud".to_string()],
                    },
                ],
            },
            LocalCommandSpec {
                name: "sync".to_string(),
                subcommands: vec![],
            },
        ]
    }

    #[test]
    fn test_build_groups_by_verb() {
        let index = VerbIndex::build(&catalog(), &[]);
        assert_eq!(index.bucket("list").len(), 2);
        assert_eq!(index.bucket("deploy").len(), 1);
        assert!(index.bucket("create").is_empty());
    }

    #[test]
    fn test_buckets_sorted_by_noun() {
        let index = VerbIndex::build(&catalog(), &[]);
        let nouns: Vec<&str> = index
            .bucket("list")
            .iter()
            .map(|e| e.op.noun.as_str())
            .collect();
        assert_eq!(nouns, vec!["virtualmachines", "zones"]);
    }

    #[test]
    fn test_verbs_iterate_ascending() {
        let index = VerbIndex::build(&catalog(), &locals());
        let verbs: Vec<&str> = index.verbs().collect();
        assert_eq!(verbs, vec!["deploy", "list", "set", "sync"]);
    }

    #[test]
    fn test_local_subcommands_become_pseudo_operations() {
        let index = VerbIndex::build(&catalog(), &locals());
        let entry = index.find("set", "output").unwrap();
        assert_eq!(entry.origin, EntryOrigin::Local);
        let values: Vec<&str> = entry.op.args.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(values, vec!["json", "table"]);
    }

    #[test]
    fn test_local_command_without_subcommands_gets_empty_noun() {
        let index = VerbIndex::build(&catalog(), &locals());
        let bucket = index.bucket("sync");
        assert_eq!(bucket.len(), 1);
        assert_eq!(bucket[0].op.noun, "");
        assert_eq!(bucket[0].origin, EntryOrigin::Local);
    }

    #[test]
    fn test_every_bucket_entry_matches_its_verb() {
        let index = VerbIndex::build(&catalog(), &locals());
        let verbs: Vec<String> = index.verbs().map(str::to_string).collect();
        for verb in verbs {
            for entry in index.bucket(&verb) {
                assert_eq!(entry.op.verb, verb);
            }
        }
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let cat = catalog();
        let a = VerbIndex::build(&cat, &locals());
        let b = VerbIndex::build(&cat, &locals());
        let collect = |idx: &VerbIndex| -> Vec<(String, Vec<String>)> {
            idx.verbs()
                .map(|v| {
                    (
                        v.to_string(),
                        idx.bucket(v).iter().map(|e| e.op.name.clone()).collect(),
                    )
                })
                .collect()
        };
        assert_eq!(collect(&a), collect(&b));
    }
}
