//! Typed records for one remote-callable operation and its arguments.

/// Remote-declared argument type, plus the one synthetic CLI-only type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgKind {
    String,
    Integer,
    Long,
    Short,
    Boolean,
    List,
    Map,
    Uuid,
    Date,
    /// CLI-only response-key filter; never forwarded to the remote call.
    Filter,
    /// Anything the remote declares that we do not model explicitly.
    Other(String),
}

impl ArgKind {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "string" => Self::String,
            "integer" => Self::Integer,
            "long" => Self::Long,
            "short" => Self::Short,
            "boolean" => Self::Boolean,
            "list" => Self::List,
            "map" => Self::Map,
            "uuid" => Self::Uuid,
            "date" => Self::Date,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Self::Map)
    }

    #[must_use]
    pub const fn is_boolean(&self) -> bool {
        matches!(self, Self::Boolean)
    }

    #[must_use]
    pub const fn is_filter(&self) -> bool {
        matches!(self, Self::Filter)
    }
}

/// One parameter accepted by an operation.
///
/// `name` keeps a trailing `=` so prefix matching against a partially
/// typed `key=` token needs no extra bookkeeping. Local pseudo-operations
/// store bare value tokens here instead, without the marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentSpec {
    pub name: String,
    pub kind: ArgKind,
    pub related: Vec<String>,
    pub required: bool,
    pub description: String,
}

impl ArgumentSpec {
    /// Argument name without the trailing `=` marker.
    #[must_use]
    pub fn bare_name(&self) -> &str {
        self.name.trim_end_matches('=')
    }
}

/// One remote-callable action, or a local pseudo-operation synthesized
/// by the verb index so local sub-commands complete uniformly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Canonical identifier in its original casing, e.g. `listVirtualMachines`.
    pub name: String,
    /// Longest leading run of lowercase letters of `name`.
    pub verb: String,
    /// Remainder of `name` after the verb, lower-cased.
    pub noun: String,
    /// Alphabetically sorted by name; the synthetic filter argument
    /// participates in the same sort.
    pub args: Vec<ArgumentSpec>,
    /// Names (with `=` marker) of the arguments every invocation must carry.
    pub required_args: Vec<String>,
    pub is_async: bool,
    pub description: String,
    /// Field names that can appear in a successful response.
    pub response_keys: Vec<String>,
}

impl Operation {
    #[must_use]
    pub fn find_arg(&self, token: &str) -> Option<&ArgumentSpec> {
        self.args
            .iter()
            .find(|arg| arg.name.ends_with('=') && token.starts_with(arg.name.as_str()))
    }
}

/// Splits an operation name into its verb (leading lowercase run) and
/// noun (lower-cased remainder).
///
/// A name with no lowercase prefix yields an empty verb; the completer
/// treats such an operation as unreachable rather than failing.
#[must_use]
pub fn split_verb_noun(name: &str) -> (String, String) {
    let idx = name
        .find(|c: char| !c.is_ascii_lowercase())
        .unwrap_or(name.len());
    (name[..idx].to_string(), name[idx..].to_lowercase())
}
