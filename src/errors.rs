//! Error types for stubgen runs.
//!
//! Every variant is fatal: the tool runs once per build step, and partial or
//! guessed output would break the downstream Go build. Errors surface through
//! `anyhow::Result` at the command boundary.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StubgenError {
    /// The file could not be parsed as Go source.
    #[error("failed to parse {path}: source contains syntax errors")]
    Parse { path: PathBuf },

    /// A type node outside the supported shape set (named, pointer,
    /// qualified, map, slice) appeared in a matching method's signature.
    #[error("unsupported type shape `{kind}` at {path}:{line}")]
    UnsupportedType {
        kind: String,
        path: PathBuf,
        line: usize,
    },

    /// The first parameter of a matching method was not `context.Context`.
    #[error("method {method}: first parameter must be context.Context, found `{found}`")]
    MissingContext { method: String, found: String },

    /// A matching method declared no results.
    #[error("method {method} declares no results; activities must return at least an error")]
    NoResults { method: String },

    /// A matching method declared more results than the stub shape supports.
    #[error("method {method} declares {count} results; at most two are supported")]
    TooManyResults { method: String, count: usize },

    /// A kept parameter has no name, so it cannot be forwarded by name at
    /// the generated call site.
    #[error("method {method}: parameter of type `{ty}` has no name")]
    AnonymousParam { method: String, ty: String },
}
