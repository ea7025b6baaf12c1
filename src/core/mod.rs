//! Core data model shared by the extractor and the synthesizer.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use tree_sitter::Tree;

/// A Go type expression, restricted to the closed set of shapes the
/// generator can express. Anything outside this set is rejected during
/// lowering rather than guessed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A plain identifier: `string`, `error`, `Jobs`.
    Named(String),
    /// A single-level pointer: `*T`.
    Pointer(Box<TypeExpr>),
    /// A package-qualified reference: `model.Result`.
    Qualified { package: String, name: String },
    /// `map[K]V`.
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    /// `[]T`.
    Slice(Box<TypeExpr>),
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named(name) => write!(f, "{name}"),
            TypeExpr::Pointer(inner) => write!(f, "*{inner}"),
            TypeExpr::Qualified { package, name } => write!(f, "{package}.{name}"),
            TypeExpr::Map { key, value } => write!(f, "map[{key}]{value}"),
            TypeExpr::Slice(elem) => write!(f, "[]{elem}"),
        }
    }
}

/// One parameter or result. Grouped declarations (`a, b SomeType`) are
/// expanded before construction, so a `Param` carries at most one name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: Option<String>,
    pub ty: TypeExpr,
}

impl Param {
    pub fn named(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: Some(name.into()),
            ty,
        }
    }

    pub fn anonymous(ty: TypeExpr) -> Self {
        Self { name: None, ty }
    }
}

/// A normalized method signature: the implicit context parameter has
/// already been validated and dropped, and results are known to number
/// one or two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub name: String,
    pub params: Vec<Param>,
    pub results: Vec<Param>,
}

/// One parsed Go source file: the tree-sitter tree plus everything the
/// extractor needs to interpret it.
pub struct SourceUnit {
    pub path: PathBuf,
    pub source: String,
    pub tree: Tree,
    pub package_name: String,
    /// Short alias -> full import path, as written in this file.
    pub imports: HashMap<String, String>,
}
