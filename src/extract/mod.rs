//! Signature extraction.
//!
//! Walks parsed compilation units, matches method declarations whose
//! receiver is written `*Target`, lowers their signatures into the
//! [`TypeExpr`] model, and collects the set of imported modules the kept
//! types reference.

use crate::core::{MethodSignature, Param, SourceUnit, TypeExpr};
use crate::errors::StubgenError;
use crate::parser::{node_line, node_text};
use anyhow::Result;
use log::debug;
use std::collections::{BTreeSet, HashMap};
use tree_sitter::Node;

/// Everything the synthesizer needs from one extraction pass.
#[derive(Debug)]
pub struct Extraction {
    /// Matched methods, in declaration order across the sorted unit list.
    pub methods: Vec<MethodSignature>,
    /// Module paths referenced by kept parameter and result types. May
    /// contain the empty placeholder for types that need no import; the
    /// synthesizer filters it at emission.
    pub modules: BTreeSet<String>,
}

/// Extract the signatures of all methods declared on `*target`.
///
/// `aliases` is the merged alias table for the whole unit set; it is only
/// read here. Declarations whose receiver does not match are skipped
/// silently. Any qualifying method whose signature falls outside the
/// supported shape set aborts the run.
pub fn extract(
    units: &[SourceUnit],
    aliases: &HashMap<String, String>,
    target: &str,
) -> Result<Extraction> {
    let mut methods = Vec::new();
    let mut modules = BTreeSet::new();

    for unit in units {
        let root = unit.tree.root_node();
        let mut cursor = root.walk();
        for decl in root.named_children(&mut cursor) {
            if decl.kind() != "method_declaration" {
                continue;
            }
            if !receiver_matches(decl, unit, target) {
                debug!(
                    "skipping method at {}:{}: receiver is not *{}",
                    unit.path.display(),
                    node_line(&decl),
                    target
                );
                continue;
            }
            let signature = lower_method(decl, unit)?;
            for param in signature.params.iter().chain(signature.results.iter()) {
                collect_modules(&param.ty, aliases, &mut modules);
            }
            debug!(
                "matched {}.{} ({} params, {} results)",
                target,
                signature.name,
                signature.params.len(),
                signature.results.len()
            );
            methods.push(signature);
        }
    }

    Ok(Extraction { methods, modules })
}

/// Matching is purely syntactic: exactly one receiver parameter whose
/// written type is a pointer to a plain identifier equal to the target.
fn receiver_matches(decl: Node, unit: &SourceUnit, target: &str) -> bool {
    let Some(receiver) = decl.child_by_field_name("receiver") else {
        return false;
    };
    let mut cursor = receiver.walk();
    let mut fields = receiver
        .named_children(&mut cursor)
        .filter(|n| n.kind() == "parameter_declaration");
    let Some(first) = fields.next() else {
        return false;
    };
    if fields.next().is_some() {
        return false;
    }
    let Some(ty) = first.child_by_field_name("type") else {
        return false;
    };
    if ty.kind() != "pointer_type" {
        return false;
    }
    match type_operand(ty) {
        Some(inner) => {
            inner.kind() == "type_identifier" && node_text(&inner, &unit.source) == target
        }
        None => false,
    }
}

fn lower_method(decl: Node, unit: &SourceUnit) -> Result<MethodSignature, StubgenError> {
    let name = decl
        .child_by_field_name("name")
        .map(|n| node_text(&n, &unit.source).to_string())
        .unwrap_or_default();
    let params = lower_params(decl, unit, &name)?;
    let results = lower_results(decl, unit, &name)?;
    Ok(MethodSignature {
        name,
        params,
        results,
    })
}

/// Lower the declared parameters, validating and dropping the leading
/// context parameter. The whole first declaration group is dropped, the
/// way the activity convention writes it.
fn lower_params(decl: Node, unit: &SourceUnit, method: &str) -> Result<Vec<Param>, StubgenError> {
    let mut kept = Vec::new();
    let mut saw_context = false;

    if let Some(list) = decl.child_by_field_name("parameters") {
        let mut cursor = list.walk();
        for field in list.named_children(&mut cursor) {
            match field.kind() {
                "parameter_declaration" => {}
                "comment" => continue,
                _ => return Err(unsupported(field, unit)),
            }
            if !saw_context {
                validate_context(field, unit, method)?;
                saw_context = true;
                continue;
            }
            kept.extend(expand_field(field, unit, method, true)?);
        }
    }

    if !saw_context {
        return Err(StubgenError::MissingContext {
            method: method.to_string(),
            found: "()".to_string(),
        });
    }
    Ok(kept)
}

fn validate_context(field: Node, unit: &SourceUnit, method: &str) -> Result<(), StubgenError> {
    let ty_node = field
        .child_by_field_name("type")
        .ok_or_else(|| unsupported(field, unit))?;
    let ty = lower_type(ty_node, unit)?;
    match &ty {
        TypeExpr::Qualified { package, name } if package == "context" && name == "Context" => {
            Ok(())
        }
        _ => Err(StubgenError::MissingContext {
            method: method.to_string(),
            found: ty.to_string(),
        }),
    }
}

fn lower_results(decl: Node, unit: &SourceUnit, method: &str) -> Result<Vec<Param>, StubgenError> {
    let Some(result) = decl.child_by_field_name("result") else {
        return Err(StubgenError::NoResults {
            method: method.to_string(),
        });
    };

    let results = if result.kind() == "parameter_list" {
        let mut out = Vec::new();
        let mut cursor = result.walk();
        for field in result.named_children(&mut cursor) {
            match field.kind() {
                "parameter_declaration" => out.extend(expand_field(field, unit, method, false)?),
                "comment" => continue,
                _ => return Err(unsupported(field, unit)),
            }
        }
        out
    } else {
        vec![Param::anonymous(lower_type(result, unit)?)]
    };

    match results.len() {
        0 => Err(StubgenError::NoResults {
            method: method.to_string(),
        }),
        1 | 2 => Ok(results),
        n => Err(StubgenError::TooManyResults {
            method: method.to_string(),
            count: n,
        }),
    }
}

/// Expand one declaration group into independent params. `a, b SomeType`
/// yields two params sharing a copy of the lowered type.
fn expand_field(
    field: Node,
    unit: &SourceUnit,
    method: &str,
    require_names: bool,
) -> Result<Vec<Param>, StubgenError> {
    let ty_node = field
        .child_by_field_name("type")
        .ok_or_else(|| unsupported(field, unit))?;
    let ty = lower_type(ty_node, unit)?;

    let mut cursor = field.walk();
    let names: Vec<String> = field
        .children_by_field_name("name", &mut cursor)
        .map(|n| node_text(&n, &unit.source).to_string())
        .collect();

    if names.is_empty() {
        if require_names {
            return Err(StubgenError::AnonymousParam {
                method: method.to_string(),
                ty: ty.to_string(),
            });
        }
        return Ok(vec![Param::anonymous(ty)]);
    }
    Ok(names
        .into_iter()
        .map(|name| Param::named(name, ty.clone()))
        .collect())
}

/// Lower a written type into the closed shape set. Anything else is a
/// hard error: guessing an unknown shape's import would emit code that
/// fails to compile downstream.
fn lower_type(node: Node, unit: &SourceUnit) -> Result<TypeExpr, StubgenError> {
    match node.kind() {
        "type_identifier" => Ok(TypeExpr::Named(node_text(&node, &unit.source).to_string())),
        "pointer_type" => {
            let inner = type_operand(node).ok_or_else(|| unsupported(node, unit))?;
            Ok(TypeExpr::Pointer(Box::new(lower_type(inner, unit)?)))
        }
        "qualified_type" => {
            let package = node
                .child_by_field_name("package")
                .ok_or_else(|| unsupported(node, unit))?;
            let name = node
                .child_by_field_name("name")
                .ok_or_else(|| unsupported(node, unit))?;
            Ok(TypeExpr::Qualified {
                package: node_text(&package, &unit.source).to_string(),
                name: node_text(&name, &unit.source).to_string(),
            })
        }
        "map_type" => {
            let key = node
                .child_by_field_name("key")
                .ok_or_else(|| unsupported(node, unit))?;
            let value = node
                .child_by_field_name("value")
                .ok_or_else(|| unsupported(node, unit))?;
            Ok(TypeExpr::Map {
                key: Box::new(lower_type(key, unit)?),
                value: Box::new(lower_type(value, unit)?),
            })
        }
        "slice_type" => {
            let elem = node
                .child_by_field_name("element")
                .ok_or_else(|| unsupported(node, unit))?;
            Ok(TypeExpr::Slice(Box::new(lower_type(elem, unit)?)))
        }
        _ => Err(unsupported(node, unit)),
    }
}

/// First non-comment named child, for nodes like `pointer_type` whose
/// operand carries no field name.
fn type_operand(node: Node) -> Option<Node> {
    let mut cursor = node.walk();
    let operand = node
        .named_children(&mut cursor)
        .find(|n| n.kind() != "comment");
    operand
}

fn unsupported(node: Node, unit: &SourceUnit) -> StubgenError {
    StubgenError::UnsupportedType {
        kind: node.kind().to_string(),
        path: unit.path.clone(),
        line: node_line(&node),
    }
}

/// Record the module each qualified reference in `ty` resolves to. Plain
/// named types insert the empty placeholder so unresolved aliases do not
/// silently vanish; emission filters it.
fn collect_modules(ty: &TypeExpr, aliases: &HashMap<String, String>, out: &mut BTreeSet<String>) {
    match ty {
        TypeExpr::Named(_) => {
            out.insert(String::new());
        }
        TypeExpr::Pointer(inner) | TypeExpr::Slice(inner) => collect_modules(inner, aliases, out),
        TypeExpr::Qualified { package, .. } => {
            out.insert(aliases.get(package).cloned().unwrap_or_default());
        }
        TypeExpr::Map { key, value } => {
            collect_modules(key, aliases, out);
            collect_modules(value, aliases, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::GoParser;
    use indoc::indoc;
    use std::path::PathBuf;

    fn unit(source: &str) -> SourceUnit {
        GoParser::new()
            .unwrap()
            .parse_source(source, &PathBuf::from("test.go"))
            .unwrap()
    }

    #[test]
    fn matches_only_pointer_receivers_of_target() {
        let u = unit(indoc! {r#"
            package worker

            import "context"

            func (j *Jobs) Keep(ctx context.Context) error { return nil }
            func (j Jobs) ValueReceiver(ctx context.Context) error { return nil }
            func (o *Other) WrongType(ctx context.Context) error { return nil }
            func Free(ctx context.Context) error { return nil }
        "#});
        let extraction = extract(
            std::slice::from_ref(&u),
            &u.imports,
            "Jobs",
        )
        .unwrap();
        assert_eq!(extraction.methods.len(), 1);
        assert_eq!(extraction.methods[0].name, "Keep");
    }

    #[test]
    fn expands_grouped_parameters() {
        let u = unit(indoc! {r#"
            package worker

            import (
                "context"
                "pkg/model"
            )

            func (j *Jobs) Pair(ctx context.Context, a, b model.Thing) error { return nil }
        "#});
        let extraction = extract(std::slice::from_ref(&u), &u.imports, "Jobs").unwrap();
        let params = &extraction.methods[0].params;
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name.as_deref(), Some("a"));
        assert_eq!(params[1].name.as_deref(), Some("b"));
        assert_eq!(params[0].ty, params[1].ty);
        assert!(extraction.modules.contains("pkg/model"));
    }

    #[test]
    fn rejects_function_typed_parameter() {
        let u = unit(indoc! {r#"
            package worker

            import "context"

            func (j *Jobs) Bad(ctx context.Context, cb func() error) error { return nil }
        "#});
        let err = extract(std::slice::from_ref(&u), &u.imports, "Jobs").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("unsupported type shape"));
        // the error names the offending shape and where it was written
        assert!(message.contains("func"));
        assert!(message.contains("test.go:5"));
    }

    #[test]
    fn matches_pointer_to_qualified_element_types() {
        let u = unit(indoc! {r#"
            package worker

            import (
                "context"
                "encoding/json"
            )

            func (j *Jobs) Raw(ctx context.Context, raw *json.RawMessage) error { return nil }
        "#});
        let extraction = extract(std::slice::from_ref(&u), &u.imports, "Jobs").unwrap();
        assert_eq!(
            extraction.methods[0].params[0].ty.to_string(),
            "*json.RawMessage"
        );
        assert!(extraction.modules.contains("encoding/json"));
    }

    #[test]
    fn rejects_missing_context_parameter() {
        let u = unit(indoc! {r#"
            package worker

            func (j *Jobs) Bad(id string) error { return nil }
        "#});
        let err = extract(std::slice::from_ref(&u), &u.imports, "Jobs").unwrap_err();
        assert!(err.to_string().contains("context.Context"));
    }

    #[test]
    fn rejects_zero_results() {
        let u = unit(indoc! {r#"
            package worker

            import "context"

            func (j *Jobs) Bad(ctx context.Context) {}
        "#});
        let err = extract(std::slice::from_ref(&u), &u.imports, "Jobs").unwrap_err();
        assert!(err.to_string().contains("no results"));
    }

    #[test]
    fn collects_modules_through_composite_types() {
        let u = unit(indoc! {r#"
            package worker

            import (
                "context"
                "pkg/model"
                "pkg/other"
            )

            func (j *Jobs) Collect(ctx context.Context, m map[string]*model.Thing, xs []other.Id) error {
                return nil
            }
        "#});
        let extraction = extract(std::slice::from_ref(&u), &u.imports, "Jobs").unwrap();
        assert!(extraction.modules.contains("pkg/model"));
        assert!(extraction.modules.contains("pkg/other"));
        // plain types contribute the placeholder, filtered at emission
        assert!(extraction.modules.contains(""));
    }
}
