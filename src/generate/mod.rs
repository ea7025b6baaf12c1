//! Code synthesis.
//!
//! Renders the complete generated Go source unit into a `String`. Nothing
//! here touches the filesystem; the command layer writes the buffer in one
//! step after synthesis succeeds, so a failed run never leaves a truncated
//! file behind.

use crate::config::GenerateConfig;
use crate::core::{MethodSignature, Param};
use std::collections::BTreeSet;

/// Module path of the orchestration framework; always imported.
pub const WORKFLOW_MODULE: &str = "go.temporal.io/sdk/workflow";

/// Render the full generated file for `target`.
///
/// `modules` is the extractor's reference set: already deduplicated and
/// lexically sorted, possibly still holding empty placeholders, which are
/// dropped here and nowhere else.
pub fn render(
    package_name: &str,
    target: &str,
    methods: &[MethodSignature],
    modules: &BTreeSet<String>,
    config: &GenerateConfig,
) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "// Code generated by \"stubgen -type={target}\"; DO NOT EDIT.\n\n"
    ));
    out.push_str(&format!("package {package_name}\n\n"));

    let mut imports: BTreeSet<&str> = modules
        .iter()
        .map(String::as_str)
        .filter(|m| !m.is_empty())
        .collect();
    imports.insert(WORKFLOW_MODULE);
    out.push_str("import (\n");
    for import in &imports {
        out.push_str(&format!("\t\"{import}\"\n"));
    }
    out.push_str(")\n\n");

    out.push_str(&format!(
        "type {target}Stub struct {{\n\ta *{target}\n}}\n"
    ));

    for method in methods {
        out.push('\n');
        render_exec(&mut out, target, method, config);
        out.push('\n');
        render_start(&mut out, target, method, config);
    }

    out
}

/// The submit-and-await wrapper: starts the activity, blocks the calling
/// workflow until the future resolves, and decodes the payload when the
/// method has one.
fn render_exec(out: &mut String, target: &str, method: &MethodSignature, config: &GenerateConfig) {
    out.push_str(&format!(
        "func (s *{target}Stub) {}{}({})",
        method.name,
        config.exec_suffix,
        signature_params(&method.params)
    ));

    let parenthesize =
        method.results.len() > 1 || method.results.first().is_some_and(|r| r.name.is_some());
    if parenthesize {
        out.push_str(&format!(" ({})", typed_list(&method.results)));
    } else {
        out.push_str(&format!(" {}", typed_list(&method.results)));
    }

    out.push_str(" {\n");
    out.push_str(&submission(method));
    if method.results.len() > 1 {
        out.push_str(&format!("\tvar _res {}\n", method.results[0].ty));
        out.push_str("\treturn _res, f.Get(ctx, &_res)\n");
    } else {
        out.push_str("\treturn f.Get(ctx, nil)\n");
    }
    out.push_str("}\n");
}

/// The submit-and-start wrapper: same submission, but returns the future
/// immediately so callers can fan out and collect later.
fn render_start(out: &mut String, target: &str, method: &MethodSignature, config: &GenerateConfig) {
    out.push_str(&format!(
        "func (s *{target}Stub) {}{}({}) workflow.Future {{\n",
        method.name,
        config.start_suffix,
        signature_params(&method.params)
    ));
    out.push_str(&submission(method));
    out.push_str("\treturn f\n");
    out.push_str("}\n");
}

fn submission(method: &MethodSignature) -> String {
    let mut line = format!("\tf := workflow.ExecuteActivity(ctx, s.a.{}", method.name);
    if !method.params.is_empty() {
        line.push_str(", ");
        line.push_str(&name_list(&method.params));
    }
    line.push_str(")\n");
    line
}

/// Generated parameter list: the scheduling context first, then the kept
/// parameters as `name type` pairs.
fn signature_params(params: &[Param]) -> String {
    let mut list = String::from("ctx workflow.Context");
    if !params.is_empty() {
        list.push_str(", ");
        list.push_str(&typed_list(params));
    }
    list
}

fn typed_list(params: &[Param]) -> String {
    params
        .iter()
        .map(|p| match &p.name {
            Some(name) => format!("{name} {}", p.ty),
            None => p.ty.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn name_list(params: &[Param]) -> String {
    params
        .iter()
        .filter_map(|p| p.name.as_deref())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Deterministic output file name: lower-cased target plus fixed suffix.
pub fn output_file_name(target: &str) -> String {
    format!("{}.gen.go", target.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TypeExpr;
    use pretty_assertions::assert_eq;

    fn config() -> GenerateConfig {
        GenerateConfig {
            type_name: "Jobs".into(),
            exec_suffix: "Exec".into(),
            start_suffix: "Start".into(),
            dry_run: true,
            path: ".".into(),
        }
    }

    fn named(name: &str) -> TypeExpr {
        TypeExpr::Named(name.into())
    }

    #[test]
    fn single_error_result_is_unparenthesized_with_no_local() {
        let method = MethodSignature {
            name: "Touch".into(),
            params: vec![],
            results: vec![Param::anonymous(named("error"))],
        };
        let mut out = String::new();
        render_exec(&mut out, "Jobs", &method, &config());
        assert_eq!(
            out,
            "func (s *JobsStub) TouchExec(ctx workflow.Context) error {\n\
             \tf := workflow.ExecuteActivity(ctx, s.a.Touch)\n\
             \treturn f.Get(ctx, nil)\n\
             }\n"
        );
    }

    #[test]
    fn named_single_result_is_parenthesized() {
        let method = MethodSignature {
            name: "Touch".into(),
            params: vec![],
            results: vec![Param::named("err", named("error"))],
        };
        let mut out = String::new();
        render_exec(&mut out, "Jobs", &method, &config());
        assert!(out.contains(") (err error) {"));
    }

    #[test]
    fn value_error_pair_declares_local_and_returns_both() {
        let method = MethodSignature {
            name: "Process".into(),
            params: vec![Param::named("id", named("string"))],
            results: vec![
                Param::anonymous(TypeExpr::Qualified {
                    package: "model".into(),
                    name: "Result".into(),
                }),
                Param::anonymous(named("error")),
            ],
        };
        let mut out = String::new();
        render_exec(&mut out, "Jobs", &method, &config());
        assert_eq!(
            out,
            "func (s *JobsStub) ProcessExec(ctx workflow.Context, id string) (model.Result, error) {\n\
             \tf := workflow.ExecuteActivity(ctx, s.a.Process, id)\n\
             \tvar _res model.Result\n\
             \treturn _res, f.Get(ctx, &_res)\n\
             }\n"
        );
    }

    #[test]
    fn start_wrapper_returns_future() {
        let method = MethodSignature {
            name: "Process".into(),
            params: vec![Param::named("id", named("string"))],
            results: vec![Param::anonymous(named("error"))],
        };
        let mut out = String::new();
        render_start(&mut out, "Jobs", &method, &config());
        assert_eq!(
            out,
            "func (s *JobsStub) ProcessStart(ctx workflow.Context, id string) workflow.Future {\n\
             \tf := workflow.ExecuteActivity(ctx, s.a.Process, id)\n\
             \treturn f\n\
             }\n"
        );
    }

    #[test]
    fn imports_are_sorted_deduplicated_and_placeholder_free() {
        let mut modules = BTreeSet::new();
        modules.insert(String::new());
        modules.insert("pkg/model".to_string());
        modules.insert("encoding/json".to_string());
        let out = render("worker", "Jobs", &[], &modules, &config());
        let import_block = "import (\n\
             \t\"encoding/json\"\n\
             \t\"go.temporal.io/sdk/workflow\"\n\
             \t\"pkg/model\"\n\
             )\n";
        assert!(out.contains(import_block));
    }

    #[test]
    fn output_file_name_lowercases_target() {
        assert_eq!(output_file_name("Jobs"), "jobs.gen.go");
    }
}
