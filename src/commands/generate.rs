//! The one command: load a package, extract signatures, synthesize the
//! stub file, hand the text to stdout or the output file.

use crate::config::GenerateConfig;
use crate::core::SourceUnit;
use crate::generate::output_file_name;
use crate::parser::GoParser;
use crate::{extract, generate, io};
use anyhow::{bail, Result};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub fn run(config: &GenerateConfig) -> Result<()> {
    let units = load_units(&config.path)?;
    if units.is_empty() {
        bail!("no Go source files found in {}", config.path.display());
    }

    let aliases = merge_alias_tables(&units);
    let extraction = extract::extract(&units, &aliases, &config.type_name)?;
    info!(
        "matched {} methods on *{} across {} files",
        extraction.methods.len(),
        config.type_name,
        units.len()
    );

    let package_name = package_name(&units);
    let text = generate::render(
        &package_name,
        &config.type_name,
        &extraction.methods,
        &extraction.modules,
        config,
    );

    if config.dry_run {
        print!("{text}");
    } else {
        let out_path = config.path.join(output_file_name(&config.type_name));
        io::write_file(&out_path, &text)?;
        info!("wrote {}", out_path.display());
    }
    Ok(())
}

/// Discover and parse the package's `.go` files in sorted-path order, so
/// extraction order is stable across runs. `*_test.go` is excluded,
/// matching the Go toolchain's default package load.
fn load_units(dir: &Path) -> Result<Vec<SourceUnit>> {
    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_go_source(path))
        .collect();
    paths.sort();

    let mut parser = GoParser::new()?;
    let mut units = Vec::with_capacity(paths.len());
    for path in paths {
        debug!("parsing {}", path.display());
        units.push(parser.parse_file(&path)?);
    }
    Ok(units)
}

fn is_go_source(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".go") && !name.ends_with("_test.go")
}

/// One alias table for the whole unit set. First occurrence of an alias
/// wins; a conflicting later binding is worth a warning but not a failure,
/// since only aliases actually referenced by kept types matter.
fn merge_alias_tables(units: &[SourceUnit]) -> HashMap<String, String> {
    let mut merged: HashMap<String, String> = HashMap::new();
    for unit in units {
        for (alias, path) in &unit.imports {
            match merged.get(alias) {
                Some(existing) if existing != path => warn!(
                    "alias {} bound to both {} and {}; keeping the first",
                    alias, existing, path
                ),
                Some(_) => {}
                None => {
                    merged.insert(alias.clone(), path.clone());
                }
            }
        }
    }
    merged
}

fn package_name(units: &[SourceUnit]) -> String {
    let first = units[0].package_name.clone();
    for unit in &units[1..] {
        if unit.package_name != first {
            warn!(
                "{} declares package {}, expected {}",
                unit.path.display(),
                unit.package_name,
                first
            );
        }
    }
    first
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn go_source_filter_excludes_tests_and_foreign_files() {
        assert!(is_go_source(Path::new("activities.go")));
        assert!(!is_go_source(Path::new("activities_test.go")));
        assert!(!is_go_source(Path::new("README.md")));
    }
}
