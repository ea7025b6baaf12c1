// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod extract;
pub mod generate;
pub mod io;
pub mod parser;

// Re-export commonly used types
pub use crate::config::GenerateConfig;
pub use crate::core::{MethodSignature, Param, SourceUnit, TypeExpr};
pub use crate::errors::StubgenError;
pub use crate::extract::{extract, Extraction};
pub use crate::generate::{output_file_name, render, WORKFLOW_MODULE};
pub use crate::parser::GoParser;
