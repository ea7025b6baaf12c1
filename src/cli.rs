use crate::config::GenerateConfig;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "stubgen")]
#[command(about = "Generate Temporal activity stub wrappers from Go source", long_about = None)]
#[command(version)]
#[command(after_help = "Expected to be used via 'go generate'. Place a comment like this in your code:\n\
    //go:generate stubgen -t ActivitiesStruct")]
pub struct Cli {
    /// Name of the struct type to generate stubs for
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub type_name: String,

    /// Suffix of the generated submit-and-await methods
    #[arg(long = "exec-suffix", default_value = "Exec")]
    pub exec_suffix: String,

    /// Suffix of the generated submit-and-start methods
    #[arg(long = "start-suffix", default_value = "Start")]
    pub start_suffix: String,

    /// Print the generated source to stdout instead of writing a file
    #[arg(long = "dry")]
    pub dry_run: bool,

    /// Directory of the Go package to scan
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Increase verbosity (can be repeated: -v, -vv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

impl Cli {
    pub fn into_config(self) -> GenerateConfig {
        GenerateConfig {
            type_name: self.type_name,
            exec_suffix: self.exec_suffix,
            start_suffix: self.start_suffix,
            dry_run: self.dry_run,
            path: self.path,
        }
    }
}
