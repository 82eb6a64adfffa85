pub mod build;
pub mod completions;
pub mod inspect;

use clap::{ArgAction, Parser, Subcommand};

/// wgsldoc - Cross-linked HTML documentation for WGSL shaders
#[derive(Parser, Debug)]
#[command(name = "wgsldoc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase log detail (-v info, -vv debug, -vvv trace)
    #[arg(long, short, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only print warnings and errors
    #[arg(long, short, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate documentation for a shader tree
    Build(build::BuildArgs),

    /// Parse one shader and print its model as JSON
    Inspect(inspect::InspectArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
