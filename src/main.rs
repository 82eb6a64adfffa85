use clap::Parser;
use miette::Result;
use wgsldoc::cli::{Cli, Commands};
use wgsldoc::logging::init_logging;
use wgsldoc::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    let printer = Printer::new(cli.quiet);

    match cli.command {
        Commands::Build(args) => wgsldoc::cli::build::run(args, &printer)?,
        Commands::Inspect(args) => wgsldoc::cli::inspect::run(args, &printer)?,
        Commands::Completions(args) => wgsldoc::cli::completions::run(args)?,
    }

    Ok(())
}
