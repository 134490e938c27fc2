use clap::Parser;
use next_bundle_report::cli::{Cli, Commands};
use next_bundle_report::{cmd, fmt};
use std::process;

fn main() {
    // Initialize logger (use RUST_LOG env var to control verbosity)
    env_logger::init();

    let cli = Cli::parse();
    fmt::set_emoji(!cli.no_emoji);

    let result = match &cli.command {
        Commands::Run(args) => cmd::cmd_run(args).map(|_| ()),
        Commands::Measure(args) => cmd::cmd_measure(args),
        Commands::Compare(args) => cmd::cmd_compare(args),
        Commands::Completions { shell } => {
            cmd::cmd_completions(*shell);
            Ok(())
        }
    };

    if let Err(e) = result {
        use next_bundle_report::error::ErrorFormatter;
        eprintln!("{}", ErrorFormatter::format(&e));
        let exit_code = ErrorFormatter::exit_code(&e);
        process::exit(exit_code);
    }
}
