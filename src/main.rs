use clap::Parser;

use pose_overlay::cli::logging::set_verbose;
use pose_overlay::cli::{Cli, Commands, run_overlay};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Overlay(args) => {
            set_verbose(args.verbose);
            run_overlay(&args);
        }
    }
}
