//! netmsg-check CLI entry point.

use clap::Parser;
use netmsg_check::cli::{self, Cli, EXIT_ERROR};

fn main() {
    let cli = Cli::parse();
    cli::init_logging(cli.verbose);

    let exit_code = match cli::run_check(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:?}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
