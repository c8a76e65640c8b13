use clap::Parser;
use std::process;

use pairwise::cli::{self, Cli};

fn main() {
  let cli = Cli::parse();

  herald::set_verbose(cli.verbose);

  // Library diagnostics stay quiet unless asked for
  let directives = if cli.verbose { "pairwise=debug,warn" } else { "warn" };
  if let Err(e) = herald::init_tracing(directives, "PAIRWISE_LOG") {
    herald::warn!(&format!("tracing disabled: {e}"));
  }

  if let Err(e) = cli::run(cli) {
    herald::error!(&format!("{e:#}"));
    process::exit(1);
  }
}
