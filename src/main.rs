use std::io;

use clap::Parser;

use roadmap::cli::{self, Cli};
use roadmap::config::Config;
use roadmap::{rlog, rlog_error, Result};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    roadmap::log::init_with_debug(cli.debug || config.debug);
    rlog!("roadmap starting");

    let result = cli::run(&cli, &config, &mut io::stdout().lock());
    if let Err(e) = &result {
        rlog_error!("{}", e);
    }
    result
}
