use anyhow::Context;
use clap::Parser;

use lanthorn::{Args, LoggingConfig, init_logging};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut logging = LoggingConfig::default();
    if let Some(filter) = &args.log {
        logging = logging.filter(filter.clone());
    }
    init_logging(logging);

    lanthorn::run(args.app_config()).context("renderer exited with an error")
}
