use anyhow::Result;
use clap::Parser;

use blocksync::cli::SubCommandExtend;
use blocksync::config::{Opts, SubCommand};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = Opts::parse();

    match &opts.subcmd {
        SubCommand::Export(cmd) => cmd.run(&opts).await,
        SubCommand::Compare(cmd) => cmd.run(&opts).await,
        SubCommand::Status(cmd) => cmd.run(&opts).await,
    }
}
