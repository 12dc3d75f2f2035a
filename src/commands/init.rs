//! Interactive setup of `config.json`.

use crate::{
    libs::{config::Config, messages::Message},
    msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write the default settings instead of running the wizard
    #[arg(short, long)]
    reset: bool,
}

pub fn cmd(init_args: InitArgs) -> Result<()> {
    if init_args.reset {
        Config::default().save()?;
    } else {
        Config::init()?.save()?;
    }

    msg_success!(Message::ConfigSaved);
    Ok(())
}
