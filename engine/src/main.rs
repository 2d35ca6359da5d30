
mod config;
mod interfaces;
mod mcts;
mod neural;
mod selfplay;

#[cfg(test)]
mod testing;

use std::fs::OpenOptions;
use std::io::Read;

use clap::Parser;

use interfaces::*;

use utils::*;

///
/// A structure representing command line arguments.
///
#[derive(Parser)]
struct CLIArgs 
{
    #[clap(short, long, default_value = "train")]
    mode: String,

    #[clap(short, long, default_value = "config/config.toml")]
    config: String,

    #[clap(long)]
    human_first: bool
}

fn main () -> Result<()>
{
    let args = CLIArgs::parse();

    let mut config_str = String::new();
    OpenOptions::new().read(true).open(& args.config)
        .context(format!("Failed to open config file '{}'.", & args.config))?
        .read_to_string(& mut config_str)?;

    let config : config::Config = toml::from_str(& config_str)?;
    config.validate()?;

    let _logger = log::initialize(& config.log_path, "engine")?;

    match args.mode.as_str() 
    {
        "train" => 
        {
            train::Learner::new(& config)?.learn()?;
        },
        "play" => 
        {
            play::HumanPlay::new(& config, args.human_first)?.run_loop()?;
        },
        _ => 
        {
            return Err(error::error!("Mode '{}' is unsupported.", & args.mode)); 
        }
    };

    Ok(())
}
