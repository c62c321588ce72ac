mod commands;
mod error;
mod util;
use argh::FromArgs;
use core::error::Error;

#[derive(FromArgs, Debug)]
/// Converts Neo Geo Pocket Color 2BPP tile data to and from raw pixel files
struct TopLevel {
    #[argh(subcommand)]
    command: Commands,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Commands {
    Info(commands::info::InfoCmd),
    Decode(commands::decode::DecodeCmd),
    Encode(commands::encode::EncodeCmd),
    Roundtrip(commands::roundtrip::RoundtripCmd),
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli: TopLevel = argh::from_env();

    match cli.command {
        Commands::Info(cmd) => commands::info::handle_info_command(cmd)?,
        Commands::Decode(cmd) => commands::decode::handle_decode_command(cmd)?,
        Commands::Encode(cmd) => commands::encode::handle_encode_command(cmd)?,
        Commands::Roundtrip(cmd) => commands::roundtrip::handle_roundtrip_command(cmd)?,
    }

    Ok(())
}
