use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::*;
use l2_reflector_cat::{reflect, FrameParser, ReflectOptions};

/// `cat` for frames going through the IEEE 802.15.4 loopback device.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a hex encoded IEEE 802.15.4 data frame.
    Parse {
        /// The frame to parse.
        #[clap(value_parser(clap::builder::NonEmptyStringValueParser::new()))]
        input: String,
        /// The frame ends with a 2-octet FCS.
        #[arg(long)]
        fcs: bool,
    },
    /// Send a hex encoded payload through the loopback device.
    Reflect {
        /// The payload to send.
        payload: String,
        /// Destination address, hex encoded, 2 or 8 octets.
        #[arg(long, default_value = "1234")]
        dst: String,
        /// Send to the broadcast address instead.
        #[arg(long)]
        broadcast: bool,
        /// Use the long source address.
        #[arg(long)]
        src_long: bool,
        /// Carry the source PAN ID.
        #[arg(long)]
        src_pan: bool,
        /// PAN ID, decimal or `0x` prefixed hex.
        #[arg(long, value_parser = parse_u16)]
        pan: Option<u16>,
        /// Do not request acknowledgments.
        #[arg(long)]
        no_ack: bool,
    },
}

fn parse_u16(s: &str) -> Result<u16, std::num::ParseIntError> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    }
}

fn run(args: Args) -> l2_reflector_cat::Result<String> {
    match args.command {
        Command::Parse { input, fcs } => FrameParser::parse_hex(&input, fcs),
        Command::Reflect {
            payload,
            dst,
            broadcast,
            src_long,
            src_pan,
            pan,
            no_ack,
        } => {
            let opts = ReflectOptions {
                dst: hex::decode(dst)?,
                broadcast,
                src_long,
                src_pan,
                pan_id: pan,
                no_ack,
            };
            reflect(&hex::decode(payload)?, &opts)
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Args::parse()) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}: {err}", "error".red().bold());
            ExitCode::FAILURE
        }
    }
}
