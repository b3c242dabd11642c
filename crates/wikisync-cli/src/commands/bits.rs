//! Bits command
//!
//! Usage: wikisync bits <RAW> <LOW> <HIGH>

use clap::Args;
use wikisync_core::host::extract_bits;

#[derive(Debug, Args)]
pub struct BitsArgs {
    /// Raw varp value
    #[arg(allow_negative_numbers = true)]
    pub raw: i32,

    /// Least significant bit (inclusive)
    pub low: u32,

    /// Most significant bit (inclusive)
    pub high: u32,
}

pub fn execute(args: BitsArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.low > args.high {
        return Err(format!("low bit {} is above high bit {}", args.low, args.high).into());
    }
    println!("{}", extract_bits(args.raw, args.low, args.high));
    Ok(())
}
