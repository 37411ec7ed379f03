use std::io::BufRead;

use anyhow::Context;
use auth_core::password::encode;
use auth_core::password::hash_password;
use auth_core::HashParameters;
use clap::Parser;

/// Hash a password read from stdin into the directory's encoded format.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Memory cost in KiB
    #[arg(short, long, env = "HASH_MEMORY_KIB", default_value_t = 19_456)]
    memory_kib: u32,

    /// Number of passes
    #[arg(short, long, env = "HASH_TIME_COST", default_value_t = 2)]
    time_cost: u32,

    /// Degree of parallelism
    #[arg(short, long, env = "HASH_PARALLELISM", default_value_t = 1)]
    parallelism: u8,

    /// Salt length in bytes
    #[arg(long, default_value_t = 16)]
    salt_length: u32,

    /// Derived key length in bytes
    #[arg(long, default_value_t = 32)]
    key_length: u32,
}

fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();

    let params = HashParameters {
        memory_cost_kib: args.memory_kib,
        time_cost: args.time_cost,
        parallelism: args.parallelism,
        salt_length: args.salt_length,
        key_length: args.key_length,
    };

    let mut password = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut password)
        .context("Failed to read password from stdin")?;
    let password = password.trim_end_matches(['\r', '\n']);
    anyhow::ensure!(!password.is_empty(), "Password must not be empty");

    let raw = hash_password(&params, password.as_bytes())?;
    println!("{}", encode(&params, &raw));

    Ok(())
}
