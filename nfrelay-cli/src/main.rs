//! ## nfrelay
//! **NetFlow v5 collector and relay**
//!
//! Receives NetFlow v5 export datagrams, enriches each flow record with
//! reverse-DNS hostnames and forwards it as JSON on stdout or as InfluxDB
//! line protocol over UDP. Logs go to stderr.

use clap::Parser;

mod commands;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => commands::run(args).await,
        Commands::Config(args) => commands::print_config(args),
    }
}
