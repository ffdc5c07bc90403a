//! Supplement Safety Bible server CLI
//!
//! Starts the interaction checker HTTP server.

use ssb_server::{config::ServerConfig, init_tracing, start_server, ServerError};
use std::env;
use std::process;

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        ServerConfig::from_file(&args[2])?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        // Environment only
        ServerConfig::from_env()?
    };

    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("Supplement Safety Bible - Interaction Checker Server");
    println!();
    println!("USAGE:");
    println!("    ssb-server [--config <path-to-config.toml>]");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("EXAMPLE:");
    println!("    ssb-server --config config/server.toml");
    println!();
    println!("ENVIRONMENT:");
    println!("    SUPABASE_URL                 Supabase project URL");
    println!("    SUPABASE_SERVICE_ROLE_KEY    Service-role key (preferred)");
    println!("    SUPABASE_ANON_KEY            Anon key (fallback)");
    println!("    RUST_LOG                     Log filter (default: info)");
    println!();
    println!("    Environment values override the config file.");
    println!();
}
