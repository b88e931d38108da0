//! sign_demo: interactive entry point.

use clap::Parser;
use sign_demo::app::run;
use sign_demo::config::load_settings;
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Sign-language text composition demo
#[derive(Parser, Debug)]
#[command(name = "sign_demo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON settings file (defaults are used for anything missing)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the effective settings as JSON and exit
    #[arg(long)]
    print_config: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let settings = match load_settings(cli.config.as_deref()) {
        Ok(s)  => s,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    if cli.print_config {
        match serde_json::to_string_pretty(&settings) {
            Ok(json) => println!("{}", json),
            Err(e)   => {
                error!("serialising settings: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║          Sign Language Text Composition Demo                 ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("  Hand tracker: keyboard simulation (arrows = sample, Space = hand)");
    println!("  Opening window…");
    println!();

    if let Err(e) = run(&settings) {
        error!("{}", e);
        std::process::exit(1);
    }
}
