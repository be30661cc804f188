// SPDX-License-Identifier: GPL-3.0-only

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "photo-express")]
#[command(about = "Capture a photo, adjust its brightness and save it to Pictures")]
#[command(version = env!("GIT_VERSION"))]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Config file (default: ~/.config/photo-express/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import an existing image as the captured photo, adjust and save it
    Edit {
        /// Image to import
        input: PathBuf,

        #[command(flatten)]
        options: SessionArgs,
    },

    /// Take a photo with an external capture command, adjust and save it
    Capture {
        /// Capture command, `{output}` is replaced by the destination path
        /// (default: `capture_command` from the config file)
        #[arg(short, long)]
        command: Option<String>,

        #[command(flatten)]
        options: SessionArgs,
    },

    /// Print the multiplicative and additive tints for a brightness level
    Tints {
        /// Brightness level (0-200, 100 = unchanged)
        #[arg(allow_negative_numbers = true)]
        level: i32,
    },
}

#[derive(Args)]
struct SessionArgs {
    /// Brightness level (0-200, 100 = unchanged)
    #[arg(short, long, default_value = "100", allow_negative_numbers = true)]
    brightness: i32,

    /// Preview view size as WIDTHxHEIGHT
    #[arg(long, value_parser = cli::parse_view_size)]
    view: Option<(u32, u32)>,

    /// Root of the shared media catalog (photos land in ROOT/Pictures)
    #[arg(short, long)]
    output_root: Option<PathBuf>,
}

impl SessionArgs {
    fn into_options(self, config_path: Option<PathBuf>) -> cli::SessionOptions {
        cli::SessionOptions {
            brightness: self.brightness,
            view: self.view,
            output_root: self.output_root,
            config_path,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=photo_express=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Edit { input, options } => {
            cli::edit_photo(input, options.into_options(cli.config))
        }
        Commands::Capture { command, options } => {
            cli::capture_photo(command, options.into_options(cli.config))
        }
        Commands::Tints { level } => {
            cli::print_tints(level);
            Ok(())
        }
    }
}
