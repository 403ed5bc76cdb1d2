use clap::{Parser, Subcommand};

use kc_cli::commands::{check_ops, config_ops, decide_ops, type_ops};

#[derive(Parser)]
#[command(name = "kctool", about = "Keyboard compositor diagnostics")]
struct Cli {
    /// Custom settings TOML
    #[arg(long, global = true)]
    config: Option<String>,
    /// Write a JSON trace into this directory (requires --features trace)
    #[arg(long, global = true)]
    trace: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate the catalog and every mapping it lists
    Check {
        /// Resource directory (catalog and mappings)
        dir: String,
        /// Output as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Type keys into a simulated text area and print the result
    Type {
        /// Resource directory
        dir: String,
        /// Language code of the text area
        lang: String,
        /// Keys to type
        keys: String,
        /// Print the synthetic events as JSON lines
        #[arg(long)]
        events: bool,
    },
    /// Show the engine decision for a buffer
    Decide {
        /// Resource directory
        dir: String,
        /// Language code
        lang: String,
        /// Buffer contents
        text: String,
        /// Cursor position in chars (default: end of text)
        #[arg(long)]
        cursor: Option<usize>,
    },
    /// Export default settings as TOML
    SettingsExport,
    /// Validate a custom settings TOML file
    SettingsValidate {
        /// Path to the TOML file
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Some(dir) = &cli.trace {
        kc_engine::init_tracing(std::path::Path::new(dir));
    }
    if let Some(file) = &cli.config {
        config_ops::load_config(file);
    }
    let settings = kc_core::settings::settings();

    match cli.command {
        Command::Check { dir, json } => check_ops::check(&dir, json, settings),
        Command::Type {
            dir,
            lang,
            keys,
            events,
        } => type_ops::type_cmd(&dir, &lang, &keys, events, settings),
        Command::Decide {
            dir,
            lang,
            text,
            cursor,
        } => decide_ops::decide_cmd(&dir, &lang, &text, cursor, settings),
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
    }
}
