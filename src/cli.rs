// src/cli.rs
// =============================================================================
// Command-line interface, defined with clap's derive API.
//
// Global options (config, database, logging, credentials) can be given before
// or after the subcommand. Credentials may also come from the environment;
// whatever is still missing gets prompted for interactively.
// =============================================================================

use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

// The whole command line: global options plus exactly one subcommand
//
// #[derive(Parser)] generates the parsing code from the fields below
#[derive(Parser, Debug)]
#[command(
    name = "mirror-scout",
    version,
    about = "Keep a list of your favourite sites and find the fastest ones that are up",
    long_about = "mirror-scout stores a personal list of websites in a local database, \
                  probes them over HTTP and recommends the fastest reachable ones. \
                  Every command requires logging in."
)]
pub struct Cli {
    /// Path to a TOML config file (default: ./mirror-scout.toml if present)
    // global = true lets the flag appear before or after the subcommand
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database file (overrides the config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Login username
    // env = ... makes clap fall back to the environment variable
    #[arg(short, long, global = true, env = "MIRROR_SCOUT_USER")]
    pub username: Option<String>,

    /// Login password
    // hide_env_values keeps the password out of --help output
    #[arg(short, long, global = true, env = "MIRROR_SCOUT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    // Holds whichever subcommand the user picked
    #[command(subcommand)]
    pub command: Commands,
}

// One variant per subcommand; the variant's fields become its arguments
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Save a new site
    ///
    /// Example: mirror-scout add Archive archive.org Movies
    Add {
        /// Display name
        // Fields without #[arg] are positional and required
        name: String,

        /// Site URL; https:// is assumed when no scheme is given
        url: String,

        /// Free-form category (e.g. Movies, Series)
        // Positional but optional thanks to the default
        #[arg(default_value = "")]
        category: String,
    },

    /// Show every saved site
    List {
        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Remove a saved site by id
    Delete {
        /// Id shown by `list`
        id: i64,
    },

    /// Probe all saved sites once and print the fastest reachable ones
    Recommend {
        /// How many sites to recommend (default from config: 3)
        // Option<..> so main.rs can tell "not given" from "given" and fall back to config
        #[arg(long, value_parser = top_parser())]
        top: Option<usize>,

        /// Per-site timeout in milliseconds (default from config: 3000)
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Output JSON with every probe result instead of text
        #[arg(long)]
        json: bool,
    },

    /// Write all saved sites to a CSV file
    Export {
        /// Output file (default from config: my_sites_report.csv)
        // Gives both --output and -o
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Talk to the assistant; ask it to recommend or check sites
    Chat {
        /// How many sites each recommendation lists
        #[arg(long, value_parser = top_parser())]
        top: Option<usize>,
    },
}

// --top must be at least 1; asking for zero picks makes no sense
fn top_parser() -> RangedU64ValueParser<usize> {
    RangedU64ValueParser::<usize>::new().range(1..)
}
