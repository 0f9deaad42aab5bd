// src/main.rs
// =============================================================================
// Entry point of the mirror-scout CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Load config, set up logging, open the database
// 3. Log in (every command is behind the login)
// 4. Dispatch to the subcommand handler
// 5. Exit with a code: 0 = success, 1 = nothing useful found / not found,
//    2 = access denied or unexpected error
// =============================================================================

// Module declarations - one per source file or directory under src/
mod app;
mod assistant;
mod cli;
mod config;
mod logging;
mod prober;
mod ranker;
mod report;
mod repository;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;

use app::{resolve_credentials, App};
use assistant::{render_outcome, spawn_cycle, ChatSession, CycleOutcome};
use cli::{Cli, Commands};
use config::Config;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    // Parse arguments; clap handles --help and --version and exits on bad input
    let cli = Cli::parse();

    // Config file first, then command-line flags win over it
    let mut config = Config::resolve(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.database_path = db;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Commands::Recommend {
        timeout_ms: Some(timeout_ms),
        ..
    } = cli.command
    {
        config.probe.timeout_ms = timeout_ms;
    }

    // Logging has to be up before anything worth logging happens
    logging::init_logging(&config.log_level);

    // Opens (or creates) the database and builds the shared HTTP client
    let app = App::open(config)?;

    // Every command sits behind the login
    let (username, password) = resolve_credentials(cli.username, cli.password)?;
    if !app.login(&username, &password)? {
        eprintln!("❌ Access denied: invalid credentials");
        return Ok(2);
    }

    // Dispatch to the handler for the chosen subcommand
    match cli.command {
        Commands::Add {
            name,
            url,
            category,
        } => handle_add(&app, &name, &url, &category),
        Commands::List { json } => handle_list(&app, json),
        Commands::Delete { id } => handle_delete(&app, id),
        Commands::Recommend { top, json, .. } => {
            // --top wins, otherwise the config value (3 unless changed)
            let top = top.unwrap_or(app.config.probe.top_n);
            handle_recommend(&app, top, json).await
        }
        Commands::Export { output } => {
            let path = output.unwrap_or_else(|| app.config.export_path.clone());
            handle_export(&app, &path)
        }
        Commands::Chat { top } => {
            let top = top.unwrap_or(app.config.probe.top_n);
            handle_chat(app, top).await
        }
    }
}

// Handles the 'add' subcommand
// A rejected record is reported to the user, not returned as an error
fn handle_add(app: &App, name: &str, url: &str, category: &str) -> Result<i32> {
    match app.repo.insert(name, url, category) {
        Ok(id) => {
            println!("✅ Site added to repository (id {})", id);
            // Show the URL the prober will actually hit
            println!("   Will be probed at {}", prober::with_default_scheme(url));
            Ok(0)
        }
        Err(e) => {
            tracing::warn!(error = %e, "insert failed");
            eprintln!("❌ Could not add site: {}", e);
            Ok(1)
        }
    }
}

// Handles the 'list' subcommand: a table for humans, JSON for scripts
fn handle_list(app: &App, json: bool) -> Result<i32> {
    let sites = app.repo.list_all().context("Failed to list sites")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sites)?);
    } else if sites.is_empty() {
        println!("📭 No sites saved yet. Add one with `mirror-scout add <name> <url> [category]`");
    } else {
        println!("{}", report::render_table(&sites));
    }
    Ok(0)
}

// Handles the 'delete' subcommand
fn handle_delete(app: &App, id: i64) -> Result<i32> {
    // delete() tells us whether a row actually went away
    if app.repo.delete(id).context("Failed to delete site")? {
        println!("🗑️  Deleted site {}", id);
        Ok(0)
    } else {
        eprintln!("⚠️  No site with id {}", id);
        Ok(1)
    }
}

// Runs one probe cycle. Exit code 1 when nothing could be recommended.
async fn handle_recommend(app: &App, top: usize, json: bool) -> Result<i32> {
    // Keep stdout pure JSON when --json is set
    if !json {
        println!("{}\n", assistant::SCANNING);
    }

    // The cycle runs on its own task; awaiting it waits for every probe
    let outcome = spawn_cycle(app.repo.clone(), app.prober.clone(), top)
        .await
        .context("probe task failed")??;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{}", render_outcome(&outcome));
    }

    // Empty list and "all down" both mean there was nothing to recommend
    Ok(match outcome {
        CycleOutcome::Ranked { .. } => 0,
        CycleOutcome::EmptyList | CycleOutcome::AllDown { .. } => 1,
    })
}

// Handles the 'export' subcommand (overwrites the target file)
fn handle_export(app: &App, path: &std::path::Path) -> Result<i32> {
    let sites = app.repo.list_all().context("Failed to list sites")?;
    let written = report::export_csv(&sites, path)?;
    println!("📄 Exported {} site(s) to {}", written, path.display());
    Ok(0)
}

// Handles the 'chat' subcommand: reads messages from stdin until EOF or "quit"
async fn handle_chat(app: App, top: usize) -> Result<i32> {
    let session = ChatSession {
        repo: app.repo,
        prober: app.prober,
        top_n: top,
    };

    session
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;
    Ok(0)
}
