// src/app.rs
// =============================================================================
// Application state handed to every command handler.
//
// Instead of global state, main.rs builds one App (config + repository +
// prober) after parsing arguments and passes it down explicitly.
// =============================================================================

use anyhow::{Context, Result};
use inquire::{Password, Text};
use tracing::info;

use crate::config::Config;
use crate::prober::Prober;
use crate::repository::SiteRepository;

#[derive(Clone)]
pub struct App {
    pub config: Config,
    pub repo: SiteRepository,
    pub prober: Prober,
}

impl App {
    pub fn open(config: Config) -> Result<Self> {
        let repo = SiteRepository::open(&config.database_path).with_context(|| {
            format!("Failed to open database '{}'", config.database_path.display())
        })?;
        let prober = Prober::new(config.probe_timeout(), config.probe.concurrency)?;

        Ok(Self {
            config,
            repo,
            prober,
        })
    }

    /// Checks the credential against the stored one.
    pub fn login(&self, username: &str, password: &str) -> Result<bool> {
        let ok = self
            .repo
            .verify_credential(username, password)
            .context("Failed to check credentials")?;
        info!(username, ok, "login attempt");
        Ok(ok)
    }
}

/// Uses the given credentials, prompting for whichever half is missing.
pub fn resolve_credentials(
    username: Option<String>,
    password: Option<String>,
) -> Result<(String, String)> {
    let username = match username {
        Some(username) => username,
        None => Text::new("Username:")
            .prompt()
            .context("Failed to read username")?,
    };

    let password = match password {
        Some(password) => password,
        None => Password::new("Password:")
            .without_confirmation()
            .prompt()
            .context("Failed to read password")?,
    };

    Ok((username, password))
}
