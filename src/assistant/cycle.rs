// src/assistant/cycle.rs
// =============================================================================
// One probe cycle: snapshot the repository, probe every site, rank survivors.
//
// The result distinguishes the three things the user can be told:
// - the list is empty (nothing to probe)
// - every site is down
// - here are the fastest ones
// =============================================================================

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::info;

use crate::prober::{ProbeResult, Prober};
use crate::ranker::{rank, Recommendation};
use crate::repository::{RepoError, SiteRepository};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CycleOutcome {
    EmptyList,
    AllDown {
        results: Vec<ProbeResult>,
    },
    Ranked {
        results: Vec<ProbeResult>,
        picks: Vec<Recommendation>,
    },
}

pub async fn run_cycle(
    repo: &SiteRepository,
    prober: &Prober,
    top_n: usize,
) -> Result<CycleOutcome, RepoError> {
    // Sites added after this line are not part of this cycle
    let sites = repo.list_all()?;
    if sites.is_empty() {
        info!("probe cycle skipped, no sites saved");
        return Ok(CycleOutcome::EmptyList);
    }

    let results = prober.probe_all(sites).await;

    // "All down" is about the probes, not about how many picks were asked for
    if !results.iter().any(ProbeResult::is_reachable) {
        Ok(CycleOutcome::AllDown { results })
    } else {
        let picks = rank(&results, top_n);
        Ok(CycleOutcome::Ranked { results, picks })
    }
}

/// Runs a cycle on its own task. Awaiting the handle yields the whole batch
/// at once, so nothing can be rendered before every probe has settled.
pub fn spawn_cycle(
    repo: SiteRepository,
    prober: Prober,
    top_n: usize,
) -> JoinHandle<Result<CycleOutcome, RepoError>> {
    tokio::spawn(async move { run_cycle(&repo, &prober, top_n).await })
}
