// src/prober/http.rs
// =============================================================================
// Checks whether saved sites are up and how fast they answer.
//
// Key functionality:
// - Sends one HTTP HEAD request per site (no body download)
// - Times the request until the response headers arrive
// - Anything below 400 counts as reachable, redirects are not followed
// - Failures (timeout, DNS, refused, 4xx/5xx, bad URL) become Unreachable,
//   they never bubble up as errors
// - Runs probes concurrently with a cap on how many are in flight
// =============================================================================

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt}; // StreamExt gives us .buffered()
use reqwest::{redirect, Client, StatusCode};
use serde::Serialize;
use std::error::Error as _;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::normalize::probe_target;
use crate::repository::SiteRecord;

pub const DEFAULT_TIMEOUT_MS: u64 = 3000;
pub const DEFAULT_CONCURRENCY: usize = 50;

/// Why a probe failed. Only used for logs and the JSON report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// No response headers within the timeout
    Timeout,
    /// Could not resolve hostname
    DnsError,
    /// TCP connection refused or reset
    ConnectError,
    /// TLS handshake or certificate problem
    SslError,
    /// Server answered with 400 or above
    HttpStatus(u16),
    /// Stored URL could not be turned into a request
    InvalidUrl,
    /// Anything else
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Reachable { latency_ms: u64 },
    Unreachable { reason: FailureReason },
}

/// One site plus what happened when we probed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    pub site: SiteRecord,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl ProbeResult {
    pub fn is_reachable(&self) -> bool {
        matches!(self.outcome, Outcome::Reachable { .. })
    }

    /// Latency for reachable sites, None otherwise
    pub fn latency_ms(&self) -> Option<u64> {
        match self.outcome {
            Outcome::Reachable { latency_ms } => Some(latency_ms),
            Outcome::Unreachable { .. } => None,
        }
    }
}

/// Holds one HTTP client (connection pool) shared by every probe.
#[derive(Clone)]
pub struct Prober {
    client: Client,
    concurrency: usize,
}

impl Prober {
    pub fn new(timeout: Duration, concurrency: usize) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            // A 3xx answer already proves the site is alive
            .redirect(redirect::Policy::none())
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self {
            client,
            concurrency: concurrency.max(1),
        })
    }

    /// Probes every site and returns exactly one result per input record.
    ///
    /// Up to `concurrency` requests run at once. `.buffered()` hands results
    /// back in input order even though the requests overlap.
    pub async fn probe_all(&self, sites: Vec<SiteRecord>) -> Vec<ProbeResult> {
        let total = sites.len();
        let started = Instant::now();

        let futures = sites.into_iter().map(|site| {
            let client = self.client.clone(); // cheap, shares the pool
            async move { probe_site(client, site).await }
        });

        let results: Vec<ProbeResult> = stream::iter(futures)
            .buffered(self.concurrency)
            .collect()
            .await;

        let reachable = results.iter().filter(|r| r.is_reachable()).count();
        info!(
            total,
            reachable,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "probe cycle finished"
        );
        results
    }
}

// Probes a single site. Never fails: every error becomes an Unreachable outcome.
async fn probe_site(client: Client, site: SiteRecord) -> ProbeResult {
    let Some(target) = probe_target(&site.url) else {
        debug!(url = %site.url, "not a probeable URL");
        return ProbeResult {
            site,
            outcome: Outcome::Unreachable {
                reason: FailureReason::InvalidUrl,
            },
        };
    };

    let start = Instant::now();
    let outcome = match client.head(target.as_str()).send().await {
        Ok(response) => analyze_status(response.status(), start.elapsed()),
        Err(e) => {
            let reason = categorize_error(&e);
            debug!(url = %target, ?reason, error = %e, "probe failed");
            Outcome::Unreachable { reason }
        }
    };

    debug!(name = %site.name, url = %target, ?outcome, "probed");
    ProbeResult { site, outcome }
}

// Status codes:
// - 1xx-3xx: the server is there and talking to us
// - 4xx/5xx: client or server error, treat the site as down
fn analyze_status(status: StatusCode, elapsed: Duration) -> Outcome {
    if status.as_u16() < 400 {
        Outcome::Reachable {
            latency_ms: round_millis(elapsed),
        }
    } else {
        Outcome::Unreachable {
            reason: FailureReason::HttpStatus(status.as_u16()),
        }
    }
}

fn round_millis(elapsed: Duration) -> u64 {
    (elapsed.as_secs_f64() * 1000.0).round() as u64
}

// Sorts reqwest errors into buckets.
//
// reqwest wraps hyper/io errors, so the text we want to sniff for DNS or TLS
// hints usually sits further down the source chain.
fn categorize_error(error: &reqwest::Error) -> FailureReason {
    if error.is_timeout() {
        return FailureReason::Timeout;
    }
    if error.is_builder() {
        return FailureReason::InvalidUrl;
    }

    let chain = error_chain_text(error);

    if chain.contains("dns") || chain.contains("failed to lookup address") {
        FailureReason::DnsError
    } else if chain.contains("certificate") || chain.contains("ssl") || chain.contains("tls") {
        FailureReason::SslError
    } else if error.is_connect() {
        FailureReason::ConnectError
    } else {
        FailureReason::Error
    }
}

fn error_chain_text(error: &reqwest::Error) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(inner) = source {
        text.push_str(": ");
        text.push_str(&inner.to_string());
        source = inner.source();
    }
    text.to_lowercase()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. buffered vs buffer_unordered
//    - Both run up to N futures at the same time
//    - buffer_unordered yields whichever finishes first
//    - buffered yields in the order the futures were created
//    - Here the order matters for tie-breaking in the ranker, so: buffered
//
// 2. Why does probe_site return ProbeResult and not Result<..>?
//    - A dead site is a normal answer, not an error
//    - Putting the failure in the Outcome enum means the caller can't forget it
//
// 3. let-else
//    - `let Some(x) = expr else { return ...; };` binds x or leaves early
// -----------------------------------------------------------------------------
