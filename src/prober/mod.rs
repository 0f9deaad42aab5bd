// src/prober/mod.rs
// =============================================================================
// Site availability probing.
//
// Submodules:
// - http: sends the HEAD requests and turns responses into outcomes
// - normalize: adds a default https:// scheme to stored URLs
//
// The prober never touches the repository. It receives a snapshot of
// SiteRecords and gives back one ProbeResult per record.
// =============================================================================

mod http;
mod normalize;

pub use http::{
    FailureReason, Outcome, ProbeResult, Prober, DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_MS,
};
pub use normalize::with_default_scheme;
