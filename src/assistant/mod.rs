// src/assistant/mod.rs
// =============================================================================
// The recommendation assistant.
//
// Submodules:
// - cycle: repository snapshot -> probes -> ranking, as one task
// - chat: the interactive shell and the text rendering of a cycle
// =============================================================================

mod chat;
mod cycle;

pub use chat::{render_outcome, ChatSession, SCANNING};
pub use cycle::{spawn_cycle, CycleOutcome};
