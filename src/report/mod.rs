// src/report/mod.rs
// =============================================================================
// Ways of showing the saved site list outside the chat:
// - table: aligned text for the terminal
// - export: CSV file
// =============================================================================

mod export;
mod table;

pub use export::export_csv;
pub use table::render_table;
