// src/report/table.rs
// =============================================================================
// Human-readable listing of the saved sites for the terminal.
// =============================================================================

use crate::repository::SiteRecord;

const URL_WIDTH: usize = 45;
const NAME_WIDTH: usize = 25;

pub fn render_table(sites: &[SiteRecord]) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{:<6} {:<name$} {:<url$} {}\n",
        "ID",
        "NAME",
        "URL",
        "CATEGORY",
        name = NAME_WIDTH,
        url = URL_WIDTH
    ));
    out.push_str(&"=".repeat(6 + NAME_WIDTH + URL_WIDTH + 15));
    out.push('\n');

    for site in sites {
        out.push_str(&format!(
            "{:<6} {:<name$} {:<url$} {}\n",
            site.id,
            truncate(&site.name, NAME_WIDTH),
            truncate(&site.url, URL_WIDTH),
            site.category,
            name = NAME_WIDTH,
            url = URL_WIDTH
        ));
    }

    out.push_str(&format!("\n📋 Total: {}", sites.len()));
    out
}

// Shortens to `width` characters, ending in "..." when something was cut.
// Counts chars, not bytes, so non-ASCII names never split mid-character.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}
