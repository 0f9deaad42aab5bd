// src/assistant/chat.rs
// =============================================================================
// The scripted "chat" front end.
//
// It is keyword matching, not language understanding: a message that mentions
// watching or checking something kicks off a probe cycle, everything else gets
// a hint. Replies are plain text so they work in any terminal.
// =============================================================================

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::{JoinError, JoinHandle};
use tracing::debug;

use super::cycle::{spawn_cycle, CycleOutcome};
use crate::prober::Prober;
use crate::repository::{RepoError, SiteRepository};

pub const GREETING: &str = "Hello! I can check your site list and recommend active ones. \
                            Try asking 'Recommend a movie site'.";
pub const SCANNING: &str = "Scanning repository for fastest mirrors... 🔍";
pub const HINT: &str =
    "I can help you check site availability. Try asking 'Recommend a site to watch a movie'.";
pub const EMPTY_LIST: &str = "Your list is empty. Add sites with the 'add' command.";
pub const ALL_DOWN: &str = "❌ All sites in your list appear to be down.";
pub const BUSY: &str = "Still scanning, hang on... ⏳";

// Any of these in a message means "go probe"
const TRIGGER_WORDS: [&str; 5] = ["movie", "series", "watch", "check", "recommend"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Recommend,
    Quit,
    Blank,
    Unknown,
}

pub fn classify(message: &str) -> Intent {
    let lower = message.trim().to_lowercase();

    if lower.is_empty() {
        Intent::Blank
    } else if lower == "exit" || lower == "quit" {
        Intent::Quit
    } else if TRIGGER_WORDS.iter().any(|word| lower.contains(word)) {
        Intent::Recommend
    } else {
        Intent::Unknown
    }
}

/// Renders a finished cycle as the reply text.
///
/// Each pick becomes "{rank}. {name}\n   {latency}ms | {url}".
pub fn render_outcome(outcome: &CycleOutcome) -> String {
    match outcome {
        CycleOutcome::EmptyList => EMPTY_LIST.to_string(),
        CycleOutcome::AllDown { .. } => ALL_DOWN.to_string(),
        CycleOutcome::Ranked { picks, .. } => {
            let lines: Vec<String> = picks
                .iter()
                .enumerate()
                .map(|(i, pick)| {
                    format!("{}. {}\n   {}ms | {}", i + 1, pick.name, pick.latency_ms, pick.url)
                })
                .collect();

            format!(
                "✅ Here are the top {} active sites:\n\n{}",
                picks.len(),
                lines.join("\n\n")
            )
        }
    }
}

/// Shared state the chat loop needs for a probe cycle.
pub struct ChatSession {
    pub repo: SiteRepository,
    pub prober: Prober,
    pub top_n: usize,
}

type PendingCycle = JoinHandle<Result<CycleOutcome, RepoError>>;

// What woke the loop up
enum Event {
    Line(std::io::Result<Option<String>>),
    Finished(std::result::Result<Result<CycleOutcome, RepoError>, JoinError>),
}

impl ChatSession {
    /// Reads messages line by line until EOF or "quit", answering each one.
    ///
    /// A cycle runs in the background; the loop keeps answering messages
    /// and prints the recommendation as soon as the cycle is done.
    pub async fn run<R, W>(&self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        say(&mut output, GREETING).await?;

        let mut lines = input.lines();
        let mut pending: Option<PendingCycle> = None;

        loop {
            output.write_all(b"> ").await?;
            output.flush().await?;

            // next_line() is cancel safe, so losing the race drops no input
            let event = match pending.as_mut() {
                Some(handle) => tokio::select! {
                    joined = handle => Event::Finished(joined),
                    line = lines.next_line() => Event::Line(line),
                },
                None => Event::Line(lines.next_line().await),
            };

            let message = match event {
                Event::Finished(joined) => {
                    pending = None;
                    let outcome = joined.context("probe task failed")??;
                    say(&mut output, &render_outcome(&outcome)).await?;
                    continue;
                }
                Event::Line(line) => line.context("failed to read input")?,
            };

            // EOF behaves like "quit"
            let intent = message.as_deref().map_or(Intent::Quit, classify);
            debug!(?intent, "chat message");

            match intent {
                Intent::Blank => continue,
                Intent::Quit => break,
                Intent::Unknown => say(&mut output, HINT).await?,
                Intent::Recommend if pending.is_some() => say(&mut output, BUSY).await?,
                Intent::Recommend => {
                    say(&mut output, SCANNING).await?;
                    pending = Some(spawn_cycle(
                        self.repo.clone(),
                        self.prober.clone(),
                        self.top_n,
                    ));
                }
            }
        }

        // Don't leave without the answer that was asked for
        if let Some(handle) = pending {
            let outcome = handle.await.context("probe task failed")??;
            say(&mut output, &render_outcome(&outcome)).await?;
        }

        say(&mut output, "Bye!").await?;
        Ok(())
    }
}

async fn say<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n\n").await?;
    output.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prober::{FailureReason, Outcome, ProbeResult};
    use crate::ranker::Recommendation;
    use crate::repository::SiteRecord;
    use std::time::Duration;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_classify_triggers() {
        assert_eq!(classify("Recommend a movie site"), Intent::Recommend);
        assert_eq!(classify("what SERIES can I watch?"), Intent::Recommend);
        assert_eq!(classify("check status"), Intent::Recommend);
        assert_eq!(classify("hello there"), Intent::Unknown);
        assert_eq!(classify("   "), Intent::Blank);
        assert_eq!(classify(" Quit "), Intent::Quit);
        assert_eq!(classify("exit"), Intent::Quit);
    }

    #[test]
    fn test_render_ranked() {
        let outcome = CycleOutcome::Ranked {
            results: Vec::new(),
            picks: vec![
                Recommendation {
                    name: "Archive".to_string(),
                    latency_ms: 20,
                    url: "archive.org".to_string(),
                },
                Recommendation {
                    name: "Example".to_string(),
                    latency_ms: 50,
                    url: "https://example.com".to_string(),
                },
            ],
        };

        assert_eq!(
            render_outcome(&outcome),
            "✅ Here are the top 2 active sites:\n\n\
             1. Archive\n   20ms | archive.org\n\n\
             2. Example\n   50ms | https://example.com"
        );
    }

    #[test]
    fn test_render_empty_states_differ() {
        let down = CycleOutcome::AllDown {
            results: vec![ProbeResult {
                site: SiteRecord {
                    id: 1,
                    name: "Gone".to_string(),
                    url: "gone.example".to_string(),
                    category: String::new(),
                },
                outcome: Outcome::Unreachable {
                    reason: FailureReason::DnsError,
                },
            }],
        };

        assert_eq!(render_outcome(&CycleOutcome::EmptyList), EMPTY_LIST);
        assert_eq!(render_outcome(&down), ALL_DOWN);
    }

    #[tokio::test]
    async fn test_session_transcript() {
        let session = ChatSession {
            repo: SiteRepository::memory().unwrap(),
            prober: Prober::new(Duration::from_millis(500), 2).unwrap(),
            top_n: 3,
        };

        let input: &[u8] = b"hi\n\nrecommend a movie\nquit\nnever read\n";
        let mut output: Vec<u8> = Vec::new();
        session.run(input, &mut output).await.unwrap();

        let transcript = String::from_utf8(output).unwrap();
        assert!(transcript.starts_with(GREETING));
        assert!(transcript.contains(HINT));
        assert!(transcript.contains(SCANNING));
        assert!(transcript.contains(EMPTY_LIST));
        assert!(transcript.trim_end().ends_with("Bye!"));
        // Hint comes before the scan, scan before the answer
        let hint = transcript.find(HINT).unwrap();
        let scan = transcript.find(SCANNING).unwrap();
        let answer = transcript.find(EMPTY_LIST).unwrap();
        assert!(hint < scan && scan < answer);
    }

    #[tokio::test]
    async fn test_session_answers_while_cycle_runs() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
            .mount(&server)
            .await;

        let repo = SiteRepository::memory().unwrap();
        repo.insert("Slowpoke", &server.uri(), "Movies").unwrap();
        let session = ChatSession {
            repo,
            prober: Prober::new(Duration::from_millis(2000), 2).unwrap(),
            top_n: 3,
        };

        let input: &[u8] = b"recommend\nhello\ncheck again\nquit\n";
        let mut output: Vec<u8> = Vec::new();
        session.run(input, &mut output).await.unwrap();

        let transcript = String::from_utf8(output).unwrap();
        let scan = transcript.find(SCANNING).unwrap();
        let hint = transcript.find(HINT).unwrap();
        let busy = transcript.find(BUSY).unwrap();
        let answer = transcript.find("✅ Here are the top 1 active sites:").unwrap();

        // The slow cycle did not hold up the replies to later messages
        assert!(scan < hint && hint < busy && busy < answer);
        assert!(transcript.contains("1. Slowpoke"));
        assert_eq!(transcript.matches(SCANNING).count(), 1);
        assert!(transcript.trim_end().ends_with("Bye!"));
    }
}
