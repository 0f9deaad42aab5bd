// src/ranker.rs
// =============================================================================
// Picks the fastest reachable sites out of a probe cycle.
//
// Three steps, no I/O:
// 1. Drop every Unreachable result
// 2. Stable sort by latency, lowest first (equal latencies keep input order)
// 3. Keep the first N
// =============================================================================

use serde::Serialize;

use crate::prober::ProbeResult;

pub const DEFAULT_TOP_N: usize = 3;

/// One line of the recommendation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub name: String,
    pub latency_ms: u64,
    /// The URL as the user saved it, not the normalized probe target
    pub url: String,
}

/// Returns at most `top_n` reachable sites, best first.
pub fn rank(results: &[ProbeResult], top_n: usize) -> Vec<Recommendation> {
    let mut reachable: Vec<Recommendation> = results
        .iter()
        .filter_map(|result| {
            result.latency_ms().map(|latency_ms| Recommendation {
                name: result.site.name.clone(),
                latency_ms,
                url: result.site.url.clone(),
            })
        })
        .collect();

    // sort_by_key is stable, which is what keeps ties deterministic
    reachable.sort_by_key(|rec| rec.latency_ms);
    reachable.truncate(top_n);
    reachable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prober::{FailureReason, Outcome};
    use crate::repository::SiteRecord;

    fn up(id: i64, name: &str, latency_ms: u64) -> ProbeResult {
        ProbeResult {
            site: SiteRecord {
                id,
                name: name.to_string(),
                url: format!("{}.example", name.to_lowercase()),
                category: "Movies".to_string(),
            },
            outcome: Outcome::Reachable { latency_ms },
        }
    }

    fn down(id: i64, name: &str) -> ProbeResult {
        ProbeResult {
            site: SiteRecord {
                id,
                name: name.to_string(),
                url: format!("{}.example", name.to_lowercase()),
                category: "Movies".to_string(),
            },
            outcome: Outcome::Unreachable {
                reason: FailureReason::Timeout,
            },
        }
    }

    fn names(recs: &[Recommendation]) -> Vec<&str> {
        recs.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_filters_and_sorts() {
        let input = vec![up(1, "A", 50), down(2, "B"), up(3, "C", 20)];
        let ranked = rank(&input, 3);

        assert_eq!(
            ranked,
            vec![
                Recommendation {
                    name: "C".to_string(),
                    latency_ms: 20,
                    url: "c.example".to_string(),
                },
                Recommendation {
                    name: "A".to_string(),
                    latency_ms: 50,
                    url: "a.example".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(rank(&[], 3).is_empty());
    }

    #[test]
    fn test_all_unreachable() {
        let input = vec![down(1, "A"), down(2, "B")];
        assert!(rank(&input, 3).is_empty());
    }

    #[test]
    fn test_truncates_to_top_n() {
        let input = vec![
            up(1, "A", 90),
            up(2, "B", 10),
            up(3, "C", 70),
            up(4, "D", 30),
            up(5, "E", 50),
        ];
        let ranked = rank(&input, 3);

        assert_eq!(names(&ranked), vec!["B", "D", "E"]);
        let latencies: Vec<u64> = ranked.iter().map(|r| r.latency_ms).collect();
        assert_eq!(latencies, vec![10, 30, 50]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let input = vec![up(1, "First", 40), up(2, "Second", 40), up(3, "Fast", 5)];
        assert_eq!(names(&rank(&input, 3)), vec!["Fast", "First", "Second"]);

        let swapped = vec![up(2, "Second", 40), up(1, "First", 40), up(3, "Fast", 5)];
        assert_eq!(names(&rank(&swapped, 3)), vec!["Fast", "Second", "First"]);
    }

    #[test]
    fn test_fewer_than_n_reachable() {
        let input = vec![down(1, "A"), up(2, "B", 15)];
        assert_eq!(names(&rank(&input, 3)), vec!["B"]);
    }

    #[test]
    fn test_zero_n_returns_nothing() {
        let input = vec![up(1, "A", 15)];
        assert!(rank(&input, 0).is_empty());
    }

    // Checks the general properties over a handful of mixed inputs
    #[test]
    fn test_properties_hold() {
        let inputs = vec![
            vec![],
            vec![down(1, "A")],
            vec![up(1, "A", 3), up(2, "B", 3), down(3, "C"), up(4, "D", 1)],
            vec![up(1, "A", 100), down(2, "B"), up(3, "C", 0), up(4, "D", 7), up(5, "E", 7)],
        ];

        for input in &inputs {
            for n in 0..5 {
                let ranked = rank(input, n);
                let reachable = input.iter().filter(|r| r.is_reachable()).count();

                assert!(ranked.len() <= n.min(reachable));
                assert!(ranked.windows(2).all(|w| w[0].latency_ms <= w[1].latency_ms));
                for rec in &ranked {
                    assert!(input
                        .iter()
                        .any(|r| r.is_reachable() && r.site.name == rec.name));
                }
                // Same input, same output
                assert_eq!(ranked, rank(input, n));
            }
        }
    }
}
