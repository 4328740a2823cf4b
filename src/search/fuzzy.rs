use rayon::prelude::*;

use crate::core::config::FuzzyConfig;
use crate::core::utils::similarity;
use crate::search::results::ScoredDocument;

/// A candidate entity reduced to what fuzzy matching needs: its name and
/// its observation texts.
#[derive(Debug, Clone)]
pub struct FuzzyCandidate<'a> {
    pub name: &'a str,
    pub observations: &'a [String],
}

/// Whole-string similarity fuzzy search (spec §4.8). For each candidate,
/// `similarity(query, name)` is checked first; only if that misses does
/// the search fall through to observations, taking the first one that
/// clears the threshold.
pub struct FuzzySearcher {
    config: FuzzyConfig,
    pool: rayon::ThreadPool,
}

impl FuzzySearcher {
    /// A dedicated pool (sized to the host's core count) rather than
    /// rayon's global pool, so offloading a search never contends with
    /// an embedding host process's own rayon usage.
    pub fn new(config: FuzzyConfig) -> Self {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_cpus::get())
            .build()
            .expect("failed to build fuzzy worker pool");
        FuzzySearcher { config, pool }
    }

    fn best_match(&self, query_lower: &str, candidate: &FuzzyCandidate) -> Option<f32> {
        let name_lower = candidate.name.to_lowercase();
        let name_sim = similarity(query_lower, &name_lower);
        if name_sim >= self.config.threshold {
            return Some(name_sim);
        }
        candidate.observations.iter().find_map(|obs| {
            let sim = similarity(query_lower, &obs.to_lowercase());
            (sim >= self.config.threshold).then_some(sim)
        })
    }

    /// Runs the search, offloading to a rayon worker pool when the
    /// candidate set exceeds `worker_threshold` (default 500).
    pub fn search(&self, query: &str, candidates: &[FuzzyCandidate]) -> Vec<ScoredDocument> {
        let query_lower = query.to_lowercase();

        let mut matches: Vec<ScoredDocument> = if candidates.len() > self.config.worker_threshold {
            self.pool.install(|| {
                candidates
                    .par_iter()
                    .filter_map(|c| {
                        self.best_match(&query_lower, c)
                            .map(|score| ScoredDocument { name: c.name.to_string(), score, explanation: None })
                    })
                    .collect()
            })
        } else {
            candidates
                .iter()
                .filter_map(|c| {
                    self.best_match(&query_lower, c)
                        .map(|score| ScoredDocument { name: c.name.to_string(), score, explanation: None })
                })
                .collect()
        };

        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        matches
    }

    /// "Did you mean?" mode: top-K candidates with `0.5 < sim < 1.0`
    /// (excludes exact matches).
    pub fn suggest(&self, query: &str, candidates: &[FuzzyCandidate], top_k: usize) -> Vec<ScoredDocument> {
        let query_lower = query.to_lowercase();
        let mut matches: Vec<ScoredDocument> = candidates
            .iter()
            .filter_map(|c| {
                let sim = similarity(&query_lower, &c.name.to_lowercase());
                (sim > 0.5 && sim < 1.0).then_some(ScoredDocument {
                    name: c.name.to_string(),
                    score: sim,
                    explanation: None,
                })
            })
            .collect();
        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        matches.truncate(top_k);
        matches
    }
}
