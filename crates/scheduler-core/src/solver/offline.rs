//! `OfflineSolver` — best-first branch-and-bound over the full horizon.

use std::time::{Duration, Instant};

use tracing::{debug, info, trace};

use crate::error::Result;
use crate::job::Job;
use crate::objective::Objective;
use crate::schedule::Schedule;

/// Search limits for [`OfflineSolver`]. Both are soft: exceeding either
/// returns the best schedule found so far rather than erroring
/// (`spec.md` §5).
#[derive(Debug, Clone, Default)]
pub struct OfflineSearchConfig {
    /// Stop expanding once this many nodes have been popped from the
    /// frontier. `None` means unbounded.
    pub node_limit: Option<u64>,
    /// Stop expanding once this much wall-clock time has elapsed since
    /// [`OfflineSolver::solve`] was called. `None` means unbounded.
    pub deadline: Option<Duration>,
}

/// The result of an offline search.
#[derive(Debug, Clone)]
pub struct OfflineSolution {
    pub schedule: Schedule,
    pub objective: Objective,
    /// `false` if the search stopped early due to `node_limit` or
    /// `deadline` rather than proving optimality.
    pub proved_optimal: bool,
}

/// Exact (when unbounded) branch-and-bound solver for the offline problem.
///
/// Maintains a frontier of candidate [`Schedule`]s, repeatedly pruning
/// dominated candidates and expanding the most promising one, per
/// `spec.md` §4.6.
pub struct OfflineSolver {
    config: OfflineSearchConfig,
}

struct FrontierNode {
    schedule: Schedule,
    /// Insertion order, used as the deterministic tie-break.
    id: u64,
}

impl OfflineSolver {
    pub fn new(config: OfflineSearchConfig) -> Self {
        OfflineSolver { config }
    }

    /// Runs the search to completion (or until the configured budget is
    /// exhausted) and returns the best schedule found.
    pub fn solve(&self, jobs: Vec<Job>, total_slots: u64) -> Result<OfflineSolution> {
        let start = Instant::now();
        let deadline = self.config.deadline.map(|d| start + d);

        let mut next_id = 0u64;
        let mut frontier: Vec<FrontierNode> = Vec::new();

        let mut root = Schedule::new(jobs, total_slots)?;
        root.lower_bound();
        root.upper_bound()?;
        frontier.push(FrontierNode { schedule: root, id: next_id });
        next_id += 1;

        let mut best_known: (Objective, Option<Schedule>) = (Objective::MIN, None);
        let mut nodes_expanded = 0u64;
        let mut proved_optimal = true;

        loop {
            frontier.retain(|n| {
                n.schedule
                    .cached_upper_bound()
                    .expect("upper bound cached at insertion")
                    > best_known.0
            });
            if frontier.is_empty() {
                break;
            }

            let select_idx = frontier
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| {
                    let a_key = (
                        a.schedule.cached_lower_bound().expect("cached"),
                        a.schedule.cached_upper_bound().expect("cached"),
                    );
                    let b_key = (
                        b.schedule.cached_lower_bound().expect("cached"),
                        b.schedule.cached_upper_bound().expect("cached"),
                    );
                    a_key.cmp(&b_key).then_with(|| b.id.cmp(&a.id))
                })
                .map(|(i, _)| i)
                .expect("frontier is non-empty");

            let node = frontier.swap_remove(select_idx);
            let score = node.schedule.score();
            if score > best_known.0 {
                trace!(node_id = node.id, objective = %score, "new incumbent");
                best_known = (score, Some(node.schedule.clone()));
            }
            nodes_expanded += 1;

            let budget_exhausted = deadline.is_some_and(|d| Instant::now() >= d)
                || self.config.node_limit.is_some_and(|limit| nodes_expanded >= limit);
            if budget_exhausted {
                debug!(nodes_expanded, "search budget exhausted before optimality was proven");
                proved_optimal = false;
                break;
            }

            if !node.schedule.is_terminal() {
                for child in node.schedule.expand() {
                    let mut child = child;
                    child.lower_bound();
                    child.upper_bound()?;
                    frontier.push(FrontierNode { schedule: child, id: next_id });
                    next_id += 1;
                }
            }

            if frontier
                .iter()
                .all(|n| n.schedule.cached_upper_bound().expect("cached") <= best_known.0)
            {
                break;
            }
        }

        info!(
            nodes_expanded,
            objective = %best_known.0,
            proved_optimal,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "offline search finished"
        );

        let schedule = best_known
            .1
            .expect("the root node is always scored before the loop can exit");
        Ok(OfflineSolution { schedule, objective: best_known.0, proved_optimal })
    }
}
