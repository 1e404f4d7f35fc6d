//! Path ranking: validate, score, and order a unit's candidate paths
//!
//! Small candidate sets are scored in order on the calling thread with
//! progress reports. Large sets are scored on rayon's pool and collected
//! back in input order, so the final stable sort gives the same answer
//! either way.

use ordered_float::OrderedFloat;
use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Reverse;
use std::sync::Arc;

use crate::battle::ai::behavior::Verbosity;
use crate::battle::ai::decision_context::{DecisionContext, TurnView};
use crate::battle::ai::legacy::{legacy_breakdown, legacy_rank};
use crate::battle::ai::path_validator::{filter_paths, RejectionReason, ValidationContext};
use crate::battle::ai::session::{PlanningProgress, PlanningSession};
use crate::battle::ai::utility::UtilityAggregator;
use crate::battle::constants::IMPOSSIBLE_RANK;
use crate::battle::movement::MovePath;
use crate::battle::units::Battlefield;
use crate::core::error::{PlannerError, Result};
use crate::core::types::UnitId;

/// A scored path
#[derive(Debug, Clone, Serialize)]
pub struct RankedPath {
    pub path: MovePath,
    /// Always finite; `IMPOSSIBLE_RANK` for paths that cannot be executed
    pub rank: f64,
    /// Position of the path in the candidate list
    pub index: usize,
}

impl RankedPath {
    pub fn is_possible(&self) -> bool {
        self.rank > IMPOSSIBLE_RANK
    }
}

/// Output of one ranking pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct Ranking {
    /// Best first; ties keep candidate order
    pub ranked: Vec<RankedPath>,
    /// Stopped early by cancellation or deadline
    pub cancelled: bool,
    pub evaluated: usize,
    #[serde(skip)]
    pub rejected: Vec<(usize, RejectionReason)>,
    /// Validation rejected everything and the full set was ranked
    pub fell_back: bool,
}

/// How surviving paths are scored
#[derive(Debug, Clone)]
pub enum RankingStrategy {
    Utility(Arc<UtilityAggregator>),
    /// Closed-form formula driven by behavior settings
    Legacy,
}

/// Ranks candidate paths for one unit
#[derive(Debug, Clone)]
pub struct PathRanker {
    strategy: RankingStrategy,
}

impl PathRanker {
    pub fn new(strategy: RankingStrategy) -> Self {
        Self { strategy }
    }

    /// Utility scoring when the session carries an aggregator, otherwise legacy
    pub fn for_session(session: &PlanningSession) -> Self {
        match &session.utility {
            Some(utility) => Self::new(RankingStrategy::Utility(utility.clone())),
            None => Self::new(RankingStrategy::Legacy),
        }
    }

    pub fn strategy(&self) -> &RankingStrategy {
        &self.strategy
    }

    /// Validate, score and order `paths` for the unit `unit_id`
    ///
    /// Fails only when there is nothing to rank. A unit missing from the
    /// battlefield, or a path belonging to another unit, ranks as
    /// `IMPOSSIBLE_RANK`.
    pub fn rank_paths(
        &self,
        unit_id: UnitId,
        paths: &[MovePath],
        battlefield: &Battlefield,
        session: &PlanningSession,
    ) -> Result<Ranking> {
        if paths.is_empty() {
            return Err(PlannerError::NoCandidatePaths(unit_id));
        }

        let Some(unit) = battlefield.find_unit(unit_id) else {
            tracing::warn!("Unit {:?} not on the battlefield, all paths impossible", unit_id);
            let mut ranking = Ranking {
                ranked: paths
                    .iter()
                    .enumerate()
                    .map(|(index, path)| RankedPath {
                        path: path.clone(),
                        rank: IMPOSSIBLE_RANK,
                        index,
                    })
                    .collect(),
                evaluated: paths.len(),
                ..Ranking::default()
            };
            sort_ranked(&mut ranking.ranked);
            return Ok(ranking);
        };

        let enemies = battlefield.enemies_of(unit);
        let friends = battlefield.friends_of(unit);

        let validation = ValidationContext::new(
            unit,
            &enemies,
            &battlefield.map,
            &session.behavior,
            &session.config,
            session.table.as_ref(),
        );
        let validated = filter_paths(paths, &validation);

        let view = TurnView::new(
            unit,
            enemies.clone(),
            friends,
            &battlefield.map,
            session.table.as_ref(),
            session.seed,
        );

        let survivors = &validated.survivors;
        let total = survivors.len();
        let parallel = total >= session.config.parallel_threshold;

        let mut scores: Vec<(usize, f64)> = Vec::with_capacity(total);
        let mut cancelled = false;

        if parallel {
            // First path always scored so a cancelled pass still has an answer
            let first = survivors[0];
            scores.push((first, self.score_path(&view, paths, first, unit_id, session)));

            let rest: Vec<Option<(usize, f64)>> = survivors[1..]
                .par_iter()
                .map(|&index| {
                    if session.should_stop() {
                        return None;
                    }
                    Some((index, self.score_path(&view, paths, index, unit_id, session)))
                })
                .collect();

            cancelled = rest.iter().any(Option::is_none);
            scores.extend(rest.into_iter().flatten());
            session.report(PlanningProgress::new(scores.len(), total));
        } else {
            let interval = session.config.progress_interval_percent.max(1);
            let mut next_report = interval;
            for (n, &index) in survivors.iter().enumerate() {
                if n > 0 && session.should_stop() {
                    cancelled = true;
                    break;
                }
                scores.push((index, self.score_path(&view, paths, index, unit_id, session)));

                let progress = PlanningProgress::new(n + 1, total);
                if progress.percent >= next_report {
                    session.report(progress);
                    next_report = (progress.percent / interval + 1) * interval;
                }
            }
        }

        if cancelled {
            tracing::warn!(
                "Ranking for {} cancelled after {}/{} paths",
                unit.name,
                scores.len(),
                total
            );
        }

        let mut ranked: Vec<RankedPath> = scores
            .into_iter()
            .map(|(index, rank)| RankedPath {
                path: paths[index].clone(),
                rank,
                index,
            })
            .collect();
        sort_ranked(&mut ranked);

        if let Some(best) = ranked.first() {
            tracing::info!(
                "Ranked {} of {} paths for {} (best {:.3}: {})",
                ranked.len(),
                paths.len(),
                unit.name,
                best.rank,
                best.path
            );
        }

        Ok(Ranking {
            evaluated: ranked.len(),
            ranked,
            cancelled,
            rejected: validated.rejected,
            fell_back: validated.fell_back,
        })
    }

    fn score_path(
        &self,
        view: &TurnView,
        paths: &[MovePath],
        index: usize,
        unit_id: UnitId,
        session: &PlanningSession,
    ) -> f64 {
        let path = &paths[index];
        if path.unit_id() != unit_id {
            tracing::warn!("Path {} belongs to another unit, ranking as impossible", index);
            return IMPOSSIBLE_RANK;
        }

        let ctx = DecisionContext::new(view, path, index);
        let debug = session.behavior.verbosity == Verbosity::Debug;
        let rank = match &self.strategy {
            RankingStrategy::Utility(aggregator) => {
                if debug {
                    for entry in aggregator.explain(&ctx) {
                        tracing::debug!(
                            "path {} {}: {:.3} -> {:.3} x{}",
                            index,
                            entry.name,
                            entry.score,
                            entry.curved,
                            entry.weight
                        );
                    }
                }
                aggregator.score(&ctx)
            }
            RankingStrategy::Legacy => {
                if debug {
                    tracing::debug!("path {} {:?}", index, legacy_breakdown(&ctx, &session.behavior));
                }
                legacy_rank(&ctx, &session.behavior)
            }
        };

        if !rank.is_finite() {
            tracing::warn!("Path {} scored {}, ranking as impossible", index, rank);
            return IMPOSSIBLE_RANK;
        }
        if session.behavior.verbosity != Verbosity::Quiet {
            tracing::debug!("path {} ({}) rank {:.4}", index, path, rank);
        }
        rank
    }
}

/// Descending by rank; stable, so ties keep candidate order
fn sort_ranked(ranked: &mut [RankedPath]) {
    ranked.sort_by_key(|r| Reverse(OrderedFloat(r.rank)));
}

/// Highest-ranked path that is actually executable
///
/// Expects ranked (descending) order, as produced by `rank_paths`.
pub fn best_path(ranked: &[RankedPath]) -> Option<&RankedPath> {
    ranked.iter().find(|r| r.is_possible())
}

/// Entries with rank at or above a threshold, order preserved
pub fn filter_above(ranked: &[RankedPath], threshold: f64) -> Vec<RankedPath> {
    ranked
        .iter()
        .filter(|r| r.rank >= threshold)
        .cloned()
        .collect()
}
