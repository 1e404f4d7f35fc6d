//! Planning session: everything a ranking pass needs besides the battle
//!
//! Passed explicitly to the ranker instead of living in global state.

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::battle::ai::behavior::{BehaviorSettings, BotProfile};
use crate::battle::ai::registry::ConsiderationRegistry;
use crate::battle::ai::utility::UtilityAggregator;
use crate::battle::maneuver::{SkillCheckTable, TwoD6Table};
use crate::core::config::PlannerConfig;
use crate::core::error::Result;

/// Shared flag asking a ranking pass to stop early
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// A progress report from a ranking pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanningProgress {
    pub completed: usize,
    pub total: usize,
    /// `completed * 100 / total`
    pub percent: u32,
}

impl PlanningProgress {
    pub fn new(completed: usize, total: usize) -> Self {
        let percent = if total == 0 {
            100
        } else {
            (completed * 100 / total) as u32
        };
        Self {
            completed,
            total,
            percent,
        }
    }
}

/// Receives progress reports; purely observational
pub trait ProgressSink: Send + Sync {
    fn report(&self, progress: PlanningProgress);
}

/// Logs progress through tracing
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn report(&self, progress: PlanningProgress) {
        tracing::info!(
            "Planning {}% ({}/{} paths)",
            progress.percent,
            progress.completed,
            progress.total
        );
    }
}

/// Settings and collaborators for one bot's planning
#[derive(Clone)]
pub struct PlanningSession {
    pub behavior: BehaviorSettings,
    pub config: PlannerConfig,
    pub table: Arc<dyn SkillCheckTable>,
    pub seed: u64,
    /// Utility scoring; None selects the closed-form ranking
    pub utility: Option<Arc<UtilityAggregator>>,
    pub cancel: CancellationToken,
    pub deadline: Option<Instant>,
    pub progress: Option<Arc<dyn ProgressSink>>,
}

impl fmt::Debug for PlanningSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanningSession")
            .field("behavior", &self.behavior)
            .field("config", &self.config)
            .field("seed", &self.seed)
            .field("utility", &self.utility.is_some())
            .field("deadline", &self.deadline)
            .finish()
    }
}

impl PlanningSession {
    /// Session with default behavior and the 2d6 table
    pub fn new(behavior: BehaviorSettings, config: PlannerConfig) -> Self {
        let seed = config.default_seed;
        Self {
            behavior,
            config,
            table: Arc::new(TwoD6Table),
            seed,
            utility: None,
            cancel: CancellationToken::new(),
            deadline: None,
            progress: None,
        }
    }

    /// Session for a bot profile, building its utility setup if it has one
    pub fn from_profile(
        profile: &BotProfile,
        config: PlannerConfig,
        registry: &ConsiderationRegistry,
    ) -> Result<Self> {
        let mut session = Self::new(profile.behavior.clone(), config);
        if let Some(utility) = &profile.utility {
            session.utility = Some(Arc::new(UtilityAggregator::from_config(utility, registry)?));
        }
        Ok(session)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_table(mut self, table: Arc<dyn SkillCheckTable>) -> Self {
        self.table = table;
        self
    }

    pub fn with_utility(mut self, utility: UtilityAggregator) -> Self {
        self.utility = Some(Arc::new(utility));
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = Some(sink);
        self
    }

    /// Cancelled explicitly or past the deadline
    pub fn should_stop(&self) -> bool {
        self.cancel.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    pub(crate) fn report(&self, progress: PlanningProgress) {
        if let Some(sink) = &self.progress {
            sink.report(progress);
        }
    }
}

impl Default for PlanningSession {
    fn default() -> Self {
        Self::new(BehaviorSettings::default(), PlannerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_cancellation_shared_between_clones() {
        let token = CancellationToken::new();
        let session = PlanningSession::default().with_cancellation(token.clone());
        assert!(!session.should_stop());
        token.cancel();
        assert!(session.should_stop());
    }

    #[test]
    fn test_deadline_in_past_stops() {
        let session = PlanningSession::default().with_deadline(Instant::now() - Duration::from_millis(1));
        assert!(session.should_stop());
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(PlanningProgress::new(1, 3).percent, 33);
        assert_eq!(PlanningProgress::new(3, 3).percent, 100);
        assert_eq!(PlanningProgress::new(0, 0).percent, 100);
    }

    #[test]
    fn test_session_uses_config_seed() {
        let config = PlannerConfig {
            default_seed: 7,
            ..PlannerConfig::default()
        };
        let session = PlanningSession::new(BehaviorSettings::default(), config);
        assert_eq!(session.seed, 7);
        assert_eq!(session.with_seed(9).seed, 9);
    }

    #[test]
    fn test_from_profile_builds_utility() {
        let profile = crate::battle::ai::behavior::BotProfile {
            utility: Some(crate::battle::ai::utility::UtilityConfig {
                mode: Default::default(),
                considerations: vec![crate::battle::ai::utility::ConsiderationConfig::new(
                    "my_unit_armor",
                    1.0,
                )],
            }),
            ..Default::default()
        };
        let session = PlanningSession::from_profile(
            &profile,
            PlannerConfig::default(),
            &ConsiderationRegistry::with_builtins(),
        )
        .unwrap();
        assert!(session.utility.is_some());
    }
}
