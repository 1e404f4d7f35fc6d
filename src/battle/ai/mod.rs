//! Bot movement planning for a single unit's turn
//!
//! Pipeline: candidate paths -> validator -> per-path DecisionContext ->
//! considerations -> utility aggregator (or the closed-form rank) ->
//! ranked output. Game state is read-only throughout.

pub mod behavior;
pub mod considerations;
pub mod decision_context;
pub mod firepower;
pub mod legacy;
pub mod path_ranker;
pub mod path_validator;
pub mod registry;
pub mod risk;
pub mod session;
pub mod spatial;
pub mod utility;

pub use behavior::{load_profile, BehaviorSettings, BotProfile, Verbosity};
pub use considerations::{Consideration, ParamValue, Parameters};
pub use decision_context::{DecisionContext, TurnView};
pub use path_ranker::{best_path, filter_above, PathRanker, RankedPath, Ranking, RankingStrategy};
pub use path_validator::{filter_paths, validate_path, RejectionReason, ValidatedPaths, ValidationContext};
pub use registry::ConsiderationRegistry;
pub use risk::path_success_probability;
pub use session::{CancellationToken, PlanningProgress, PlanningSession, ProgressSink, TracingProgress};
pub use utility::{AggregationMode, ConsiderationConfig, ResponseCurve, UtilityAggregator, UtilityConfig};
