//! Headless turn planner
//!
//! Builds a small skirmish, enumerates paths for the first unit and
//! prints the top-ranked moves.

use clap::{Parser, ValueEnum};
use hex_tactics_ai::battle::ai::{
    best_path, load_profile, ConsiderationRegistry, PathRanker, PlanningSession, TracingProgress,
};
use hex_tactics_ai::battle::{
    enumerate_paths, BattleHexCoord, BattleMap, BattleTerrain, Battlefield, HexDirection,
    PlanningUnit, Structure, WeaponProfile,
};
use hex_tactics_ai::core::types::TeamId;
use hex_tactics_ai::core::PlannerConfig;
use serde::Serialize;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Headless turn planner - rank one unit's moves and print them
#[derive(Parser, Debug)]
#[command(name = "plan_turn")]
#[command(about = "Rank candidate moves for a bot unit in a demo skirmish")]
struct Args {
    /// Bot profile name (loaded from data/bot_profiles/)
    #[arg(long, default_value = "default")]
    profile: String,

    /// Map width in hexes
    #[arg(long, default_value_t = 16)]
    map_width: u32,

    /// Map height in hexes
    #[arg(long, default_value_t = 17)]
    map_height: u32,

    /// Random seed for reproducible choices
    #[arg(long)]
    seed: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Number of ranked paths to print
    #[arg(long, default_value_t = 5)]
    top: usize,

    /// Report progress while ranking
    #[arg(long)]
    progress: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct PlannedMove {
    rank: f64,
    index: usize,
    description: String,
    end_q: i32,
    end_r: i32,
}

#[derive(Serialize)]
struct PlanOutput {
    profile: String,
    seed: u64,
    candidates: usize,
    evaluated: usize,
    fell_back: bool,
    cancelled: bool,
    best: Option<PlannedMove>,
    top: Vec<PlannedMove>,
}

fn build_skirmish(width: u32, height: u32) -> Battlefield {
    let mut map = BattleMap::new(width, height);
    let mid_q = (width / 2) as i32;
    let mid_r = (height / 2) as i32;
    for r in 0..height as i32 {
        if r % 4 != 0 {
            map.set_terrain(BattleHexCoord::new(mid_q, r), BattleTerrain::LightWoods);
        }
    }
    map.set_terrain(BattleHexCoord::new(mid_q - 2, mid_r), BattleTerrain::Rubble);
    map.set_terrain(BattleHexCoord::new(mid_q - 1, mid_r + 1), BattleTerrain::Ice);
    map.set_structure(BattleHexCoord::new(mid_q + 1, mid_r - 1), Structure::new(40.0));

    let mut field = Battlefield::new(map);

    let mut hunter = PlanningUnit::new("Griffin", TeamId::new(1), BattleHexCoord::new(2, mid_r));
    hunter.movement.walk_mp = 5;
    hunter.movement.jump_mp = 5;
    hunter.weapons.push(WeaponProfile::new("PPC", 10.0, 6, 12, 18).with_min_range(3));
    hunter.weapons.push(WeaponProfile::new("LRM-10", 6.0, 7, 14, 21).with_min_range(6));
    field.add_unit(hunter);

    let mut wingman = PlanningUnit::new("Shadow Hawk", TeamId::new(1), BattleHexCoord::new(1, mid_r + 2));
    wingman.weapons.push(WeaponProfile::new("AC/5", 5.0, 6, 12, 18).with_min_range(3));
    field.add_unit(wingman);

    let mut brawler = PlanningUnit::new("Hunchback", TeamId::new(2), BattleHexCoord::new(width as i32 - 3, mid_r));
    brawler.facing = HexDirection::West;
    brawler.weapons.push(WeaponProfile::new("AC/20", 20.0, 3, 6, 9));
    brawler.armor_remaining = 60.0;
    field.add_unit(brawler);

    let mut sniper = PlanningUnit::new("Archer", TeamId::new(2), BattleHexCoord::new(width as i32 - 2, 2));
    sniper.facing = HexDirection::SouthWest;
    sniper.weapons.push(WeaponProfile::new("LRM-20", 12.0, 7, 14, 21).with_min_range(6));
    field.add_unit(sniper);

    field
}

fn main() -> hex_tactics_ai::core::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hex_tactics_ai=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = PlannerConfig::default();
    config
        .validate()
        .map_err(hex_tactics_ai::core::PlannerError::InvalidConfig)?;
    let seed = args.seed.unwrap_or(config.default_seed);

    let profile = load_profile(&args.profile)?;
    let registry = ConsiderationRegistry::with_builtins();
    let mut session = PlanningSession::from_profile(&profile, config, &registry)?.with_seed(seed);
    if args.progress {
        session = session.with_progress(Arc::new(TracingProgress));
    }

    let field = build_skirmish(args.map_width, args.map_height);
    let unit = &field.units[0];
    let paths = enumerate_paths(unit, &field.map);
    tracing::info!("{} candidate paths for {}", paths.len(), unit.name);

    let ranker = PathRanker::for_session(&session);
    let ranking = ranker.rank_paths(unit.id, &paths, &field, &session)?;

    let to_move = |r: &hex_tactics_ai::battle::ai::RankedPath| PlannedMove {
        rank: r.rank,
        index: r.index,
        description: r.path.to_string(),
        end_q: r.path.final_position().q,
        end_r: r.path.final_position().r,
    };

    let output = PlanOutput {
        profile: profile.name.clone(),
        seed,
        candidates: paths.len(),
        evaluated: ranking.evaluated,
        fell_back: ranking.fell_back,
        cancelled: ranking.cancelled,
        best: best_path(&ranking.ranked).map(to_move),
        top: ranking.ranked.iter().take(args.top).map(to_move).collect(),
    };

    if args.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("=== Turn Plan: {} (seed {}) ===", output.profile, output.seed);
        println!(
            "Candidates: {}  Evaluated: {}  Fell back: {}",
            output.candidates, output.evaluated, output.fell_back
        );
        for (n, m) in output.top.iter().enumerate() {
            println!("{:>2}. {:>10.4}  #{:<4} {}", n + 1, m.rank, m.index, m.description);
        }
        match &output.best {
            Some(best) => println!("Best: #{} -> ({}, {})", best.index, best.end_q, best.end_r),
            None => println!("Best: no executable move"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_accepts_known_values() {
        let args = Args::try_parse_from(["plan_turn", "--format", "json"]).unwrap();
        assert_eq!(args.format, OutputFormat::Json);
        let args = Args::try_parse_from(["plan_turn"]).unwrap();
        assert_eq!(args.format, OutputFormat::Text);
    }

    #[test]
    fn test_format_rejects_unknown_value() {
        assert!(Args::try_parse_from(["plan_turn", "--format", "yaml"]).is_err());
    }
}
