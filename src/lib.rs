//! Hex Tactics AI - bot movement planning for hex-grid tactical combat

pub mod battle;
pub mod core;
