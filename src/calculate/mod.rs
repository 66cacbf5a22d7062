//! Statistics calculation engine.
//!
//! - `aggregate`: concurrent fetch of every player's history, folded into
//!   per-roster, per-map win/loss tallies
//! - `ranking`: per-map win rates and the differential ranking of maps

pub mod aggregate;
pub mod ranking;

pub use aggregate::{calculate_winloss, fold_winloss};
pub use ranking::{rank_maps, win_rates};

/// Calculate win rate from wins/losses.
///
/// A map with no recorded matches has a win rate of 0.0.
pub fn calculate_win_rate(wins: u32, losses: u32) -> f64 {
    let total = wins + losses;
    if total == 0 {
        0.0
    } else {
        wins as f64 / total as f64
    }
}

/// Round half away from zero to `decimals` places.
///
/// Negative zero is normalized to positive zero.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor + 0.0
}
