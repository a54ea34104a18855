//! gammon Equity - Cubeless match and money equity
//!
//! Converts win/gammon/backgammon percentages into a single equity value.
//! Match play goes through a [`MatchEquityTable`](gammon_met::MatchEquityTable)
//! and is normalized to ±1 per point at the current score; money play is a
//! closed-form sum.
//!
//! The crate holds no global state. Callers own the table (usually via a
//! [`MetStore`](gammon_met::MetStore)) and pass it in.

pub mod calculator;
pub mod context;
pub mod match_play;
pub mod money;
pub mod probabilities;

pub use calculator::{EquityCalculator, Position};
pub use context::MatchContext;
pub use match_play::{expected_mwc, match_cubeless_equity, normalize_mwc};
pub use money::money_cubeless_equity;
pub use probabilities::{GammonConvention, OutcomeMasses, OutcomeProbabilities};
