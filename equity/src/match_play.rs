//! Cubeless match equity
//!
//! The expected match-winning chance is the probability-weighted MWC over the
//! six ways the game can end, each result scaled by the cube. It is then
//! mapped linearly onto [-1, +1] using the MWC of a plain 1-point win and
//! 1-point loss from the same score. The normalization ignores the cube so
//! equities at different cube levels share one scale.

use gammon_met::MatchEquityTable;

use crate::context::MatchContext;
use crate::probabilities::{GammonConvention, OutcomeMasses, OutcomeProbabilities};

/// Probability-weighted MWC across all game results
pub fn expected_mwc(masses: &OutcomeMasses, ctx: &MatchContext, met: &MatchEquityTable) -> f64 {
    let cube = ctx.cube();
    masses
        .outcomes()
        .iter()
        .map(|&(mass, multiplier, player_won)| {
            mass * ctx.mwc_after(met, multiplier.saturating_mul(cube), player_won)
        })
        .sum()
}

/// Map an MWC onto [-1, +1] between a 1-point loss and a 1-point win.
///
/// Returns 0.0 when the two anchors coincide.
pub fn normalize_mwc(mwc: f64, mwc_win: f64, mwc_loss: f64) -> f64 {
    let span = mwc_win - mwc_loss;
    if span == 0.0 {
        return 0.0;
    }
    (mwc - mwc_loss) / span * 2.0 - 1.0
}

/// Normalized cubeless match equity for a position
pub fn match_cubeless_equity(
    probs: &OutcomeProbabilities,
    ctx: &MatchContext,
    convention: GammonConvention,
    met: &MatchEquityTable,
) -> f64 {
    let mwc = expected_mwc(&probs.masses(convention), ctx, met);
    let mwc_win = ctx.mwc_after(met, 1, true);
    let mwc_loss = ctx.mwc_after(met, 1, false);
    normalize_mwc(mwc, mwc_win, mwc_loss)
}
