//! Cubeless money equity
//!
//! Closed form, no table. Percentages are converted to decimals first.

use crate::probabilities::{GammonConvention, OutcomeProbabilities};

/// Cubeless money-play equity for a position.
///
/// - cumulative: `(W - L) + (Wg - Lg) + (Wbg - Lbg)`
/// - exclusive: `2W - 1 + 2(Wg - Lg) + 3(Wbg - Lbg)`
pub fn money_cubeless_equity(probs: &OutcomeProbabilities, convention: GammonConvention) -> f64 {
    let w = probs.win / 100.0;
    let wg = probs.win_gammon / 100.0;
    let wbg = probs.win_backgammon / 100.0;
    let l = probs.lose / 100.0;
    let lg = probs.lose_gammon / 100.0;
    let lbg = probs.lose_backgammon / 100.0;

    match convention {
        GammonConvention::Cumulative => (w - l) + (wg - lg) + (wbg - lbg),
        GammonConvention::Exclusive => 2.0 * w - 1.0 + 2.0 * (wg - lg) + 3.0 * (wbg - lbg),
    }
}
