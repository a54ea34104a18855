//! Match equity table data model
//!
//! A table answers one question: given how many points each side still needs
//! ("away" scores), what is the player's chance of winning the match?
//!
//! Two grids are stored:
//! - `pre_crawford[player_away - 1][opponent_away - 1]`: used for ordinary
//!   play and for the Crawford game itself (same equities, only cube access
//!   differs).
//! - `post_crawford[trailer_away - 1]`: the trailer's chance against a leader
//!   who is 1-away after the Crawford game. The leader's chance is the
//!   complement, see [`Lookup`].

use serde::Serialize;

use crate::error::{MetError, Result};

/// Points a side still needs to win the match
pub type Away = u32;

/// Free-text table metadata. Has no effect on lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub copyright: String,
}

/// Which stored cell answers a query, after clamping.
///
/// The post-Crawford grid is stored from the trailer's side, so the two
/// post-Crawford cases read the same array with opposite orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Player is the 1-away leader post-Crawford: `1 - post_crawford[trailer_away - 1]`
    PostCrawfordLeader { trailer_away: Away },
    /// Opponent is the 1-away leader post-Crawford: `post_crawford[trailer_away - 1]`
    PostCrawfordTrailer { trailer_away: Away },
    /// Ordinary or Crawford-game score: `pre_crawford[player_away - 1][opponent_away - 1]`
    PreCrawford { player_away: Away, opponent_away: Away },
}

/// Immutable match equity table
///
/// Construction guarantees that `pre_crawford` covers at least `size × size`
/// cells and `post_crawford` at least `size` cells, so lookups never index out
/// of bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchEquityTable {
    info: TableInfo,
    size: Away,
    pre_crawford: Vec<Vec<f64>>,
    post_crawford: Vec<f64>,
}

impl MatchEquityTable {
    /// Build a table from raw grids.
    ///
    /// Fails with [`MetError::Format`] if `size` is zero or the grids do not
    /// cover `size` away scores on each axis.
    pub fn new(
        info: TableInfo,
        size: Away,
        pre_crawford: Vec<Vec<f64>>,
        post_crawford: Vec<f64>,
    ) -> Result<Self> {
        let n = size as usize;
        if n == 0 {
            return Err(MetError::format("table size must be at least 1"));
        }
        if pre_crawford.len() < n {
            return Err(MetError::format(format!(
                "pre-Crawford table has {} rows, expected {}",
                pre_crawford.len(),
                n
            )));
        }
        if let Some((i, row)) = pre_crawford.iter().take(n).enumerate().find(|(_, r)| r.len() < n) {
            return Err(MetError::format(format!(
                "pre-Crawford row {} has {} values, expected {}",
                i + 1,
                row.len(),
                n
            )));
        }
        if post_crawford.len() < n {
            return Err(MetError::format(format!(
                "post-Crawford data has {} values, expected {}",
                post_crawford.len(),
                n
            )));
        }
        Ok(MatchEquityTable { info, size, pre_crawford, post_crawford })
    }

    /// Table metadata
    pub fn info(&self) -> &TableInfo {
        &self.info
    }

    /// Largest away score the table answers for; larger scores are clamped
    pub fn size(&self) -> Away {
        self.size
    }

    /// Pre-Crawford rows, indexed `[player_away - 1][opponent_away - 1]`
    pub fn pre_crawford(&self) -> &[Vec<f64>] {
        &self.pre_crawford
    }

    /// Post-Crawford trailer MWCs, indexed `[trailer_away - 1]`
    pub fn post_crawford(&self) -> &[f64] {
        &self.post_crawford
    }

    /// Clamp an away score into `[1, size]`
    pub fn clamp_away(&self, away: Away) -> Away {
        away.clamp(1, self.size)
    }

    /// Resolve which cell answers a query. Both scores are clamped first.
    pub fn lookup(&self, player_away: Away, opponent_away: Away, post_crawford: bool) -> Lookup {
        let player_away = self.clamp_away(player_away);
        let opponent_away = self.clamp_away(opponent_away);

        match (post_crawford, player_away, opponent_away) {
            (true, 1, trailer_away) if trailer_away > 1 => Lookup::PostCrawfordLeader { trailer_away },
            (true, trailer_away, 1) if trailer_away > 1 => Lookup::PostCrawfordTrailer { trailer_away },
            _ => Lookup::PreCrawford { player_away, opponent_away },
        }
    }

    /// Read the value for a resolved lookup
    pub fn value(&self, lookup: Lookup) -> f64 {
        match lookup {
            Lookup::PostCrawfordLeader { trailer_away } => {
                1.0 - self.post_crawford[(trailer_away - 1) as usize]
            }
            Lookup::PostCrawfordTrailer { trailer_away } => {
                self.post_crawford[(trailer_away - 1) as usize]
            }
            Lookup::PreCrawford { player_away, opponent_away } => {
                self.pre_crawford[(player_away - 1) as usize][(opponent_away - 1) as usize]
            }
        }
    }

    /// Player's match-winning chance at the given score.
    ///
    /// `crawford` is accepted for symmetry with the game context; the Crawford
    /// game shares the pre-Crawford grid, so it does not change the result.
    pub fn mwc(&self, player_away: Away, opponent_away: Away, crawford: bool, post_crawford: bool) -> f64 {
        let _ = crawford;
        self.value(self.lookup(player_away, opponent_away, post_crawford))
    }

    /// Player's match-winning chance after a game worth `points_won` ends.
    ///
    /// Returns exactly 1.0 or 0.0 when the result decides the match. Otherwise
    /// the resulting score is post-Crawford if this game was the Crawford game
    /// or either side was already 1-away (a 1-away game that is not the
    /// Crawford game is post-Crawford by definition).
    pub fn mwc_after_result(
        &self,
        player_away: Away,
        opponent_away: Away,
        points_won: Away,
        player_won: bool,
        crawford: bool,
    ) -> f64 {
        let (player_next, opponent_next) = if player_won {
            (player_away.saturating_sub(points_won), opponent_away)
        } else {
            (player_away, opponent_away.saturating_sub(points_won))
        };

        if player_next == 0 {
            return 1.0;
        }
        if opponent_next == 0 {
            return 0.0;
        }

        let post_crawford = crawford || player_away == 1 || opponent_away == 1;
        self.mwc(player_next, opponent_next, false, post_crawford)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// 3-away table with distinct cells so misaddressing shows up
    fn sample_table() -> MatchEquityTable {
        MatchEquityTable::new(
            TableInfo { name: "sample".into(), ..TableInfo::default() },
            3,
            vec![
                vec![0.50, 0.70, 0.75],
                vec![0.30, 0.50, 0.60],
                vec![0.25, 0.40, 0.50],
            ],
            vec![0.50, 0.48, 0.32],
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_zero_size() {
        let err = MatchEquityTable::new(TableInfo::default(), 0, vec![], vec![]);
        assert!(matches!(err, Err(MetError::Format(_))));
    }

    #[test]
    fn test_new_rejects_short_rows() {
        let err = MatchEquityTable::new(
            TableInfo::default(),
            2,
            vec![vec![0.5, 0.6], vec![0.4]],
            vec![0.5, 0.5],
        );
        assert!(matches!(err, Err(MetError::Format(_))));
    }

    #[test]
    fn test_new_rejects_short_post_crawford() {
        let err = MatchEquityTable::new(
            TableInfo::default(),
            2,
            vec![vec![0.5, 0.6], vec![0.4, 0.5]],
            vec![0.5],
        );
        assert!(matches!(err, Err(MetError::Format(_))));
    }

    #[test]
    fn test_in_range_lookup_reads_raw_cell() {
        let met = sample_table();
        for p in 1..=3 {
            for o in 1..=3 {
                let expected = met.pre_crawford()[(p - 1) as usize][(o - 1) as usize];
                assert_eq!(met.mwc(p, o, false, false), expected, "cell ({}, {})", p, o);
            }
        }
    }

    #[test]
    fn test_scores_are_clamped() {
        let met = sample_table();
        assert_eq!(met.mwc(0, 2, false, false), met.mwc(1, 2, false, false));
        assert_eq!(met.mwc(9, 2, false, false), met.mwc(3, 2, false, false));
        assert_eq!(met.mwc(9, 40, false, false), met.mwc(3, 3, false, false));
        assert_eq!(met.clamp_away(met.clamp_away(17)), met.clamp_away(17));
    }

    #[test]
    fn test_post_crawford_leader_takes_complement() {
        let met = sample_table();
        assert_eq!(met.lookup(1, 3, true), Lookup::PostCrawfordLeader { trailer_away: 3 });
        assert_abs_diff_eq!(met.mwc(1, 3, false, true), 1.0 - 0.32, epsilon = 1e-12);
        assert_abs_diff_eq!(met.mwc(1, 2, false, true), 1.0 - 0.48, epsilon = 1e-12);
    }

    #[test]
    fn test_post_crawford_trailer_reads_directly() {
        let met = sample_table();
        assert_eq!(met.lookup(2, 1, true), Lookup::PostCrawfordTrailer { trailer_away: 2 });
        assert_eq!(met.mwc(2, 1, false, true), 0.48);
        assert_eq!(met.mwc(3, 1, false, true), 0.32);
    }

    #[test]
    fn test_post_crawford_flag_ignored_away_from_one_away() {
        let met = sample_table();
        assert_eq!(met.mwc(2, 3, false, true), met.mwc(2, 3, false, false));
        assert_eq!(met.mwc(1, 1, false, true), 0.50);
    }

    #[test]
    fn test_crawford_flag_does_not_change_lookup() {
        let met = sample_table();
        assert_eq!(met.mwc(1, 3, true, false), met.mwc(1, 3, false, false));
    }

    #[test]
    fn test_after_result_decided_match() {
        let met = sample_table();
        assert_eq!(met.mwc_after_result(2, 3, 2, true, false), 1.0);
        assert_eq!(met.mwc_after_result(2, 3, 3, true, false), 1.0);
        assert_eq!(met.mwc_after_result(2, 3, 3, false, false), 0.0);
        assert_eq!(met.mwc_after_result(1, 1, 1, false, false), 0.0);
    }

    #[test]
    fn test_after_result_reaching_one_away_is_crawford_game() {
        let met = sample_table();
        // 2-away wins a single game: next game is the Crawford game, pre-Crawford grid
        assert_eq!(met.mwc_after_result(2, 3, 1, true, false), 0.75);
    }

    #[test]
    fn test_after_result_from_crawford_game_is_post_crawford() {
        let met = sample_table();
        // Leader at 1-away loses the Crawford game 1 point: 1-away vs 2-away post-Crawford
        assert_abs_diff_eq!(met.mwc_after_result(1, 3, 1, false, true), 1.0 - 0.48, epsilon = 1e-12);
        // Same result without the Crawford flag is post-Crawford too
        assert_abs_diff_eq!(met.mwc_after_result(1, 3, 1, false, false), 1.0 - 0.48, epsilon = 1e-12);
    }

    #[test]
    fn test_after_result_trailer_side_post_crawford() {
        let met = sample_table();
        // Trailer at 3-away wins a single game against the 1-away leader
        assert_eq!(met.mwc_after_result(3, 1, 1, true, false), 0.48);
    }
}
