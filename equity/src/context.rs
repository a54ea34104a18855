//! Match score and cube context for a position

use gammon_met::{Away, MatchEquityTable};

/// Score and cube state the equity is computed under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchContext {
    /// Points the player still needs
    pub player_away: Away,
    /// Points the opponent still needs
    pub opponent_away: Away,
    /// Cube value; every result is scaled by it. Zero is treated as 1.
    pub cube_value: u32,
    /// This game is the Crawford game
    pub crawford: bool,
    /// One side is 1-away and the Crawford game has been played
    pub post_crawford: bool,
}

impl MatchContext {
    /// Centered cube, ordinary pre-Crawford game
    pub fn new(player_away: Away, opponent_away: Away) -> Self {
        MatchContext {
            player_away,
            opponent_away,
            cube_value: 1,
            crawford: false,
            post_crawford: false,
        }
    }

    pub fn with_cube(mut self, cube_value: u32) -> Self {
        self.cube_value = cube_value;
        self
    }

    pub fn with_crawford(mut self, crawford: bool) -> Self {
        self.crawford = crawford;
        self
    }

    pub fn with_post_crawford(mut self, post_crawford: bool) -> Self {
        self.post_crawford = post_crawford;
        self
    }

    /// Cube multiplier applied to outcome points
    pub fn cube(&self) -> u32 {
        self.cube_value.max(1)
    }

    /// Player's MWC at the current score, before this game is played
    pub fn current_mwc(&self, met: &MatchEquityTable) -> f64 {
        met.mwc(self.player_away, self.opponent_away, self.crawford, self.post_crawford)
    }

    /// Player's MWC once this game ends with `points` going to the winner
    pub fn mwc_after(&self, met: &MatchEquityTable, points: u32, player_won: bool) -> f64 {
        met.mwc_after_result(self.player_away, self.opponent_away, points, player_won, self.crawford)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let ctx = MatchContext::new(3, 5);
        assert_eq!(ctx.cube(), 1);
        assert!(!ctx.crawford);
        assert!(!ctx.post_crawford);

        let ctx = ctx.with_cube(4).with_crawford(true);
        assert_eq!(ctx.cube(), 4);
        assert!(ctx.crawford);
    }

    #[test]
    fn test_zero_cube_counts_as_one() {
        assert_eq!(MatchContext::new(3, 5).with_cube(0).cube(), 1);
    }

    #[test]
    fn test_current_mwc_uses_post_crawford_flag() {
        let met = MatchEquityTable::embedded().unwrap();
        let pre = MatchContext::new(1, 4).current_mwc(&met);
        let post = MatchContext::new(1, 4).with_post_crawford(true).current_mwc(&met);
        assert_eq!(pre, met.mwc(1, 4, false, false));
        assert_eq!(post, met.mwc(1, 4, false, true));
    }
}
