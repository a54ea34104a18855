//! Outcome probabilities and their decomposition into exclusive masses
//!
//! Evaluators report six percentages (0-100): the player's and opponent's
//! win, gammon and backgammon chances. Gammon figures come in two
//! conventions, see [`GammonConvention`].

/// How gammon and backgammon percentages relate to the win percentage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GammonConvention {
    /// Gammons include backgammons, wins include gammons
    #[default]
    Cumulative,
    /// Single wins, gammons and backgammons are disjoint
    Exclusive,
}

impl From<bool> for GammonConvention {
    /// `true` means cumulative gammons
    fn from(cumulative: bool) -> Self {
        if cumulative {
            GammonConvention::Cumulative
        } else {
            GammonConvention::Exclusive
        }
    }
}

/// Raw outcome percentages for one position, each on a 0-100 scale.
///
/// Callers keep `win >= win_gammon >= win_backgammon` (and likewise for the
/// losing side); no consistency check is made.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OutcomeProbabilities {
    pub win: f64,
    pub win_gammon: f64,
    pub win_backgammon: f64,
    pub lose: f64,
    pub lose_gammon: f64,
    pub lose_backgammon: f64,
}

/// Disjoint probability masses (0-1) for the six ways a game can end
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OutcomeMasses {
    pub win_single: f64,
    pub win_gammon: f64,
    pub win_backgammon: f64,
    pub lose_single: f64,
    pub lose_gammon: f64,
    pub lose_backgammon: f64,
}

impl OutcomeProbabilities {
    pub fn new(
        win: f64,
        win_gammon: f64,
        win_backgammon: f64,
        lose: f64,
        lose_gammon: f64,
        lose_backgammon: f64,
    ) -> Self {
        OutcomeProbabilities {
            win,
            win_gammon,
            win_backgammon,
            lose,
            lose_gammon,
            lose_backgammon,
        }
    }

    /// Split the percentages into disjoint masses under `convention`
    pub fn masses(&self, convention: GammonConvention) -> OutcomeMasses {
        let (win_single, win_gammon) =
            split_side(self.win, self.win_gammon, self.win_backgammon, convention);
        let (lose_single, lose_gammon) =
            split_side(self.lose, self.lose_gammon, self.lose_backgammon, convention);

        OutcomeMasses {
            win_single,
            win_gammon,
            win_backgammon: self.win_backgammon / 100.0,
            lose_single,
            lose_gammon,
            lose_backgammon: self.lose_backgammon / 100.0,
        }
    }
}

/// Single-game and gammon-only masses for one side
fn split_side(win: f64, gammon: f64, backgammon: f64, convention: GammonConvention) -> (f64, f64) {
    match convention {
        GammonConvention::Cumulative => ((win - gammon) / 100.0, (gammon - backgammon) / 100.0),
        GammonConvention::Exclusive => ((win - gammon - backgammon) / 100.0, gammon / 100.0),
    }
}

impl OutcomeMasses {
    /// `(mass, points multiplier, player won)` for each outcome
    pub fn outcomes(&self) -> [(f64, u32, bool); 6] {
        [
            (self.win_single, 1, true),
            (self.win_gammon, 2, true),
            (self.win_backgammon, 3, true),
            (self.lose_single, 1, false),
            (self.lose_gammon, 2, false),
            (self.lose_backgammon, 3, false),
        ]
    }

    /// Sum of all six masses; 1.0 for a consistent input
    pub fn total(&self) -> f64 {
        self.outcomes().iter().map(|(mass, _, _)| mass).sum()
    }
}
