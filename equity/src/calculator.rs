//! Equity calculator bound to a match equity table
//!
//! Holds the table shared from the application's [`MetStore`] and a default
//! gammon convention. Batches of positions are evaluated on the rayon pool;
//! the table is read-only, so workers share it without locking.

use std::sync::Arc;

use gammon_met::{MatchEquityTable, MetStore};
use log::debug;
use rayon::prelude::*;

use crate::context::MatchContext;
use crate::match_play::match_cubeless_equity;
use crate::money::money_cubeless_equity;
use crate::probabilities::{GammonConvention, OutcomeProbabilities};

/// One position to evaluate: outcome percentages plus match context
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub probabilities: OutcomeProbabilities,
    pub context: MatchContext,
}

/// Computes match and money equities against a fixed table
#[derive(Debug, Clone)]
pub struct EquityCalculator {
    met: Arc<MatchEquityTable>,
    convention: GammonConvention,
}

impl EquityCalculator {
    /// Calculator over `met`, cumulative gammons
    pub fn new(met: Arc<MatchEquityTable>) -> Self {
        EquityCalculator {
            met,
            convention: GammonConvention::default(),
        }
    }

    /// Calculator over the store's table, loading it if needed
    pub fn from_store(store: &MetStore) -> gammon_met::Result<Self> {
        Ok(Self::new(store.get()?))
    }

    pub fn with_convention(mut self, convention: GammonConvention) -> Self {
        self.convention = convention;
        self
    }

    pub fn convention(&self) -> GammonConvention {
        self.convention
    }

    pub fn met(&self) -> &MatchEquityTable {
        &self.met
    }

    /// Normalized cubeless match equity. `met` overrides the calculator's table.
    pub fn match_equity(
        &self,
        probs: &OutcomeProbabilities,
        ctx: &MatchContext,
        met: Option<&MatchEquityTable>,
    ) -> f64 {
        let met = met.unwrap_or(self.met.as_ref());
        match_cubeless_equity(probs, ctx, self.convention, met)
    }

    /// Cubeless money equity
    pub fn money_equity(&self, probs: &OutcomeProbabilities) -> f64 {
        money_cubeless_equity(probs, self.convention)
    }

    /// Match equities for many positions, in input order
    pub fn match_equity_batch(&self, positions: &[Position]) -> Vec<f64> {
        debug!("evaluating {} positions", positions.len());
        positions
            .par_iter()
            .map(|pos| match_cubeless_equity(&pos.probabilities, &pos.context, self.convention, &self.met))
            .collect()
    }
}
