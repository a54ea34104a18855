//! gammon MET - Match equity tables for backgammon match play
//!
//! This crate owns the match equity table (MET) data model, the parser for the
//! bracketed `key=value` text format, and the match-winning-chance (MWC)
//! lookups that the equity calculator builds on.
//!
//! Tables are immutable once built. The embedded default table is parsed on
//! demand through a [`MetStore`], which the application owns and shares.

pub mod error;
pub mod parser;
pub mod store;
pub mod table;

pub use error::{MetError, Result};
pub use parser::{parse, ParseWarning, ParsedTable};
pub use store::{MetSource, MetStore, EMBEDDED_MET};
pub use table::{Away, Lookup, MatchEquityTable, TableInfo};
