mod matching;
pub mod seed;

pub use matching::{MatchOutcome, MatchingService};
