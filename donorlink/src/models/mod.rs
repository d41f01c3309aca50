mod matching;
mod profile;

pub use matching::*;
pub use profile::*;
