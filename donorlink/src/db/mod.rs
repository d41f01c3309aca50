pub mod backends;
pub mod traits;

pub use backends::memory::InMemoryProfileStore;
pub use traits::*;
