pub(crate) mod health;
pub mod matches;
pub mod profiles;

pub use health::health_check;
