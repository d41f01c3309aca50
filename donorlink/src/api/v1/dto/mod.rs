//! v1 API Data Transfer Objects.
//!
//! These types define the wire format for the v1 REST API and convert into
//! the domain models in `src/models/`.

pub mod matches;
pub mod profiles;

pub use matches::*;
pub use profiles::*;
