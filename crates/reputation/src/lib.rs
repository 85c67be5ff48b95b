//! Reputation derived from opinions.
//!
//! Nothing here is stored. Profiles and stats are recomputed from the full
//! opinion set every time they are asked for.

pub mod level;
pub mod profile;
pub mod stats;

pub use level::{TrustBand, TrustLevel};
pub use profile::{compute_trust_profile, compute_trust_profile_with, TrustProfile};
pub use stats::BusinessStats;
