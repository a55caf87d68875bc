//! Medloc - provider discovery and matching engine
//!
//! Locates, filters, ranks and annotates nearby doctors for a user's
//! position fix: distance, live availability, home-visit eligibility and
//! arrival estimates, plus aggregate statistics over the result set.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{calculate_distance, MatchingEngine, SearchOutcome, SearchPreset};
pub use crate::error::{DiscoveryError, DiscoveryResult};
pub use crate::models::{Coordinates, DoctorLocation, FilterPatch, SearchFilters, SearchStats, SortCriteria};
