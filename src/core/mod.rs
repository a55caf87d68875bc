// Core algorithm exports
pub mod distance;
pub mod engine;
pub mod filters;
pub mod presets;
pub mod ranking;
pub mod schedule;
pub mod stats;
pub mod visit;

pub use distance::{calculate_bounding_box, calculate_distance, is_within_bounding_box, BoundingBox};
pub use engine::{EngineSettings, MatchingEngine, SearchOutcome};
pub use filters::{matches_availability, matches_filters};
pub use presets::{SearchPreset, UnknownPreset};
pub use ranking::{sort_doctors, sorted_doctors};
pub use schedule::{is_doctor_available_now, is_within_window, Clock, FixedClock, SystemClock};
pub use stats::compute_search_stats;
pub use visit::{can_doctor_visit_home, estimated_arrival_minutes, TravelModel};
