// Model exports
pub mod domain;
pub mod filters;
pub mod requests;
pub mod responses;

pub use domain::{
    Address, Availability, ConsultationType, Coordinates, DoctorLocation, PositionFix, PriceRange,
    SearchStats, SortCriteria, UserLocation, WorkingHours, EMERGENCY_SPECIALTY, MEDICAL_SPECIALTIES,
};
pub use filters::{FilterPatch, SearchFilters};
pub use requests::SearchRequest;
pub use responses::{AnnotatedDoctor, ErrorResponse, HealthResponse, SearchResponse};
