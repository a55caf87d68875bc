use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::core::distance::{calculate_bounding_box, is_within_bounding_box};
use crate::models::{
    Address, ConsultationType, Coordinates, DoctorLocation, PriceRange, WorkingHours,
};
use super::directory::{DirectoryError, DirectoryQuery, ProviderDirectory};

/// Directory backed by an in-process list of providers
///
/// Applies the same coarse pre-filter a remote directory would: bounding
/// box, specialty and consultation type.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    providers: RwLock<Vec<DoctorLocation>>,
}

impl InMemoryDirectory {
    pub fn new(providers: Vec<DoctorLocation>) -> Self {
        Self {
            providers: RwLock::new(providers),
        }
    }

    /// Directory seeded with the sample Caracas catalog
    pub fn with_sample_catalog() -> Self {
        Self::new(sample_catalog())
    }

    /// Replace the whole catalog
    pub async fn replace(&self, providers: Vec<DoctorLocation>) {
        *self.providers.write().await = providers;
    }

    pub async fn len(&self) -> usize {
        self.providers.read().await.len()
    }
}

#[async_trait]
impl ProviderDirectory for InMemoryDirectory {
    async fn find_nearby(
        &self,
        origin: Coordinates,
        query: &DirectoryQuery,
    ) -> Result<Vec<DoctorLocation>, DirectoryError> {
        let bbox = calculate_bounding_box(origin, query.max_distance_km);
        let providers = self.providers.read().await;

        let candidates: Vec<DoctorLocation> = providers
            .iter()
            .filter(|p| is_within_bounding_box(p.coordinates, &bbox))
            .filter(|p| query.specialty.as_ref().map_or(true, |s| &p.specialty == s))
            .filter(|p| query.consultation_type.map_or(true, |c| p.offers(c)))
            .cloned()
            .map(|mut p| {
                p.distance = None;
                p
            })
            .collect();

        tracing::debug!(
            "In-memory directory matched {} of {} providers",
            candidates.len(),
            providers.len()
        );

        Ok(candidates)
    }
}

fn caracas(street: &str, postal_code: &str) -> Option<Address> {
    Some(Address {
        street: street.to_string(),
        city: "Caracas".to_string(),
        state: "Distrito Capital".to_string(),
        country: "Venezuela".to_string(),
        postal_code: postal_code.to_string(),
    })
}

#[allow(clippy::too_many_arguments)]
fn provider(
    n: u32,
    name: &str,
    specialty: &str,
    rating: f64,
    coordinates: Coordinates,
    address: Option<Address>,
    is_available: bool,
    consultation_types: Vec<ConsultationType>,
    price_range: PriceRange,
    hours: (u32, u32),
    service_radius: f64,
) -> DoctorLocation {
    let clock = |h: u32| chrono::NaiveTime::from_hms_opt(h % 24, 0, 0).unwrap_or_default();
    DoctorLocation {
        id: format!("doc-{}", n),
        doctor_id: format!("doctor-{:03}", n),
        doctor_name: name.to_string(),
        specialty: specialty.to_string(),
        coordinates,
        avatar: None,
        address,
        consultation_types,
        working_hours: WorkingHours::new(clock(hours.0), clock(hours.1)),
        service_radius,
        price_range,
        rating,
        is_available,
        distance: None,
    }
}

/// Sample providers around central Caracas
pub fn sample_catalog() -> Vec<DoctorLocation> {
    use ConsultationType::{HomeVisit, InPerson, Virtual};

    vec![
        provider(
            1,
            "Dr. María González",
            "Medicina General",
            4.8,
            Coordinates::new(10.4806, -66.9036),
            caracas("Av. Francisco de Miranda, Centro Comercial Lido", "1060"),
            true,
            vec![Virtual, InPerson, HomeVisit],
            PriceRange::new(25.0, 50.0),
            (8, 17),
            15.0,
        ),
        provider(
            2,
            "Dr. Carlos Rodríguez",
            "Cardiología",
            4.9,
            Coordinates::new(10.4880, -66.8790),
            caracas("Centro Médico de Caracas, Piso 5", "1050"),
            true,
            vec![Virtual, InPerson],
            PriceRange::new(60.0, 120.0),
            (9, 18),
            10.0,
        ),
        provider(
            3,
            "Dra. Ana Martínez",
            "Pediatría",
            4.7,
            Coordinates::new(10.4750, -66.9150),
            caracas("Hospital de Niños J.M. de los Ríos", "1011"),
            false,
            vec![InPerson, HomeVisit],
            PriceRange::new(30.0, 70.0),
            (7, 15),
            20.0,
        ),
        provider(
            4,
            "Dr. Luis Herrera",
            "Emergencia Médica",
            4.6,
            Coordinates::new(10.4970, -66.8530),
            caracas("Clínica El Ávila, Altamira", "1060"),
            true,
            vec![HomeVisit, InPerson],
            PriceRange::new(40.0, 90.0),
            (20, 8),
            30.0,
        ),
        provider(
            5,
            "Dra. Isabel Pérez",
            "Psiquiatría",
            4.5,
            Coordinates::new(10.5010, -66.9140),
            caracas("San Bernardino, Av. Panteón", "1010"),
            true,
            vec![Virtual],
            PriceRange::new(45.0, 80.0),
            (10, 19),
            0.0,
        ),
    ]
}
