use chrono::Utc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::error::{DiscoveryError, DiscoveryResult};
use crate::models::{
    AnnotatedDoctor, Coordinates, DoctorLocation, FilterPatch, SearchFilters, SearchStats,
    SortCriteria, UserLocation,
};
use crate::services::{DirectoryError, DirectoryQuery, LocationError, LocationProvider, ProviderDirectory};
use super::{
    distance::calculate_distance,
    filters::matches_filters,
    presets::SearchPreset,
    ranking::{sort_doctors, sorted_doctors},
    schedule::{self, Clock, SystemClock},
    stats::compute_search_stats,
    visit::{self, TravelModel},
};

/// Tunables for the matching engine
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub default_filters: SearchFilters,
    pub travel: TravelModel,
    pub location_timeout: Duration,
    pub search_timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_filters: SearchFilters::default(),
            travel: TravelModel::default(),
            location_timeout: Duration::from_secs(15),
            search_timeout: Duration::from_secs(20),
        }
    }
}

/// How a successful search ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The result set was replaced with `total` doctors
    Completed { total: usize },
    /// A newer search was issued meanwhile; this response was dropped
    Superseded,
}

#[derive(Debug, Default)]
struct ResultSlot {
    seq: u64,
    doctors: Arc<Vec<DoctorLocation>>,
    selected: Option<String>,
}

/// Decrements the in-flight counter when the search ends or is dropped
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Provider discovery and matching engine
///
/// Owns three state slots: the user's last position fix, the search
/// filters and the current result set. Each slot is replaced as a whole,
/// never edited, so readers always get a consistent snapshot.
///
/// # Pipeline
/// 1. Permission and position fix ([`initialize_location`](Self::initialize_location))
/// 2. Directory query with the server-side filters
/// 3. Distance annotation for the fix
/// 4. Client-side filter pass
/// 5. Ordering by distance, then commit unless a newer search was issued
pub struct MatchingEngine {
    location: Arc<dyn LocationProvider>,
    directory: Arc<dyn ProviderDirectory>,
    clock: Arc<dyn Clock>,
    settings: EngineSettings,
    user_location: RwLock<Option<Arc<UserLocation>>>,
    filters: RwLock<Arc<SearchFilters>>,
    results: RwLock<ResultSlot>,
    issued: AtomicU64,
    in_flight: AtomicUsize,
}

impl MatchingEngine {
    pub fn new(
        location: Arc<dyn LocationProvider>,
        directory: Arc<dyn ProviderDirectory>,
        settings: EngineSettings,
    ) -> Self {
        let filters = Arc::new(settings.default_filters.clone());
        Self {
            location,
            directory,
            clock: Arc::new(SystemClock),
            settings,
            user_location: RwLock::new(None),
            filters: RwLock::new(filters),
            results: RwLock::new(ResultSlot::default()),
            issued: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Replace the clock used for availability checks
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    // ---- State snapshots ----

    pub async fn user_location(&self) -> Option<Arc<UserLocation>> {
        self.user_location.read().await.clone()
    }

    pub async fn filters(&self) -> Arc<SearchFilters> {
        self.filters.read().await.clone()
    }

    pub async fn nearby_doctors(&self) -> Arc<Vec<DoctorLocation>> {
        self.results.read().await.doctors.clone()
    }

    pub async fn selected_doctor(&self) -> Option<DoctorLocation> {
        let slot = self.results.read().await;
        let id = slot.selected.as_ref()?;
        slot.doctors.iter().find(|d| &d.id == id).cloned()
    }

    /// True while at least one search is in flight
    pub fn is_searching(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    // ---- Location ----

    /// Make sure a usable position fix exists
    ///
    /// Requests permission when needed, then takes one fix. On failure the
    /// previous fix, if any, is left in place.
    pub async fn initialize_location(&self) -> DiscoveryResult<Arc<UserLocation>> {
        info!("Initializing user location");

        if !self.location.has_permission().await {
            let granted = self.location.request_permission().await.map_err(|e| {
                warn!("Location permission request failed: {}", e);
                DiscoveryError::PermissionDenied
            })?;
            if !granted {
                warn!("Location permission denied");
                return Err(DiscoveryError::PermissionDenied);
            }
        }

        let fix = match timeout(self.settings.location_timeout, self.location.current_position()).await {
            Ok(Ok(fix)) => fix,
            Ok(Err(e)) => {
                warn!("Position fix failed: {}", e);
                return Err(e.into());
            }
            Err(_) => {
                warn!("Position fix timed out after {:?}", self.settings.location_timeout);
                return Err(LocationError::Timeout.into());
            }
        };

        let user_location = Arc::new(UserLocation {
            coordinates: fix.coordinates,
            accuracy_meters: fix.accuracy_meters,
            timestamp: Utc::now(),
        });
        *self.user_location.write().await = Some(user_location.clone());

        info!(
            "Position fix at ({:.5}, {:.5}) ±{}m",
            fix.coordinates.latitude, fix.coordinates.longitude, fix.accuracy_meters
        );

        Ok(user_location)
    }

    // ---- Filters ----

    /// Merge a partial update into the filters and return the new record
    pub async fn update_filters(&self, patch: &FilterPatch) -> Arc<SearchFilters> {
        let mut slot = self.filters.write().await;
        let updated = Arc::new(slot.merged(patch));
        *slot = updated.clone();
        debug!("Filters updated: {:?}", updated);
        updated
    }

    /// Restore default filters and drop the fix, the results and the selection
    ///
    /// Searches still in flight are discarded when they complete.
    pub async fn reset_search(&self) {
        info!("Resetting search");
        self.issued.fetch_add(1, Ordering::SeqCst);
        *self.filters.write().await = Arc::new(self.settings.default_filters.clone());
        *self.user_location.write().await = None;

        let mut slot = self.results.write().await;
        slot.doctors = Arc::new(Vec::new());
        slot.selected = None;
    }

    // ---- Searching ----

    /// Query the directory around `origin` and return doctors that pass
    /// every filter, annotated with distance and ordered nearest first
    ///
    /// Does not touch the engine state.
    pub async fn search_nearby_doctors(
        &self,
        origin: Coordinates,
        filters: &SearchFilters,
    ) -> DiscoveryResult<Vec<DoctorLocation>> {
        let query = DirectoryQuery::from(filters);

        let candidates = match timeout(self.settings.search_timeout, self.directory.find_nearby(origin, &query)).await {
            Ok(Ok(candidates)) => candidates,
            Ok(Err(e)) => {
                warn!("Directory query failed: {}", e);
                return Err(e.into());
            }
            Err(_) => {
                warn!("Directory query timed out after {:?}", self.settings.search_timeout);
                return Err(DirectoryError::Timeout.into());
            }
        };

        let total_candidates = candidates.len();
        let now = self.clock.now();

        let mut doctors: Vec<DoctorLocation> = candidates
            .into_iter()
            .map(|mut doctor| {
                doctor.distance = Some(calculate_distance(origin, doctor.coordinates));
                doctor
            })
            .filter(|doctor| matches_filters(doctor, filters, now))
            .collect();

        sort_doctors(&mut doctors, SortCriteria::Distance);

        debug!("{} of {} candidates passed the filters", doctors.len(), total_candidates);

        Ok(doctors)
    }

    /// Search around the current fix, optionally merging a filter patch first
    ///
    /// A failed search leaves the previous result set untouched.
    pub async fn search_doctors_with_filters(
        &self,
        patch: Option<FilterPatch>,
    ) -> DiscoveryResult<SearchOutcome> {
        let origin = self
            .user_location()
            .await
            .map(|location| location.coordinates)
            .ok_or_else(|| {
                DiscoveryError::LocationUnavailable("no position fix, initialize location first".to_string())
            })?;

        let filters = match patch {
            Some(patch) if !patch.is_empty() => self.update_filters(&patch).await,
            _ => self.filters().await,
        };

        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let _in_flight = InFlight::enter(&self.in_flight);

        info!("Search #{} started with filters: {:?}", seq, filters);

        let doctors = self.search_nearby_doctors(origin, &filters).await?;
        Ok(self.commit(seq, doctors).await)
    }

    async fn commit(&self, seq: u64, doctors: Vec<DoctorLocation>) -> SearchOutcome {
        let mut slot = self.results.write().await;

        let latest = self.issued.load(Ordering::SeqCst);
        if seq < latest || seq < slot.seq {
            debug!("Search #{} superseded by #{}, dropping {} results", seq, latest, doctors.len());
            return SearchOutcome::Superseded;
        }

        let total = doctors.len();
        let selection_gone = slot
            .selected
            .as_ref()
            .is_some_and(|id| !doctors.iter().any(|d| &d.id == id));
        if selection_gone {
            slot.selected = None;
        }
        slot.seq = seq;
        slot.doctors = Arc::new(doctors);

        info!("Search #{} completed: {} doctors", seq, total);
        SearchOutcome::Completed { total }
    }

    pub async fn search_preset(&self, preset: &SearchPreset) -> DiscoveryResult<SearchOutcome> {
        info!("Preset search: {}", preset);
        self.search_doctors_with_filters(Some(preset.patch())).await
    }

    pub async fn search_by_specialty(&self, specialty: &str) -> DiscoveryResult<SearchOutcome> {
        self.search_preset(&SearchPreset::Specialty(specialty.to_string())).await
    }

    pub async fn search_for_emergency(&self) -> DiscoveryResult<SearchOutcome> {
        self.search_preset(&SearchPreset::Emergency).await
    }

    pub async fn search_for_virtual_consultation(&self) -> DiscoveryResult<SearchOutcome> {
        self.search_preset(&SearchPreset::VirtualNow).await
    }

    pub async fn search_for_home_visit(&self) -> DiscoveryResult<SearchOutcome> {
        self.search_preset(&SearchPreset::HomeVisitToday).await
    }

    // ---- Selection ----

    /// Select a doctor of the current result set by id
    pub async fn select_doctor(&self, id: &str) -> Option<DoctorLocation> {
        let mut slot = self.results.write().await;
        let doctor = slot.doctors.iter().find(|d| d.id == id).cloned()?;
        slot.selected = Some(doctor.id.clone());
        debug!("Doctor selected: {}", doctor.doctor_name);
        Some(doctor)
    }

    // ---- Derived facts ----

    pub async fn get_sorted_doctors(&self, criteria: SortCriteria) -> Vec<DoctorLocation> {
        sorted_doctors(&self.nearby_doctors().await, criteria)
    }

    pub fn is_doctor_available_now(&self, doctor: &DoctorLocation) -> bool {
        schedule::is_doctor_available_now(doctor, self.clock.now())
    }

    pub fn can_doctor_visit_home(&self, doctor: &DoctorLocation) -> bool {
        visit::can_doctor_visit_home(doctor)
    }

    /// Minutes until arrival for a home visit, 0 when the distance is unknown
    pub fn get_estimated_arrival_time(&self, doctor: &DoctorLocation) -> u32 {
        visit::estimated_arrival_minutes(doctor, &self.settings.travel)
    }

    pub async fn get_search_stats(&self) -> SearchStats {
        compute_search_stats(&self.nearby_doctors().await, self.clock.now())
    }

    /// Attach the derived facts to a doctor
    pub fn annotate(&self, doctor: DoctorLocation) -> AnnotatedDoctor {
        AnnotatedDoctor {
            available_now: self.is_doctor_available_now(&doctor),
            can_visit_home: self.can_doctor_visit_home(&doctor),
            eta_minutes: self.get_estimated_arrival_time(&doctor),
            doctor,
        }
    }
}
