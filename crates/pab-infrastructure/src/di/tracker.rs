//! Registration tracker
//!
//! Lets independent provider registration routines avoid wiring the same
//! provider twice into one container, without a central list of providers.
//!
//! The tracker is itself a singleton stored in the [`ServiceCollection`] it
//! guards. It is created by the first check or mark against a collection and
//! dropped with it, so separate collections never share markers. Once
//! created it cannot be replaced.

use crate::di::container::ServiceCollection;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use pab_domain::ProviderMarker;
use pab_domain::error::Result;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkState {
    Reserved,
    Registered,
}

/// Set of provider markers recorded against one container
///
/// Recorded markers are never removed. Each update is atomic per marker, so
/// concurrent marks of the same marker leave exactly one entry.
///
/// A marker can also be reserved while its provider is being registered.
/// A reservation blocks other reservations of the same marker and becomes a
/// recorded marker on [`MarkerReservation::commit`]; dropping it uncommitted
/// releases the marker.
#[derive(Debug, Default)]
pub struct RegistrationTracker {
    markers: DashMap<ProviderMarker, MarkState>,
}

impl RegistrationTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `marker` has been recorded
    pub fn contains(&self, marker: &ProviderMarker) -> bool {
        self.markers
            .get(marker)
            .is_some_and(|state| *state == MarkState::Registered)
    }

    /// Whether `marker` is reserved by a registration still in progress
    pub fn is_reserved(&self, marker: &ProviderMarker) -> bool {
        self.markers
            .get(marker)
            .is_some_and(|state| *state == MarkState::Reserved)
    }

    /// Record `marker`, returning `true` if it was neither recorded nor reserved before
    ///
    /// Marking a reserved marker records it; the reservation can then no
    /// longer release it.
    pub fn mark(&self, marker: ProviderMarker) -> bool {
        match self.markers.entry(marker) {
            Entry::Occupied(mut occupied) => {
                occupied.insert(MarkState::Registered);
                false
            }
            Entry::Vacant(vacant) => {
                vacant.insert(MarkState::Registered);
                true
            }
        }
    }

    /// Reserve `marker` for a registration in progress
    ///
    /// Returns `None` when the marker is already recorded or reserved.
    pub fn reserve(self: &Arc<Self>, marker: ProviderMarker) -> Option<MarkerReservation> {
        match self.markers.entry(marker.clone()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(vacant) => {
                vacant.insert(MarkState::Reserved);
                Some(MarkerReservation {
                    tracker: Arc::clone(self),
                    marker,
                    committed: false,
                })
            }
        }
    }

    /// Recorded markers, sorted
    pub fn markers(&self) -> Vec<ProviderMarker> {
        let mut markers: Vec<ProviderMarker> = self
            .markers
            .iter()
            .filter(|entry| *entry.value() == MarkState::Registered)
            .map(|entry| entry.key().clone())
            .collect();
        markers.sort();
        markers
    }

    /// Number of recorded markers
    pub fn len(&self) -> usize {
        self.markers
            .iter()
            .filter(|entry| *entry.value() == MarkState::Registered)
            .count()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Claim on a marker held while its provider registers
#[derive(Debug)]
pub struct MarkerReservation {
    tracker: Arc<RegistrationTracker>,
    marker: ProviderMarker,
    committed: bool,
}

impl MarkerReservation {
    /// Reserved marker
    pub fn marker(&self) -> &ProviderMarker {
        &self.marker
    }

    /// Record the reserved marker
    pub fn commit(mut self) {
        self.tracker.mark(self.marker.clone());
        self.committed = true;
        debug!(marker = %self.marker, "Provider marked as registered");
    }
}

impl Drop for MarkerReservation {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        let released = self
            .tracker
            .markers
            .remove_if(&self.marker, |_, state| *state == MarkState::Reserved);
        if released.is_some() {
            debug!(marker = %self.marker, "Released provider reservation");
        }
    }
}

/// Registration tracking operations on a [`ServiceCollection`]
///
/// Every operation fails with `Error::RegistrationConflict` if the collection
/// holds a [`RegistrationTracker`] registration that is not a singleton
/// instance (a factory or a transient registration).
pub trait RegistrationTrackerExt {
    /// The collection's tracker, created on first use
    fn registration_tracker(&self) -> Result<Arc<RegistrationTracker>>;

    /// Whether `marker` has been marked against this collection
    fn is_registered(&self, marker: &ProviderMarker) -> Result<bool>;

    /// Mark `marker` against this collection; marking twice is a no-op
    fn mark_registered(&self, marker: ProviderMarker) -> Result<()>;

    /// Mark `marker` and report whether this call was the one that added it
    ///
    /// Among concurrent callers passing the same marker, exactly one gets
    /// `true`.
    fn try_mark_registered(&self, marker: ProviderMarker) -> Result<bool>;

    /// Reserve `marker` for a registration in progress
    ///
    /// Returns `None` when the marker is already recorded or reserved.
    /// Among concurrent callers passing the same marker, at most one gets a
    /// reservation.
    fn reserve_registration(&self, marker: ProviderMarker) -> Result<Option<MarkerReservation>>;

    /// Markers recorded against this collection, sorted
    fn registered_markers(&self) -> Result<Vec<ProviderMarker>>;
}

impl RegistrationTrackerExt for ServiceCollection {
    fn registration_tracker(&self) -> Result<Arc<RegistrationTracker>> {
        self.get_or_add_singleton(|| Arc::new(RegistrationTracker::new()))
    }

    fn is_registered(&self, marker: &ProviderMarker) -> Result<bool> {
        Ok(self.registration_tracker()?.contains(marker))
    }

    fn mark_registered(&self, marker: ProviderMarker) -> Result<()> {
        self.try_mark_registered(marker).map(|_| ())
    }

    fn try_mark_registered(&self, marker: ProviderMarker) -> Result<bool> {
        let tracker = self.registration_tracker()?;
        let label = marker.to_string();
        let added = tracker.mark(marker);
        if added {
            debug!(marker = %label, "Provider marked as registered");
        }
        Ok(added)
    }

    fn reserve_registration(&self, marker: ProviderMarker) -> Result<Option<MarkerReservation>> {
        Ok(self.registration_tracker()?.reserve(marker))
    }

    fn registered_markers(&self) -> Result<Vec<ProviderMarker>> {
        Ok(self.registration_tracker()?.markers())
    }
}
