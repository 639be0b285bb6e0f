//! Timeslots and their capacity limits.

use rsvp_core::error::DomainError;

/// Timeslots offered when nothing else is configured.
pub const DEFAULT_TIMESLOTS: [&str; 2] = ["18:00", "19:30"];

/// Capacity applied to every timeslot unless overridden.
pub const DEFAULT_CAPACITY: u32 = 56;

/// A scheduled arrival window with its own capacity limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeslot {
    /// The value clients submit and the table stores, e.g. `"18:00"`.
    pub label: String,
    /// Maximum number of records accepted for this slot.
    pub capacity: u32,
}

impl Timeslot {
    /// Creates a timeslot.
    #[must_use]
    pub fn new(label: impl Into<String>, capacity: u32) -> Self {
        Self {
            label: label.into(),
            capacity,
        }
    }
}

/// The recognized set of timeslots, in configuration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeslotCatalog {
    slots: Vec<Timeslot>,
}

impl TimeslotCatalog {
    /// Builds a catalog.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `slots` is empty, a label is
    /// blank, or a label appears twice.
    pub fn new(slots: Vec<Timeslot>) -> Result<Self, DomainError> {
        if slots.is_empty() {
            return Err(DomainError::Validation(
                "at least one timeslot must be configured".into(),
            ));
        }
        for (i, slot) in slots.iter().enumerate() {
            if slot.label.trim().is_empty() {
                return Err(DomainError::Validation("timeslot label is empty".into()));
            }
            if slots[..i].iter().any(|s| s.label == slot.label) {
                return Err(DomainError::Validation(format!(
                    "duplicate timeslot: {}",
                    slot.label
                )));
            }
        }
        Ok(Self { slots })
    }

    /// Builds a catalog where every label shares one capacity.
    ///
    /// # Errors
    ///
    /// Same as [`TimeslotCatalog::new`].
    pub fn uniform(labels: &[&str], capacity: u32) -> Result<Self, DomainError> {
        Self::new(
            labels
                .iter()
                .map(|label| Timeslot::new(*label, capacity))
                .collect(),
        )
    }

    /// Looks up a slot by its exact label.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&Timeslot> {
        self.slots.iter().find(|s| s.label == label)
    }

    /// Iterates slots in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &Timeslot> {
        self.slots.iter()
    }

    /// Number of configured slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always `false`; a catalog holds at least one slot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Default for TimeslotCatalog {
    fn default() -> Self {
        Self {
            slots: DEFAULT_TIMESLOTS
                .iter()
                .map(|label| Timeslot::new(*label, DEFAULT_CAPACITY))
                .collect(),
        }
    }
}
