//! Roster management module
//!
//! This module defines the participant roster contract the turn engine
//! depends on, and the default ordered implementation.

pub mod mobbers;

use serde::{Deserialize, Serialize};

pub use mobbers::Mobbers;

/// A participant in the mob
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mobber {
    /// Stable identifier; assigned by the roster when left empty
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// Disabled mobbers are skipped when rotating
    #[serde(default)]
    pub disabled: bool,
}

impl Mobber {
    /// Create an enabled mobber without an id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            disabled: false,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// The mobber whose turn it is and the one who follows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobberPair {
    pub current: Option<Mobber>,
    pub next: Option<Mobber>,
}

/// Ordered participants plus the current-turn pointer
pub trait Roster {
    fn add_mobber(&mut self, mobber: Mobber);

    /// Remove the mobber with `id`, returning it if it was present
    fn remove_mobber(&mut self, id: &str) -> Option<Mobber>;

    /// Replace the record sharing `mobber.id`. Returns false for unknown ids.
    fn update_mobber(&mut self, mobber: Mobber) -> bool;

    fn shuffle_mobbers(&mut self);

    /// Advance the current-turn pointer to the next eligible mobber
    fn rotate(&mut self);

    fn current_and_next(&self) -> MobberPair;

    fn all(&self) -> &[Mobber];

    fn current_mobber(&self) -> usize;

    fn set_current_mobber(&mut self, index: usize);
}
