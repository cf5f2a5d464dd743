//! Default roster: an ordered list that skips disabled mobbers

use rand::seq::SliceRandom;
use tracing::debug;
use uuid::Uuid;

use super::{Mobber, MobberPair, Roster};

#[derive(Debug, Clone, Default)]
pub struct Mobbers {
    mobbers: Vec<Mobber>,
    current_mobber: usize,
}

impl Mobbers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.mobbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mobbers.is_empty()
    }

    /// First enabled index at or after `start`, wrapping around the list
    fn enabled_from(&self, start: usize) -> Option<usize> {
        let len = self.mobbers.len();
        (0..len)
            .map(|offset| (start + offset) % len)
            .find(|&index| self.mobbers.get(index).is_some_and(|m| !m.disabled))
    }

    fn current_index(&self) -> Option<usize> {
        if self.mobbers.is_empty() {
            return None;
        }
        let start = if self.current_mobber < self.mobbers.len() {
            self.current_mobber
        } else {
            0
        };
        self.enabled_from(start)
    }
}

impl Roster for Mobbers {
    fn add_mobber(&mut self, mut mobber: Mobber) {
        if mobber.id.is_empty() {
            mobber.id = Uuid::new_v4().to_string();
        }
        debug!("Adding mobber {} ({})", mobber.name, mobber.id);
        self.mobbers.push(mobber);
    }

    fn remove_mobber(&mut self, id: &str) -> Option<Mobber> {
        let index = self.mobbers.iter().position(|m| m.id == id)?;
        let removed = self.mobbers.remove(index);

        if index < self.current_mobber {
            self.current_mobber -= 1;
        }
        if self.current_mobber >= self.mobbers.len() {
            self.current_mobber = 0;
        }

        debug!("Removed mobber {} ({})", removed.name, removed.id);
        Some(removed)
    }

    fn update_mobber(&mut self, mobber: Mobber) -> bool {
        match self.mobbers.iter_mut().find(|m| m.id == mobber.id) {
            Some(existing) => {
                *existing = mobber;
                true
            }
            None => false,
        }
    }

    fn shuffle_mobbers(&mut self) {
        self.mobbers.shuffle(&mut rand::thread_rng());
    }

    fn rotate(&mut self) {
        let Some(current) = self.current_index() else {
            return;
        };
        if let Some(next) = self.enabled_from(current + 1) {
            self.current_mobber = next;
        }
    }

    fn current_and_next(&self) -> MobberPair {
        let Some(current) = self.current_index() else {
            return MobberPair::default();
        };
        let next = self.enabled_from(current + 1);

        MobberPair {
            current: self.mobbers.get(current).cloned(),
            next: next.and_then(|index| self.mobbers.get(index).cloned()),
        }
    }

    fn all(&self) -> &[Mobber] {
        &self.mobbers
    }

    fn current_mobber(&self) -> usize {
        self.current_mobber
    }

    fn set_current_mobber(&mut self, index: usize) {
        self.current_mobber = index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(names: &[&str]) -> Mobbers {
        let mut mobbers = Mobbers::new();
        for name in names {
            mobbers.add_mobber(Mobber::new(*name).with_id(*name));
        }
        mobbers
    }

    fn names(pair: &MobberPair) -> (Option<&str>, Option<&str>) {
        (
            pair.current.as_ref().map(|m| m.name.as_str()),
            pair.next.as_ref().map(|m| m.name.as_str()),
        )
    }

    #[test]
    fn empty_roster_has_no_current_or_next() {
        let mut mobbers = Mobbers::new();
        mobbers.rotate();
        assert_eq!(mobbers.current_and_next(), MobberPair::default());
        assert_eq!(mobbers.current_mobber(), 0);
    }

    #[test]
    fn add_assigns_missing_ids() {
        let mut mobbers = Mobbers::new();
        mobbers.add_mobber(Mobber::new("ada"));
        mobbers.add_mobber(Mobber::new("bob").with_id("fixed"));

        assert!(!mobbers.all()[0].id.is_empty());
        assert_eq!(mobbers.all()[1].id, "fixed");
    }

    #[test]
    fn rotation_cycles_through_everyone() {
        let mut mobbers = roster(&["a", "b", "c"]);
        let mut seen = vec![mobbers.current_mobber()];
        for _ in 0..3 {
            mobbers.rotate();
            seen.push(mobbers.current_mobber());
        }
        assert_eq!(seen, vec![0, 1, 2, 0]);
    }

    #[test]
    fn rotation_skips_disabled_mobbers() {
        let mut mobbers = roster(&["a", "b", "c"]);
        mobbers.update_mobber(Mobber {
            id: "b".into(),
            name: "b".into(),
            disabled: true,
        });

        assert_eq!(names(&mobbers.current_and_next()), (Some("a"), Some("c")));
        mobbers.rotate();
        assert_eq!(mobbers.current_mobber(), 2);
        mobbers.rotate();
        assert_eq!(mobbers.current_mobber(), 0);
    }

    #[test]
    fn disabled_current_resolves_to_next_enabled() {
        let mut mobbers = roster(&["a", "b"]);
        mobbers.update_mobber(Mobber {
            id: "a".into(),
            name: "a".into(),
            disabled: true,
        });
        assert_eq!(names(&mobbers.current_and_next()), (Some("b"), Some("b")));
    }

    #[test]
    fn all_disabled_means_nobody_is_up() {
        let mut mobbers = roster(&["a"]);
        mobbers.update_mobber(Mobber {
            id: "a".into(),
            name: "a".into(),
            disabled: true,
        });
        assert_eq!(mobbers.current_and_next(), MobberPair::default());
    }

    #[test]
    fn removing_before_pointer_keeps_current_mobber() {
        let mut mobbers = roster(&["a", "b", "c"]);
        mobbers.set_current_mobber(2);
        assert!(mobbers.remove_mobber("a").is_some());
        assert_eq!(mobbers.current_mobber(), 1);
        assert_eq!(names(&mobbers.current_and_next()).0, Some("c"));
    }

    #[test]
    fn removing_last_wraps_pointer() {
        let mut mobbers = roster(&["a", "b", "c"]);
        mobbers.set_current_mobber(2);
        mobbers.remove_mobber("c");
        assert_eq!(mobbers.current_mobber(), 0);
    }

    #[test]
    fn unknown_ids_are_reported() {
        let mut mobbers = roster(&["a"]);
        assert!(mobbers.remove_mobber("zzz").is_none());
        assert!(!mobbers.update_mobber(Mobber::new("zzz").with_id("zzz")));
        assert_eq!(mobbers.len(), 1);
    }

    #[test]
    fn shuffle_keeps_everyone() {
        let mut mobbers = roster(&["a", "b", "c", "d"]);
        mobbers.shuffle_mobbers();
        let mut ids: Vec<_> = mobbers.all().iter().map(|m| m.id.clone()).collect();
        ids.sort();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
    }
}
