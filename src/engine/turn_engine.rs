//! Turn rotation and countdown state machine

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    roster::{Mobber, MobberPair, Mobbers, Roster},
    services::ClipboardHistory,
};

use super::{
    clock::{Clock, ClockPair, TickClock},
    events::{EventCallback, TurnEvent},
    format::get_time_remaining,
    snapshot::{restore_current_mobber, restore_mobbers, Settings, StateSnapshot},
};

/// Where the current turn stands, derived from which clock is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TurnPhase {
    /// Turn clock paused at full duration
    Stopped,
    /// Turn clock counting down
    Running,
    /// Turn expired; alert clock counting up
    Alerting,
    /// Turn clock paused with part of the turn used
    PausedMidTurn,
}

/// Owns turn timing, rotation and session settings.
///
/// Every command runs to completion and reports what changed through the
/// event callback, in order. The owner drives time by calling [`tick`]
/// once per second.
///
/// [`tick`]: TurnEngine::tick
pub struct TurnEngine<C = TickClock, R = Mobbers> {
    settings: Settings,
    seconds_remaining: i64,
    current_mobber: usize,
    roster: R,
    clocks: ClockPair<C>,
    callback: Option<EventCallback>,
    clipboard: Option<Box<dyn ClipboardHistory + Send>>,
}

impl TurnEngine<TickClock, Mobbers> {
    /// Create an engine with default settings and an empty roster
    pub fn new() -> Self {
        Self::with_roster(Mobbers::new())
    }
}

impl Default for TurnEngine<TickClock, Mobbers> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock, R: Roster> TurnEngine<C, R> {
    pub fn with_roster(roster: R) -> Self {
        let settings = Settings::default();
        let clocks = ClockPair::new(settings.seconds_per_turn);

        Self {
            seconds_remaining: settings.seconds_per_turn,
            current_mobber: roster.current_mobber(),
            settings,
            roster,
            clocks,
            callback: None,
            clipboard: None,
        }
    }

    pub fn set_callback<F>(&mut self, callback: F)
    where
        F: FnMut(TurnEvent) + Send + 'static,
    {
        self.callback = Some(Box::new(callback));
    }

    pub fn set_clipboard<H>(&mut self, clipboard: H)
    where
        H: ClipboardHistory + Send + 'static,
    {
        self.clipboard = Some(Box::new(clipboard));
    }

    /// Replace both clocks with a fresh paused pair at full turn duration
    pub fn create_timers(&mut self) {
        self.clocks = ClockPair::new(self.settings.seconds_per_turn);
    }

    fn emit(&mut self, event: TurnEvent) {
        if let Some(callback) = self.callback.as_mut() {
            callback(event);
        }
    }

    /// Advance both clocks by one second.
    ///
    /// The alert clock only advances if it was already running when the tick
    /// began, so an expiry and its first alert tick never share a second.
    pub fn tick(&mut self) {
        let alerting = self.clocks.alert.is_running();

        if let Some(seconds_remaining) = self.clocks.turn.tick() {
            self.on_turn_tick(seconds_remaining);
        }

        if alerting {
            if let Some(seconds) = self.clocks.alert.tick() {
                self.emit(TurnEvent::Alert { seconds });
            }
        }
    }

    fn on_turn_tick(&mut self, seconds_remaining: i64) {
        self.dispatch_timer_change(seconds_remaining);
        if seconds_remaining >= 0 {
            return;
        }

        info!("Turn expired");
        self.pause();
        self.reset(false);
        self.advance_roster();
        self.emit(TurnEvent::TurnEnded);
        self.start_alerts();

        if self.settings.clear_clipboard_history_on_turn_end {
            let keep = self.settings.number_of_items_clipboard_history_stores as usize;
            if let Some(clipboard) = self.clipboard.as_mut() {
                clipboard.clear_history(keep);
            }
        }
    }

    fn dispatch_timer_change(&mut self, seconds_remaining: i64) {
        self.seconds_remaining = seconds_remaining;
        self.emit(TurnEvent::TimerChange {
            seconds_remaining,
            time_remaining: get_time_remaining(seconds_remaining),
            seconds_per_turn: self.settings.seconds_per_turn,
        });
    }

    /// Return the turn clock to full duration, optionally ending the turn first
    pub fn reset(&mut self, stop: bool) {
        if stop {
            self.clocks.turn.pause();
            self.emit(TurnEvent::TurnEnded);
        }
        self.clocks.turn.reset(self.settings.seconds_per_turn);
        self.stop_alerts();
        self.dispatch_timer_change(self.settings.seconds_per_turn);
    }

    pub fn start_alerts(&mut self) {
        self.clocks.alert.reset(0);
        self.clocks.alert.start();
        self.emit(TurnEvent::Alert { seconds: 0 });
    }

    pub fn stop_alerts(&mut self) {
        self.clocks.alert.pause();
        self.clocks.alert.reset(0);
        self.emit(TurnEvent::StopAlerts);
    }

    /// Resume a turn only if part of it has already been used
    pub fn start_remaining(&mut self) {
        if self.seconds_remaining < self.settings.seconds_per_turn {
            self.start();
        }
    }

    pub fn start(&mut self) {
        self.clocks.turn.start();
        self.emit(TurnEvent::Started);
        self.stop_alerts();
    }

    pub fn pause(&mut self) {
        self.clocks.turn.pause();
        self.emit(TurnEvent::Paused);
        self.stop_alerts();
    }

    /// End the current turn and hand over to the next mobber
    pub fn rotate(&mut self) {
        self.reset(true);
        self.advance_roster();
    }

    fn advance_roster(&mut self) {
        self.roster.rotate();
        self.current_mobber = self.roster.current_mobber();
        let state = self.get_state();
        self.emit(TurnEvent::ConfigUpdated(state));

        let MobberPair { current, next } = self.roster.current_and_next();
        debug!(
            "Rotated to {} (next: {})",
            current.as_ref().map_or("nobody", |m| m.name.as_str()),
            next.as_ref().map_or("nobody", |m| m.name.as_str()),
        );
        self.emit(TurnEvent::Rotated {
            current,
            next,
            time_remaining: get_time_remaining(self.seconds_remaining),
        });
    }

    /// Bring a newly attached observer up to date
    pub fn initialize(&mut self) {
        let MobberPair { current, next } = self.roster.current_and_next();
        let event = TurnEvent::Initialized {
            current,
            next,
            time_remaining: get_time_remaining(self.seconds_remaining),
            is_timer_running: self.clocks.turn.is_running(),
            is_time_remaining: self.seconds_remaining < self.settings.seconds_per_turn,
        };
        self.emit(event);
    }

    /// Publish the whole settings snapshot after any change
    pub fn publish_config(&mut self) {
        self.initialize();
        let state = self.get_state();
        self.emit(TurnEvent::ConfigUpdated(state));
    }

    /// Stop and reset a turn whose mobber is no longer eligible
    fn end_invalidated_turn(&mut self) {
        self.pause();
        self.reset(false);
        self.emit(TurnEvent::TurnEnded);
    }

    pub fn add_mobber(&mut self, mobber: Mobber) {
        self.roster.add_mobber(mobber);
        self.publish_config();
    }

    /// Remove a mobber by id. Returns false, emitting nothing, for unknown ids.
    pub fn remove_mobber(&mut self, id: &str) -> bool {
        let removing_current = self
            .roster
            .current_and_next()
            .current
            .is_some_and(|current| current.id == id);

        let Some(removed) = self.roster.remove_mobber(id) else {
            return false;
        };
        self.current_mobber = self.roster.current_mobber();

        if removing_current {
            info!("Removed {} during their turn, ending it", removed.name);
            self.end_invalidated_turn();
        }

        self.publish_config();
        true
    }

    /// Replace a mobber's record. Returns false, emitting nothing, for unknown ids.
    pub fn update_mobber(&mut self, mobber: Mobber) -> bool {
        let disabling_current = mobber.disabled
            && self
                .roster
                .current_and_next()
                .current
                .is_some_and(|current| current.id == mobber.id);

        let name = mobber.name.clone();
        if !self.roster.update_mobber(mobber) {
            return false;
        }

        if disabling_current {
            info!("Disabled {} during their turn, ending it", name);
            self.end_invalidated_turn();
        }

        self.publish_config();
        true
    }

    pub fn shuffle_mobbers(&mut self) {
        self.roster.shuffle_mobbers();
        self.publish_config();
    }

    /// Change the turn length; values below one second are clamped
    pub fn set_seconds_per_turn(&mut self, value: i64) {
        let value = value.max(1);
        self.settings.seconds_per_turn = value;
        self.seconds_remaining = value;
        self.publish_config();
        self.reset(false);
    }

    pub fn set_seconds_until_fullscreen(&mut self, value: i64) {
        self.settings.seconds_until_fullscreen = value;
        self.publish_config();
    }

    pub fn set_snap_threshold(&mut self, value: i64) {
        self.settings.snap_threshold = value;
        self.publish_config();
    }

    pub fn set_alert_sound(&mut self, sound: Option<String>) {
        self.settings.alert_sound = sound;
        self.publish_config();
    }

    pub fn set_alert_sound_times(&mut self, seconds: Vec<i64>) {
        self.settings.alert_sound_times = seconds;
        self.publish_config();
    }

    pub fn set_timer_always_on_top(&mut self, value: bool) {
        self.settings.timer_always_on_top = value;
        self.publish_config();
    }

    pub fn set_shuffle_mobbers_on_startup(&mut self, value: bool) {
        self.settings.shuffle_mobbers_on_startup = value;
        self.publish_config();
    }

    pub fn set_clear_clipboard_history_on_turn_end(&mut self, value: bool) {
        self.settings.clear_clipboard_history_on_turn_end = value;
        self.publish_config();
    }

    /// Change how many clipboard entries survive a turn end; clamped to at least one
    pub fn set_number_of_items_clipboard_history_stores(&mut self, value: i64) {
        self.settings.number_of_items_clipboard_history_stores =
            u32::try_from(value.max(1)).unwrap_or(u32::MAX);
        self.publish_config();
    }

    pub fn get_state(&self) -> StateSnapshot {
        StateSnapshot {
            mobbers: self.roster.all().to_vec(),
            settings: self.settings.clone(),
            current_mobber: self.current_mobber,
            seconds_remaining: self.seconds_remaining,
        }
    }

    /// Restore a persisted state record, ignoring malformed fields.
    ///
    /// A restored session always starts at the top of a turn, with a fresh
    /// pair of clocks.
    pub fn load_state(&mut self, state: &Value) {
        let mobbers = restore_mobbers(state);
        let restored_mobbers = mobbers.len();
        for mobber in mobbers {
            self.roster.add_mobber(mobber);
        }

        self.settings.restore_from(state);

        if let Some(index) = restore_current_mobber(state) {
            // An index past the roster falls back to the first mobber
            let index = if index < self.roster.all().len() { index } else { 0 };
            self.current_mobber = index;
            self.roster.set_current_mobber(index);
        }
        self.seconds_remaining = self.settings.seconds_per_turn;

        self.create_timers();
        info!(
            "Loaded state: {} mobbers, {}s per turn",
            restored_mobbers, self.settings.seconds_per_turn
        );
    }

    pub fn phase(&self) -> TurnPhase {
        if self.clocks.turn.is_running() {
            TurnPhase::Running
        } else if self.clocks.alert.is_running() {
            TurnPhase::Alerting
        } else if self.seconds_remaining < self.settings.seconds_per_turn {
            TurnPhase::PausedMidTurn
        } else {
            TurnPhase::Stopped
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn seconds_remaining(&self) -> i64 {
        self.seconds_remaining
    }

    pub fn time_remaining(&self) -> String {
        get_time_remaining(self.seconds_remaining)
    }

    pub fn current_mobber(&self) -> usize {
        self.current_mobber
    }

    pub fn current_and_next(&self) -> MobberPair {
        self.roster.current_and_next()
    }

    pub fn roster(&self) -> &R {
        &self.roster
    }

    pub fn clocks(&self) -> &ClockPair<C> {
        &self.clocks
    }
}

impl<C: fmt::Debug, R: fmt::Debug> fmt::Debug for TurnEngine<C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TurnEngine")
            .field("settings", &self.settings)
            .field("seconds_remaining", &self.seconds_remaining)
            .field("current_mobber", &self.current_mobber)
            .field("roster", &self.roster)
            .field("clocks", &self.clocks)
            .finish_non_exhaustive()
    }
}
