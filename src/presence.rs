//! Per-slot presence stamps and the freshness / pause-timeout policy.
//!
//! All decisions here are lazy: nothing fires autonomously, callers compare
//! stored timestamps against the `now` they were invoked at.

use crate::game::Slot;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Seconds after which a presence stamp is considered stale.
pub const FRESHNESS_WINDOW_SECS: i64 = 60;

/// Seconds a session may stay paused before it is forcibly ended.
pub const PAUSE_TIMEOUT_SECS: i64 = 300;

/// Per-slot last-seen timestamps. Unset until the slot's client first
/// proves liveness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presence {
    /// Slot A's last heartbeat or move.
    pub seen_a: Option<DateTime<Utc>>,
    /// Slot B's last heartbeat or move.
    pub seen_b: Option<DateTime<Utc>>,
}

impl Presence {
    /// Last-seen stamp for a slot.
    pub fn seen(&self, slot: Slot) -> Option<DateTime<Utc>> {
        match slot {
            Slot::A => self.seen_a,
            Slot::B => self.seen_b,
        }
    }

    /// Refreshes a slot's stamp to `now`.
    pub fn touch(&mut self, slot: Slot, now: DateTime<Utc>) {
        match slot {
            Slot::A => self.seen_a = Some(now),
            Slot::B => self.seen_b = Some(now),
        }
    }

    /// Whether a slot's stamp exists and is within the freshness window.
    pub fn is_fresh(&self, slot: Slot, now: DateTime<Utc>) -> bool {
        self.seen(slot)
            .is_some_and(|seen| now - seen <= Duration::seconds(FRESHNESS_WINDOW_SECS))
    }

    /// Attributes abandonment after a pause timeout.
    ///
    /// If exactly one slot is fresh, the stale slot is the abandoner. If
    /// both or neither are fresh the attribution is ambiguous and stays
    /// unset.
    pub fn attribute_abandonment(&self, now: DateTime<Utc>) -> Option<Slot> {
        match (self.is_fresh(Slot::A, now), self.is_fresh(Slot::B, now)) {
            (true, false) => Some(Slot::B),
            (false, true) => Some(Slot::A),
            _ => None,
        }
    }
}

/// Whether a pause that began at `paused_at` has outlived the pause
/// timeout.
pub fn pause_expired(paused_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - paused_at > Duration::seconds(PAUSE_TIMEOUT_SECS)
}
