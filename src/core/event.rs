//! Targeted events and the append-only log.
//!
//! Two distinct channels come out of action resolution:
//!
//! - [`Event`]: a single-consumption notification meant for exactly one
//!   player's client (a revealed hand, a received trade card). Event ids are
//!   strictly increasing per room, so a client can tell "have I already shown
//!   this" by comparing against the last id it surfaced; there is no ack
//!   channel.
//! - [`LogEntry`]: append-only, never mutated or removed; the sole mechanism
//!   for catch-up context. Full detail of reveals never lands here.

use serde::{Deserialize, Serialize};

use super::card::Card;
use super::player::PlayerId;

/// Who may see a log entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogViewer {
    /// Everyone in the room.
    All,
    /// A single seat.
    Player(PlayerId),
}

/// One line of the append-only room log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Monotonic per room.
    pub id: u64,
    pub text: String,
    /// Category for presentation ("action", "elimination", "win", ...).
    pub kind: String,
    pub viewer: LogViewer,
}

/// Payload carried by a targeted event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EventPayload {
    None,
    /// Revealed or received cards.
    Cards(Vec<Card>),
    /// A payout, fine, or score delta.
    Amount(i64),
}

/// A targeted, single-consumption notification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Strictly increasing per room.
    pub id: u64,
    /// Event kind ("hand_revealed", "trade_received", ...).
    pub kind: String,
    pub initiator: PlayerId,
    /// The seat this event is for. `None` means every client may surface it.
    pub target: Option<PlayerId>,
    pub payload: EventPayload,
}

impl Event {
    /// Whether the given seat should surface this event.
    #[must_use]
    pub fn is_for(&self, seat: PlayerId) -> bool {
        match self.target {
            Some(t) => t == seat,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_targeting() {
        let ev = Event {
            id: 1,
            kind: "hand_revealed".into(),
            initiator: PlayerId::new(0),
            target: Some(PlayerId::new(2)),
            payload: EventPayload::None,
        };
        assert!(ev.is_for(PlayerId::new(2)));
        assert!(!ev.is_for(PlayerId::new(1)));
    }

    #[test]
    fn test_broadcast_event() {
        let ev = Event {
            id: 2,
            kind: "round_won".into(),
            initiator: PlayerId::new(1),
            target: None,
            payload: EventPayload::Amount(3),
        };
        assert!(ev.is_for(PlayerId::new(0)));
        assert!(ev.is_for(PlayerId::new(3)));
    }

    #[test]
    fn test_log_entry_serde() {
        let entry = LogEntry {
            id: 7,
            text: "Ada drew a card".into(),
            kind: "action".into(),
            viewer: LogViewer::All,
        };
        let json = serde_json::to_string(&entry).unwrap();
        let back: LogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, back);
    }
}
