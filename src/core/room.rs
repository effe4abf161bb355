//! The room document.
//!
//! A [`Room`] is the full, self-contained state of one game room, the only
//! thing that ever crosses the store boundary, always as a whole document.
//! Every client sees fully-formed snapshots; the engine mutates a deep copy
//! and writes the result back.
//!
//! Invariants:
//! - `status == Playing` implies `phase` names a phase of the active variant.
//! - `turn_index` always indexes a non-eliminated seat while playing (it is
//!   recomputed before a snapshot is persisted).
//! - Cards in `deck + discard + pool + hands` are constant across any single
//!   resolved action.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::card::Card;
use super::event::{Event, EventPayload, LogEntry, LogViewer};
use super::player::{Player, PlayerId};
use super::rng::GameRngState;

/// Room lifecycle status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomStatus {
    Lobby,
    Playing,
    Finished,
}

/// A pending declaration: cards committed to the pool under a claimed kind,
/// awaiting judgement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    pub seat: PlayerId,
    /// The kind the declarer claims every pool card to be.
    pub kind: String,
    pub count: usize,
}

/// Per-room settings, persisted with the document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Rule-table name ("smuggle", "overload", "glitch").
    pub variant: String,
    /// Long-game multiplier for deck construction.
    pub long_game: bool,
    /// RNG stream position; every client resolves randomness from here.
    pub rng: GameRngState,
}

/// One room's full game state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub host_uid: String,
    pub status: RoomStatus,
    /// Current phase name; meaningful only while `Playing`.
    pub phase: String,
    /// Seat index of the acting player for turn-gated phases.
    pub turn_index: usize,
    pub players: Vec<Player>,
    /// Face-down draw pile; top is the end of the vec.
    pub deck: Vec<Card>,
    pub discard: Vec<Card>,
    /// Declaration pool (face-down committed cards).
    pub pool: Vec<Card>,
    pub declaration: Option<Declaration>,
    pub round: u32,
    /// Append-only; structural sharing keeps snapshot copies cheap.
    pub logs: Vector<LogEntry>,
    pub last_event: Option<Event>,
    next_event_id: u64,
    next_log_id: u64,
    pub settings: Settings,
}

impl Room {
    /// Create an empty lobby.
    pub fn new(id: impl Into<String>, host_uid: impl Into<String>, settings: Settings) -> Self {
        Self {
            id: id.into(),
            host_uid: host_uid.into(),
            status: RoomStatus::Lobby,
            phase: String::new(),
            turn_index: 0,
            players: Vec::new(),
            deck: Vec::new(),
            discard: Vec::new(),
            pool: Vec::new(),
            declaration: None,
            round: 0,
            logs: Vector::new(),
            last_event: None,
            next_event_id: 1,
            next_log_id: 1,
            settings,
        }
    }

    // === Seats ===

    /// Resolve a client uid to a seat.
    #[must_use]
    pub fn seat_of(&self, uid: &str) -> Option<PlayerId> {
        self.players.iter().position(|p| p.uid == uid).map(|i| PlayerId::new(i as u8))
    }

    /// Whether a seat index is in range.
    #[must_use]
    pub fn has_seat(&self, seat: PlayerId) -> bool {
        seat.index() < self.players.len()
    }

    /// The player at a seat. Panics if the seat is out of range; resolve
    /// targets through [`Room::has_seat`] first.
    #[must_use]
    pub fn player(&self, seat: PlayerId) -> &Player {
        &self.players[seat.index()]
    }

    /// Mutable player at a seat.
    pub fn player_mut(&mut self, seat: PlayerId) -> &mut Player {
        &mut self.players[seat.index()]
    }

    /// Whether the uid is the host.
    #[must_use]
    pub fn is_host(&self, uid: &str) -> bool {
        self.host_uid == uid
    }

    // === Turn order ===

    /// Seats still in the round, in seat order.
    pub fn survivors(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_active())
            .map(|(i, _)| PlayerId::new(i as u8))
    }

    /// Number of non-eliminated seats.
    #[must_use]
    pub fn survivor_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_active()).count()
    }

    /// The seat currently holding the turn.
    #[must_use]
    pub fn turn_seat(&self) -> PlayerId {
        PlayerId::new(self.turn_index as u8)
    }

    /// Pass the turn to the next non-eliminated seat.
    ///
    /// Leaves `turn_index` unchanged when no seat is active.
    pub fn advance_turn(&mut self) {
        self.advance_turn_where(|_| true);
    }

    /// Pass the turn to the next non-eliminated seat satisfying `eligible`.
    ///
    /// Leaves `turn_index` unchanged when no such seat exists.
    pub fn advance_turn_where(&mut self, eligible: impl Fn(&Player) -> bool) {
        let n = self.players.len();
        for step in 1..=n {
            let idx = (self.turn_index + step) % n;
            let seat = &self.players[idx];
            if seat.is_active() && eligible(seat) {
                self.turn_index = idx;
                return;
            }
        }
    }

    /// Recompute `turn_index` so it indexes an active seat, keeping it in
    /// place when the current holder is still alive.
    pub fn ensure_turn_valid(&mut self) {
        self.ensure_turn_where(|_| true);
    }

    /// Like [`Room::ensure_turn_valid`], but the holder must also satisfy
    /// `eligible`; otherwise the turn moves to the next seat that does.
    pub fn ensure_turn_where(&mut self, eligible: impl Fn(&Player) -> bool) {
        if self.players.is_empty() {
            return;
        }
        let holder = &self.players[self.turn_index % self.players.len()];
        if !holder.is_active() || !eligible(holder) {
            self.advance_turn_where(eligible);
        }
    }

    // === Log and events ===

    /// Append a log entry, assigning the next log id.
    pub fn push_log(&mut self, text: impl Into<String>, kind: &str, viewer: LogViewer) {
        let entry = LogEntry {
            id: self.next_log_id,
            text: text.into(),
            kind: kind.to_string(),
            viewer,
        };
        self.next_log_id += 1;
        self.logs.push_back(entry);
    }

    /// Emit a targeted event, assigning the next monotonic event id.
    pub fn push_event(
        &mut self,
        kind: &str,
        initiator: PlayerId,
        target: Option<PlayerId>,
        payload: EventPayload,
    ) -> Event {
        let event = Event {
            id: self.next_event_id,
            kind: kind.to_string(),
            initiator,
            target,
            payload,
        };
        self.next_event_id += 1;
        self.last_event = Some(event.clone());
        event
    }

    // === Invariant checks ===

    /// Total cards in circulation: deck + discard + pool + all hands.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.deck.len()
            + self.discard.len()
            + self.pool.len()
            + self.players.iter().map(|p| p.hand.len()).sum::<usize>()
    }
}
