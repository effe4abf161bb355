//! Core types shared by every game variant: seats, cards, the room
//! document, events, and deterministic RNG.

pub mod card;
pub mod event;
pub mod player;
pub mod rng;
pub mod room;

pub use card::{count_kind, Card};
pub use event::{Event, EventPayload, LogEntry, LogViewer};
pub use player::{Player, PlayerFlags, PlayerId};
pub use rng::{GameRng, GameRngState};
pub use room::{Declaration, Room, RoomStatus, Settings};
