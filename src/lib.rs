//! # parlor
//!
//! A turn-based, multi-actor party game engine built around a shared,
//! whole-document room state.
//!
//! ## Design Principles
//!
//! 1. **Rule Tables Over Branching**: The engine never branches on which
//!    game is being played. Every variant is a [`rules::RuleSet`]: deck
//!    spec, role definitions, phase graph, thresholds.
//!
//! 2. **Pure Resolution**: Actions resolve as pure functions over a room
//!    snapshot. Validation runs completely before any mutation, so an
//!    illegal action can never leave a half-applied document.
//!
//! 3. **Seeded Randomness**: Every shuffle and random pick goes through a
//!    [`core::GameRng`] whose O(1) state lives inside the room document,
//!    so any client holding the document continues the same stream and
//!    replays are reproducible.
//!
//! ## Architecture
//!
//! - **Whole-Document Store**: The core talks to a [`store::RoomStore`]
//!   through read/write/subscribe only: no field-level merge, no
//!   transactions stronger than "replace the document".
//!
//! - **Bounded Cascades**: A drawn hazard can eliminate its holder, whose
//!   forced successor draw can eliminate the next seat too. The chain runs
//!   as a bounded work loop, never recursive re-entry.
//!
//! - **Fixed Win Precedence**: Lone survivor beats every personal
//!   directive; directives are checked in seat order.
//!
//! ## Modules
//!
//! - `core`: Room document, players, cards, events, RNG
//! - `deck`: Build, shuffle, constrained draw, reshuffle-from-discard
//! - `roles`: Role definitions, hidden directives, assignment
//! - `phase`: Per-variant phase graph and actor gating
//! - `resolve`: Action validation and resolution
//! - `payout`: Deterministic percentage-modifier math
//! - `elimination`: Overload rule and cascade loop
//! - `win`: Win evaluation and round closure
//! - `store`: Whole-document room persistence
//! - `engine`: Read-modify-write driver over a rule table and a store
//! - `games`: Shipped variants as rule tables

pub mod core;
pub mod deck;
pub mod elimination;
pub mod engine;
pub mod error;
pub mod games;
pub mod payout;
pub mod phase;
pub mod resolve;
pub mod roles;
pub mod rules;
pub mod store;
pub mod win;

// Re-export commonly used types
pub use crate::core::{
    Card, Declaration, Event, EventPayload, GameRng, GameRngState, LogEntry, LogViewer, Player,
    PlayerFlags, PlayerId, Room, RoomStatus, Settings,
};

pub use crate::deck::{DeckSpec, KindSpec};
pub use crate::engine::Engine;
pub use crate::error::{EngineError, StoreError, ValidationError};
pub use crate::phase::{PhaseActor, PhaseSpec, PhaseTable, Trigger};
pub use crate::resolve::{Action, ActionKind, Resolution, RevealMode, TransferDest, Verdict};
pub use crate::roles::{ActionFamily, AssignConstraints, Directive, RoleDef, UltimateSpec};
pub use crate::rules::{JudgementRules, RuleSet};
pub use crate::store::{MemoryStore, RoomStore, SubscriptionId};
