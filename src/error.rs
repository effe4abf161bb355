//! Error taxonomy for the engine.
//!
//! Three families, mirroring how failures are actually handled:
//!
//! - [`ValidationError`]: an illegal action for the current phase or actor.
//!   Recovered locally by the submitting client; never written to the store.
//! - [`EngineError::ResourceExhaustion`]: deck and discard both empty on a
//!   required draw. Fatal to the current round; the engine forces an early
//!   resolution pass instead of crashing.
//! - [`StoreError`]: failures at the shared-document boundary.

use thiserror::Error;

/// An action that is structurally or situationally illegal.
///
/// Validation always happens before any mutation, so a validation failure
/// leaves the room document untouched.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("player {uid} is not seated in this room")]
    UnknownPlayer { uid: String },

    #[error("not eligible to act in phase {phase}")]
    NotEligible { phase: String },

    #[error("action is not legal in phase {phase}")]
    WrongPhase { phase: String },

    #[error("room is not in play")]
    NotPlaying,

    #[error("only the host may do this")]
    NotHost,

    #[error("card index {index} out of range for a hand of {hand_len}")]
    BadCardIndex { index: usize, hand_len: usize },

    #[error("no cards selected")]
    EmptySelection,

    #[error("duplicate card selection")]
    DuplicateSelection,

    #[error("seat {seat} is not a valid target")]
    InvalidTarget { seat: u8 },

    #[error("action requires a target")]
    TargetRequired,

    #[error("action requires a target other than yourself")]
    SelfTarget,

    #[error("target's hand is empty")]
    EmptyTargetHand,

    #[error("a declaration is already pending")]
    DeclarationPending,

    #[error("no declaration to judge")]
    NoDeclaration,

    #[error("ultimate already spent")]
    UltimateSpent,

    #[error("your role has no ultimate")]
    NoUltimate,

    #[error("this game needs {min}-{max} players, have {have}")]
    PlayerCount { min: usize, max: usize, have: usize },

    #[error("role pool has {pool} roles for {seats} seats and none are repeatable")]
    RolePoolTooSmall { seats: usize, pool: usize },

    #[error("unknown role {name}")]
    UnknownRole { name: String },

    #[error("no transition from phase {phase} on {trigger}")]
    NoTransition { phase: String, trigger: String },

    #[error("unknown phase {phase}")]
    UnknownPhase { phase: String },
}

/// Top-level engine error.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Deck and discard both empty on a required draw.
    #[error("deck and discard are both empty")]
    ResourceExhaustion,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures at the room-document store boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("room {0} not found")]
    RoomNotFound(String),

    #[error("room {0} already exists")]
    RoomExists(String),

    #[error("failed to encode or decode room document: {0}")]
    Codec(String),
}
