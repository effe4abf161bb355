//! Phase machine: who may act, and what the next phase is.
//!
//! Each game variant declares its phases and transition table as data in its
//! rule table. The machine itself is shared: [`PhaseTable::can_act`] gates
//! submissions, [`PhaseTable::transition`] is a pure lookup from
//! (phase, trigger) to the next phase.
//!
//! Phase gating is the engine's only serialization primitive (see the
//! concurrency model in the crate docs): tables must name at most one
//! free-acting seat per phase, with everything else being idempotent
//! ready-style toggles.

use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, Room, RoomStatus};
use crate::error::ValidationError;
use crate::resolve::ActionKind;

/// Which seat(s) a phase admits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseActor {
    /// Only the seat holding the turn.
    TurnPlayer,
    /// Only the seat holding this role.
    Role(String),
    /// Every non-eliminated seat (simultaneous ready-style phases).
    Everyone,
    /// Only the host.
    Host,
    /// No submissions accepted.
    Nobody,
}

/// Events that drive phase transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    /// Round setup finished.
    Start,
    /// Every active seat toggled ready.
    AllReady,
    /// A turn action resolved.
    ActionResolved,
    /// An inspector verdict resolved.
    JudgementResolved,
    /// A winner was declared.
    GameOver,
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Trigger::Start => "start",
            Trigger::AllReady => "all_ready",
            Trigger::ActionResolved => "action_resolved",
            Trigger::JudgementResolved => "judgement_resolved",
            Trigger::GameOver => "game_over",
        };
        f.write_str(name)
    }
}

/// One phase: its name, who may act, and which action kinds are legal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSpec {
    pub name: String,
    pub actor: PhaseActor,
    pub legal: Vec<ActionKind>,
}

impl PhaseSpec {
    /// Create a phase admitting no actions.
    pub fn new(name: impl Into<String>, actor: PhaseActor) -> Self {
        Self { name: name.into(), actor, legal: Vec::new() }
    }

    /// Allow an action kind in this phase.
    #[must_use]
    pub fn allow(mut self, kind: ActionKind) -> Self {
        self.legal.push(kind);
        self
    }
}

/// A game variant's phase graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTable {
    pub initial: String,
    pub phases: Vec<PhaseSpec>,
    /// (from, trigger, to) rows.
    pub transitions: Vec<(String, Trigger, String)>,
}

impl PhaseTable {
    /// Create an empty table with the given initial phase.
    pub fn new(initial: impl Into<String>) -> Self {
        Self { initial: initial.into(), phases: Vec::new(), transitions: Vec::new() }
    }

    /// Add a phase.
    #[must_use]
    pub fn with_phase(mut self, phase: PhaseSpec) -> Self {
        self.phases.push(phase);
        self
    }

    /// Add a transition row.
    #[must_use]
    pub fn with_transition(
        mut self,
        from: impl Into<String>,
        trigger: Trigger,
        to: impl Into<String>,
    ) -> Self {
        self.transitions.push((from.into(), trigger, to.into()));
        self
    }

    /// Look up a phase spec by name.
    #[must_use]
    pub fn spec(&self, name: &str) -> Option<&PhaseSpec> {
        self.phases.iter().find(|p| p.name == name)
    }

    /// Whether this seat may submit anything in the room's current phase.
    #[must_use]
    pub fn can_act(&self, room: &Room, actor: PlayerId) -> bool {
        if room.status != RoomStatus::Playing || !room.has_seat(actor) {
            return false;
        }
        let player = room.player(actor);
        if !player.is_active() {
            return false;
        }
        let Some(spec) = self.spec(&room.phase) else {
            return false;
        };
        match &spec.actor {
            PhaseActor::TurnPlayer => actor == room.turn_seat(),
            PhaseActor::Role(role) => player.role.as_deref() == Some(role.as_str()),
            PhaseActor::Everyone => true,
            PhaseActor::Host => room.is_host(&player.uid),
            PhaseActor::Nobody => false,
        }
    }

    /// Whether an action kind is legal in the room's current phase.
    #[must_use]
    pub fn is_legal(&self, room: &Room, kind: ActionKind) -> bool {
        self.spec(&room.phase).is_some_and(|s| s.legal.contains(&kind))
    }

    /// Pure transition lookup; an unknown (phase, trigger) pair is an error.
    pub fn transition(&self, phase: &str, trigger: Trigger) -> Result<&str, ValidationError> {
        self.try_transition(phase, trigger).ok_or_else(|| ValidationError::NoTransition {
            phase: phase.to_string(),
            trigger: trigger.to_string(),
        })
    }

    /// Transition lookup returning `None` when the table has no row, for
    /// triggers that may legitimately leave the phase unchanged.
    #[must_use]
    pub fn try_transition(&self, phase: &str, trigger: Trigger) -> Option<&str> {
        self.transitions
            .iter()
            .find(|(from, t, _)| from == phase && *t == trigger)
            .map(|(_, _, to)| to.as_str())
    }
}

/// Whether every non-eliminated seat is ready.
///
/// Recomputed from the live player list on every call; players join and
/// leave between checks, so the ready set is never cached.
#[must_use]
pub fn all_ready(room: &Room) -> bool {
    let mut any = false;
    for player in room.players.iter().filter(|p| p.is_active()) {
        if !player.ready {
            return false;
        }
        any = true;
    }
    any
}
