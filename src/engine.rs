//! Orchestration over one [`RuleSet`] and one [`RoomStore`].
//!
//! The [`Engine`] is the only writer: every entry point reads the latest
//! room document, derives the next state through the pure resolution
//! pipeline, and writes the whole document back. Randomness is never
//! ambient: the generator is rebuilt from the state persisted in the room
//! document, so any process holding the document continues the same
//! stream.

use tracing::{debug, info};

use crate::core::{GameRng, LogViewer, Player, PlayerId, Room, RoomStatus, Settings};
use crate::error::{EngineError, StoreError, ValidationError};
use crate::phase::{self, Trigger};
use crate::resolve::{self, Action, ActionKind};
use crate::rules::RuleSet;
use crate::store::RoomStore;
use crate::{deck, elimination, roles, win};

/// Game engine bound to one rule table and one store.
pub struct Engine<S: RoomStore> {
    rules: RuleSet,
    store: S,
}

impl<S: RoomStore> Engine<S> {
    pub fn new(rules: RuleSet, store: S) -> Self {
        Self { rules, store }
    }

    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Latest snapshot of a room.
    pub fn room(&self, room_id: &str) -> Result<Room, EngineError> {
        Ok(self.store.read(room_id)?)
    }

    /// Create a lobby with the host seated.
    pub fn create_room(
        &self,
        room_id: &str,
        host_uid: &str,
        host_name: &str,
        seed: u64,
        long_game: bool,
    ) -> Result<Room, EngineError> {
        let settings = Settings {
            variant: self.rules.name.clone(),
            long_game,
            rng: GameRng::new(seed).state(),
        };
        let mut room = Room::new(room_id, host_uid, settings);
        room.players.push(Player::new(host_uid, host_name));
        room.push_log(format!("{} opened the room", host_name), "lobby", LogViewer::All);
        self.store.create(&room)?;
        info!(room = room_id, seed, "room created");
        Ok(room)
    }

    /// Seat a player. Lobby only; capped at the rule table's maximum.
    pub fn join(&self, room_id: &str, uid: &str, name: &str) -> Result<Room, EngineError> {
        let mut room = self.store.read(room_id)?;
        if room.status != RoomStatus::Lobby {
            return Err(ValidationError::NotPlaying.into());
        }
        if room.seat_of(uid).is_some() {
            // Rejoining is a no-op.
            return Ok(room);
        }
        if room.players.len() >= self.rules.max_players {
            return Err(ValidationError::PlayerCount {
                min: self.rules.min_players,
                max: self.rules.max_players,
                have: room.players.len() + 1,
            }
            .into());
        }
        room.players.push(Player::new(uid, name));
        room.push_log(format!("{} joined", name), "lobby", LogViewer::All);
        self.store.write(&room)?;
        Ok(room)
    }

    /// Unseat a player. Lobby only. An emptied room is deleted; a departing
    /// host hands the room to the next seat.
    pub fn leave(&self, room_id: &str, uid: &str) -> Result<Option<Room>, EngineError> {
        let mut room = self.store.read(room_id)?;
        if room.status != RoomStatus::Lobby {
            return Err(ValidationError::NotPlaying.into());
        }
        let seat = room
            .seat_of(uid)
            .ok_or_else(|| ValidationError::UnknownPlayer { uid: uid.into() })?;
        let gone = room.players.remove(seat.index());
        if room.players.is_empty() {
            self.store.delete(room_id)?;
            return Ok(None);
        }
        if room.host_uid == uid {
            room.host_uid = room.players[0].uid.clone();
        }
        room.push_log(format!("{} left", gone.name), "lobby", LogViewer::All);
        self.store.write(&room)?;
        Ok(Some(room))
    }

    /// Host removes another seated player. Lobby only.
    pub fn kick(&self, room_id: &str, host_uid: &str, uid: &str) -> Result<Room, EngineError> {
        let room = self.store.read(room_id)?;
        if !room.is_host(host_uid) {
            return Err(ValidationError::NotHost.into());
        }
        if host_uid == uid {
            return Err(ValidationError::SelfTarget.into());
        }
        // The host is still seated, so leave cannot empty the room out.
        self.leave(room_id, uid)?
            .ok_or_else(|| EngineError::Store(StoreError::RoomNotFound(room_id.to_string())))
    }

    /// Start (or restart) a round: build and shuffle the deck, deal,
    /// assign roles, reset per-round resources, and enter the opening
    /// phase.
    pub fn start_round(&self, room_id: &str, uid: &str) -> Result<Room, EngineError> {
        let mut room = self.store.read(room_id)?;
        if !room.is_host(uid) {
            return Err(ValidationError::NotHost.into());
        }
        if room.status == RoomStatus::Playing {
            return Err(ValidationError::NotPlaying.into());
        }
        self.rules.validate_player_count(room.players.len())?;

        let mut rng = GameRng::from_state(&room.settings.rng);
        room.round += 1;

        room.deck = deck::build(&self.rules.deck, room.players.len(), room.settings.long_game);
        deck::shuffle(&mut room.deck, &mut rng);
        debug_assert!(room.deck.len() >= self.rules.min_deck_size());

        room.discard.clear();
        room.pool.clear();
        room.declaration = None;
        room.last_event = None;

        for player in &mut room.players {
            player.hand.clear();
            player.ready = false;
            player.flags.eliminated = false;
            player.flags.ultimate_spent = false;
            player.flags.crashed = false;
            for (key, value) in &self.rules.starting_resources {
                player.set_resource(key.clone(), *value);
            }
        }

        // Stable round-robin: the forced role (when the table has one) and
        // the opening turn both rotate one seat per round.
        let rotor = (room.round as usize - 1) % room.players.len();
        let constraints = roles::AssignConstraints {
            forced: self
                .rules
                .forced_role
                .as_ref()
                .map(|name| (PlayerId::new(rotor as u8), name.clone())),
        };
        roles::assign(&mut room.players, &self.rules.roles, &constraints, &mut rng)?;
        // With a forced judge seat, the opening turn starts one seat past
        // it so the judge never opens against themselves.
        room.turn_index =
            if self.rules.forced_role.is_some() { (rotor + 1) % room.players.len() } else { rotor };

        for seat in 0..room.players.len() {
            for _ in 0..self.rules.hand_size {
                // A deal that cannot stay within the per-kind caps is a
                // misconfigured table; surface it rather than seating
                // players over the threshold.
                let card = deck::draw_constrained(
                    &mut room.deck,
                    &room.players[seat].hand,
                    |card, hand| self.rules.deal_reject(card, hand),
                )
                .ok_or(EngineError::ResourceExhaustion)?;
                room.players[seat].hand.push(card);
            }
        }

        room.status = RoomStatus::Playing;
        room.phase = self.rules.phases.initial.clone();
        if let Some(next) = self.rules.phases.try_transition(&room.phase, Trigger::Start) {
            room.phase = next.to_string();
        }
        room.push_log(format!("round {} begins", room.round), "round", LogViewer::All);
        room.settings.rng = rng.state();
        self.store.write(&room)?;
        info!(room = room_id, round = room.round, "round started");
        Ok(room)
    }

    /// Submit one player action: resolve it, run the overload cascade,
    /// check for a winner, and advance the phase machine.
    pub fn submit(&self, room_id: &str, uid: &str, action: &Action) -> Result<Room, EngineError> {
        let room = self.store.read(room_id)?;
        let seat = room
            .seat_of(uid)
            .ok_or_else(|| ValidationError::UnknownPlayer { uid: uid.into() })?;
        let mut rng = GameRng::from_state(&room.settings.rng);

        let mut next = match resolve::resolve(&room, &self.rules, seat, action, &mut rng) {
            Ok(resolution) => resolution.room,
            Err(EngineError::ResourceExhaustion) => return self.finish_exhausted(room, rng),
            Err(err) => return Err(err),
        };
        debug!(room = room_id, actor = %seat, action = ?action.kind(), "action resolved");

        match elimination::run_chain(&mut next, &self.rules, &mut rng) {
            Ok(_) => {}
            Err(EngineError::ResourceExhaustion) => return self.finish_exhausted(next, rng),
            Err(err) => return Err(err),
        }

        if next.survivor_count() == 0 {
            // A single resolution can overload several seats at once.
            win::finish_without_winner(&mut next, &self.rules);
        } else if let Some(winner) = win::evaluate(&next) {
            win::declare_winner(&mut next, &self.rules, winner);
        } else {
            self.advance_phase(&mut next, action.kind());
        }

        next.settings.rng = rng.state();
        self.store.write(&next)?;
        Ok(next)
    }

    fn advance_phase(&self, room: &mut Room, kind: ActionKind) {
        let trigger = match kind {
            ActionKind::Ready => {
                if !phase::all_ready(room) {
                    return;
                }
                Trigger::AllReady
            }
            ActionKind::Judgement => Trigger::JudgementResolved,
            // An ultimate is a free action: no turn pass, no phase change.
            ActionKind::Ultimate => return,
            _ => Trigger::ActionResolved,
        };
        if let Some(next) = self.rules.phases.try_transition(&room.phase, trigger) {
            room.phase = next.to_string();
            if trigger == Trigger::AllReady {
                for player in &mut room.players {
                    player.ready = false;
                }
            }
        }
    }

    /// The deck and discard ran dry on a required draw: resolve the round
    /// early with whatever standing the table has.
    fn finish_exhausted(&self, mut room: Room, rng: GameRng) -> Result<Room, EngineError> {
        room.push_log("the deck ran dry, ending the round early", "round", LogViewer::All);
        match win::evaluate(&room) {
            Some(winner) => win::declare_winner(&mut room, &self.rules, winner),
            None => win::finish_without_winner(&mut room, &self.rules),
        }
        room.settings.rng = rng.state();
        self.store.write(&room)?;
        Ok(room)
    }
}
