//! Hazard overload and cascading elimination.
//!
//! After any mutation that can put a hazard card into a hand (a draw, a
//! trade, a forced seizure), the chain runs: every seat holding hazards at
//! or above its personal threshold is eliminated, its hand moves to the
//! discard, and if that seat held the turn, the turn passes on. In games
//! where the incoming seat must immediately draw, that draw can eliminate
//! them too, so the whole thing loops as a bounded work-list rather than
//! recursing.

use tracing::debug;

use crate::core::{EventPayload, GameRng, LogViewer, PlayerId, Room};
use crate::deck;
use crate::error::EngineError;
use crate::rules::RuleSet;

/// Iteration bound multiplier for the cascade loop. Each pass eliminates at
/// least one seat or terminates, so `players * 4` is far beyond reachable.
pub const CHAIN_BOUND_FACTOR: usize = 4;

/// Outcome of one chain run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChainOutcome {
    /// Seats eliminated during this run, in elimination order.
    pub eliminated: Vec<PlayerId>,
    /// Overload passes performed.
    pub passes: usize,
}

/// One overload pass: eliminate every seat at or over its hazard threshold.
///
/// A seat holding a badge burns it instead: the hazards leave the hand for
/// the discard and the seat stays in the round.
///
/// Idempotent: running it again on the resulting state is a no-op.
pub fn apply_overload(room: &mut Room, rules: &RuleSet) -> Vec<PlayerId> {
    let mut eliminated = Vec::new();

    for seat in PlayerId::all(room.players.len()) {
        let player = room.player(seat);
        if !player.is_active() {
            continue;
        }
        let threshold = rules.hazard_threshold_for(player);
        let hazards = rules.deck.hazard_count(&player.hand);
        if hazards < threshold as usize {
            continue;
        }

        let name = player.name.clone();
        if player.flags.badge {
            // The badge absorbs the overload: shed hazards, keep the seat.
            let player = room.player_mut(seat);
            player.flags.badge = false;
            let mut kept = Vec::new();
            let mut shed = Vec::new();
            for card in player.hand.drain(..) {
                if rules.deck.is_hazard(&card.kind) {
                    shed.push(card);
                } else {
                    kept.push(card);
                }
            }
            player.hand = kept;
            room.discard.extend(shed);
            room.push_log(
                format!("{}'s badge absorbs the overload", name),
                "elimination",
                LogViewer::All,
            );
            continue;
        }

        let hand = std::mem::take(&mut room.player_mut(seat).hand);
        room.discard.extend(hand);
        room.player_mut(seat).flags.eliminated = true;
        room.push_log(
            format!("{} overloaded ({} hazards) and is out", name, hazards),
            "elimination",
            LogViewer::All,
        );
        room.push_event("eliminated", seat, None, EventPayload::None);
        eliminated.push(seat);
    }

    eliminated
}

/// Run the full cascade until the turn holder is a surviving seat, at most
/// one seat remains, or the iteration bound is hit.
pub fn run_chain(
    room: &mut Room,
    rules: &RuleSet,
    rng: &mut GameRng,
) -> Result<ChainOutcome, EngineError> {
    let mut outcome = ChainOutcome::default();
    let bound = room.players.len() * CHAIN_BOUND_FACTOR;

    for _ in 0..bound {
        outcome.passes += 1;
        let eliminated = apply_overload(room, rules);
        let holder_fell = eliminated.contains(&room.turn_seat());
        outcome.eliminated.extend(eliminated);

        if room.survivor_count() <= 1 {
            break;
        }

        if holder_fell {
            room.advance_turn_where(|p| rules.takes_turns(p));
            if rules.forced_draw_on_turn_start {
                // The incoming seat must draw, which may overload them too.
                let seat = room.turn_seat();
                let card = deck::draw_with_reshuffle(&mut room.deck, &mut room.discard, rng)?;
                let name = room.player(seat).name.clone();
                room.player_mut(seat).hand.push(card);
                room.push_log(
                    format!("{} takes the turn and must draw", name),
                    "action",
                    LogViewer::All,
                );
                continue;
            }
            continue;
        }

        // Turn holder survived this pass: stable.
        break;
    }

    room.ensure_turn_where(|p| rules.takes_turns(p));
    if !outcome.eliminated.is_empty() {
        debug!(eliminated = outcome.eliminated.len(), passes = outcome.passes, "chain settled");
    }
    Ok(outcome)
}
