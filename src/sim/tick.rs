//! Per-tick gameplay pipeline
//!
//! Fixed order within a tick: spawn, resolve gestures, sweep expired, level
//! check. A bubble spawned this tick cannot be missed in the same tick, and a
//! bubble popped this tick is never also counted as expired.

use super::collision::{HandReport, resolve_gestures, sweep};
use super::difficulty::DifficultyParams;
use super::state::{GameEvent, GameState};
use crate::consts::POPS_PER_LEVEL;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Hands detected this frame (may be empty)
    pub hands: Vec<HandReport>,
}

/// Advance gameplay by one tick at session time `now` (seconds).
///
/// Does nothing outside `Playing`. Events are appended to `events`.
pub fn tick(state: &mut GameState, input: &TickInput, now: f64, events: &mut Vec<GameEvent>) {
    if !state.phase.is_gameplay() {
        return;
    }

    count_squeezes(state, &input.hands);

    // 1. Spawn
    let id = state.peek_entity_id();
    let live = state.targets.len();
    if let Some(target) = state.spawner.try_spawn(id, &state.params, live, state.field, now) {
        state.next_entity_id();
        log::debug!(
            "Spawned bubble {} ({:?}) at {:?}",
            target.id,
            target.required_hand(),
            target.pos
        );
        events.push(GameEvent::TargetSpawned {
            id: target.id,
            hand: target.required_hand(),
        });
        state.targets.push(target);
    }

    // 2. Gestures
    for pop in resolve_gestures(&mut state.targets, &input.hands, now) {
        state.stats.record_pop(pop.hand, pop.reaction_time);
        log::debug!(
            "Popped bubble {} with {:?} hand in {:.2}s",
            pop.target_id,
            pop.hand,
            pop.reaction_time
        );
        events.push(GameEvent::TargetPopped {
            id: pop.target_id,
            hand: pop.hand,
            pos: pop.pos,
            reaction_time: pop.reaction_time,
        });
    }

    // 3. Expiry sweep
    for miss in sweep(&mut state.targets, now) {
        state.stats.record_miss(miss.hand);
        log::debug!("Missed bubble {} ({:?})", miss.target_id, miss.hand);
        events.push(GameEvent::TargetMissed {
            id: miss.target_id,
            hand: miss.hand,
        });
    }

    // 4. Level check
    if let Some(level) = check_level_up(state) {
        events.push(GameEvent::LevelUp { level });
    }
}

/// Level earned by pop count: one level per [`POPS_PER_LEVEL`] pops
pub fn level_for_pops(popped: u32) -> u32 {
    1 + popped / POPS_PER_LEVEL
}

/// Raise the level if enough pops have accumulated and refresh the cached
/// parameters. Misses never affect the level.
fn check_level_up(state: &mut GameState) -> Option<u32> {
    let earned = level_for_pops(state.stats.popped);
    if earned <= state.level {
        return None;
    }
    state.level = earned;
    state.params = DifficultyParams::for_level(earned);
    log::info!("Level up! Now level {}", earned);
    Some(earned)
}

/// Count rising edges of each hand's gesture flag
fn count_squeezes(state: &mut GameState, hands: &[HandReport]) {
    let mut active = [false; 2];
    for report in hands.iter().filter(|h| h.gesture_active) {
        active[report.hand.index()] = true;
    }
    for (held, now_active) in state.gesture_held.iter_mut().zip(active) {
        if now_active && !*held {
            state.stats.record_squeeze();
        }
        *held = now_active;
    }
}
