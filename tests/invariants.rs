//! Property-based invariant tests.
//!
//! Plays full games from random seeds with random action selection and
//! checks the core invariants at every step: tile conservation, point
//! conservation, wait-set correctness, and the furiten lockout.

use proptest::prelude::*;
use riichi_engine::state::legal_actions::GameStateLegalActions;
use riichi_engine::state::{Action, GameState, Phase};
use riichi_engine::{GameRule, Hand};
use std::collections::HashMap;

const MAX_STEPS: u32 = 20_000;

/// Deterministic "random" pick from seed + counter.
fn pick(seed: u64, counter: u64, legal: &[Action]) -> Action {
    let mix = seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(counter.wrapping_mul(1442695040888963407));
    legal[(mix >> 33) as usize % legal.len()].clone()
}

fn brute_force_waits(state: &GameState, seat: usize) -> Vec<u8> {
    let p = &state.players[seat];
    let mut hand = Hand::new();
    for &t in &p.hand {
        hand.add(t / 4);
    }
    if hand.total() + p.melds.len() as u8 * 3 != 13 {
        return Vec::new();
    }
    let mut waits = Vec::new();
    for k in 0..34u8 {
        if hand.counts[k as usize] >= 4 {
            continue;
        }
        hand.add(k);
        if riichi_engine::agari::is_agari(&mut hand) {
            waits.push(k);
        }
        hand.remove(k);
    }
    waits
}

fn check_invariants(state: &GameState, seed: u64, step: u32) -> Result<(), TestCaseError> {
    // Tile conservation across wall, hands, melds, and visible rivers.
    prop_assert_eq!(
        state.total_tiles(),
        136,
        "seed {} step {}: tile count broken",
        seed,
        step
    );

    // Point pool conservation, riichi sticks included.
    let pool: i32 =
        state.scores().iter().sum::<i32>() + state.riichi_sticks as i32 * 1000;
    prop_assert_eq!(pool, 100_000, "seed {} step {}: points leaked", seed, step);

    // Cached waits match a brute-force probe of the hand.
    for seat in 0..4 {
        let mut cached = state.players[seat].waits.clone();
        cached.sort_unstable();
        let mut brute = brute_force_waits(state, seat);
        brute.sort_unstable();
        if state.players[seat].hand.len() + state.players[seat].melds.len() * 3 == 13 {
            prop_assert_eq!(
                &cached,
                &brute,
                "seed {} step {} seat {}: waits out of date",
                seed,
                step,
                seat
            );
        }
    }

    // A furiten player never sees a ron offer.
    if matches!(state.phase, Phase::DiscardResponse | Phase::QuadResponse) {
        for seat in 0..4u8 {
            if state.players[seat as usize].is_furiten() {
                let offers = state.legal_actions_for(seat);
                prop_assert!(
                    !offers.contains(&Action::Ron),
                    "seed {} step {}: furiten seat {} offered ron",
                    seed,
                    step,
                    seat
                );
            }
        }
    }
    Ok(())
}

fn play_checked(seed: u64) -> Result<(GameState, u32), TestCaseError> {
    let mut state = GameState::new(GameRule::default(), Some(seed));
    let mut counter = 0u64;
    let mut steps = 0u32;

    while !state.is_done && steps < MAX_STEPS {
        steps += 1;
        if state.needs_next_hand {
            state.apply(&HashMap::new()).map_err(|e| {
                TestCaseError::fail(format!("seed {seed}: next-hand apply failed: {e}"))
            })?;
            continue;
        }

        let mut actions = HashMap::new();
        match state.phase {
            Phase::SelfAction => {
                let seat = state.current_player;
                let legal = state.legal_actions(seat);
                prop_assert!(
                    !legal.is_empty(),
                    "seed {} step {}: no legal action for seat {}",
                    seed,
                    steps,
                    seat
                );
                counter += 1;
                actions.insert(seat, pick(seed, counter, &legal));
            }
            Phase::DiscardResponse | Phase::QuadResponse => {
                let mut seats: Vec<u8> = state.claims.keys().copied().collect();
                seats.sort_unstable();
                for seat in seats {
                    let legal = state.legal_actions(seat);
                    if legal.is_empty() {
                        continue;
                    }
                    counter += 1;
                    actions.insert(seat, pick(seed, counter, &legal));
                }
            }
            Phase::Ended => break,
        }

        state
            .apply(&actions)
            .map_err(|e| TestCaseError::fail(format!("seed {seed}: apply failed: {e}")))?;
        check_invariants(&state, seed, steps)?;
    }
    Ok((state, steps))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn random_games_hold_invariants(seed in 0u64..1_000_000) {
        let (state, steps) = play_checked(seed)?;
        prop_assert!(state.is_done, "seed {}: game did not finish in {} steps", seed, steps);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(4))]

    #[test]
    fn seeded_games_are_deterministic(seed in 0u64..100_000) {
        let (a, _) = play_checked(seed)?;
        let (b, _) = play_checked(seed)?;
        prop_assert_eq!(a.scores(), b.scores());
        prop_assert_eq!(a.log.events().len(), b.log.events().len());
    }
}
