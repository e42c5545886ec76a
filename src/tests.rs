#[cfg(test)]
mod unit_tests {
    use std::collections::HashMap;

    use crate::engine::Engine;
    use crate::errors::EngineError;
    use crate::hand_calculator::HandCalculator;
    use crate::log::GameEvent;
    use crate::parser::{parse_hand, parse_tile};
    use crate::rule::GameRule;
    use crate::state::player::RiverTile;
    use crate::state::{Action, GameState, Phase};
    use crate::tile;
    use crate::types::{Meld, MeldType, WinContext, Wind};
    use crate::yaku::Yaku;

    fn calc(text: &str) -> HandCalculator {
        HandCalculator::from_text(text).unwrap()
    }

    // --- Hand evaluation scenarios ------------------------------------

    #[test]
    fn pinfu_tsumo_twenty_fu() {
        // Non-dealer draws 9s onto 234m 567p 22p 345s 78s.
        let c = calc("234m567p22p345s78s");
        let mut waits = c.waits();
        waits.sort_unstable();
        assert_eq!(waits, vec![23, 26]); // 6s and 9s

        let ctx = WinContext {
            tsumo: true,
            seat_wind: Wind::South,
            round_wind: Wind::East,
            ..Default::default()
        };
        let res = c.evaluate(parse_tile("9s").unwrap(), &[], &[], &ctx);
        assert!(res.agari);
        assert!(res.yaku.contains(&Yaku::Pinfu));
        assert!(res.yaku.contains(&Yaku::MenzenTsumo));
        assert_eq!(res.han, 2);
        assert_eq!(res.fu, 20);
        assert_eq!(res.pay_tsumo_dealer, 700);
        assert_eq!(res.pay_tsumo_each, 400);
    }

    #[test]
    fn seven_pairs_ron_twenty_five_fu() {
        let c = calc("1m1m4m4m7p7p2s2s5s5s6z6z9p");
        assert_eq!(c.waits(), vec![17]); // 9p

        let ctx = WinContext {
            seat_wind: Wind::West,
            round_wind: Wind::East,
            ..Default::default()
        };
        let res = c.evaluate(parse_tile("9p").unwrap(), &[], &[], &ctx);
        assert!(res.agari);
        assert!(res.yaku.contains(&Yaku::Chiitoitsu));
        assert_eq!(res.han, 2);
        assert_eq!(res.fu, 25);
        assert_eq!(res.pay_ron, 1600);
    }

    #[test]
    fn open_chanta_rounds_to_thirty_fu() {
        // Pon of a non-valued wind, tanki on 9s.
        let c = calc("123m789m123p9s(p1z1)");
        let ctx = WinContext {
            seat_wind: Wind::West,
            round_wind: Wind::South,
            ..Default::default()
        };
        let res = c.evaluate(parse_tile("9s").unwrap(), &[], &[], &ctx);
        assert!(res.agari);
        assert!(res.yaku.contains(&Yaku::Chanta));
        assert!(!res.yaku.contains(&Yaku::YakuhaiRoundWind));
        assert!(!res.yaku.contains(&Yaku::YakuhaiSeatWind));
        assert_eq!(res.han, 1);
        // 20 base + 4 open honor triplet + 2 tanki = 26, rounded up.
        assert_eq!(res.fu, 30);
        assert_eq!(res.pay_ron, 1000);
    }

    #[test]
    fn best_variant_prefers_ryanpeiko_over_seven_pairs() {
        let c = calc("2m2m3m3m4m4m2p2p3p3p4p5s5s");
        let ctx = WinContext {
            seat_wind: Wind::South,
            round_wind: Wind::East,
            ..Default::default()
        };
        let res = c.evaluate(parse_tile("4p").unwrap(), &[], &[], &ctx);
        assert!(res.agari);
        assert!(res.yaku.contains(&Yaku::Ryanpeiko));
        assert!(res.yaku.contains(&Yaku::Pinfu));
        assert!(!res.yaku.contains(&Yaku::Chiitoitsu));
        assert_eq!(res.han, 4);
        assert_eq!(res.fu, 30);
    }

    #[test]
    fn best_variant_prefers_triplets_when_they_pay_more() {
        // 111222333m reads as three triplets (sanankou, 50 fu) or three
        // identical runs (iipeiko, 40 fu).
        let c = calc("1m1m1m2m2m2m3m3m3m456s7z");
        let ctx = WinContext {
            seat_wind: Wind::South,
            round_wind: Wind::East,
            ..Default::default()
        };
        let res = c.evaluate(parse_tile("7z").unwrap(), &[], &[], &ctx);
        assert!(res.agari);
        assert!(res.yaku.contains(&Yaku::Sanankou));
        assert_eq!(res.han, 2);
        assert_eq!(res.fu, 50);
    }

    #[test]
    fn yaku_less_shape_is_not_a_win_on_ron() {
        // Closed hand waiting 6p/9p: the 6p side completes a winning shape
        // carrying no yaku at all, the 9p side is junchan.
        let c = calc("1m1m1m7p8p1s1s1s2s3s7s8s9s");
        let ctx = WinContext {
            seat_wind: Wind::West,
            round_wind: Wind::East,
            ..Default::default()
        };
        let res = c.evaluate(parse_tile("6p").unwrap(), &[], &[], &ctx);
        assert!(res.has_shape);
        assert!(!res.agari);
        let res9 = c.evaluate(parse_tile("9p").unwrap(), &[], &[], &ctx);
        assert!(res9.agari);
        assert!(res9.yaku.contains(&Yaku::Junchan));
        assert!(res9.han >= 3);
    }

    #[test]
    fn kokushi_and_blessings_stack() {
        let c = calc("1m9m1p9p1s9s1z2z3z4z5z6z7z");
        let ctx = WinContext {
            tsumo: true,
            first_draw: true,
            seat_wind: Wind::East,
            round_wind: Wind::East,
            ..Default::default()
        };
        let res = c.evaluate(parse_tile("1m").unwrap(), &[], &[], &ctx);
        assert!(res.agari);
        assert!(res.yaku.contains(&Yaku::Kokushi));
        assert!(res.yaku.contains(&Yaku::Tenhou));
        assert_eq!(res.yakuman_count, 2);
        assert_eq!(res.han, 26);
    }

    #[test]
    fn dora_rides_on_a_real_yaku() {
        // Closed tanyao, tanki on 6p; the indicator 5p points at 6p.
        let c = calc("234m567m345p66p678s");
        let ctx = WinContext {
            seat_wind: Wind::South,
            round_wind: Wind::East,
            ..Default::default()
        };
        let indicator = parse_tile("5p").unwrap();
        let res = c.evaluate(parse_tile("6p").unwrap(), &[indicator], &[], &ctx);
        assert!(res.agari);
        assert!(res.yaku.contains(&Yaku::Tanyao));
        assert!(res.yaku.contains(&Yaku::Dora));
        // Tanyao plus two dora on the pair.
        assert_eq!(res.han, 3);
    }

    // --- State-machine scenarios --------------------------------------

    fn tids(text: &str) -> Vec<u8> {
        parse_hand(text).unwrap().0
    }

    /// Swap the wanted physical tiles into a seat's hand, preserving tile
    /// conservation. The seat's drawn tile, if any, is left in place.
    fn force_hand(state: &mut GameState, seat: usize, want: &[u8]) {
        for &tid in want {
            if state.players[seat].hand.contains(&tid) {
                continue;
            }
            let out_idx = state.players[seat]
                .hand
                .iter()
                .position(|t| !want.contains(t) && Some(*t) != state.drawn_tile)
                .expect("hand has a swappable tile");
            let out = state.players[seat].hand[out_idx];

            if let Some(w) = state.wall.tiles.iter().position(|&t| t == tid) {
                state.wall.tiles[w] = out;
            } else {
                for other in 0..4 {
                    if other == seat {
                        continue;
                    }
                    if let Some(h) = state.players[other].hand.iter().position(|&t| t == tid) {
                        state.players[other].hand[h] = out;
                        if state.drawn_tile == Some(tid) {
                            state.drawn_tile = Some(out);
                        }
                        state.players[other].sort_hand();
                        state.players[other].update_waits();
                        break;
                    }
                }
            }
            state.players[seat].hand[out_idx] = tid;
        }
        state.players[seat].sort_hand();
        state.players[seat].update_waits();
    }

    /// Hand the seat a ready-made closed quad, pulling the four copies out
    /// of the wall (or other hands) so the tile count stays at 136.
    fn grant_quad(state: &mut GameState, seat: usize, kind: u8) {
        let mut quad = Vec::new();
        for copy in 0..4u8 {
            let tid = kind * 4 + copy;
            if let Some(pos) = state.wall.tiles.iter().position(|&t| t == tid) {
                state.wall.tiles.remove(pos);
                quad.push(tid);
                continue;
            }
            for other in 0..4 {
                if let Some(h) = state.players[other].hand.iter().position(|&t| t == tid) {
                    let replacement = state.wall.tiles.pop().expect("wall not empty");
                    state.players[other].hand[h] = replacement;
                    if state.drawn_tile == Some(tid) {
                        state.drawn_tile = Some(replacement);
                    }
                    state.players[other].sort_hand();
                    state.players[other].update_waits();
                    quad.push(tid);
                    break;
                }
            }
        }
        assert_eq!(quad.len(), 4);
        state.players[seat]
            .melds
            .push(Meld::new(MeldType::Ankan, quad, None));
    }

    fn one(seat: u8, action: Action) -> HashMap<u8, Action> {
        let mut m = HashMap::new();
        m.insert(seat, action);
        m
    }

    fn pass_all(state: &mut GameState) {
        while matches!(state.phase, Phase::DiscardResponse | Phase::QuadResponse) {
            let mut actions = HashMap::new();
            for &seat in state.claims.keys() {
                actions.insert(seat, Action::Pass);
            }
            state.apply(&actions).unwrap();
        }
    }

    #[test]
    fn four_wind_abort_keeps_dealer_and_bumps_honba() {
        let mut state = GameState::new(GameRule::default(), Some(11));
        let east: Vec<u8> = (108u8..112).collect();
        for (seat, &tid) in east.iter().enumerate() {
            force_hand(&mut state, seat, &[tid]);
        }

        for &tid in &east {
            let seat = state.current_player;
            assert_eq!(state.phase, Phase::SelfAction);
            state.apply(&one(seat, Action::Discard { tile: tid })).unwrap();
            if state.needs_next_hand {
                break;
            }
            pass_all(&mut state);
        }

        assert!(state.needs_next_hand);
        assert_eq!(state.scores(), [25000; 4]);
        // Advancing keeps the dealer and adds a repeat counter.
        state.apply(&HashMap::new()).unwrap();
        assert_eq!(state.dealer, 0);
        assert_eq!(state.honba, 1);
    }

    #[test]
    fn furiten_blocks_ron() {
        let mut state = GameState::new(GameRule::default(), Some(23));

        // Seat 1 tenpai on 3p/6p with a 6p already in its river.
        force_hand(&mut state, 1, &tids("234m567m234s5s5s4p5p"));
        let mut waits = state.players[1].waits.clone();
        waits.sort_unstable();
        assert_eq!(waits, vec![11, 14]);

        let sixp_pos = state
            .wall
            .tiles
            .iter()
            .position(|&t| tile::kind(t) == 14)
            .unwrap();
        let sixp = state.wall.tiles.remove(sixp_pos);
        state.players[1].river.push(RiverTile {
            tile: sixp,
            from_hand: true,
            riichi: false,
            still_visible: true,
        });
        assert!(state.players[1].river_furiten());

        // Dealer discards 3p; seat 1 must not see a ron offer.
        let threep = tids("3p")[0];
        force_hand(&mut state, 0, &[threep]);
        state
            .apply(&one(0, Action::Discard { tile: threep }))
            .unwrap();

        let offers = state.legal_actions(1);
        assert!(!offers.contains(&Action::Ron));
        assert!(state.players[1].temporary_furiten);
    }

    #[test]
    fn ron_transfers_and_conservation() {
        let mut state = GameState::new(GameRule::single_hand(), Some(31));

        // Seat 1: pure straight, shanpon wait on 9p/east.
        force_hand(&mut state, 1, &tids("123m456m789m9p9p1z1z"));
        // Seat 1 already holds the first two 9p copies; feed the third.
        let ninep: u8 = 17 * 4 + 2;
        force_hand(&mut state, 0, &[ninep]);

        let before = state.scores();
        state
            .apply(&one(0, Action::Discard { tile: ninep }))
            .unwrap();
        assert_eq!(state.phase, Phase::DiscardResponse);
        assert!(state.legal_actions(1).contains(&Action::Ron));
        state.apply(&one(1, Action::Ron)).unwrap();

        let after = state.scores();
        let res = state.win_results.get(&1).unwrap();
        assert!(res.yaku.contains(&Yaku::Ittsuu));
        assert_eq!(res.han, 2);
        assert_eq!(res.fu, 40);
        assert_eq!(after[1] - before[1], 2600);
        assert_eq!(after[0] - before[0], -2600);
        assert_eq!(after.iter().sum::<i32>(), before.iter().sum::<i32>());
    }

    #[test]
    fn dealer_tsumo_transfers() {
        let mut state = GameState::new(GameRule::single_hand(), Some(37));
        let want = tids("234m567m234s5s5s4p5p");
        force_hand(&mut state, 0, &want);

        // Swap the one non-tenpai tile for a winning 3p out of the wall and
        // treat it as the draw.
        let w = state
            .wall
            .tiles
            .iter()
            .position(|&t| tile::kind(t) == 11)
            .unwrap();
        let threep = state.wall.tiles[w];
        let idx = state.players[0]
            .hand
            .iter()
            .position(|t| !want.contains(t))
            .unwrap();
        state.wall.tiles[w] = state.players[0].hand[idx];
        state.players[0].hand[idx] = threep;
        state.drawn_tile = Some(threep);
        // Past the blessing window, this is an ordinary tsumo.
        state.first_go_around = false;

        assert!(state.legal_actions(0).contains(&Action::Tsumo));
        let before = state.scores();
        state.apply(&one(0, Action::Tsumo)).unwrap();
        let after = state.scores();

        let res = state.win_results.get(&0).unwrap();
        assert!(res.yaku.contains(&Yaku::Pinfu));
        assert!(res.yaku.contains(&Yaku::MenzenTsumo));
        // Dealer pinfu tsumo: 2 han 20 fu, 700 from each seat.
        assert_eq!(after[0] - before[0], 2100);
        for seat in 1..4 {
            assert_eq!(after[seat] - before[seat], -700);
        }
    }

    #[test]
    fn riichi_deposit_and_ippatsu_window() {
        let mut state = GameState::new(GameRule::default(), Some(41));
        force_hand(&mut state, 0, &tids("234m567m234s5s5s4p5p"));
        let drawn = state.drawn_tile.unwrap();

        let offers = state.legal_actions(0);
        assert!(offers.contains(&Action::Riichi { tile: drawn }));

        state.apply(&one(0, Action::Riichi { tile: drawn })).unwrap();
        pass_all(&mut state);

        assert!(state.players[0].riichi);
        assert!(state.players[0].ippatsu);
        assert_eq!(state.players[0].score, 24000);
        assert_eq!(state.riichi_sticks, 1);
        assert_eq!(state.current_player, 1);

        // Riichi player's later discards are locked to the drawn tile.
        // Walk the turn back around to seat 0.
        for _ in 0..3 {
            let seat = state.current_player;
            let legals = state.legal_actions(seat);
            let discard = legals
                .iter()
                .find(|a| matches!(a, Action::Discard { .. }))
                .cloned()
                .unwrap();
            state.apply(&one(seat, discard)).unwrap();
            if state.needs_next_hand {
                return; // an abort ended the hand early; nothing to check
            }
            pass_all(&mut state);
            if state.needs_next_hand {
                return;
            }
        }
        assert_eq!(state.current_player, 0);
        let locked = state.legal_actions(0);
        let drawn_now = state.drawn_tile.unwrap();
        for a in &locked {
            if let Action::Discard { tile } = a {
                assert_eq!(*tile, drawn_now);
            }
        }
        // One full go-around without a call spends ippatsu on the discard.
        state
            .apply(&one(0, Action::Discard { tile: drawn_now }))
            .unwrap();
        assert!(!state.players[0].ippatsu);
    }

    #[test]
    fn riichi_needs_points_and_tenpai() {
        let mut state = GameState::new(GameRule::default(), Some(43));
        force_hand(&mut state, 0, &tids("234m567m234s5s5s4p5p"));
        assert!(state
            .legal_actions(0)
            .iter()
            .any(|a| matches!(a, Action::Riichi { .. })));

        state.players[0].score = 900;
        assert!(!state
            .legal_actions(0)
            .iter()
            .any(|a| matches!(a, Action::Riichi { .. })));
        state.players[0].score = 25000;

        // A hand nowhere near tenpai gets no riichi offer.
        force_hand(&mut state, 0, &tids("159m159p159s1z2z3z5z"));
        assert!(!state
            .legal_actions(0)
            .iter()
            .any(|a| matches!(a, Action::Riichi { .. })));
    }

    #[test]
    fn closed_quad_reveals_dora_and_draws_rinshan() {
        let mut state = GameState::new(GameRule::default(), Some(47));
        force_hand(&mut state, 0, &tids("1m1m1m1m234m567m5s5s9p"));

        let offers = state.legal_actions(0);
        assert!(offers.contains(&Action::Ankan { kind: 0 }));

        state.apply(&one(0, Action::Ankan { kind: 0 })).unwrap();
        assert_eq!(state.players[0].melds.len(), 1);
        assert_eq!(state.players[0].melds[0].meld_type, MeldType::Ankan);
        assert_eq!(state.wall.dora_indicators.len(), 2);
        assert_eq!(state.wall.rinshan_drawn, 1);
        assert!(state.drawn_tile.is_some());
        assert!(state
            .log
            .events()
            .iter()
            .any(|e| matches!(e, GameEvent::RevealDora { .. })));
        assert!(state
            .log
            .events()
            .iter()
            .any(|e| matches!(e, GameEvent::Draw { rinshan: true, .. })));
    }

    #[test]
    fn fifth_quad_is_blocked_and_split_quads_abort() {
        let mut state = GameState::new(GameRule::default(), Some(53));
        grant_quad(&mut state, 0, 9); // 1p
        grant_quad(&mut state, 0, 10); // 2p
        grant_quad(&mut state, 1, 11); // 3p
        grant_quad(&mut state, 1, 12); // 4p

        // Even with four of a kind in hand, no fifth quad is offered.
        force_hand(&mut state, 0, &tids("5m5m5m5m"));
        assert!(!state
            .legal_actions(0)
            .iter()
            .any(|a| matches!(a, Action::Ankan { .. } | Action::Kakan { .. })));

        // The next resolved discard aborts the hand: quads split 2/2.
        let discard = state
            .legal_actions(0)
            .iter()
            .find_map(|a| match a {
                Action::Discard { tile } => Some(*tile),
                _ => None,
            })
            .unwrap();
        state.apply(&one(0, Action::Discard { tile: discard })).unwrap();
        pass_all(&mut state);
        assert!(state.needs_next_hand);
    }

    #[test]
    fn nine_terminals_aborts_on_first_turn() {
        let mut state = GameState::new(GameRule::default(), Some(59));
        force_hand(&mut state, 0, &tids("19m19p19s1234567z"));

        let offers = state.legal_actions(0);
        assert!(offers.contains(&Action::NineTerminals));
        state.apply(&one(0, Action::NineTerminals)).unwrap();
        assert!(state.needs_next_hand);
        assert_eq!(state.scores(), [25000; 4]);

        state.apply(&HashMap::new()).unwrap();
        assert_eq!(state.dealer, 0);
        assert_eq!(state.honba, 1);
    }

    #[test]
    fn illegal_actions_leave_the_state_untouched() {
        let mut state = GameState::new(GameRule::default(), Some(61));
        let scores = state.scores();
        let hand = state.players[0].hand.clone();

        // A tile the dealer does not hold.
        let foreign = state.wall.tiles[40];
        let err = state
            .apply(&one(0, Action::Discard { tile: foreign }))
            .unwrap_err();
        assert!(matches!(err, EngineError::IllegalAction { seat: 0, .. }));
        assert_eq!(state.scores(), scores);
        assert_eq!(state.players[0].hand, hand);
        assert_eq!(state.phase, Phase::SelfAction);

        // A non-deciding seat cannot act either.
        let err = state.apply(&one(2, Action::Pass)).unwrap_err();
        assert!(matches!(err, EngineError::IllegalAction { seat: 2, .. }));
    }

    // --- Engine-level round trips -------------------------------------

    fn discard_chooser(seat: u8, legals: &[Action]) -> Action {
        let _ = seat;
        legals
            .iter()
            .find(|a| matches!(a, Action::Discard { .. }))
            .cloned()
            .unwrap_or(Action::Pass)
    }

    #[test]
    fn exhaustive_draw_after_all_discards() {
        let mut engine = Engine::with_seed(GameRule::single_hand(), 67);
        let mut saw_last_draw = false;

        // Drive manually so the haitei window can be observed.
        let mut steps = 0;
        while !engine.is_done() && steps < 1000 {
            steps += 1;
            if engine.state.needs_next_hand {
                engine.apply(&HashMap::new()).unwrap();
                continue;
            }
            if engine.state.wall.live_remaining() == 0 && engine.state.drawn_tile.is_some() {
                let seat = engine.state.current_player;
                assert!(engine.state.win_context(seat, true, false).haitei);
                saw_last_draw = true;
            }
            let mut actions = HashMap::new();
            match engine.state.phase {
                Phase::SelfAction => {
                    let seat = engine.state.current_player;
                    let legals = engine.legal_actions(seat);
                    actions.insert(seat, discard_chooser(seat, &legals));
                }
                _ => {
                    for &seat in engine.state.claims.keys() {
                        actions.insert(seat, Action::Pass);
                    }
                }
            }
            engine.apply(&actions).unwrap();
        }

        assert!(engine.is_done());
        assert!(saw_last_draw);
        assert_eq!(engine.state.wall.live_remaining(), 0);
        // Tenpai payments move points around but conserve the pool.
        assert_eq!(engine.scores().iter().sum::<i32>(), 100_000);
        assert!(matches!(
            engine.log().events().last(),
            Some(GameEvent::ScoreSnapshot { .. })
        ));
    }

    #[test]
    fn replaying_recorded_actions_reproduces_the_outcome() {
        let order = crate::tenhou::tenhou_yama_from_seed(&{
            use base64::engine::general_purpose::STANDARD;
            use base64::Engine as _;
            let bytes: Vec<u8> = (0..2496u32).map(|i| ((i * 11 + 5) % 256) as u8).collect();
            STANDARD.encode(bytes)
        })
        .unwrap();

        let run = |record: Option<&mut Vec<HashMap<u8, Action>>>,
                   replay: Option<&[HashMap<u8, Action>]>|
         -> ([i32; 4], usize) {
            let mut engine = Engine::new(GameRule::single_hand());
            engine.init_with_wall(order.clone()).unwrap();
            let mut recorded = record;
            let mut cursor = 0usize;
            let mut seed = 0x9e37u64;
            let mut steps = 0;
            while !engine.is_done() && steps < 2000 {
                steps += 1;
                if engine.state.needs_next_hand {
                    engine.apply(&HashMap::new()).unwrap();
                    continue;
                }
                let actions = if let Some(tape) = replay {
                    let a = tape[cursor].clone();
                    cursor += 1;
                    a
                } else {
                    let mut actions = HashMap::new();
                    match engine.state.phase {
                        Phase::SelfAction => {
                            let seat = engine.state.current_player;
                            let legals = engine.legal_actions(seat);
                            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
                            let pick = legals[(seed >> 33) as usize % legals.len()].clone();
                            actions.insert(seat, pick);
                        }
                        _ => {
                            let mut seats: Vec<u8> =
                                engine.state.claims.keys().copied().collect();
                            seats.sort_unstable();
                            for seat in seats {
                                let legals = engine.legal_actions(seat);
                                seed =
                                    seed.wrapping_mul(6364136223846793005).wrapping_add(1);
                                let pick =
                                    legals[(seed >> 33) as usize % legals.len()].clone();
                                actions.insert(seat, pick);
                            }
                        }
                    }
                    actions
                };
                if let Some(tape) = recorded.as_mut() {
                    tape.push(actions.clone());
                }
                engine.apply(&actions).unwrap();
            }
            (engine.scores(), engine.log().events().len())
        };

        let mut tape = Vec::new();
        let (scores_a, events_a) = run(Some(&mut tape), None);
        let (scores_b, events_b) = run(None, Some(&tape));
        assert_eq!(scores_a, scores_b);
        assert_eq!(events_a, events_b);
    }

    #[test]
    fn random_game_completes_with_conserved_points() {
        let mut engine = Engine::with_seed(GameRule::default(), 71);
        let mut seed = 71u64;
        let steps = engine
            .run_to_completion(|_, legals| {
                seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
                legals[(seed >> 33) as usize % legals.len()].clone()
            })
            .unwrap();
        assert!(engine.is_done());
        assert!(steps > 20);
        let total: i32 =
            engine.scores().iter().sum::<i32>() + engine.state.riichi_sticks as i32 * 1000;
        assert_eq!(total, 100_000);
    }
}
