    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use sugar_engine::{
        ActionSlot, Direction, InputSnapshot, KeyPress, Rect, Scene, SceneCommand, TickOutcome,
        Vec2,
    };
    use tempfile::TempDir;

    use super::catalog::{BehaviorConfig, SceneConfig};
    use super::*;
    use crate::economy::{CandyType, Character, SaveStore, UpgradeId, UpgradeOffer, DEFAULT_SLOT};
    use crate::minigame::MinigameView;

    const DT: f32 = 1.0 / 60.0;

    fn context() -> (TempDir, SceneContext) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SaveStore::new(dir.path(), DEFAULT_SLOT).expect("store");
        let context = SceneContext::open(store, StdRng::seed_from_u64(42)).expect("open context");
        (dir, context)
    }

    fn builtin_config(id: &str) -> SceneConfig {
        SceneCatalog::builtin()
            .get(&SceneId::from(id))
            .cloned()
            .expect("builtin scene config")
    }

    fn enter(id: &str, config: SceneConfig, context: &mut SceneContext) -> PlayScene {
        let mut scene = PlayScene::new(SceneId::from(id), config, context);
        scene.load(context);
        scene
    }

    fn pressed(key: KeyPress) -> InputSnapshot {
        InputSnapshot::empty().with_pressed(key)
    }

    fn step<S>(scene: &mut S, context: &mut SceneContext, input: &InputSnapshot) -> SceneCommand
    where
        S: Scene<Context = SceneContext, View = FrameView>,
    {
        scene.process_input(input, context);
        scene.update(DT, context)
    }

    fn press<S>(scene: &mut S, context: &mut SceneContext, key: KeyPress) -> SceneCommand
    where
        S: Scene<Context = SceneContext, View = FrameView>,
    {
        step(scene, context, &pressed(key))
    }

    fn idle<S>(scene: &mut S, context: &mut SceneContext) -> SceneCommand
    where
        S: Scene<Context = SceneContext, View = FrameView>,
    {
        step(scene, context, &InputSnapshot::empty())
    }

    fn switched_to(id: &str) -> SceneCommand {
        SceneCommand::SwitchTo(SceneId::from(id))
    }

    fn negotiation_sequence(view: &FrameView) -> Option<Vec<Direction>> {
        view.minigames.iter().find_map(|minigame| match minigame {
            MinigameView::Negotiation { sequence, .. } => Some(sequence.clone()),
            _ => None,
        })
    }

    fn rhythm_state(view: &FrameView) -> (&'static str, u32) {
        view.minigames
            .iter()
            .find_map(|minigame| match minigame {
                MinigameView::Rhythm {
                    phase, required, ..
                } => Some((*phase, *required)),
                _ => None,
            })
            .expect("street shows the rhythm game")
    }

    fn give_upgrade(context: &mut SceneContext, upgrade: UpgradeId) {
        let offer = UpgradeOffer {
            upgrade,
            cost: 0,
            bonus: None,
        };
        let outcome = context.transact("test_upgrade", |profile| profile.purchase_upgrade(&offer));
        assert!(outcome.is_completed());
    }

    fn classroom_without_detector(spawn: Vec2) -> SceneConfig {
        let mut config = builtin_config(ids::CLASSROOM);
        config.spawn = spawn;
        if let BehaviorConfig::Classroom(classroom) = &mut config.behavior {
            classroom.detector.radius = 0.0;
        }
        config
    }

    #[test]
    fn registry_holds_every_scene_id() {
        let registry = build_registry(&SceneCatalog::builtin()).expect("registry");
        let ids: Vec<&str> = registry.ids().map(SceneId::as_str).collect();

        assert_eq!(
            ids,
            vec![
                "brother_a_transition",
                "brother_b_transition",
                "classroom",
                "costco",
                "ending",
                "hallway",
                "instructions",
                "load_save",
                "playground",
                "store",
                "street",
                "title_screen",
            ]
        );
    }

    #[test]
    fn unknown_scene_is_fatal_and_keeps_current_scene() {
        let (_dir, context) = context();
        let mut director = build_director(&SceneCatalog::builtin(), context).expect("director");

        let err = director
            .switch_to(SceneId::from("nowhere"))
            .expect_err("unknown id");

        assert_eq!(
            err,
            SceneError::UnknownScene {
                id: SceneId::from("nowhere")
            }
        );
        assert_eq!(director.active_id().as_str(), ids::TITLE_SCREEN);
    }

    #[test]
    fn play_resets_profile_and_interlude_leads_to_classroom() {
        let (_dir, mut context) = context();
        context.mutate("seed_money", |profile| profile.credit_money(77));
        let mut director = build_director(&SceneCatalog::builtin(), context).expect("director");

        // the instructions popup swallows the first action press
        let outcome = director
            .tick(&pressed(KeyPress::Action(ActionSlot::One)), DT)
            .expect("tick");
        assert_eq!(outcome, TickOutcome::Continue);
        director.tick(&pressed(KeyPress::Confirm), DT).expect("tick");

        let outcome = director
            .tick(&pressed(KeyPress::Action(ActionSlot::One)), DT)
            .expect("tick");
        assert_eq!(
            outcome,
            TickOutcome::Switched {
                from: SceneId::from(ids::TITLE_SCREEN),
                to: SceneId::from(ids::BROTHER_A_TRANSITION),
            }
        );
        assert_eq!(director.context().profile().money(), 0);

        let mut ticks = 0;
        let destination = loop {
            ticks += 1;
            assert!(ticks < 400, "interlude never ended");
            if let TickOutcome::Switched { to, .. } =
                director.tick(&InputSnapshot::empty(), DT).expect("tick")
            {
                break to;
            }
        };
        assert_eq!(destination.as_str(), ids::CLASSROOM);
        assert!((175..=185).contains(&ticks), "interlude took {ticks} ticks");
    }

    #[test]
    fn interlude_can_be_skipped() {
        let (_dir, mut context) = context();
        let mut scene = MenuScene::interlude(ids::BROTHER_B_TRANSITION, "Mark", ids::STREET);

        assert_eq!(
            press(&mut scene, &mut context, KeyPress::Escape),
            switched_to(ids::STREET)
        );
    }

    #[test]
    fn title_escape_quits() {
        let (_dir, mut context) = context();
        let mut scene = MenuScene::title_screen();

        assert_eq!(
            press(&mut scene, &mut context, KeyPress::Escape),
            SceneCommand::Quit
        );
    }

    #[test]
    fn load_save_new_game_creates_next_slot() {
        let (_dir, mut context) = context();
        let mut scene = MenuScene::load_save(&context);
        assert_eq!(
            scene.view(&context).menu,
            vec![
                "> save_data1 - Cash: $0 / Buyers: 0".to_string(),
                "  New Game (save_data2)".to_string(),
            ]
        );

        idle(&mut scene, &mut context);
        press(&mut scene, &mut context, KeyPress::Direction(Direction::Down));
        let command = press(&mut scene, &mut context, KeyPress::Confirm);

        assert_eq!(command, switched_to(ids::BROTHER_A_TRANSITION));
        assert_eq!(context.store().active_slot(), "save_data2");
        assert!(context.store().slot_path("save_data2").is_file());
    }

    #[test]
    fn load_save_existing_slot_loads_it() {
        let (_dir, mut context) = context();
        context.mutate("seed_money", |profile| profile.credit_money(31));
        context.create_next_slot().expect("second slot");
        assert_eq!(context.profile().money(), 0);

        let mut scene = MenuScene::load_save(&context);
        assert_eq!(
            scene.view(&context).menu,
            vec![
                "> save_data1 - Cash: $31 / Buyers: 0".to_string(),
                "  save_data2 - Cash: $0 / Buyers: 0".to_string(),
                "  New Game (save_data3)".to_string(),
            ]
        );
        let command = press(&mut scene, &mut context, KeyPress::Confirm);

        assert_eq!(command, switched_to(ids::BROTHER_A_TRANSITION));
        assert_eq!(context.store().active_slot(), DEFAULT_SLOT);
        assert_eq!(context.profile().money(), 31);
    }

    #[test]
    fn load_save_marks_unreadable_slots_without_rewriting_them() {
        let (_dir, mut context) = context();
        context.mutate("seed_buyers", |profile| {
            profile.credit_money(12);
            profile.record_negotiation_win();
            profile.record_negotiation_win();
        });
        let corrupt = context.store().slot_path("save_data2");
        std::fs::write(&corrupt, "{ not json").expect("write garbage");

        let scene = MenuScene::load_save(&context);

        assert_eq!(
            scene.view(&context).menu,
            vec![
                "> save_data1 - Cash: $12 / Buyers: 2".to_string(),
                "  save_data2 (Corrupt Data)".to_string(),
                "  New Game (save_data3)".to_string(),
            ]
        );
        assert_eq!(
            std::fs::read_to_string(&corrupt).expect("untouched"),
            "{ not json"
        );
        assert_eq!(context.store().active_slot(), DEFAULT_SLOT);
    }

    #[test]
    fn instructions_scroll_is_clamped() {
        let (_dir, mut context) = context();
        let mut scene = MenuScene::instructions();
        let first_page = scene.view(&context).menu;

        press(&mut scene, &mut context, KeyPress::Direction(Direction::Up));
        assert_eq!(scene.view(&context).menu, first_page);

        for _ in 0..50 {
            press(&mut scene, &mut context, KeyPress::Direction(Direction::Down));
        }
        let last_page = scene.view(&context).menu;
        assert_ne!(last_page, first_page);
        assert!(!last_page.is_empty());

        assert_eq!(
            press(&mut scene, &mut context, KeyPress::Confirm),
            switched_to(ids::TITLE_SCREEN)
        );
    }

    #[test]
    fn hallway_timer_expires_into_next_scene() {
        let (_dir, mut context) = context();
        let mut scene = enter(ids::HALLWAY, builtin_config(ids::HALLWAY), &mut context);

        for _ in 0..7 {
            assert_eq!(
                press(&mut scene, &mut context, KeyPress::FastForward),
                SceneCommand::None
            );
        }
        assert_eq!(
            press(&mut scene, &mut context, KeyPress::FastForward),
            switched_to(ids::BROTHER_B_TRANSITION)
        );
    }

    #[test]
    fn explicit_request_beats_timer_on_same_tick() {
        let (_dir, mut context) = context();
        context.mutate("seed_money", |profile| profile.credit_money(500));
        let mut config = builtin_config(ids::COSTCO);
        config.spawn = Vec2::new(600.0, 260.0);
        config.duration_seconds = Some(DT * 2.5);
        let mut scene = enter(ids::COSTCO, config, &mut context);

        assert_eq!(
            press(&mut scene, &mut context, KeyPress::Interact),
            SceneCommand::None
        );
        assert_eq!(idle(&mut scene, &mut context), SceneCommand::None);
        // the timer also expires on this tick
        assert_eq!(
            press(&mut scene, &mut context, KeyPress::Confirm),
            switched_to(ids::ENDING)
        );
        assert!(context.profile().goal_reached());
        assert_eq!(context.profile().money(), 0);
    }

    #[test]
    fn goal_without_funds_is_declined() {
        let (_dir, mut context) = context();
        context.mutate("seed_money", |profile| profile.credit_money(499));
        let mut config = builtin_config(ids::COSTCO);
        config.spawn = Vec2::new(600.0, 260.0);
        let mut scene = enter(ids::COSTCO, config, &mut context);

        press(&mut scene, &mut context, KeyPress::Interact);
        assert_eq!(
            press(&mut scene, &mut context, KeyPress::Confirm),
            SceneCommand::None
        );
        assert!(!context.profile().goal_reached());
        assert_eq!(context.profile().money(), 499);
        assert_eq!(
            scene.view(&context).notice.as_deref(),
            Some("not enough money")
        );
    }

    #[test]
    fn negotiation_win_adds_a_buyer_and_engages_npc() {
        let (_dir, mut context) = context();
        let config = classroom_without_detector(Vec2::new(680.0, 400.0));
        let mut scene = enter(ids::CLASSROOM, config, &mut context);

        press(&mut scene, &mut context, KeyPress::Interact);
        let sequence = negotiation_sequence(&scene.view(&context)).expect("negotiation started");
        assert!((3..=5).contains(&sequence.len()));

        // movement is frozen during the attempt
        let before = scene.player();
        step(
            &mut scene,
            &mut context,
            &InputSnapshot::empty().with_held(Direction::Left, true),
        );
        assert_eq!(scene.player(), before);

        for direction in &sequence {
            press(&mut scene, &mut context, KeyPress::Direction(*direction));
        }

        assert_eq!(context.profile().buyer_count(), 1);
        assert_eq!(context.store().load().expect("reload").buyer_count(), 1);
        assert_eq!(negotiation_sequence(&scene.view(&context)), None);

        // the same classmate will not negotiate twice
        press(&mut scene, &mut context, KeyPress::Interact);
        assert_eq!(negotiation_sequence(&scene.view(&context)), None);
    }

    #[test]
    fn negotiation_wrong_key_leaves_npc_available() {
        let (_dir, mut context) = context();
        let config = classroom_without_detector(Vec2::new(680.0, 400.0));
        let mut scene = enter(ids::CLASSROOM, config, &mut context);

        press(&mut scene, &mut context, KeyPress::Interact);
        let sequence = negotiation_sequence(&scene.view(&context)).expect("negotiation started");
        let wrong = Direction::ALL
            .into_iter()
            .find(|direction| *direction != sequence[0])
            .expect("a different direction");
        press(&mut scene, &mut context, KeyPress::Direction(wrong));

        assert_eq!(context.profile().buyer_count(), 0);
        assert_eq!(negotiation_sequence(&scene.view(&context)), None);

        press(&mut scene, &mut context, KeyPress::Interact);
        assert!(negotiation_sequence(&scene.view(&context)).is_some());
    }

    #[test]
    fn detection_penalizes_without_cancelling_negotiation() {
        let (_dir, mut context) = context();
        let mut config = builtin_config(ids::CLASSROOM);
        config.spawn = Vec2::new(680.0, 330.0);
        if let BehaviorConfig::Classroom(classroom) = &mut config.behavior {
            classroom.detector.start = Vec2::new(600.0, 350.0);
        }
        let mut scene = enter(ids::CLASSROOM, config, &mut context);

        press(&mut scene, &mut context, KeyPress::Interact);

        let view = scene.view(&context);
        assert!(negotiation_sequence(&view).is_some());
        assert_eq!(scene.player(), Vec2::new(50.0, 500.0));
        let remaining = view.remaining_seconds.expect("classroom is timed");
        assert!((remaining - (120.0 - 30.0 - DT)).abs() < 1e-3, "{remaining}");
        assert!(view.minigames.iter().any(|minigame| matches!(
            minigame,
            MinigameView::Detection { held: true, .. }
        )));
    }

    #[test]
    fn detector_starts_clear_of_the_classroom_spawn() {
        let (_dir, mut context) = context();
        let mut scene = enter(ids::CLASSROOM, builtin_config(ids::CLASSROOM), &mut context);

        idle(&mut scene, &mut context);

        let view = scene.view(&context);
        assert_eq!(scene.player(), Vec2::new(600.0, 400.0));
        let remaining = view.remaining_seconds.expect("classroom is timed");
        assert!((remaining - (120.0 - DT)).abs() < 1e-3, "{remaining}");
        let detector = view
            .minigames
            .iter()
            .find_map(|minigame| match minigame {
                MinigameView::Detection { position, held, .. } => Some((*position, *held)),
                _ => None,
            })
            .expect("classroom shows the detector");
        assert!(!detector.1);
        assert!(detector.0.distance(Vec2::new(300.0, 300.0)) < 2.0, "{:?}", detector.0);
    }

    #[test]
    fn held_player_cannot_start_negotiation() {
        let (_dir, mut context) = context();
        let mut config = builtin_config(ids::CLASSROOM);
        let corner = Vec2::new(70.0, 400.0);
        if let BehaviorConfig::Classroom(classroom) = &mut config.behavior {
            classroom.detector.start = config.spawn;
            classroom.detector.hold_position = corner;
        }
        let mut scene = enter(ids::CLASSROOM, config, &mut context);

        idle(&mut scene, &mut context);
        assert_eq!(scene.player(), corner);
        assert!(!scene.view(&context).hints.contains(&"[E] Negotiate".to_string()));

        press(&mut scene, &mut context, KeyPress::Interact);

        assert_eq!(negotiation_sequence(&scene.view(&context)), None);
        assert_eq!(scene.player(), corner);
    }

    #[test]
    fn vending_machine_restocks_common_on_classroom_entry() {
        let (_dir, mut context) = context();
        give_upgrade(&mut context, UpgradeId::VendingMachine);

        enter(ids::CLASSROOM, builtin_config(ids::CLASSROOM), &mut context);

        assert_eq!(context.profile().candy(CandyType::Common), 25);
    }

    #[test]
    fn playground_sale_consumes_buyer() {
        let (_dir, mut context) = context();
        context.mutate("seed_buyer", |profile| profile.record_negotiation_win());
        let mut config = builtin_config(ids::PLAYGROUND);
        if let BehaviorConfig::Playground(playground) = &mut config.behavior {
            playground.buyer_area = Rect::new(640.0, 360.0, 0.0, 0.0);
            playground.bullies.big_count = 0;
            playground.bullies.small_count = 0;
        }
        let mut scene = enter(ids::PLAYGROUND, config, &mut context);
        assert_eq!(scene.view(&context).buyers.len(), 1);

        press(&mut scene, &mut context, KeyPress::QuantityUp);
        press(&mut scene, &mut context, KeyPress::Action(ActionSlot::One));

        assert_eq!(context.profile().money(), 4);
        assert_eq!(context.profile().candy(CandyType::Common), 13);
        assert_eq!(context.profile().buyer_count(), 0);
        assert!(scene.view(&context).buyers.is_empty());

        press(&mut scene, &mut context, KeyPress::Action(ActionSlot::One));
        assert_eq!(context.profile().money(), 4);
        assert_eq!(
            scene.view(&context).notice.as_deref(),
            Some("No buyer nearby")
        );
    }

    #[test]
    fn bully_takes_a_tenth_once() {
        let (_dir, mut context) = context();
        context.mutate("seed_money", |profile| profile.credit_money(105));
        let mut config = builtin_config(ids::PLAYGROUND);
        if let BehaviorConfig::Playground(playground) = &mut config.behavior {
            playground.bullies.big_count = 1;
            playground.bullies.small_count = 0;
            playground.bullies.big_speed = 0.0;
            playground.bullies.spawn_area = Rect::new(640.0, 360.0, 0.0, 0.0);
        }
        let mut scene = enter(ids::PLAYGROUND, config, &mut context);

        idle(&mut scene, &mut context);
        idle(&mut scene, &mut context);

        assert_eq!(context.profile().money(), 95);
        let remaining = scene.clock().remaining().expect("timed");
        assert!((remaining - (120.0 - 30.0 - 2.0 * DT)).abs() < 1e-3);
    }

    #[test]
    fn hallway_toll_opens_gate_once() {
        let (_dir, mut context) = context();
        let mut config = builtin_config(ids::HALLWAY);
        config.spawn = Vec2::new(470.0, 360.0);
        let gate = match &config.behavior {
            BehaviorConfig::Hallway(hallway) => hallway.gate,
            other => panic!("unexpected behavior {other:?}"),
        };
        let mut scene = enter(ids::HALLWAY, config, &mut context);
        assert!(scene.view(&context).obstacles.contains(&gate));

        press(&mut scene, &mut context, KeyPress::Interact);
        assert_eq!(context.profile().candy(CandyType::Common), 14);
        assert!(!scene.view(&context).obstacles.contains(&gate));

        press(&mut scene, &mut context, KeyPress::Interact);
        assert_eq!(context.profile().candy(CandyType::Common), 14);
    }

    #[test]
    fn hallway_toll_without_candy_keeps_gate() {
        let (_dir, mut context) = context();
        context.mutate("empty_pockets", |profile| while profile.pay_toll().is_ok() {});
        let mut config = builtin_config(ids::HALLWAY);
        config.spawn = Vec2::new(470.0, 360.0);
        let mut scene = enter(ids::HALLWAY, config, &mut context);
        let obstacles_before = scene.view(&context).obstacles;

        press(&mut scene, &mut context, KeyPress::Interact);

        assert_eq!(scene.view(&context).obstacles, obstacles_before);
        assert_eq!(
            scene.view(&context).notice.as_deref(),
            Some("no candy to pay with")
        );
    }

    #[test]
    fn hallway_shop_sells_bicycle_and_blocks_movement() {
        let (_dir, mut context) = context();
        context.mutate("seed_money", |profile| profile.credit_money(60));
        let mut config = builtin_config(ids::HALLWAY);
        config.spawn = Vec2::new(1090.0, 360.0);
        let mut scene = enter(ids::HALLWAY, config, &mut context);

        press(&mut scene, &mut context, KeyPress::Interact);
        assert!(scene.view(&context).panel.is_some());

        let before = scene.player();
        step(
            &mut scene,
            &mut context,
            &InputSnapshot::empty()
                .with_held(Direction::Left, true)
                .with_pressed(KeyPress::Action(ActionSlot::One)),
        );
        assert_eq!(scene.player(), before);
        assert!(context.profile().owns(UpgradeId::Bicycle));
        assert_eq!(context.profile().speed(Character::Secondary), 600.0);
        assert_eq!(context.profile().money(), 10);

        // buying again is declined
        press(&mut scene, &mut context, KeyPress::Action(ActionSlot::One));
        assert_eq!(context.profile().money(), 10);

        press(&mut scene, &mut context, KeyPress::Escape);
        assert!(scene.view(&context).panel.is_none());
    }

    fn walk_street(scene: &mut PlayScene, context: &mut SceneContext) -> SceneCommand {
        let mut next = Direction::Left;
        for _ in 0..20_000 {
            let (phase, _) = rhythm_state(&scene.view(context));
            let command = if phase == "press" {
                let command = press(scene, context, KeyPress::Direction(next));
                next = if next == Direction::Left {
                    Direction::Right
                } else {
                    Direction::Left
                };
                command
            } else {
                idle(scene, context)
            };
            if command != SceneCommand::None {
                return command;
            }
        }
        panic!("street never finished");
    }

    #[test]
    fn street_success_goes_to_store_and_saves_carry_over() {
        let (_dir, mut context) = context();
        let mut scene = enter(ids::STREET, builtin_config(ids::STREET), &mut context);
        assert_eq!(rhythm_state(&scene.view(&context)).1, 20);

        let command = walk_street(&mut scene, &mut context);

        assert_eq!(command, switched_to(ids::STORE));
        let carried = context.profile().carry_over_seconds().expect("carry-over");
        assert!(carried > 100.0 && carried < 180.0, "{carried}");
        assert_eq!(
            context.store().load().expect("reload").carry_over_seconds(),
            Some(carried)
        );
    }

    #[test]
    fn street_with_membership_and_bicycle_goes_to_costco() {
        let (_dir, mut context) = context();
        give_upgrade(&mut context, UpgradeId::BulkMembership);
        give_upgrade(&mut context, UpgradeId::Bicycle);
        let mut scene = enter(ids::STREET, builtin_config(ids::STREET), &mut context);
        assert_eq!(rhythm_state(&scene.view(&context)).1, 10);

        assert_eq!(
            walk_street(&mut scene, &mut context),
            switched_to(ids::COSTCO)
        );
    }

    fn rhythm_progress(view: &FrameView) -> (u32, bool) {
        view.minigames
            .iter()
            .find_map(|minigame| match minigame {
                MinigameView::Rhythm {
                    completed, failure, ..
                } => Some((*completed, failure.is_some())),
                _ => None,
            })
            .expect("street shows the rhythm game")
    }

    #[test]
    fn street_ignores_vertical_arrows() {
        let (_dir, mut context) = context();
        let mut scene = enter(ids::STREET, builtin_config(ids::STREET), &mut context);
        assert_eq!(rhythm_state(&scene.view(&context)).0, "wait");

        press(&mut scene, &mut context, KeyPress::Direction(Direction::Up));
        let view = scene.view(&context);
        let remaining = view.remaining_seconds.expect("street is timed");
        assert!((remaining - (180.0 - DT)).abs() < 1e-3, "{remaining}");
        assert_eq!(rhythm_progress(&view), (0, false));

        for _ in 0..600 {
            if rhythm_state(&scene.view(&context)).0 == "press" {
                break;
            }
            idle(&mut scene, &mut context);
        }
        assert_eq!(rhythm_state(&scene.view(&context)).0, "press");

        press(&mut scene, &mut context, KeyPress::Direction(Direction::Up));
        press(&mut scene, &mut context, KeyPress::Direction(Direction::Down));
        assert_eq!(rhythm_state(&scene.view(&context)).0, "press");
        assert_eq!(rhythm_progress(&scene.view(&context)), (0, false));

        press(&mut scene, &mut context, KeyPress::Direction(Direction::Left));
        assert_eq!(rhythm_progress(&scene.view(&context)), (1, false));
    }

    #[test]
    fn street_timeout_goes_to_fallback() {
        let (_dir, mut context) = context();
        let mut scene = enter(ids::STREET, builtin_config(ids::STREET), &mut context);

        let mut command = SceneCommand::None;
        for _ in 0..20 {
            command = press(&mut scene, &mut context, KeyPress::FastForward);
            if command != SceneCommand::None {
                break;
            }
        }

        assert_eq!(command, switched_to(ids::BROTHER_A_TRANSITION));
        assert_eq!(context.profile().carry_over_seconds(), None);
    }

    #[test]
    fn store_consumes_carry_over() {
        let (_dir, mut context) = context();
        context.mutate("seed_carry_over", |profile| profile.set_carry_over(42.0));

        let scene = enter(ids::STORE, builtin_config(ids::STORE), &mut context);

        assert_eq!(scene.clock().duration(), Some(42.0));
        assert_eq!(context.profile().carry_over_seconds(), None);
        assert_eq!(
            context.store().load().expect("reload").carry_over_seconds(),
            None
        );
    }

    #[test]
    fn store_without_carry_over_is_untimed_and_costco_defaults() {
        let (_dir, mut context) = context();

        let store = enter(ids::STORE, builtin_config(ids::STORE), &mut context);
        let costco = enter(ids::COSTCO, builtin_config(ids::COSTCO), &mut context);

        assert_eq!(store.clock().duration(), None);
        assert_eq!(costco.clock().duration(), Some(180.0));
    }

    #[test]
    fn store_counter_buys_within_capacity() {
        let (_dir, mut context) = context();
        context.mutate("seed_money", |profile| profile.credit_money(100));
        let mut config = builtin_config(ids::STORE);
        config.spawn = Vec2::new(800.0, 360.0);
        let mut scene = enter(ids::STORE, config, &mut context);

        press(&mut scene, &mut context, KeyPress::Interact);
        for _ in 0..20 {
            press(&mut scene, &mut context, KeyPress::QuantityUp);
        }
        assert_eq!(
            scene.view(&context).panel.and_then(|panel| panel.quantity),
            Some(10)
        );

        press(&mut scene, &mut context, KeyPress::Action(ActionSlot::One));
        assert_eq!(context.profile().money(), 90);
        assert_eq!(context.profile().candy(CandyType::Common), 25);

        // 25 + 30 would overflow the 50-candy backpack
        press(&mut scene, &mut context, KeyPress::Action(ActionSlot::One));
        press(&mut scene, &mut context, KeyPress::Action(ActionSlot::One));
        press(&mut scene, &mut context, KeyPress::Action(ActionSlot::One));
        assert_eq!(context.profile().candy(CandyType::Common), 45);
        assert_eq!(context.profile().money(), 70);
        assert!(context.profile().total_candy() <= context.profile().capacity());
    }

    #[test]
    fn candy_machine_grants_rare_bonus() {
        let (_dir, mut context) = context();
        context.mutate("seed_money", |profile| profile.credit_money(150));
        let mut config = builtin_config(ids::STORE);
        config.spawn = Vec2::new(600.0, 360.0);
        let mut scene = enter(ids::STORE, config, &mut context);

        press(&mut scene, &mut context, KeyPress::Interact);

        assert!(context.profile().owns(UpgradeId::VendingMachine));
        assert_eq!(context.profile().candy(CandyType::Rare), 5);
        assert_eq!(context.profile().money(), 0);
    }
