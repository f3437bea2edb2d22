use sugar_engine::{
    ActionSlot, Direction, InputSnapshot, KeyPress, Rect, Scene, SceneCommand, SceneId, Vec2,
};
use tracing::{debug, info};

use crate::economy::{CandyType, TradeOutcome, UpgradeId};
use crate::minigame::{
    DetectionEvent, DetectionGame, NegotiationGame, NegotiationStatus, RhythmEvent, RhythmGame,
};

use super::catalog::{
    BehaviorConfig, ClassroomConfig, HallwayConfig, PlaygroundConfig, SceneConfig, ShopConfig,
    StreetConfig,
};
use super::clock::SceneClock;
use super::context::SceneContext;
use super::hazards::{spawn_bullies, spawn_buyers, Bully, Buyer};
use super::movement::{nearest_within, step_player};
use super::view::{FrameView, PanelView};

/// A time-boxed location: a clock, a walking player and one behavior
/// variant layered on top.
pub struct PlayScene {
    config: SceneConfig,
    stage: Stage,
    behavior: Behavior,
}

struct Stage {
    id: SceneId,
    clock: SceneClock,
    pending_next: Option<SceneId>,
    player: Vec2,
    speed: f32,
    obstacles: Vec<Rect>,
    move_axis: Vec2,
    inventory_open: bool,
    notice: Option<String>,
}

impl Stage {
    /// Explicit transition request; a later request on the same tick wins.
    fn request(&mut self, next: SceneId) {
        self.pending_next = Some(next);
    }

    fn note(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }
}

enum Behavior {
    Classroom(Classroom),
    Playground(Playground),
    Hallway(Hallway),
    Street(Street),
    Shop(Shop),
}

impl PlayScene {
    pub fn new(id: SceneId, config: SceneConfig, context: &mut SceneContext) -> Self {
        let profile = context.profile();
        let mut stage = Stage {
            id,
            clock: SceneClock::new(config.duration_seconds),
            pending_next: None,
            player: config.spawn,
            speed: profile.speed(config.character),
            obstacles: config.obstacles.clone(),
            move_axis: Vec2::ZERO,
            inventory_open: false,
            notice: None,
        };

        let behavior = match &config.behavior {
            BehaviorConfig::Classroom(classroom) => Behavior::Classroom(Classroom::new(classroom)),
            BehaviorConfig::Playground(playground) => {
                let buyer_count = profile.buyer_count();
                Behavior::Playground(Playground::new(playground, buyer_count, context))
            }
            BehaviorConfig::Hallway(hallway) => {
                stage.obstacles.push(hallway.gate);
                Behavior::Hallway(Hallway::new(hallway))
            }
            BehaviorConfig::Street(street) => Behavior::Street(Street::new(street, context)),
            BehaviorConfig::Shop(shop) => Behavior::Shop(Shop::new(shop)),
        };

        Self {
            config,
            stage,
            behavior,
        }
    }

    pub fn player(&self) -> Vec2 {
        self.stage.player
    }

    pub fn clock(&self) -> &SceneClock {
        &self.stage.clock
    }

    fn handle_key(&mut self, key: KeyPress, context: &mut SceneContext) {
        match key {
            KeyPress::Inventory => {
                self.stage.inventory_open = !self.stage.inventory_open;
                return;
            }
            KeyPress::FastForward => {
                if self.stage.clock.fast_forward() {
                    info!(scene = %self.stage.id, elapsed = self.stage.clock.elapsed(), "fast_forward");
                }
                return;
            }
            _ => {}
        }

        let stage = &mut self.stage;
        match &mut self.behavior {
            Behavior::Classroom(classroom) => classroom.on_key(key, stage, context),
            Behavior::Playground(playground) => playground.on_key(key, stage, context),
            Behavior::Hallway(hallway) => hallway.on_key(key, stage, context),
            Behavior::Street(street) => street.on_key(key, stage, context),
            Behavior::Shop(shop) => shop.on_key(key, stage, context),
        }
    }
}

impl Scene for PlayScene {
    type Context = SceneContext;
    type View = FrameView;

    fn load(&mut self, context: &mut SceneContext) {
        if self.config.use_carry_over {
            let carried = context.mutate("carry_over_consumed", |profile| {
                profile.take_carry_over()
            });
            if let Some(seconds) = carried {
                self.stage.clock = SceneClock::new(Some(seconds));
            }
        }
        if let Behavior::Classroom(classroom) = &self.behavior {
            classroom.restock(context);
        }
        info!(
            scene = %self.stage.id,
            character = self.config.character.display_name(),
            duration_seconds = ?self.stage.clock.duration(),
            "play_scene_entered"
        );
    }

    fn process_input(&mut self, input: &InputSnapshot, context: &mut SceneContext) {
        self.stage.move_axis = input.movement_axis();
        for key in input.pressed() {
            self.handle_key(*key, context);
        }
    }

    fn update(&mut self, fixed_dt_seconds: f32, context: &mut SceneContext) -> SceneCommand {
        let dt = fixed_dt_seconds;
        self.stage.clock.advance(dt);

        let stage = &mut self.stage;
        let movement_blocked = match &mut self.behavior {
            Behavior::Classroom(classroom) => classroom.update(dt, stage, context),
            Behavior::Playground(playground) => playground.update(dt, stage, context),
            Behavior::Hallway(hallway) => hallway.shop_open,
            Behavior::Street(street) => street.update(dt, stage, context),
            Behavior::Shop(shop) => shop.panel.is_some(),
        };

        if !movement_blocked {
            stage.player = step_player(
                stage.player,
                stage.move_axis,
                stage.speed,
                dt,
                &stage.obstacles,
            );
        }

        if stage.pending_next.is_none() && stage.clock.expired() {
            if let Some(next) = self.config.next.clone() {
                info!(scene = %stage.id, next = %next, "scene_timer_expired");
                stage.pending_next = Some(next);
            }
        }
        SceneCommand::from(stage.pending_next.take())
    }

    fn view(&self, context: &SceneContext) -> FrameView {
        let stage = &self.stage;
        let mut view = FrameView::new(stage.id.clone(), self.config.title.clone(), context.profile());
        view.background = Some(self.config.background.clone());
        view.character = Some(self.config.character);
        view.remaining_seconds = stage.clock.remaining();
        view.player = Some(stage.player);
        view.obstacles = stage.obstacles.clone();
        view.inventory_open = stage.inventory_open;
        view.notice = stage.notice.clone();

        match &self.behavior {
            Behavior::Classroom(classroom) => classroom.fill_view(stage, &mut view),
            Behavior::Playground(playground) => playground.fill_view(stage, &mut view),
            Behavior::Hallway(hallway) => hallway.fill_view(stage, context, &mut view),
            Behavior::Street(street) => street.fill_view(&mut view),
            Behavior::Shop(shop) => shop.fill_view(stage, &mut view),
        }
        view
    }
}

fn slot_index(slot: ActionSlot) -> usize {
    usize::from(slot.number() - 1)
}

fn candy_for_slot(slot: ActionSlot) -> Option<CandyType> {
    CandyType::ALL.get(slot_index(slot)).copied()
}

fn adjust_quantity(quantity: &mut u32, key: KeyPress, max: u32) -> bool {
    match key {
        KeyPress::QuantityUp => {
            *quantity = (*quantity + 1).min(max.max(1));
            true
        }
        KeyPress::QuantityDown => {
            *quantity = quantity.saturating_sub(1).max(1);
            true
        }
        _ => false,
    }
}

fn note_outcome(stage: &mut Stage, outcome: TradeOutcome, success: impl FnOnce() -> String) {
    match outcome {
        TradeOutcome::Completed => stage.note(success()),
        TradeOutcome::Declined(reason) => stage.note(reason.to_string()),
    }
}

struct Npc {
    position: Vec2,
    engaged: bool,
}

struct ActiveNegotiation {
    npc: usize,
    game: NegotiationGame,
}

struct Classroom {
    npcs: Vec<Npc>,
    npc_radius: f32,
    negotiation_seconds: f32,
    vending_restock: u32,
    negotiation: Option<ActiveNegotiation>,
    detector: DetectionGame,
}

impl Classroom {
    fn new(config: &ClassroomConfig) -> Self {
        Self {
            npcs: config
                .npcs
                .iter()
                .map(|position| Npc {
                    position: *position,
                    engaged: false,
                })
                .collect(),
            npc_radius: config.npc_radius,
            negotiation_seconds: config.negotiation_seconds,
            vending_restock: config.vending_restock,
            negotiation: None,
            detector: DetectionGame::new(config.detector.clone()),
        }
    }

    fn restock(&self, context: &mut SceneContext) {
        if self.vending_restock == 0 || !context.profile().owns(UpgradeId::VendingMachine) {
            return;
        }
        let restock = self.vending_restock;
        let granted = context.mutate("vending_restock", |profile| {
            profile.grant_candy(CandyType::Common, restock)
        });
        info!(granted, "vending_restock");
    }

    fn eligible_npc_in_range(&self, player: Vec2) -> Option<usize> {
        let eligible = self
            .npcs
            .iter()
            .enumerate()
            .filter(|(_, npc)| !npc.engaged)
            .map(|(index, npc)| (index, npc.position));
        nearest_within(player, self.npc_radius, eligible).map(|(index, _)| index)
    }

    fn on_key(&mut self, key: KeyPress, stage: &mut Stage, context: &mut SceneContext) {
        match key {
            KeyPress::Direction(direction) => {
                let status = match self.negotiation.as_mut() {
                    Some(active) => active.game.press(direction),
                    None => return,
                };
                self.settle(status, stage, context);
            }
            KeyPress::Interact
                if self.negotiation.is_none() && !self.detector.blocks_movement() =>
            {
                let Some(npc) = self.eligible_npc_in_range(stage.player) else {
                    return;
                };
                let game = NegotiationGame::start(context.rng(), self.negotiation_seconds);
                info!(npc, length = game.target().len(), "negotiation_started");
                self.negotiation = Some(ActiveNegotiation { npc, game });
            }
            _ => {}
        }
    }

    fn settle(&mut self, status: NegotiationStatus, stage: &mut Stage, context: &mut SceneContext) {
        if status == NegotiationStatus::InProgress {
            return;
        }
        let Some(active) = self.negotiation.take() else {
            return;
        };
        match status {
            NegotiationStatus::Succeeded => {
                if let Some(npc) = self.npcs.get_mut(active.npc) {
                    npc.engaged = true;
                }
                let buyers = context.mutate("negotiation_won", |profile| {
                    profile.record_negotiation_win();
                    profile.buyer_count()
                });
                info!(npc = active.npc, buyers, "negotiation_won");
                stage.note("Deal! They'll buy at recess.");
            }
            NegotiationStatus::Failed(reason) => {
                info!(npc = active.npc, reason = ?reason, "negotiation_failed");
                stage.note("No deal.");
            }
            NegotiationStatus::InProgress => {}
        }
    }

    fn update(&mut self, dt: f32, stage: &mut Stage, context: &mut SceneContext) -> bool {
        if let Some(active) = self.negotiation.as_mut() {
            let status = active.game.tick(dt);
            self.settle(status, stage, context);
        }

        match self.detector.tick(dt, stage.player) {
            Some(DetectionEvent::Caught {
                hold_at,
                penalty_seconds,
            }) => {
                stage.player = hold_at;
                stage.clock.add_penalty(penalty_seconds);
                stage.note("Caught! Go stand in the corner.");
                info!(penalty_seconds, "detector_caught");
            }
            Some(DetectionEvent::Released { release_at }) => {
                stage.player = release_at;
                info!("detector_released");
            }
            None => {}
        }

        self.negotiation.is_some() || self.detector.blocks_movement()
    }

    fn fill_view(&self, stage: &Stage, view: &mut FrameView) {
        view.npcs = self.npcs.iter().map(|npc| npc.position).collect();
        view.minigames.push(self.detector.view());
        match &self.negotiation {
            Some(active) => view.minigames.push(active.game.view()),
            None if self.detector.blocks_movement() => {}
            None => {
                if self.eligible_npc_in_range(stage.player).is_some() {
                    view.hints.push("[E] Negotiate".to_string());
                }
            }
        }
    }
}

struct Playground {
    config: PlaygroundConfig,
    buyers: Vec<Buyer>,
    bullies: Vec<Bully>,
    quantity: u32,
}

impl Playground {
    fn new(config: &PlaygroundConfig, buyer_count: u32, context: &mut SceneContext) -> Self {
        let buyers = spawn_buyers(buyer_count, &config.buyer_area, context.rng());
        let bullies = spawn_bullies(&config.bullies, context.rng());
        Self {
            config: config.clone(),
            buyers,
            bullies,
            quantity: 1,
        }
    }

    fn buyer_in_range(&self, player: Vec2) -> Option<usize> {
        let open = self
            .buyers
            .iter()
            .enumerate()
            .filter(|(_, buyer)| !buyer.served)
            .map(|(index, buyer)| (index, buyer.position));
        nearest_within(player, self.config.buyer_radius, open).map(|(index, _)| index)
    }

    fn on_key(&mut self, key: KeyPress, stage: &mut Stage, context: &mut SceneContext) {
        if adjust_quantity(&mut self.quantity, key, self.config.max_quantity) {
            return;
        }
        let KeyPress::Action(slot) = key else {
            return;
        };
        let Some(candy) = candy_for_slot(slot) else {
            return;
        };
        let Some(buyer) = self.buyer_in_range(stage.player) else {
            info!(action = "sell", reason = "no buyer in range", "trade_declined");
            stage.note("No buyer nearby");
            return;
        };

        let price = self.config.sell_prices.price(candy);
        let quantity = self.quantity;
        let outcome = context.transact("sell", |profile| profile.sell(candy, price, quantity));
        if outcome.is_completed() {
            self.buyers[buyer].served = true;
        }
        note_outcome(stage, outcome, || {
            format!("Sold {quantity} {candy} for ${}", price * quantity)
        });
    }

    fn update(&mut self, dt: f32, stage: &mut Stage, context: &mut SceneContext) -> bool {
        let rules = &self.config.bullies;
        for bully in &mut self.bullies {
            bully.advance(dt, &rules.bounds);
            if bully.is_frozen() || bully.position.distance(stage.player) >= rules.hit_radius {
                continue;
            }
            let percent = rules.forfeit_percent;
            let taken = context.mutate("bully_hit", |profile| profile.forfeit_share(percent));
            stage.clock.add_penalty(rules.penalty_seconds);
            bully.freeze();
            stage.note(format!("A bully took ${taken}!"));
            info!(taken, penalty_seconds = rules.penalty_seconds, "bully_hit");
        }
        false
    }

    fn fill_view(&self, stage: &Stage, view: &mut FrameView) {
        view.buyers = self
            .buyers
            .iter()
            .filter(|buyer| !buyer.served)
            .map(|buyer| buyer.position)
            .collect();
        view.bullies = self.bullies.iter().map(|bully| bully.position).collect();
        if self.buyer_in_range(stage.player).is_some() {
            let prices = &self.config.sell_prices;
            view.hints.push(format!(
                "Sell x{}: [1] {} ${} [2] {} ${} [3] {} ${}",
                self.quantity,
                CandyType::Common,
                prices.common,
                CandyType::Uncommon,
                prices.uncommon,
                CandyType::Rare,
                prices.rare
            ));
        }
    }
}

struct Hallway {
    config: HallwayConfig,
    toll_paid: bool,
    shop_open: bool,
}

impl Hallway {
    fn new(config: &HallwayConfig) -> Self {
        Self {
            config: config.clone(),
            toll_paid: false,
            shop_open: false,
        }
    }

    fn near_monitor(&self, player: Vec2) -> bool {
        player.distance(self.config.monitor) < self.config.monitor_radius
    }

    fn near_shop(&self, player: Vec2) -> bool {
        player.distance(self.config.shop) < self.config.shop_radius
    }

    fn on_key(&mut self, key: KeyPress, stage: &mut Stage, context: &mut SceneContext) {
        if self.shop_open {
            match key {
                KeyPress::Escape | KeyPress::Interact => self.shop_open = false,
                KeyPress::Action(slot) => {
                    let Some(offer) = self.config.upgrades.get(slot_index(slot)).copied() else {
                        return;
                    };
                    let outcome =
                        context.transact("upgrade", |profile| profile.purchase_upgrade(&offer));
                    note_outcome(stage, outcome, || {
                        format!("Bought {}", offer.upgrade.display_name())
                    });
                }
                _ => {}
            }
            return;
        }

        if key != KeyPress::Interact {
            return;
        }
        if !self.toll_paid && self.near_monitor(stage.player) {
            self.pay_toll(stage, context);
        } else if self.near_shop(stage.player) {
            self.shop_open = true;
        }
    }

    fn pay_toll(&mut self, stage: &mut Stage, context: &mut SceneContext) {
        let mut paid = None;
        let outcome = context.transact("toll", |profile| match profile.pay_toll() {
            Ok(candy) => {
                paid = Some(candy);
                TradeOutcome::Completed
            }
            Err(reason) => TradeOutcome::Declined(reason),
        });
        let Some(candy) = paid else {
            note_outcome(stage, outcome, String::new);
            return;
        };

        self.toll_paid = true;
        let gate = self.config.gate;
        stage.obstacles.retain(|obstacle| *obstacle != gate);
        stage.note(format!("Paid 1 {candy}. The monitor lets you through."));
        info!(candy = %candy, "toll_paid");
    }

    fn fill_view(&self, stage: &Stage, context: &SceneContext, view: &mut FrameView) {
        if self.shop_open {
            let profile = context.profile();
            let lines = self
                .config
                .upgrades
                .iter()
                .enumerate()
                .map(|(index, offer)| {
                    let status = if profile.owns(offer.upgrade) {
                        "owned".to_string()
                    } else {
                        format!("${}", offer.cost)
                    };
                    format!("[{}] {} {status}", index + 1, offer.upgrade.display_name())
                })
                .collect();
            view.panel = Some(PanelView {
                title: "Upgrades".to_string(),
                lines,
                quantity: None,
            });
            return;
        }
        if !self.toll_paid && self.near_monitor(stage.player) {
            view.hints.push("[E] Pay the hall monitor 1 candy".to_string());
        } else if self.near_shop(stage.player) {
            view.hints.push("[E] Browse upgrades".to_string());
        }
    }
}

struct Street {
    config: StreetConfig,
    rhythm: RhythmGame,
}

impl Street {
    fn new(config: &StreetConfig, context: &mut SceneContext) -> Self {
        let owns_bicycle = context.profile().owns(UpgradeId::Bicycle);
        let mut rhythm = RhythmGame::for_bicycle(owns_bicycle);
        rhythm.begin(context.rng());
        Self {
            config: config.clone(),
            rhythm,
        }
    }

    fn success_target(&self, context: &SceneContext) -> SceneId {
        match &self.config.upgrade_route {
            Some(route) if context.profile().owns(route.upgrade) => route.target.clone(),
            _ => self.config.success.clone(),
        }
    }

    fn on_key(&mut self, key: KeyPress, stage: &mut Stage, context: &mut SceneContext) {
        if let KeyPress::Direction(direction @ (Direction::Left | Direction::Right)) = key {
            let event = self.rhythm.press(direction, context.rng());
            self.apply(event, stage, context);
        }
    }

    fn update(&mut self, dt: f32, stage: &mut Stage, context: &mut SceneContext) -> bool {
        let event = self.rhythm.tick(dt, context.rng());
        self.apply(event, stage, context);
        true
    }

    fn apply(&mut self, event: Option<RhythmEvent>, stage: &mut Stage, context: &mut SceneContext) {
        match event {
            Some(RhythmEvent::Stepped { completed }) => {
                debug!(completed, required = self.rhythm.required(), "rhythm_step");
            }
            Some(RhythmEvent::Failed {
                reason,
                penalty_seconds,
            }) => {
                stage.clock.add_penalty(penalty_seconds);
                stage.note(format!("Tripped! +{penalty_seconds:.0}s"));
                info!(reason = ?reason, penalty_seconds, "rhythm_failed");
            }
            Some(RhythmEvent::Completed) => {
                let remaining = stage.clock.remaining().unwrap_or(0.0);
                context.mutate("carry_over_saved", |profile| profile.set_carry_over(remaining));
                let target = self.success_target(context);
                info!(carry_over_seconds = remaining, next = %target, "rhythm_complete");
                stage.request(target);
            }
            None => {}
        }
    }

    fn fill_view(&self, view: &mut FrameView) {
        view.minigames.push(self.rhythm.view());
        view.hints.push(format!(
            "Alternate {} and {} when told to step",
            Direction::Left.arrow(),
            Direction::Right.arrow()
        ));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShopPanel {
    Counter,
    Goal,
}

struct Shop {
    config: ShopConfig,
    panel: Option<ShopPanel>,
    quantity: u32,
}

impl Shop {
    fn new(config: &ShopConfig) -> Self {
        Self {
            config: config.clone(),
            panel: None,
            quantity: 1,
        }
    }

    fn near_counter(&self, player: Vec2) -> bool {
        let counters = self.config.counters.iter().copied().enumerate();
        nearest_within(player, self.config.counter_radius, counters).is_some()
    }

    fn near_goal(&self, player: Vec2) -> bool {
        self.config
            .goal
            .as_ref()
            .is_some_and(|goal| player.distance(goal.position) < goal.radius)
    }

    fn near_machine(&self, player: Vec2) -> bool {
        self.config
            .machine
            .as_ref()
            .is_some_and(|machine| player.distance(machine.position) < machine.radius)
    }

    fn on_key(&mut self, key: KeyPress, stage: &mut Stage, context: &mut SceneContext) {
        match self.panel {
            Some(ShopPanel::Counter) => self.on_counter_key(key, stage, context),
            Some(ShopPanel::Goal) => self.on_goal_key(key, stage, context),
            None => {
                if key != KeyPress::Interact {
                    return;
                }
                if self.near_counter(stage.player) {
                    self.panel = Some(ShopPanel::Counter);
                    self.quantity = 1;
                } else if self.near_goal(stage.player) {
                    self.panel = Some(ShopPanel::Goal);
                } else if self.near_machine(stage.player) {
                    self.buy_machine(stage, context);
                }
            }
        }
    }

    fn on_counter_key(&mut self, key: KeyPress, stage: &mut Stage, context: &mut SceneContext) {
        if key == KeyPress::Escape {
            self.panel = None;
            return;
        }
        if adjust_quantity(&mut self.quantity, key, self.config.max_quantity) {
            return;
        }
        let KeyPress::Action(slot) = key else {
            return;
        };
        let Some(candy) = candy_for_slot(slot) else {
            return;
        };
        let price = self.config.prices.price(candy);
        let quantity = self.quantity;
        let outcome = context.transact("buy", |profile| profile.buy(candy, price, quantity));
        note_outcome(stage, outcome, || {
            format!("Bought {quantity} {candy} for ${}", price * quantity)
        });
    }

    fn on_goal_key(&mut self, key: KeyPress, stage: &mut Stage, context: &mut SceneContext) {
        match key {
            KeyPress::Escape => self.panel = None,
            KeyPress::Confirm => {
                let Some(goal) = self.config.goal.clone() else {
                    return;
                };
                let outcome = context.transact("goal", |profile| profile.purchase_goal(goal.cost));
                if outcome.is_completed() {
                    info!(goal = %goal.name, next = %goal.next, "goal_purchased");
                    stage.request(goal.next.clone());
                }
                note_outcome(stage, outcome, || format!("You got the {}!", goal.name));
            }
            _ => {}
        }
    }

    fn buy_machine(&mut self, stage: &mut Stage, context: &mut SceneContext) {
        let Some(machine) = self.config.machine.as_ref() else {
            return;
        };
        let offer = machine.offer;
        let outcome = context.transact("upgrade", |profile| profile.purchase_upgrade(&offer));
        note_outcome(stage, outcome, || {
            format!("Bought the {}", offer.upgrade.display_name())
        });
    }

    fn fill_view(&self, stage: &Stage, view: &mut FrameView) {
        match self.panel {
            Some(ShopPanel::Counter) => {
                let prices = &self.config.prices;
                let lines = CandyType::ALL
                    .iter()
                    .enumerate()
                    .map(|(index, candy)| {
                        format!("[{}] {candy} ${}", index + 1, prices.price(*candy))
                    })
                    .collect();
                view.panel = Some(PanelView {
                    title: "Counter".to_string(),
                    lines,
                    quantity: Some(self.quantity),
                });
            }
            Some(ShopPanel::Goal) => {
                if let Some(goal) = &self.config.goal {
                    view.panel = Some(PanelView {
                        title: goal.name.clone(),
                        lines: vec![format!("[Enter] Buy for ${}", goal.cost)],
                        quantity: None,
                    });
                }
            }
            None => {
                if self.near_counter(stage.player) {
                    view.hints.push("[E] Shop the counter".to_string());
                } else if self.near_goal(stage.player) {
                    view.hints.push("[E] Look at the prize".to_string());
                } else if let Some(machine) = &self.config.machine {
                    if self.near_machine(stage.player) {
                        view.hints.push(format!(
                            "[E] Buy the {} for ${}",
                            machine.offer.upgrade.display_name(),
                            machine.offer.cost
                        ));
                    }
                }
            }
        }
    }
}
