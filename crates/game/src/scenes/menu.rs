use sugar_engine::{ActionSlot, Direction, InputSnapshot, KeyPress, Scene, SceneCommand, SceneId};
use tracing::{info, warn};

use super::context::SceneContext;
use super::ids;
use super::view::FrameView;

pub const INTERLUDE_SECONDS: f32 = 3.0;
pub const CREDITS_SCROLL_PX_PER_SECOND: f32 = 30.0;
const CREDITS_LINE_HEIGHT_PX: f32 = 30.0;
const INSTRUCTIONS_VISIBLE_LINES: usize = 8;

const INSTRUCTION_LINES: &[&str] = &[
    "Andrew sells candy at school; Mark restocks after.",
    "Arrows move. [E] interacts. [I] opens the backpack.",
    "Classroom: talk to classmates and match the arrow",
    "sequence before time runs out to win a buyer.",
    "Stay out of the teacher's sight or lose 30 seconds.",
    "Playground: find your buyers and press 1-3 to sell.",
    "[+]/[-] change how many you sell. Avoid bullies.",
    "Hallway: pay the monitor a candy to get past,",
    "then spend your money on upgrades.",
    "Street: alternate left and right on the beat.",
    "Stores: restock at the counter with 1-3.",
    "Save $500 for the PS5 at Costco to win.",
    "[F] skips 15 seconds ahead.",
];

const CREDITS_LINES: &[&str] = &[
    "SUGAR RUSH",
    "",
    "You bought the PS5!",
    "",
    "Thanks for playing.",
];

const TITLE_OPTIONS: &[&str] = &["[1] Play", "[2] Load Save", "[3] Instructions", "[4] Quit"];

enum MenuKind {
    Title { popup_open: bool },
    Instructions { scroll: usize },
    SlotSelect(SlotSelect),
    Interlude { remaining: f32, next: SceneId },
    Ending { scroll_px: f32 },
}

struct SlotSelect {
    slots: Vec<SlotEntry>,
    new_slot: String,
    cursor: usize,
}

struct SlotEntry {
    name: String,
    label: String,
}

impl SlotEntry {
    fn summarize(name: String, context: &SceneContext) -> Self {
        let label = match context.store().load_slot(&name) {
            Ok(profile) => format!(
                "{name} - Cash: ${} / Buyers: {}",
                profile.money(),
                profile.buyer_count()
            ),
            Err(error) => {
                warn!(slot = %name, error = %error, "save_slot_unreadable");
                format!("{name} (Corrupt Data)")
            }
        };
        Self { name, label }
    }
}

impl SlotSelect {
    fn entry_count(&self) -> usize {
        self.slots.len() + 1
    }
}

pub struct MenuScene {
    id: SceneId,
    title: &'static str,
    kind: MenuKind,
    pending_next: Option<SceneId>,
    quit: bool,
    notice: Option<String>,
}

impl MenuScene {
    fn with_kind(id: &str, title: &'static str, kind: MenuKind) -> Self {
        Self {
            id: SceneId::from(id),
            title,
            kind,
            pending_next: None,
            quit: false,
            notice: None,
        }
    }

    pub fn title_screen() -> Self {
        Self::with_kind(
            ids::TITLE_SCREEN,
            "Sugar Rush",
            MenuKind::Title { popup_open: true },
        )
    }

    pub fn instructions() -> Self {
        Self::with_kind(
            ids::INSTRUCTIONS,
            "How to Play",
            MenuKind::Instructions { scroll: 0 },
        )
    }

    pub fn load_save(context: &SceneContext) -> Self {
        let slots = context
            .list_slots()
            .unwrap_or_else(|error| {
                warn!(error = %error, "save_slots_unlisted");
                Vec::new()
            })
            .into_iter()
            .map(|name| SlotEntry::summarize(name, context))
            .collect();
        let new_slot = context.next_slot_name().unwrap_or_else(|error| {
            warn!(error = %error, "save_slots_unlisted");
            context.store().active_slot().to_string()
        });
        Self::with_kind(
            ids::LOAD_SAVE,
            "Load Save",
            MenuKind::SlotSelect(SlotSelect {
                slots,
                new_slot,
                cursor: 0,
            }),
        )
    }

    pub fn interlude(id: &str, title: &'static str, next: &str) -> Self {
        Self::with_kind(
            id,
            title,
            MenuKind::Interlude {
                remaining: INTERLUDE_SECONDS,
                next: SceneId::from(next),
            },
        )
    }

    pub fn ending() -> Self {
        Self::with_kind(ids::ENDING, "The End", MenuKind::Ending { scroll_px: 0.0 })
    }

    fn request(&mut self, next: &str) {
        self.pending_next = Some(SceneId::from(next));
    }

    fn handle_key(&mut self, key: KeyPress, context: &mut SceneContext) {
        match &mut self.kind {
            MenuKind::Title { popup_open } => {
                if *popup_open {
                    match key {
                        KeyPress::Confirm => *popup_open = false,
                        KeyPress::Escape => self.quit = true,
                        _ => {}
                    }
                    return;
                }
                match key {
                    KeyPress::Action(ActionSlot::One) => {
                        context.start_new_game();
                        info!(slot = context.store().active_slot(), "new_game_started");
                        self.request(ids::BROTHER_A_TRANSITION);
                    }
                    KeyPress::Action(ActionSlot::Two) => self.request(ids::LOAD_SAVE),
                    KeyPress::Action(ActionSlot::Three) => self.request(ids::INSTRUCTIONS),
                    KeyPress::Action(ActionSlot::Four) | KeyPress::Escape => self.quit = true,
                    _ => {}
                }
            }
            MenuKind::Instructions { scroll } => match key {
                KeyPress::Direction(Direction::Up) => *scroll = scroll.saturating_sub(1),
                KeyPress::Direction(Direction::Down) => {
                    let max = INSTRUCTION_LINES
                        .len()
                        .saturating_sub(INSTRUCTIONS_VISIBLE_LINES);
                    *scroll = (*scroll + 1).min(max);
                }
                KeyPress::Escape | KeyPress::Confirm => self.request(ids::TITLE_SCREEN),
                _ => {}
            },
            MenuKind::SlotSelect(select) => match key {
                KeyPress::Direction(Direction::Up) => {
                    select.cursor = select.cursor.saturating_sub(1);
                }
                KeyPress::Direction(Direction::Down) => {
                    select.cursor = (select.cursor + 1).min(select.entry_count() - 1);
                }
                KeyPress::Confirm => {
                    let result = match select.slots.get(select.cursor) {
                        Some(slot) => context.select_slot(&slot.name),
                        None => context.create_next_slot().map(|_| ()),
                    };
                    match result {
                        Ok(()) => {
                            info!(slot = context.store().active_slot(), "save_slot_loaded");
                            self.request(ids::BROTHER_A_TRANSITION);
                        }
                        Err(error) => {
                            warn!(error = %error, "save_slot_load_failed");
                            self.notice = Some(error.to_string());
                        }
                    }
                }
                KeyPress::Escape => self.request(ids::TITLE_SCREEN),
                _ => {}
            },
            MenuKind::Interlude { next, .. } => {
                if matches!(key, KeyPress::Confirm | KeyPress::Escape) {
                    self.pending_next = Some(next.clone());
                }
            }
            MenuKind::Ending { .. } => {
                if matches!(key, KeyPress::Confirm | KeyPress::Escape) {
                    self.request(ids::TITLE_SCREEN);
                }
            }
        }
    }

    fn menu_lines(&self) -> Vec<String> {
        match &self.kind {
            MenuKind::Title { popup_open: true } => {
                let mut lines = vec!["How to play (press Enter to close)".to_string()];
                lines.extend(INSTRUCTION_LINES.iter().map(|line| line.to_string()));
                lines
            }
            MenuKind::Title { popup_open: false } => {
                TITLE_OPTIONS.iter().map(|line| line.to_string()).collect()
            }
            MenuKind::Instructions { scroll } => INSTRUCTION_LINES
                .iter()
                .skip(*scroll)
                .take(INSTRUCTIONS_VISIBLE_LINES)
                .map(|line| line.to_string())
                .collect(),
            MenuKind::SlotSelect(select) => select
                .slots
                .iter()
                .map(|slot| slot.label.as_str())
                .chain(std::iter::once("New Game"))
                .enumerate()
                .map(|(index, label)| {
                    let marker = if index == select.cursor { ">" } else { " " };
                    if index == select.slots.len() {
                        format!("{marker} {label} ({})", select.new_slot)
                    } else {
                        format!("{marker} {label}")
                    }
                })
                .collect(),
            MenuKind::Interlude { .. } => vec![self.title.to_string()],
            MenuKind::Ending { scroll_px } => {
                let skipped = (*scroll_px / CREDITS_LINE_HEIGHT_PX) as usize;
                CREDITS_LINES
                    .iter()
                    .skip(skipped)
                    .map(|line| line.to_string())
                    .collect()
            }
        }
    }
}

impl Scene for MenuScene {
    type Context = SceneContext;
    type View = FrameView;

    fn process_input(&mut self, input: &InputSnapshot, context: &mut SceneContext) {
        for key in input.pressed() {
            self.handle_key(*key, context);
        }
    }

    fn update(&mut self, fixed_dt_seconds: f32, _context: &mut SceneContext) -> SceneCommand {
        if self.quit {
            return SceneCommand::Quit;
        }
        match &mut self.kind {
            MenuKind::Interlude { remaining, next } => {
                *remaining -= fixed_dt_seconds;
                if *remaining <= 0.0 && self.pending_next.is_none() {
                    self.pending_next = Some(next.clone());
                }
            }
            MenuKind::Ending { scroll_px } => {
                *scroll_px += CREDITS_SCROLL_PX_PER_SECOND * fixed_dt_seconds;
            }
            _ => {}
        }
        SceneCommand::from(self.pending_next.take())
    }

    fn view(&self, context: &SceneContext) -> FrameView {
        let mut view = FrameView::new(self.id.clone(), self.title, context.profile());
        view.menu = self.menu_lines();
        view.notice = self.notice.clone();
        if let MenuKind::Interlude { remaining, .. } = &self.kind {
            view.remaining_seconds = Some(remaining.max(0.0));
        }
        view
    }
}
