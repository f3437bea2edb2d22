use serde::{Deserialize, Serialize};

use super::geometry::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

const DIRECTION_COUNT: usize = 4;

impl Direction {
    pub const ALL: [Direction; DIRECTION_COUNT] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    const fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    /// Screen-space unit step; y grows downward.
    pub const fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }

    pub const fn arrow(self) -> &'static str {
        match self {
            Direction::Up => "^",
            Direction::Down => "v",
            Direction::Left => "<",
            Direction::Right => ">",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSlot {
    One,
    Two,
    Three,
    Four,
}

impl ActionSlot {
    pub const fn number(self) -> u8 {
        match self {
            ActionSlot::One => 1,
            ActionSlot::Two => 2,
            ActionSlot::Three => 3,
            ActionSlot::Four => 4,
        }
    }

    pub const fn from_number(number: u8) -> Option<ActionSlot> {
        match number {
            1 => Some(ActionSlot::One),
            2 => Some(ActionSlot::Two),
            3 => Some(ActionSlot::Three),
            4 => Some(ActionSlot::Four),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyPress {
    Direction(Direction),
    Action(ActionSlot),
    Interact,
    Inventory,
    Escape,
    Confirm,
    QuantityUp,
    QuantityDown,
    FastForward,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct HeldDirections {
    down: [bool; DIRECTION_COUNT],
}

impl HeldDirections {
    pub(crate) fn set(&mut self, direction: Direction, is_down: bool) {
        self.down[direction.index()] = is_down;
    }

    pub(crate) fn is_down(&self, direction: Direction) -> bool {
        self.down[direction.index()]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    quit_requested: bool,
    held: HeldDirections,
    pressed: Vec<KeyPress>,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        self.held.is_down(direction)
    }

    /// Raw movement intent from held directions; opposite keys cancel.
    pub fn movement_axis(&self) -> Vec2 {
        Direction::ALL
            .iter()
            .filter(|direction| self.is_held(**direction))
            .fold(Vec2::ZERO, |axis, direction| axis + direction.unit())
    }

    pub fn pressed(&self) -> &[KeyPress] {
        &self.pressed
    }

    pub fn was_pressed(&self, key: KeyPress) -> bool {
        self.pressed.contains(&key)
    }

    pub fn with_quit_requested(mut self, quit_requested: bool) -> Self {
        self.quit_requested = quit_requested;
        self
    }

    pub fn with_held(mut self, direction: Direction, is_down: bool) -> Self {
        self.held.set(direction, is_down);
        self
    }

    pub fn with_pressed(mut self, key: KeyPress) -> Self {
        self.pressed.push(key);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_held_directions_cancel() {
        let snapshot = InputSnapshot::empty()
            .with_held(Direction::Left, true)
            .with_held(Direction::Right, true)
            .with_held(Direction::Down, true);

        assert_eq!(snapshot.movement_axis(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn releasing_a_direction_clears_it() {
        let snapshot = InputSnapshot::empty()
            .with_held(Direction::Up, true)
            .with_held(Direction::Up, false);

        assert!(!snapshot.is_held(Direction::Up));
        assert_eq!(snapshot.movement_axis(), Vec2::ZERO);
    }

    #[test]
    fn pressed_keys_keep_arrival_order() {
        let snapshot = InputSnapshot::empty()
            .with_pressed(KeyPress::Direction(Direction::Left))
            .with_pressed(KeyPress::Interact);

        assert_eq!(
            snapshot.pressed(),
            &[KeyPress::Direction(Direction::Left), KeyPress::Interact]
        );
        assert!(snapshot.was_pressed(KeyPress::Interact));
        assert!(!snapshot.was_pressed(KeyPress::Escape));
    }
}
