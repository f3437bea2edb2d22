use sugar_engine::{Rect, Vec2};

pub const FOOTPRINT_WIDTH: f32 = 30.0;
pub const FOOTPRINT_HEIGHT: f32 = 20.0;

/// Collision box at the player's feet, below and centered on `position`.
pub fn footprint(position: Vec2) -> Rect {
    Rect::new(
        position.x - FOOTPRINT_WIDTH / 2.0,
        position.y + 15.0,
        FOOTPRINT_WIDTH,
        FOOTPRINT_HEIGHT,
    )
}

pub fn is_blocked(position: Vec2, obstacles: &[Rect]) -> bool {
    let feet = footprint(position);
    obstacles.iter().any(|obstacle| feet.overlaps(obstacle))
}

/// Moves along x, then y, dropping the component of the step that would
/// push the footprint into an obstacle.
pub fn step_player(
    position: Vec2,
    axis: Vec2,
    speed: f32,
    dt: f32,
    obstacles: &[Rect],
) -> Vec2 {
    let delta = axis.normalized_or_zero() * (speed * dt);
    let mut next = position;

    let along_x = Vec2::new(next.x + delta.x, next.y);
    if delta.x != 0.0 && !is_blocked(along_x, obstacles) {
        next = along_x;
    }
    let along_y = Vec2::new(next.x, next.y + delta.y);
    if delta.y != 0.0 && !is_blocked(along_y, obstacles) {
        next = along_y;
    }
    next
}

pub fn nearest_within<I>(from: Vec2, radius: f32, points: I) -> Option<(usize, f32)>
where
    I: IntoIterator<Item = (usize, Vec2)>,
{
    points
        .into_iter()
        .map(|(index, point)| (index, from.distance(point)))
        .filter(|(_, distance)| *distance < radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
}
