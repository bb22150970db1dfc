use std::fmt;

/// Discrete grid position expressed in tile coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance between two tiles.
    pub fn distance(self, other: Position) -> u32 {
        (self.x - other.x).unsigned_abs() + (self.y - other.y).unsigned_abs()
    }

    /// Returns the neighbouring tile in the given direction.
    pub fn step(self, direction: Direction) -> Position {
        let (dx, dy) = direction.to_delta();
        Position::new(self.x + dx, self.y + dy)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Width and height of the battle map in tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }

    /// Clamps a position into the map bounds.
    pub fn clamp(&self, position: Position) -> Position {
        let max_x = (self.width as i32 - 1).max(0);
        let max_y = (self.height as i32 - 1).max(0);
        Position::new(position.x.clamp(0, max_x), position.y.clamp(0, max_y))
    }
}

impl Default for MapDimensions {
    fn default() -> Self {
        Self::new(16, 12)
    }
}

/// Cardinal direction used for cursor movement and menu navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Screen-space delta: `Up` decreases `y`.
    pub const fn to_delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_keeps_positions_inside_map() {
        let dims = MapDimensions::new(8, 6);
        assert_eq!(dims.clamp(Position::new(-3, 2)), Position::new(0, 2));
        assert_eq!(dims.clamp(Position::new(12, 9)), Position::new(7, 5));
        assert!(dims.contains(Position::new(7, 5)));
        assert!(!dims.contains(Position::new(8, 5)));
    }

    #[test]
    fn distance_is_manhattan() {
        assert_eq!(Position::new(1, 1).distance(Position::new(4, -1)), 5);
        assert_eq!(Position::ORIGIN.step(Direction::Up), Position::new(0, -1));
    }
}
