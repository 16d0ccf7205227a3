//! Grid primitives shared by all three games: positions, directions, held-key
//! state and the small distance / clamping helpers the loops are built from.

use serde::Serialize;

/// A cell on a game grid. Columns grow to the right, rows grow downward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct GridPos {
    pub col: i32,
    pub row: i32,
}

impl GridPos {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Chebyshev distance: max of the absolute column and row deltas.
    pub fn tile_distance(self, other: GridPos) -> i32 {
        (self.col - other.col).abs().max((self.row - other.row).abs())
    }

    /// Step one cell in `dir`, clamped to `[0, cols-1] x [0, rows-1]`.
    pub fn step_clamped(self, dir: Direction, cols: i32, rows: i32) -> GridPos {
        let (dc, dr) = dir.delta();
        self.offset_clamped(dc, dr, cols, rows)
    }

    pub fn offset_clamped(self, dc: i32, dr: i32, cols: i32, rows: i32) -> GridPos {
        GridPos {
            col: (self.col + dc).clamp(0, (cols - 1).max(0)),
            row: (self.row + dr).clamp(0, (rows - 1).max(0)),
        }
    }

    /// Row-major index into a `cols`-wide grid. Caller guarantees bounds.
    pub fn index(self, cols: i32) -> usize {
        self.row as usize * cols as usize + self.col as usize
    }

    pub fn in_bounds(self, cols: i32, rows: i32) -> bool {
        self.col >= 0 && self.row >= 0 && self.col < cols && self.row < rows
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Parse the direction names the JS side sends. Unknown names are ignored.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Currently held directional inputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldKeys {
    pub fn set(&mut self, dir: Direction, pressed: bool) {
        match dir {
            Direction::Up => self.up = pressed,
            Direction::Down => self.down = pressed,
            Direction::Left => self.left = pressed,
            Direction::Right => self.right = pressed,
        }
    }

    /// Resolve held keys to one direction; priority is up, down, left, right.
    pub fn direction(&self) -> Option<Direction> {
        if self.up {
            Some(Direction::Up)
        } else if self.down {
            Some(Direction::Down)
        } else if self.left {
            Some(Direction::Left)
        } else if self.right {
            Some(Direction::Right)
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        *self = HeldKeys::default();
    }
}

/// Format milliseconds as `mm:ss`, truncating partial seconds.
pub fn format_clock(ms: f64) -> String {
    let total_sec = (ms / 1000.0).floor().max(0.0) as u64;
    format!("{:02}:{:02}", total_sec / 60, total_sec % 60)
}

/// Format a countdown as `mm:ss`, rounding partial seconds up.
pub fn format_countdown(ms: f64) -> String {
    let total_sec = (ms / 1000.0).ceil().max(0.0) as u64;
    format!("{:02}:{:02}", total_sec / 60, total_sec % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chebyshev_distance_takes_larger_axis() {
        let a = GridPos::new(2, 3);
        assert_eq!(a.tile_distance(GridPos::new(5, 4)), 3);
        assert_eq!(a.tile_distance(GridPos::new(1, 1)), 2);
        assert_eq!(a.tile_distance(a), 0);
    }

    #[test]
    fn step_clamped_stays_on_grid() {
        let corner = GridPos::new(0, 0);
        assert_eq!(corner.step_clamped(Direction::Up, 4, 4), corner);
        assert_eq!(corner.step_clamped(Direction::Left, 4, 4), corner);
        assert_eq!(
            corner.step_clamped(Direction::Right, 4, 4),
            GridPos::new(1, 0)
        );
        let far = GridPos::new(3, 3);
        assert_eq!(far.step_clamped(Direction::Down, 4, 4), far);
    }

    #[test]
    fn held_keys_resolve_with_priority() {
        let mut keys = HeldKeys::default();
        assert_eq!(keys.direction(), None);
        keys.set(Direction::Right, true);
        keys.set(Direction::Down, true);
        assert_eq!(keys.direction(), Some(Direction::Down));
        keys.set(Direction::Up, true);
        assert_eq!(keys.direction(), Some(Direction::Up));
        keys.clear();
        assert_eq!(keys.direction(), None);
    }

    #[test]
    fn direction_parsing_ignores_unknown_names() {
        assert_eq!(Direction::from_key("left"), Some(Direction::Left));
        assert_eq!(Direction::from_key("jump"), None);
        for d in Direction::ALL {
            assert_eq!(Direction::from_key(d.as_str()), Some(d));
        }
    }

    #[test]
    fn clock_formats() {
        assert_eq!(format_clock(0.0), "00:00");
        assert_eq!(format_clock(61_999.0), "01:01");
        assert_eq!(format_countdown(170_000.0), "02:50");
        assert_eq!(format_countdown(1.0), "00:01");
        assert_eq!(format_countdown(-5.0), "00:00");
    }
}
