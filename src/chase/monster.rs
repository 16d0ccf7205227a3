use serde::Serialize;

use crate::grid::GridPos;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum MonsterState {
    Chasing,
    /// Counting down to detonation (ms left).
    Arming { timer: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MonsterKind {
    Normal,
    Purple,
}

#[derive(Clone, Debug, Serialize)]
pub struct Monster {
    pub id: u32,
    pub pos: GridPos,
    pub state: MonsterState,
    pub kind: MonsterKind,
    pub move_cooldown: f64,
    pub move_interval: f64,
    pub blast_radius: i32,
    #[serde(skip)]
    pub(crate) dead: bool,
}

impl Monster {
    pub fn new(id: u32, pos: GridPos, kind: MonsterKind, move_interval: f64, blast_radius: i32) -> Self {
        Self {
            id,
            pos,
            state: MonsterState::Chasing,
            kind,
            move_cooldown: 0.0,
            move_interval,
            blast_radius,
            dead: false,
        }
    }

    pub fn is_arming(&self) -> bool {
        matches!(self.state, MonsterState::Arming { .. })
    }
}

/// Greedy chase step toward `target`: move along the axis with the larger
/// absolute offset; ties go to the row axis. Zero when already on target.
pub fn greedy_step(from: GridPos, target: GridPos) -> (i32, i32) {
    let dx = target.col - from.col;
    let dy = target.row - from.row;
    if dx.abs() > dy.abs() {
        (dx.signum(), 0)
    } else if dy != 0 {
        (0, dy.signum())
    } else {
        (0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greedy_step_prefers_larger_axis() {
        let m = GridPos::new(5, 5);
        assert_eq!(greedy_step(m, GridPos::new(9, 6)), (1, 0));
        assert_eq!(greedy_step(m, GridPos::new(4, 1)), (0, -1));
        assert_eq!(greedy_step(m, GridPos::new(1, 5)), (-1, 0));
    }

    #[test]
    fn greedy_step_breaks_ties_on_rows() {
        let m = GridPos::new(5, 5);
        assert_eq!(greedy_step(m, GridPos::new(8, 8)), (0, 1));
        assert_eq!(greedy_step(m, GridPos::new(2, 2)), (0, -1));
        assert_eq!(greedy_step(m, m), (0, 0));
    }
}
