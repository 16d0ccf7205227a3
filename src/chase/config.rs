// Chase game tuning. Every constant the loop reads lives here so balancing
// never touches the simulation code.
use serde::{Deserialize, Serialize};

/// How many monsters the game tries to keep alive: `base + score / per_score`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonsterQuota {
    pub base: u32,
    pub per_score: u32,
}

impl MonsterQuota {
    pub fn desired(&self, score: u32) -> usize {
        (self.base + score / self.per_score.max(1)) as usize
    }
}

/// Purple monsters: slower, bigger blast, only once the score is high enough.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PurpleVariant {
    pub min_score: u32,
    pub chance: f64,
    /// Multiplier on the monster move interval (>1 is slower).
    pub interval_factor: f64,
    /// Multiplier on the blast radius.
    pub radius_factor: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChaseConfig {
    pub tile_size: f64,
    pub player_move_interval: f64,
    pub tap_move_min_interval: f64,
    pub explosion_delay: f64,
    pub explosion_radius: i32,
    pub min_spawn_distance: i32,
    pub monsters_enabled_at: f64,
    pub monster_spawn_min_interval: f64,
    pub spawn_retries: u32,
    pub quota: MonsterQuota,
    pub purple: PurpleVariant,
}

impl Default for ChaseConfig {
    fn default() -> Self {
        Self {
            tile_size: 10.0,
            player_move_interval: 274.0,
            tap_move_min_interval: 45.0,
            explosion_delay: 500.0,
            explosion_radius: 1,
            min_spawn_distance: 6,
            monsters_enabled_at: 2000.0,
            monster_spawn_min_interval: 250.0,
            spawn_retries: 300,
            quota: MonsterQuota {
                base: 1,
                per_score: 5,
            },
            purple: PurpleVariant {
                min_score: 10,
                chance: 0.5,
                interval_factor: 1.4,
                radius_factor: 2,
            },
        }
    }
}

impl ChaseConfig {
    /// Monsters are a touch slower than the player.
    pub fn monster_move_interval(&self) -> f64 {
        (self.player_move_interval * 1.05).round().max(20.0)
    }

    pub fn purple_move_interval(&self) -> f64 {
        (self.monster_move_interval() * self.purple.interval_factor).round()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_intervals_match_tuning() {
        let cfg = ChaseConfig::default();
        assert_eq!(cfg.monster_move_interval(), 288.0);
        assert_eq!(cfg.purple_move_interval(), 403.0);
    }

    #[test]
    fn quota_grows_every_five_points() {
        let quota = ChaseConfig::default().quota;
        assert_eq!(quota.desired(0), 1);
        assert_eq!(quota.desired(4), 1);
        assert_eq!(quota.desired(5), 2);
        assert_eq!(quota.desired(23), 5);
    }
}
