/// Game configuration constants and tunable parameters.
///
/// Passed explicitly to the engine and the level builders; nothing in the
/// simulation reads global settings.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Hit points the player starts with.
    pub player_hit_points: i32,
    pub combat: CombatConfig,
    pub creatures: CreatureConfig,
    /// Cellular-automata parameters used by cave levels.
    pub cave: CaveConfig,
}

/// Damage numbers applied by actions and traps.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    pub bump_damage: i32,
    pub trap_fireball_damage: i32,
    pub heal_amount: i32,
}

/// Cooldowns and ranges for the creature controllers.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CreatureConfig {
    pub slime_split_cooldown: u32,
    pub lich_heal_cooldown: u32,
    pub spider_web_cooldown: u32,
    /// Chebyshev range within which the web spider shoots.
    pub spider_web_range: u32,
    /// Radius of the spider cave trap, in cells.
    pub spider_cave_radius: u32,
}

/// Cellular-automata cave parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CaveConfig {
    /// Probability that an interior cell starts as wall.
    pub fill_probability: f32,
    /// A wall stays a wall with at least this many wall neighbours.
    pub remain_wall_count: u32,
    /// A floor becomes a wall with at least this many wall neighbours.
    pub become_wall_count: u32,
    pub generations: u32,
    /// Minimum ratio of kept floor cells to the full rectangle.
    pub minimum_area: f32,
    pub max_attempts: u32,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum skeletons a single lich controller can command.
    pub const MAX_LICH_SKELETONS: usize = 16;
    /// Maximum entities stacked on a single cell.
    pub const MAX_OCCUPANTS_PER_TILE: usize = 4;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_PLAYER_HIT_POINTS: i32 = 100;

    pub fn new() -> Self {
        Self {
            player_hit_points: Self::DEFAULT_PLAYER_HIT_POINTS,
            combat: CombatConfig::default(),
            creatures: CreatureConfig::default(),
            cave: CaveConfig::default(),
        }
    }

    pub fn with_player_hit_points(mut self, player_hit_points: i32) -> Self {
        self.player_hit_points = player_hit_points;
        self
    }

    pub fn with_cave(mut self, cave: CaveConfig) -> Self {
        self.cave = cave;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            bump_damage: 1,
            trap_fireball_damage: 3,
            heal_amount: 2,
        }
    }
}

impl Default for CreatureConfig {
    fn default() -> Self {
        Self {
            slime_split_cooldown: 5,
            lich_heal_cooldown: 3,
            spider_web_cooldown: 4,
            spider_web_range: 4,
            spider_cave_radius: 6,
        }
    }
}

impl CaveConfig {
    /// Parameters for the spider cave: 40×40 with at least 40% open floor.
    pub const SPIDER_ROOM: Self = Self {
        fill_probability: 0.5,
        remain_wall_count: 4,
        become_wall_count: 5,
        generations: 4,
        minimum_area: 0.4,
        max_attempts: 20,
    };
}

impl Default for CaveConfig {
    fn default() -> Self {
        Self::SPIDER_ROOM
    }
}
