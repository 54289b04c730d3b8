//! Battle configuration, validation and named presets.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tunable parameters of a battle.
///
/// Every field has a default, so partial TOML or JSON documents deserialize
/// into a complete configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Hit points every agent starts with.
    pub hp_default: f32,
    /// Base damage dealt per contact before modifiers.
    pub damage_base: f32,
    /// Global damage modifier applied to every contact.
    pub damage_multiplier: f32,
    /// Frames per second of the eventual video; sizes the frame budget.
    pub fps: u32,
    /// Longest battle duration in seconds; sizes the frame budget.
    pub max_duration_secs: u32,
    /// Explicit frame budget overriding `fps × max_duration_secs`.
    pub max_frames: Option<u32>,
    /// Width of the arena in world units.
    pub arena_width: f32,
    /// Height of the arena in world units.
    pub arena_height: f32,
    /// Reference radius of an agent; also the wall margin.
    pub base_radius: f32,
    /// Reference speed in world units per frame.
    pub max_speed: f32,
    /// Fraction of velocity kept when bouncing off a wall.
    pub bounce_damping: f32,
    /// Minimum edge length of a spatial hash cell.
    pub grid_cell_size: f32,
    /// Population counts, strictly descending, at which everyone grows.
    pub growth_thresholds: Vec<u32>,
    /// Radius and speed multiplier applied by a growth pulse.
    pub growth_factor: f32,
    /// Largest radius expressed as a multiple of `base_radius`.
    pub max_radius_multiple: f32,
    /// Lower bound of the per-agent strength draw.
    pub strength_min: f32,
    /// Upper bound of the per-agent strength draw.
    pub strength_max: f32,
    /// Seed of the pseudo random generator used to stage the arena.
    pub seed: u64,
    /// Live population at which collision detection fans out across threads.
    pub parallel_threshold: usize,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            hp_default: 100.0,
            damage_base: 5.0,
            damage_multiplier: 0.5,
            fps: 30,
            max_duration_secs: 60,
            max_frames: None,
            arena_width: 1_000.0,
            arena_height: 1_000.0,
            base_radius: 10.0,
            max_speed: 8.0,
            bounce_damping: 0.98,
            grid_cell_size: 50.0,
            growth_thresholds: vec![500, 250, 100, 50, 25, 10, 5],
            growth_factor: 1.3,
            max_radius_multiple: 8.0,
            strength_min: 0.8,
            strength_max: 1.2,
            seed: 0x5eed_b4a7_71e0_0001,
            parallel_threshold: 20_000,
        }
    }
}

impl BattleConfig {
    /// Builds the configuration associated with a named preset.
    #[must_use]
    pub fn from_preset(preset: Preset) -> Self {
        let (max_duration_secs, hp_default, damage_base) = match preset {
            Preset::Quick => (20, 50.0, 10.0),
            Preset::Normal => (60, 100.0, 5.0),
            Preset::Epic => (120, 200.0, 3.0),
            Preset::Ultra => (180, 300.0, 2.0),
        };
        Self {
            max_duration_secs,
            hp_default,
            damage_base,
            ..Self::default()
        }
    }

    /// Number of frames the simulation may run before it is cut off.
    #[must_use]
    pub fn frame_budget(&self) -> u32 {
        self.max_frames
            .unwrap_or_else(|| self.fps.saturating_mul(self.max_duration_secs))
    }

    /// Largest radius an agent may reach through growth.
    #[must_use]
    pub fn max_radius(&self) -> f32 {
        self.base_radius * self.max_radius_multiple
    }

    /// Hit points a killer may be healed up to.
    #[must_use]
    pub fn max_hp(&self) -> f32 {
        self.hp_default * 2.0
    }

    /// Checks that every field lies inside its meaningful range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("hp_default", self.hp_default)?;
        require_non_negative("damage_base", self.damage_base)?;
        require_non_negative("damage_multiplier", self.damage_multiplier)?;
        require_positive("base_radius", self.base_radius)?;
        require_positive("max_speed", self.max_speed)?;
        require_positive("grid_cell_size", self.grid_cell_size)?;
        require_positive("arena_width", self.arena_width)?;
        require_positive("arena_height", self.arena_height)?;

        if self.fps == 0 {
            return Err(ConfigError::ZeroFrameRate);
        }
        if self.frame_budget() == 0 {
            return Err(ConfigError::ZeroFrameBudget);
        }

        let margin = 2.0 * self.base_radius;
        if self.arena_width <= margin || self.arena_height <= margin {
            return Err(ConfigError::ArenaTooSmall {
                width: self.arena_width,
                height: self.arena_height,
                base_radius: self.base_radius,
            });
        }

        if !(self.bounce_damping > 0.0 && self.bounce_damping <= 1.0) {
            return Err(ConfigError::DampingOutOfRange(self.bounce_damping));
        }
        if !(self.growth_factor.is_finite() && self.growth_factor >= 1.0) {
            return Err(ConfigError::GrowthFactorBelowOne(self.growth_factor));
        }
        if !(self.max_radius_multiple.is_finite() && self.max_radius_multiple >= 1.0) {
            return Err(ConfigError::RadiusCapBelowOne(self.max_radius_multiple));
        }

        require_positive("strength_min", self.strength_min)?;
        require_positive("strength_max", self.strength_max)?;
        if self.strength_min > self.strength_max {
            return Err(ConfigError::InvertedStrengthRange {
                min: self.strength_min,
                max: self.strength_max,
            });
        }

        if self
            .growth_thresholds
            .windows(2)
            .any(|pair| pair[0] <= pair[1])
        {
            return Err(ConfigError::ThresholdsNotDescending(
                self.growth_thresholds.clone(),
            ));
        }

        Ok(())
    }
}

fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn require_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

/// Reasons a configuration is rejected before a battle starts.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// A field that must be strictly positive and finite was not.
    #[error("`{field}` must be positive and finite, got {value}")]
    NotPositive {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was provided.
        value: f32,
    },
    /// A field that must not be negative was.
    #[error("`{field}` must be finite and not negative, got {value}")]
    Negative {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was provided.
        value: f32,
    },
    /// The frame rate was zero.
    #[error("`fps` must be at least 1")]
    ZeroFrameRate,
    /// The frame budget resolved to zero frames.
    #[error("the frame budget must allow at least one frame")]
    ZeroFrameBudget,
    /// The arena cannot contain an agent between its walls.
    #[error("arena {width}x{height} is too small for base radius {base_radius}")]
    ArenaTooSmall {
        /// Configured arena width.
        width: f32,
        /// Configured arena height.
        height: f32,
        /// Configured base radius.
        base_radius: f32,
    },
    /// Wall damping fell outside `(0, 1]`.
    #[error("`bounce_damping` must lie in (0, 1], got {0}")]
    DampingOutOfRange(f32),
    /// Growth would shrink agents.
    #[error("`growth_factor` must be at least 1, got {0}")]
    GrowthFactorBelowOne(f32),
    /// The radius cap lies below the base radius.
    #[error("`max_radius_multiple` must be at least 1, got {0}")]
    RadiusCapBelowOne(f32),
    /// The strength draw range is inverted.
    #[error("strength range [{min}, {max}] is inverted")]
    InvertedStrengthRange {
        /// Configured lower bound.
        min: f32,
        /// Configured upper bound.
        max: f32,
    },
    /// Growth thresholds are not strictly descending.
    #[error("growth thresholds must be strictly descending, got {0:?}")]
    ThresholdsNotDescending(Vec<u32>),
    /// The roster holds more participants than agent identifiers can address.
    #[error("roster of {0} participants exceeds the addressable agent range")]
    RosterTooLarge(usize),
    /// A preset name did not match any known preset.
    #[error("unknown preset `{0}` (expected quick, normal, epic or ultra)")]
    UnknownPreset(String),
}

/// Named battle sizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Short battle for smoke runs.
    Quick,
    /// Default one-minute battle.
    Normal,
    /// Long battle for large audiences.
    Epic,
    /// Longest battle for very large audiences.
    Ultra,
}

impl Preset {
    /// Largest roster the preset is tuned for.
    #[must_use]
    pub const fn participant_cap(self) -> usize {
        match self {
            Self::Quick => 500,
            Self::Normal => 5_000,
            Self::Epic => 50_000,
            Self::Ultra => 100_000,
        }
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "quick" => Ok(Self::Quick),
            "normal" => Ok(Self::Normal),
            "epic" => Ok(Self::Epic),
            "ultra" => Ok(Self::Ultra),
            other => Err(ConfigError::UnknownPreset(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_is_valid() {
        let config = BattleConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.frame_budget(), 1_800);
        assert!((config.max_radius() - 80.0).abs() < f32::EPSILON);
    }

    #[test]
    fn explicit_frame_budget_overrides_duration() {
        let config = BattleConfig {
            max_frames: Some(42),
            ..BattleConfig::default()
        };
        assert_eq!(config.frame_budget(), 42);
    }

    #[test]
    fn negative_hp_is_rejected() {
        let config = BattleConfig {
            hp_default: -1.0,
            ..BattleConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "hp_default",
                value: -1.0,
            })
        );
    }

    #[test]
    fn nan_damage_is_rejected() {
        let config = BattleConfig {
            damage_base: f32::NAN,
            ..BattleConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Negative {
                field: "damage_base",
                ..
            })
        ));
    }

    #[test]
    fn zero_frame_budget_is_rejected() {
        let config = BattleConfig {
            max_frames: Some(0),
            ..BattleConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroFrameBudget));

        let config = BattleConfig {
            fps: 0,
            ..BattleConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroFrameRate));
    }

    #[test]
    fn tiny_arena_is_rejected() {
        let config = BattleConfig {
            arena_width: 15.0,
            ..BattleConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ArenaTooSmall { .. })
        ));
    }

    #[test]
    fn damping_must_not_amplify() {
        let config = BattleConfig {
            bounce_damping: 1.5,
            ..BattleConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::DampingOutOfRange(1.5)));
    }

    #[test]
    fn shrinking_growth_is_rejected() {
        let config = BattleConfig {
            growth_factor: 0.9,
            ..BattleConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::GrowthFactorBelowOne(0.9))
        );

        let config = BattleConfig {
            max_radius_multiple: 0.5,
            ..BattleConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::RadiusCapBelowOne(0.5)));
    }

    #[test]
    fn inverted_strength_range_is_rejected() {
        let config = BattleConfig {
            strength_min: 1.5,
            strength_max: 1.0,
            ..BattleConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvertedStrengthRange { min: 1.5, max: 1.0 })
        );
    }

    #[test]
    fn thresholds_must_descend() {
        let config = BattleConfig {
            growth_thresholds: vec![100, 250],
            ..BattleConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ThresholdsNotDescending(vec![100, 250]))
        );

        let config = BattleConfig {
            growth_thresholds: Vec::new(),
            ..BattleConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn presets_scale_duration_and_durability() {
        let quick = BattleConfig::from_preset(Preset::Quick);
        assert_eq!(quick.frame_budget(), 600);
        assert!((quick.hp_default - 50.0).abs() < f32::EPSILON);
        assert!((quick.damage_base - 10.0).abs() < f32::EPSILON);
        assert_eq!(Preset::Quick.participant_cap(), 500);

        let ultra = BattleConfig::from_preset(Preset::Ultra);
        assert_eq!(ultra.frame_budget(), 5_400);
        assert_eq!(ultra.validate(), Ok(()));
    }

    #[test]
    fn preset_names_parse_case_insensitively() {
        assert_eq!("Epic".parse::<Preset>(), Ok(Preset::Epic));
        assert_eq!(
            "legendary".parse::<Preset>(),
            Err(ConfigError::UnknownPreset("legendary".to_owned()))
        );
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: BattleConfig = toml::from_str(
            r#"
            hp_default = 250.0
            growth_thresholds = [40, 20, 10]
            seed = 7
            "#,
        )
        .expect("parse config");

        assert!((config.hp_default - 250.0).abs() < f32::EPSILON);
        assert_eq!(config.growth_thresholds, vec![40, 20, 10]);
        assert_eq!(config.seed, 7);
        assert!((config.arena_width - 1_000.0).abs() < f32::EPSILON);
        assert_eq!(config.validate(), Ok(()));
    }
}
