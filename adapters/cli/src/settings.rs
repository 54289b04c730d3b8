//! Battle configuration assembled from presets, TOML files and flags.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use brawl_core::{BattleConfig, Preset};

/// Roster size used when neither a preset nor `--participants` sets one.
pub(crate) const DEFAULT_PARTICIPANTS: usize = 1_000;

/// Field overrides given on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Overrides {
    pub(crate) hp_default: Option<f32>,
    pub(crate) damage_base: Option<f32>,
    pub(crate) fps: Option<u32>,
    pub(crate) duration: Option<u32>,
    pub(crate) max_frames: Option<u32>,
    pub(crate) seed: Option<u64>,
}

impl Overrides {
    fn apply(self, config: &mut BattleConfig) {
        if let Some(hp_default) = self.hp_default {
            config.hp_default = hp_default;
        }
        if let Some(damage_base) = self.damage_base {
            config.damage_base = damage_base;
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(duration) = self.duration {
            config.max_duration_secs = duration;
        }
        if let Some(max_frames) = self.max_frames {
            config.max_frames = Some(max_frames);
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
    }
}

/// Builds the validated configuration for a run.
///
/// A TOML file takes precedence over a preset; flags override both.
pub(crate) fn resolve(
    preset: Option<Preset>,
    file: Option<&Path>,
    overrides: Overrides,
) -> Result<BattleConfig> {
    let mut config = match (file, preset) {
        (Some(path), _) => load(path)?,
        (None, Some(preset)) => BattleConfig::from_preset(preset),
        (None, None) => BattleConfig::default(),
    };
    overrides.apply(&mut config);
    config.validate().context("invalid battle configuration")?;
    Ok(config)
}

/// Reads a configuration from a TOML file; absent keys keep their defaults.
pub(crate) fn load(path: &Path) -> Result<BattleConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("failed to parse config {}", path.display()))
}

/// Roster size requested by the flags, the preset, or the default.
#[must_use]
pub(crate) fn participant_cap(participants: Option<usize>, preset: Option<Preset>) -> usize {
    participants
        .or_else(|| preset.map(Preset::participant_cap))
        .unwrap_or(DEFAULT_PARTICIPANTS)
}
