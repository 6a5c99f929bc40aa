use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::{Bounds, Viewport};

/// Tunable parameters recognised by the simulation and its adapters.
///
/// Every field falls back to its default when omitted from a configuration
/// file, so an empty document describes the stock game.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Seconds between two movement ticks.
    pub movement_interval: f32,
    /// Number of segments created behind the head when a round starts.
    pub starting_tail_length: u32,
    /// Minimum drag distance that registers as a swipe.
    pub swipe_threshold: f32,
    /// Zoom factor applied to the viewport; larger values shrink the board.
    pub screen_zoom: f32,
    /// Seconds to wait after a round ends before a new one is constructed.
    pub restart_delay: f32,
    /// Seed for the food placement generator.
    pub food_seed: u64,
    /// Viewport the board is derived from.
    pub viewport: ViewportConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            movement_interval: 0.1,
            starting_tail_length: 3,
            swipe_threshold: 100.0,
            screen_zoom: 1.0,
            restart_delay: 3.0,
            food_seed: 0x5eed_f00d_cafe_d00d,
            viewport: ViewportConfig::default(),
        }
    }
}

impl GameConfig {
    /// Verifies that every numeric option lies inside its accepted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.movement_interval.is_finite() && self.movement_interval > 0.0) {
            return Err(ConfigError::MovementInterval(self.movement_interval));
        }
        if !(self.swipe_threshold.is_finite() && self.swipe_threshold > 0.0) {
            return Err(ConfigError::SwipeThreshold(self.swipe_threshold));
        }
        if !(self.screen_zoom.is_finite() && self.screen_zoom > 0.0) {
            return Err(ConfigError::ScreenZoom(self.screen_zoom));
        }
        if !(self.restart_delay.is_finite() && self.restart_delay >= 0.0) {
            return Err(ConfigError::RestartDelay(self.restart_delay));
        }
        if !(self.viewport.orthographic_size.is_finite() && self.viewport.orthographic_size > 0.0)
        {
            return Err(ConfigError::OrthographicSize(
                self.viewport.orthographic_size,
            ));
        }
        if !(self.viewport.aspect.is_finite() && self.viewport.aspect > 0.0) {
            return Err(ConfigError::Aspect(self.viewport.aspect));
        }

        let viewport = self.zoomed_viewport();
        let half_height = viewport.orthographic_size().floor();
        let half_width = (viewport.aspect() * half_height).floor();
        let limit = Bounds::MAX_HALF_EXTENT as f32;
        if half_width > limit || half_height > limit {
            return Err(ConfigError::BoardTooLarge {
                half_width,
                half_height,
            });
        }
        Ok(())
    }

    /// Interval between movement ticks.
    #[must_use]
    pub fn movement_interval(&self) -> Duration {
        Duration::from_secs_f32(self.movement_interval.max(0.0))
    }

    /// Delay between the end of a round and the restart.
    #[must_use]
    pub fn restart_delay(&self) -> Duration {
        Duration::from_secs_f32(self.restart_delay.max(0.0))
    }

    /// Viewport after the configured zoom has been applied.
    #[must_use]
    pub fn zoomed_viewport(&self) -> Viewport {
        Viewport::new(self.viewport.orthographic_size, self.viewport.aspect)
            .zoomed(self.screen_zoom)
    }
}

/// Camera parameters used to derive the playable bounds.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewportConfig {
    /// Half of the visible height measured in cells, before zoom.
    pub orthographic_size: f32,
    /// Width divided by height of the visible area.
    pub aspect: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            orthographic_size: 10.0,
            aspect: 1.6,
        }
    }
}

/// Reasons a [`GameConfig`] fails validation.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The movement interval must be a positive number of seconds.
    #[error("movement_interval must be positive (received {0})")]
    MovementInterval(f32),
    /// The swipe threshold must be a positive distance.
    #[error("swipe_threshold must be positive (received {0})")]
    SwipeThreshold(f32),
    /// The zoom factor must be positive.
    #[error("screen_zoom must be positive (received {0})")]
    ScreenZoom(f32),
    /// The restart delay cannot be negative.
    #[error("restart_delay must not be negative (received {0})")]
    RestartDelay(f32),
    /// The orthographic size must be positive.
    #[error("viewport.orthographic_size must be positive (received {0})")]
    OrthographicSize(f32),
    /// The aspect ratio must be positive.
    #[error("viewport.aspect must be positive (received {0})")]
    Aspect(f32),
    /// The zoomed viewport describes a board wider or taller than supported.
    #[error(
        "viewport describes a board with half extents {half_width}x{half_height} (at most {} supported)",
        Bounds::MAX_HALF_EXTENT
    )]
    BoardTooLarge {
        /// Half width derived from the zoomed viewport.
        half_width: f32,
        /// Half height derived from the zoomed viewport.
        half_height: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        let config = GameConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.movement_interval(), Duration::from_millis(100));
        assert_eq!(config.zoomed_viewport().bounds(), Bounds::new(16, 10));
    }

    #[test]
    fn empty_document_yields_defaults() {
        let config: GameConfig = toml::from_str("").expect("empty config parses");
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn partial_document_overrides_named_fields() {
        let config: GameConfig = toml::from_str(
            r#"
                movement_interval = 0.25
                starting_tail_length = 0
                screen_zoom = 2.0

                [viewport]
                aspect = 1.0
            "#,
        )
        .expect("partial config parses");

        assert_eq!(config.starting_tail_length, 0);
        assert_eq!(config.movement_interval(), Duration::from_millis(250));
        assert_eq!(config.zoomed_viewport().bounds(), Bounds::new(5, 5));
        assert_eq!(config.swipe_threshold, 100.0);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<GameConfig, _> = toml::from_str("movement_speed = 3.0");
        assert!(result.is_err());
    }

    #[test]
    fn non_positive_values_fail_validation() {
        let config = GameConfig {
            movement_interval: 0.0,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::MovementInterval(0.0)));

        let config = GameConfig {
            swipe_threshold: -1.0,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::SwipeThreshold(-1.0)));

        let config = GameConfig {
            screen_zoom: 0.0,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ScreenZoom(0.0)));
    }

    #[test]
    fn oversized_viewport_fails_validation() {
        let config = GameConfig {
            viewport: ViewportConfig {
                orthographic_size: 3.0e9,
                aspect: 1.0,
            },
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BoardTooLarge { half_height, .. }) if half_height >= 3.0e9
        ));

        let wide = GameConfig {
            viewport: ViewportConfig {
                orthographic_size: 100.0,
                aspect: 20.0,
            },
            ..GameConfig::default()
        };
        assert!(matches!(
            wide.validate(),
            Err(ConfigError::BoardTooLarge { half_width, .. }) if half_width == 2000.0
        ));

        let zoomed_in = GameConfig {
            screen_zoom: 4.0,
            ..wide
        };
        assert_eq!(zoomed_in.validate(), Ok(()));
    }
}
