//! Scene description for the portal walk demo
//!
//! Loaded from `.toml` or `.ron` through [`Config`]; the default is the
//! corridor in `scenes/corridor.toml`.

use probe_engine::config::{ColliderConfig, Config, ConfigError, TeleporterConfig};
use probe_engine::foundation::math::Vec3;
use serde::{Deserialize, Serialize};

/// Whole demo scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkConfig {
    /// Simulation steps before giving up
    pub ticks: u32,
    /// Seconds per step
    pub dt: f32,
    /// The walker
    pub player: PlayerConfig,
    /// Collidable wall panels
    #[serde(default)]
    pub walls: Vec<WallConfig>,
    /// Trigger volume at the end of the walk
    pub portal: PortalConfig,
    /// Random collidable crates
    #[serde(default)]
    pub scatter: ScatterConfig,
}

/// The walker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Starting position
    pub start: [f32; 3],
    /// Heading about +Y, in degrees (0 walks down -Z)
    #[serde(default)]
    pub yaw_degrees: f32,
    /// Walking speed in units per second
    pub speed: f32,
    /// Probe collider settings
    #[serde(default)]
    pub collider: ColliderConfig,
}

/// One flat wall panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallConfig {
    /// Panel center
    pub position: [f32; 3],
    /// Rotation about +Y, in degrees (0 faces +Z)
    #[serde(default)]
    pub yaw_degrees: f32,
    /// Panel width
    pub width: f32,
    /// Panel height
    pub height: f32,
}

/// The portal volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Volume center
    pub position: [f32; 3],
    /// Volume half extents
    pub half_extents: [f32; 3],
    /// Teleporter settings
    pub teleporter: TeleporterConfig,
}

/// Crates scattered left and right of the corridor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterConfig {
    /// Number of crates
    pub count: usize,
    /// Closest a crate gets to the corridor axis
    pub inner_radius: f32,
    /// Furthest a crate gets from the corridor axis
    pub outer_radius: f32,
    /// Depth range along Z
    pub depth: [f32; 2],
    /// Crate half size
    pub size: f32,
    /// Fixed seed for repeatable layouts
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            count: 0,
            inner_radius: 2.0,
            outer_radius: 6.0,
            depth: [-8.0, 6.0],
            size: 0.4,
            seed: None,
        }
    }
}

impl Default for WalkConfig {
    fn default() -> Self {
        let side_wall = |x: f32| WallConfig {
            position: [x, 0.5, -1.0],
            yaw_degrees: 90.0,
            width: 14.0,
            height: 3.0,
        };

        Self {
            ticks: 600,
            dt: 1.0 / 60.0,
            player: PlayerConfig {
                start: [0.4, 0.0, 4.0],
                yaw_degrees: -4.0,
                speed: 1.5,
                collider: ColliderConfig::default(),
            },
            walls: vec![
                side_wall(-1.0),
                side_wall(1.0),
                WallConfig {
                    position: [0.0, 0.5, -8.0],
                    yaw_degrees: 0.0,
                    width: 2.0,
                    height: 3.0,
                },
            ],
            portal: PortalConfig {
                position: [0.0, 1.0, -6.0],
                half_extents: [1.0, 1.5, 0.25],
                teleporter: TeleporterConfig::new("https://example.com/gallery"),
            },
            scatter: ScatterConfig {
                count: 12,
                seed: Some(7),
                ..ScatterConfig::default()
            },
        }
    }
}

impl Config for WalkConfig {}

impl WalkConfig {
    /// Check the nested component settings and the simulation parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.player.collider.validate()?;
        self.portal.teleporter.validate()?;

        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(ConfigError::Invalid {
                field: "dt",
                reason: format!("must be positive, got {}", self.dt),
            });
        }
        if self.scatter.inner_radius > self.scatter.outer_radius {
            return Err(ConfigError::Invalid {
                field: "scatter.inner_radius",
                reason: "must not exceed outer_radius".to_string(),
            });
        }
        Ok(())
    }
}

/// `[x, y, z]` from a config file
pub fn vec3(values: [f32; 3]) -> Vec3 {
    Vec3::new(values[0], values[1], values[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(WalkConfig::default().validate().is_ok());
    }

    #[test]
    fn test_bundled_corridor_parses() {
        let config: WalkConfig = toml::from_str(include_str!("../scenes/corridor.toml")).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.walls.len(), 3);
        assert_eq!(config.portal.teleporter.url, "https://example.com/gallery");
        assert!(config.portal.teleporter.debug);
    }

    #[test]
    fn test_bad_dt_is_rejected() {
        let config = WalkConfig {
            dt: 0.0,
            ..WalkConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field: "dt", .. })));
    }
}
