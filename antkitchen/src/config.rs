use anyhow::{Context, Result, bail};
use log::info;
use macroquad::math::Vec3;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::simulation::{
    FLOOR_HEIGHT, MAX_ANTS, MAX_SCENT_GRID_SIZE, RESPAWN_INTERVAL, SCENT_GRID_SIZE, SCENT_NOISE,
    SPAWN_POINT, SPAWN_SCATTER,
};

/// Axis-aligned box in the owner's local space.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct BoxConfig {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl BoxConfig {
    pub const fn new(min: [f32; 3], max: [f32; 3]) -> Self {
        Self { min, max }
    }
}

/// Static room geometry (counters, walls).
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct BodyConfig {
    pub position: [f32; 3],
    pub colliders: Vec<BoxConfig>,
}

/// A kitchen appliance: body, optional door and optional lethal trigger.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct KitchenObjectConfig {
    pub name: String,
    pub position: [f32; 3],
    pub body: Vec<BoxConfig>,
    pub door: Vec<BoxConfig>,
    pub trigger: Option<BoxConfig>,
    pub closed: bool,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SceneConfig {
    pub floor_height: f32,
    pub room: Vec<BodyConfig>,
    pub objects: Vec<KitchenObjectConfig>,
}

/// Something that happens to the scene at a given tick.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EventAction {
    Close { object: String },
    Open { object: String },
    Lure { position: [f32; 3] },
    Repel { position: [f32; 3] },
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ScriptedEvent {
    pub tick: u64,
    #[serde(flatten)]
    pub action: EventAction,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SimulationConfig {
    pub ant_count: usize,
    pub scent_grid_size: usize,
    pub scent_noise: f32,         // Initial scent is drawn from [0, scent_noise)
    pub respawn_interval: u32,    // Ticks between respawns, 0 disables
    pub spawn_point: [f32; 3],
    pub spawn_scatter: f32,       // Half-width of the x/z spawn square
    pub scene: SceneConfig,
    pub events: Vec<ScriptedEvent>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ant_count: MAX_ANTS,
            scent_grid_size: SCENT_GRID_SIZE,
            scent_noise: SCENT_NOISE,
            respawn_interval: RESPAWN_INTERVAL,
            spawn_point: SPAWN_POINT.to_array(),
            spawn_scatter: SPAWN_SCATTER,
            scene: SceneConfig::default(),
            events: vec![
                ScriptedEvent {
                    tick: 1,
                    action: EventAction::Lure {
                        position: [4.0, 1.5, 0.0],
                    },
                },
                ScriptedEvent {
                    tick: 400,
                    action: EventAction::Close {
                        object: "microwave".to_string(),
                    },
                },
                ScriptedEvent {
                    tick: 500,
                    action: EventAction::Open {
                        object: "microwave".to_string(),
                    },
                },
            ],
        }
    }
}

impl Default for SceneConfig {
    /// A counter with a back splash and a microwave standing on it.
    fn default() -> Self {
        Self {
            floor_height: FLOOR_HEIGHT,
            room: vec![
                BodyConfig {
                    position: [0.0, 0.0, 0.0],
                    colliders: vec![BoxConfig::new([-8.0, -1.0, -4.0], [8.0, 1.0, 3.0])],
                },
                BodyConfig {
                    position: [0.0, 0.0, 0.0],
                    colliders: vec![BoxConfig::new([-8.0, -1.0, 3.0], [8.0, 6.0, 4.0])],
                },
            ],
            objects: vec![KitchenObjectConfig {
                name: "microwave".to_string(),
                position: [4.0, 1.0, 0.0],
                body: vec![
                    BoxConfig::new([-1.5, 1.2, -1.0], [1.5, 1.5, 1.0]),
                    BoxConfig::new([-1.5, 0.0, -1.0], [-1.3, 1.2, 1.0]),
                    BoxConfig::new([1.3, 0.0, -1.0], [1.5, 1.2, 1.0]),
                    BoxConfig::new([-1.5, 0.0, 0.8], [1.5, 1.2, 1.0]),
                ],
                door: vec![BoxConfig::new([-1.5, 0.0, -1.2], [1.5, 1.2, -1.0])],
                trigger: Some(BoxConfig::new([-1.3, 0.0, -1.0], [1.3, 1.2, 0.8])),
                closed: false,
            }],
        }
    }
}

impl SimulationConfig {
    pub fn spawn_point(&self) -> Vec3 {
        Vec3::from_array(self.spawn_point)
    }

    /// Rejects settings the simulation cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.ant_count == 0 {
            bail!("ant_count must be at least 1");
        }
        if self.scent_grid_size == 0 || self.scent_grid_size > MAX_SCENT_GRID_SIZE {
            bail!(
                "scent_grid_size must be between 1 and {}, got {}",
                MAX_SCENT_GRID_SIZE,
                self.scent_grid_size
            );
        }
        if !self.spawn_point.iter().all(|c| c.is_finite()) {
            bail!("spawn_point must be finite, got {:?}", self.spawn_point);
        }
        if !self.scent_noise.is_finite() || self.scent_noise < 0.0 {
            bail!("scent_noise must be a non-negative number, got {}", self.scent_noise);
        }
        if !self.spawn_scatter.is_finite() || self.spawn_scatter < 0.0 {
            bail!(
                "spawn_scatter must be a non-negative number, got {}",
                self.spawn_scatter
            );
        }
        for object in &self.scene.objects {
            if object.name.is_empty() {
                bail!("every kitchen object needs a name");
            }
        }
        Ok(())
    }
}

/// Loads the simulation configuration from a TOML file or uses defaults.
pub fn load_config(path: Option<&Path>) -> Result<SimulationConfig> {
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
            let config: SimulationConfig = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
            info!("Loaded config from '{}'", path.display());
            config
        }
        None => {
            info!("No config file provided, using defaults.");
            SimulationConfig::default()
        }
    };
    config.validate()?;
    Ok(config)
}
