pub mod ant;
mod kitchen;
mod population;
mod scent;
mod sim;
mod surface;
mod timer;

// Re-export key types for easier imports
pub use ant::{Ant, AntPose};
pub use kitchen::{Body, Kitchen, KitchenObject, ObjectKey, WorldQuery};
pub use population::{AntId, Population, SpawnArea};
pub use scent::ScentField;
pub use sim::Simulation;
pub use surface::SurfaceMode;
pub use timer::Timer;

use macroquad::math::Vec3;

// Scent field constants
pub const SCENT_GRID_SIZE: usize = 100;
pub const MAX_SCENT_GRID_SIZE: usize = 1024; // Keeps size^3 allocatable and cells within i32
pub const SCENT_NOISE: f32 = 0.5; // Initial scent is drawn from [0, SCENT_NOISE)
pub const SCENT_DEPOSIT: f32 = 0.2; // Laid each time an ant enters a new cell
pub const MAX_SCENT: f32 = 1.0; // Deposits saturate here
pub const LURE_RADIUS: i32 = 5; // Half-width (in cells) of the lure/repel cube
pub const LURE_AMOUNT: f32 = 5.0;

// Ant behavior constants
pub const MAX_ANTS: usize = 500;
pub const ANT_STEP: f32 = 0.03; // Distance covered per tick
pub const LEG_SWING_STEP: f32 = 0.15; // Radians per tick
pub const LEG_SWING_LIMIT: f32 = std::f32::consts::FRAC_PI_4;
pub const DYING_DURATION: f32 = 0.5; // Seconds inside a closed trigger before death
pub const ANT_SCALE: f32 = 0.02; // Model scale used by renderers

// Population constants
pub const RESPAWN_INTERVAL: u32 = 10; // One ant is respawned every N ticks
pub const SPAWN_POINT: Vec3 = Vec3::new(0.0, 1.5, 0.0);
pub const SPAWN_SCATTER: f32 = 1.0;

// World query constants
pub const FLOOR_HEIGHT: f32 = -1.0;
pub const FLOOR_PROBE: f32 = 0.5; // How far ahead the floor plane is sampled
pub const COLLIDER_PROBE: f32 = 1.0; // How far ahead scene colliders are sampled
