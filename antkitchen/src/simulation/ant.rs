use log::debug;
use macroquad::math::{IVec3, Mat4, Vec3, Vec4};
use std::f32::consts::PI;

use super::surface::{Frame, Transition, dead_rotation, spawn_frame};
use super::{
    ANT_STEP, DYING_DURATION, LEG_SWING_LIMIT, LEG_SWING_STEP, SCENT_DEPOSIT, ScentField,
    SurfaceMode, Timer, WorldQuery,
};

/// What a renderer needs to draw one ant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AntPose {
    pub position: Vec3,
    pub rotation: Mat4,
    pub leg_rotation: f32,
    pub dead: bool,
}

impl AntPose {
    /// Model matrix of the body mesh, which is authored facing backwards.
    pub fn body_transform(&self, scale: f32) -> Mat4 {
        Mat4::from_translation(self.position)
            * self.rotation
            * Mat4::from_rotation_y(PI)
            * Mat4::from_scale(Vec3::splat(scale))
    }
}

/// State of an ant.
///
/// `forward`, `up` and `right` are directions (`w = 0`) and stay orthonormal:
/// every change of surface resets them to a canonical frame, and every new
/// heading is taken in the walking plane.
#[derive(Debug, Clone)]
pub struct Ant {
    pub position: Vec3,
    pub forward: Vec4,
    pub up: Vec4,
    pub right: Vec4,
    pub rotation: Mat4,

    pub mode: SurfaceMode,
    pub last_grid: Option<IVec3>,
    pub leg_rotation: f32,
    pub leg_rotation_up: bool,
    pub energy: Timer, // Time spent inside a closed trigger
    pub dead: bool,
}

impl Ant {
    /// Create a new ant on the floor, facing -z.
    pub fn new(position: Vec3) -> Self {
        let mut ant = Self {
            position,
            forward: Vec4::ZERO,
            up: Vec4::ZERO,
            right: Vec4::ZERO,
            rotation: Mat4::IDENTITY,
            mode: SurfaceMode::Floor,
            last_grid: None,
            leg_rotation: 0.0,
            leg_rotation_up: true,
            energy: Timer::new(DYING_DURATION),
            dead: false,
        };
        ant.set_frame(spawn_frame());
        ant
    }

    /// Put the ant back at `position` with spawn defaults.
    pub fn respawn(&mut self, position: Vec3) {
        self.set_frame(spawn_frame());
        self.position = position;
        self.mode = SurfaceMode::Floor;
        self.last_grid = None;
        self.energy.reset();
        self.dead = false;
    }

    pub fn pose(&self) -> AntPose {
        AntPose {
            position: self.position,
            rotation: self.rotation,
            leg_rotation: self.leg_rotation,
            dead: self.dead,
        }
    }

    fn set_frame(&mut self, frame: Frame) {
        self.forward = frame.forward.extend(0.0);
        self.up = frame.up.extend(0.0);
        self.right = frame.right.extend(0.0);
        self.rotation = frame.rotation;
    }

    /// Advance the ant by one tick. Returns true on the tick the ant dies.
    ///
    /// `dt` only feeds the dying timer; the ant always covers [`ANT_STEP`]
    /// per tick.
    pub fn update(&mut self, dt: f32, scent: &mut ScentField, world: &impl WorldQuery) -> bool {
        if self.dead {
            return false;
        }

        if world.is_dying(self.position) {
            self.energy.update(dt);
            if self.energy.is_expired() {
                self.dead = true;
                self.rotation = dead_rotation();
                return true;
            }
        }

        self.follow_surface(scent, world);
        self.swing_legs();
        self.choose_scent(scent, false);

        self.position += self.forward.truncate() * ANT_STEP;
        false
    }

    fn follow_surface(&mut self, scent: &mut ScentField, world: &impl WorldQuery) {
        let position = self.position;
        let transition = self
            .mode
            .next_transition(|dir| world.intersects(position, dir));

        if let Some(transition) = transition {
            debug!(
                "Ant at ({:.2},{:.2},{:.2}) {:?} -> {:?}",
                position.x,
                position.y,
                position.z,
                self.mode,
                transition.target()
            );
            self.apply_transition(transition);
            self.choose_scent(scent, true);
        }
    }

    fn apply_transition(&mut self, transition: Transition) {
        self.set_frame(transition.frame());
        self.mode = transition.target();
    }

    fn swing_legs(&mut self) {
        if self.leg_rotation_up {
            self.leg_rotation += LEG_SWING_STEP;
            if self.leg_rotation > LEG_SWING_LIMIT {
                self.leg_rotation_up = false;
            }
        } else {
            self.leg_rotation -= LEG_SWING_STEP;
            if self.leg_rotation < -LEG_SWING_LIMIT {
                self.leg_rotation_up = true;
            }
        }
    }

    /// Follow the strongest scent among the neighbouring cells that keep the
    /// ant within 45 degrees of its current heading.
    ///
    /// Without `force` this only runs when the ant has entered a new cell,
    /// and lays scent on that cell first. With `force` the heading is
    /// re-evaluated immediately and no scent is laid.
    pub fn choose_scent(&mut self, scent: &mut ScentField, force: bool) {
        let grid = scent.grid_position(self.position);
        if !force && self.last_grid == Some(grid) {
            return;
        }

        if !force {
            scent.deposit(grid, SCENT_DEPOSIT);
        }
        self.last_grid = Some(grid);

        let next_grid = scent.grid_position(self.position + self.forward.truncate());
        let ring = self.mode.neighbour_ring(grid);

        let mut max_scent = 0.0;
        for (i, &cell) in ring.iter().enumerate() {
            let intensity = scent.scent_at(cell);
            if intensity <= max_scent {
                continue;
            }
            let before = ring[(i + 7) % 8];
            let after = ring[(i + 1) % 8];
            if next_grid == before || next_grid == cell || next_grid == after {
                max_scent = intensity;
                self.face_towards(scent.real_position(cell));
            }
        }
    }

    fn face_towards(&mut self, target: Vec3) {
        let forward = self.mode.project(target - self.position).normalize_or_zero();
        if forward == Vec3::ZERO {
            return;
        }
        let frame = self.mode.heading_frame(forward, self.up.truncate());
        self.set_frame(frame);
    }
}
