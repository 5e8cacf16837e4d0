use macroquad::math::{IVec3, Mat4, Quat, Vec3};
use std::f32::consts::{FRAC_PI_2, PI};

/// Surface an ant is currently walking on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceMode {
    #[default]
    Floor,
    FrontWall,
    BackWall,
}

/// Compass ring around a cell, listed so that consecutive entries (with
/// wrap-around) are 45 degrees apart. Offsets are in the surface plane.
const RING: [(i32, i32); 8] = [
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
];

/// Up vector every wall heading is rebuilt around.
const WALL_UP: Vec3 = Vec3::new(0.0, 0.0, -1.0);

/// Forward/up/right and model rotation an ant takes on a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub forward: Vec3,
    pub up: Vec3,
    pub right: Vec3,
    pub rotation: Mat4,
}

impl SurfaceMode {
    /// World axes spanning the walking plane, as (first, second) component
    /// indices.
    fn plane_axes(self) -> (usize, usize) {
        match self {
            SurfaceMode::Floor => (0, 2),
            SurfaceMode::FrontWall | SurfaceMode::BackWall => (0, 1),
        }
    }

    /// World axis perpendicular to the walking plane.
    pub fn normal_axis(self) -> usize {
        match self {
            SurfaceMode::Floor => 1,
            SurfaceMode::FrontWall | SurfaceMode::BackWall => 2,
        }
    }

    /// The eight neighbours of `center` in the walking plane.
    pub fn neighbour_ring(self, center: IVec3) -> [IVec3; 8] {
        let (u, v) = self.plane_axes();
        RING.map(|(du, dv)| {
            let mut cell = center;
            cell[u] += du;
            cell[v] += dv;
            cell
        })
    }

    /// Drops the component of `dir` that leaves the walking plane.
    pub fn project(self, dir: Vec3) -> Vec3 {
        let mut dir = dir;
        dir[self.normal_axis()] = 0.0;
        dir
    }

    /// Frame for walking along `forward`, which must lie in the walking plane.
    pub fn heading_frame(self, forward: Vec3, up: Vec3) -> Frame {
        match self {
            SurfaceMode::Floor => {
                let angle = forward.z.atan2(forward.x);
                Frame {
                    forward,
                    up,
                    right: up.cross(forward),
                    rotation: axis_rotation(up, angle + FRAC_PI_2),
                }
            }
            SurfaceMode::FrontWall | SurfaceMode::BackWall => {
                let angle = forward.y.atan2(forward.x);
                Frame {
                    forward,
                    up: WALL_UP,
                    right: forward.cross(WALL_UP),
                    rotation: axis_rotation(WALL_UP, angle + FRAC_PI_2)
                        * axis_rotation(Vec3::X, FRAC_PI_2),
                }
            }
        }
    }
}

pub(crate) fn axis_rotation(axis: Vec3, angle: f32) -> Mat4 {
    Mat4::from_quat(Quat::from_axis_angle(axis, angle))
}

/// Frame an ant is reset to on spawn.
pub fn spawn_frame() -> Frame {
    Frame {
        forward: Vec3::NEG_Z,
        up: Vec3::Y,
        right: Vec3::X,
        rotation: Mat4::IDENTITY,
    }
}

/// Pose of an ant frozen at death: flipped on its back.
pub fn dead_rotation() -> Mat4 {
    axis_rotation(Vec3::X, PI)
}

/// A change of walking surface, named by what the ant runs into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Floor -> FrontWall: a wall blocks the way ahead (+z).
    ClimbFrontWall,
    /// Floor -> BackWall: nothing below, the ant walks over an edge.
    OverEdge,
    /// FrontWall -> Floor: ground reached below.
    FrontWallBottom,
    /// FrontWall -> Floor when the wall ends, or BackWall -> Floor when the
    /// ground is reached.
    OntoFloor,
}

impl Transition {
    pub fn target(self) -> SurfaceMode {
        match self {
            Transition::ClimbFrontWall => SurfaceMode::FrontWall,
            Transition::OverEdge => SurfaceMode::BackWall,
            Transition::FrontWallBottom | Transition::OntoFloor => SurfaceMode::Floor,
        }
    }

    /// Canonical frame on the new surface.
    pub fn frame(self) -> Frame {
        match self {
            Transition::ClimbFrontWall => Frame {
                forward: Vec3::Y,
                up: Vec3::NEG_Z,
                right: Vec3::X,
                rotation: axis_rotation(Vec3::X, -FRAC_PI_2),
            },
            Transition::OverEdge => Frame {
                forward: Vec3::NEG_Y,
                up: Vec3::Z,
                right: Vec3::NEG_X,
                rotation: axis_rotation(Vec3::X, -FRAC_PI_2),
            },
            Transition::FrontWallBottom => Frame {
                forward: Vec3::NEG_Z,
                up: Vec3::Y,
                right: Vec3::NEG_X,
                rotation: axis_rotation(Vec3::Y, -FRAC_PI_2),
            },
            Transition::OntoFloor => Frame {
                forward: Vec3::Z,
                up: Vec3::Y,
                right: Vec3::X,
                rotation: Mat4::IDENTITY,
            },
        }
    }
}

impl SurfaceMode {
    /// Decides whether to change surface. `blocked(dir)` answers whether one
    /// step along `dir` runs into something.
    pub fn next_transition(self, blocked: impl Fn(Vec3) -> bool) -> Option<Transition> {
        match self {
            SurfaceMode::FrontWall => {
                if blocked(Vec3::NEG_Y) {
                    Some(Transition::FrontWallBottom)
                } else if !blocked(Vec3::NEG_Z) {
                    Some(Transition::OntoFloor)
                } else {
                    None
                }
            }
            SurfaceMode::BackWall => blocked(Vec3::NEG_Y).then_some(Transition::OntoFloor),
            SurfaceMode::Floor => {
                if blocked(Vec3::Z) {
                    Some(Transition::ClimbFrontWall)
                } else if !blocked(Vec3::NEG_Y) {
                    Some(Transition::OverEdge)
                } else {
                    None
                }
            }
        }
    }
}
