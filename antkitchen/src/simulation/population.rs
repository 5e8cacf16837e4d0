use log::{debug, info};
use macroquad::math::Vec3;
use macroquad::rand::gen_range;

use super::ant::{Ant, AntPose};
use super::{ScentField, WorldQuery};

/// Index of an ant in its population. Ants are never removed, so ids stay
/// valid for the lifetime of the population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AntId(pub usize);

/// Square on the x/z plane new and respawned ants are dropped into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnArea {
    pub center: Vec3,
    pub scatter: f32,
}

impl SpawnArea {
    pub fn new(center: Vec3, scatter: f32) -> Self {
        Self { center, scatter }
    }

    pub fn sample(&self) -> Vec3 {
        if self.scatter <= 0.0 {
            return self.center;
        }
        Vec3::new(
            self.center.x + gen_range(-self.scatter, self.scatter),
            self.center.y,
            self.center.z + gen_range(-self.scatter, self.scatter),
        )
    }
}

/// Fixed-size set of ants. Dead ants stay in place until they are picked for
/// a respawn, which happens to one random ant every `respawn_interval` ticks.
pub struct Population {
    ants: Vec<Ant>,
    pub spawn: SpawnArea,
    pub respawn_interval: u32,
    tick_count: u64,
    deaths: u64,
}

impl Population {
    pub fn new(count: usize, spawn: SpawnArea, respawn_interval: u32) -> Self {
        let ants = (0..count).map(|_| Ant::new(spawn.sample())).collect();
        Self {
            ants,
            spawn,
            respawn_interval,
            tick_count: 0,
            deaths: 0,
        }
    }

    /// Runs one tick: the periodic respawn first, then every ant in order.
    /// Ants see each other's scent deposits from earlier in the same tick.
    pub fn update(&mut self, dt: f32, scent: &mut ScentField, world: &impl WorldQuery) {
        self.tick_count += 1;
        if self.respawn_interval > 0
            && self.tick_count % u64::from(self.respawn_interval) == 0
            && !self.ants.is_empty()
        {
            let index = gen_range(0, self.ants.len());
            self.respawn(AntId(index));
        }

        for ant in &mut self.ants {
            if ant.update(dt, scent, world) {
                self.deaths += 1;
                info!(
                    "{} ant dead at pos {:.2} {:.2} {:.2}",
                    self.deaths, ant.position.x, ant.position.y, ant.position.z
                );
            }
        }
    }

    /// Puts one ant back into the spawn area. Returns false for an unknown id.
    pub fn respawn(&mut self, id: AntId) -> bool {
        let position = self.spawn.sample();
        match self.ants.get_mut(id.0) {
            Some(ant) => {
                debug!(
                    "Respawning ant {} (dead: {}) at ({:.2},{:.2},{:.2})",
                    id.0, ant.dead, position.x, position.y, position.z
                );
                ant.respawn(position);
                true
            }
            None => false,
        }
    }

    pub fn ants(&self) -> &[Ant] {
        &self.ants
    }

    pub fn ant(&self, id: AntId) -> Option<&Ant> {
        self.ants.get(id.0)
    }

    pub fn ant_mut(&mut self, id: AntId) -> Option<&mut Ant> {
        self.ants.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.ants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ants.is_empty()
    }

    pub fn alive_count(&self) -> usize {
        self.ants.iter().filter(|a| !a.dead).count()
    }

    /// Total deaths since creation.
    pub fn deaths(&self) -> u64 {
        self.deaths
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn poses(&self) -> Vec<AntPose> {
        self.ants.iter().map(Ant::pose).collect()
    }
}
