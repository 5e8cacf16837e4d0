use anyhow::{Context, Result, anyhow};
use log::{debug, info, warn};
use macroquad::math::Vec3;

use crate::config::{EventAction, SimulationConfig};

use super::ant::AntPose;
use super::kitchen::{Kitchen, ObjectKey};
use super::population::{Population, SpawnArea};
use super::scent::ScentField;

/// A scripted event with its object name resolved against the kitchen.
#[derive(Debug, Clone, Copy)]
enum Event {
    SetClosed { key: ObjectKey, closed: bool },
    Lure(Vec3),
    Repel(Vec3),
}

pub struct Simulation {
    pub tick: u64,
    pub scent: ScentField,
    pub population: Population,
    pub kitchen: Kitchen,
    events: Vec<(u64, Event)>, // Sorted by tick
}

impl Simulation {
    pub fn new(config: &SimulationConfig) -> Result<Self> {
        config.validate()?;

        let kitchen = Kitchen::from_config(&config.scene).context("Failed to build the kitchen")?;

        let mut events = Vec::with_capacity(config.events.len());
        for scripted in &config.events {
            let event = match &scripted.action {
                EventAction::Close { object } | EventAction::Open { object } => {
                    let key = kitchen.find(object).ok_or_else(|| {
                        anyhow!(
                            "Event at tick {} refers to unknown object '{}'",
                            scripted.tick,
                            object
                        )
                    })?;
                    Event::SetClosed {
                        key,
                        closed: matches!(scripted.action, EventAction::Close { .. }),
                    }
                }
                EventAction::Lure { position } => Event::Lure(Vec3::from_array(*position)),
                EventAction::Repel { position } => Event::Repel(Vec3::from_array(*position)),
            };
            events.push((scripted.tick, event));
        }
        events.sort_by_key(|(tick, _)| *tick);

        let scent = ScentField::seeded(config.scent_grid_size, config.scent_noise);
        let spawn = SpawnArea::new(config.spawn_point(), config.spawn_scatter);
        let population = Population::new(config.ant_count, spawn, config.respawn_interval);

        info!(
            "Simulation ready: {} ants, {}^3 scent grid, {} kitchen objects, {} events",
            config.ant_count,
            config.scent_grid_size,
            kitchen.iter().count(),
            events.len()
        );

        Ok(Self {
            tick: 0,
            scent,
            population,
            kitchen,
            events,
        })
    }

    /// Advances the simulation by one tick.
    pub fn update(&mut self, dt: f32) {
        self.apply_events();
        self.population.update(dt, &mut self.scent, &self.kitchen);
        self.tick += 1;
    }

    fn apply_events(&mut self) {
        let start = self.events.partition_point(|(tick, _)| *tick < self.tick);
        let end = self.events.partition_point(|(tick, _)| *tick <= self.tick);
        for index in start..end {
            let event = self.events[index].1;
            debug!("Tick {}: {:?}", self.tick, event);
            match event {
                Event::SetClosed { key, closed } => {
                    if !self.kitchen.set_closed(key, closed) {
                        warn!("Tick {}: scripted event targets a removed object", self.tick);
                    }
                }
                Event::Lure(pos) => self.lure_at(pos),
                Event::Repel(pos) => self.repel_at(pos),
            }
        }
    }

    /// Draws ants towards `pos`.
    pub fn lure_at(&mut self, pos: Vec3) {
        self.scent.lure(pos);
    }

    /// Pushes ants away from `pos`.
    pub fn repel_at(&mut self, pos: Vec3) {
        self.scent.repel(pos);
    }

    /// Opens or closes a kitchen object by name.
    pub fn set_closed(&mut self, name: &str, closed: bool) -> Result<()> {
        let key = self
            .kitchen
            .find(name)
            .ok_or_else(|| anyhow!("No kitchen object named '{}'", name))?;
        self.kitchen.set_closed(key, closed);
        info!("{} is now {}", name, if closed { "closed" } else { "open" });
        Ok(())
    }

    pub fn poses(&self) -> Vec<AntPose> {
        self.population.poses()
    }
}
