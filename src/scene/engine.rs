use bevy::log::warn;
use bevy::prelude::Resource;
use std::time::Duration;

use super::{Scene, SceneError};
use crate::resources::{Command, CommandQueue};

/// Gameplay logic layered over a scene
pub trait SceneScript: Send + Sync + 'static {
    fn name(&self) -> &str;

    /// Handles one queued command before the step.
    fn apply(&mut self, _scene: &mut Scene, _command: Command) -> Result<(), SceneError> {
        Ok(())
    }

    /// Runs after every step, in dispatch mode.
    fn post_step(&mut self, scene: &mut Scene) -> Result<(), SceneError>;
}

/// One scene plus its script, advanced a fixed step per frame
#[derive(Resource)]
pub struct SimulationEngine<S: SceneScript> {
    scene: Scene,
    script: S,
    commands: CommandQueue,
    dt: Duration,
}

impl<S: SceneScript> SimulationEngine<S> {
    pub fn new(scene: Scene, script: S, dt: Duration) -> Self {
        Self {
            scene,
            script,
            commands: CommandQueue::new(),
            dt,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn script(&self) -> &S {
        &self.script
    }

    pub fn time_step(&self) -> Duration {
        self.dt
    }

    /// A producer handle for the command queue
    pub fn commands(&self) -> CommandQueue {
        self.commands.clone()
    }

    /// Commands, step, then scripted reactions.
    ///
    /// A rejected command is logged and skipped; the rest of the frame runs.
    pub fn frame(&mut self) -> Result<(), SceneError> {
        for command in self.commands.drain() {
            if let Err(err) = self.script.apply(&mut self.scene, command) {
                warn!("{} ignored {:?}: {}", self.script.name(), command, err);
            }
        }

        self.scene.step(self.dt)?;

        let script = &mut self.script;
        self.scene.dispatch(|scene| script.post_step(scene))
    }

    pub fn run(&mut self, frames: usize) -> Result<(), SceneError> {
        for _ in 0..frames {
            self.frame()?;
        }
        Ok(())
    }
}
