use bevy::prelude::*;
use std::marker::PhantomData;

use crate::resources::Command;
use crate::scene::{SceneScript, SimulationEngine};

/// Sandbox stages
#[derive(Debug, Hash, PartialEq, Eq, Clone, SystemSet)]
pub enum SandboxSet {
    /// Keyboard to command queue, every rendered frame
    Input,
    /// One engine frame per fixed tick
    Simulation,
}

/// Drives a `SimulationEngine<S>` resource at a fixed rate and feeds it
/// keyboard commands. The engine itself is inserted by the caller.
pub struct SandboxPlugin<S> {
    pub time_step: f64,
    _script: PhantomData<fn() -> S>,
}

impl<S> SandboxPlugin<S> {
    pub fn new(time_step: f64) -> Self {
        Self {
            time_step,
            _script: PhantomData,
        }
    }
}

impl<S: SceneScript> Plugin for SandboxPlugin<S> {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_seconds(self.time_step));

        app.add_systems(
            Update,
            keyboard_command_system::<S>.in_set(SandboxSet::Input),
        )
        .add_systems(
            FixedUpdate,
            advance_engine_system::<S>.in_set(SandboxSet::Simulation),
        );
    }
}

/// Key bindings of the sandbox
pub fn command_for_key(key: KeyCode) -> Option<Command> {
    match key {
        KeyCode::KeyJ => Some(Command::MoveLeft),
        KeyCode::KeyL => Some(Command::MoveRight),
        KeyCode::KeyF => Some(Command::FieldGoal),
        KeyCode::KeyR => Some(Command::Reset),
        KeyCode::Digit1 => Some(Command::SpawnOne),
        KeyCode::Digit2 => Some(Command::SpawnMany(100)),
        KeyCode::Digit3 => Some(Command::SpawnMany(1000)),
        KeyCode::Digit4 => Some(Command::SpawnJousters),
        _ => None,
    }
}

fn keyboard_command_system<S: SceneScript>(
    keyboard: Res<ButtonInput<KeyCode>>,
    engine: Res<SimulationEngine<S>>,
) {
    let queue = engine.commands();
    for key in keyboard.get_just_pressed() {
        if let Some(command) = command_for_key(*key) {
            debug!("{:?} -> {:?}", key, command);
            queue.push(command);
        }
    }
}

fn advance_engine_system<S: SceneScript>(mut engine: ResMut<SimulationEngine<S>>) {
    if let Err(err) = engine.frame() {
        error!(
            "{} frame {} failed: {}",
            engine.script().name(),
            engine.scene().steps(),
            err
        );
    }
}

/// Frames to run before a headless app exits
#[derive(Resource, Debug, Clone, Copy)]
pub struct FrameBudget(pub u64);

pub fn exit_after_budget_system<S: SceneScript>(
    engine: Res<SimulationEngine<S>>,
    budget: Res<FrameBudget>,
    mut exit: EventWriter<AppExit>,
) {
    if engine.scene().steps() >= budget.0 {
        info!("Ran {} frames, exiting", engine.scene().steps());
        exit.send(AppExit::Success);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        assert_eq!(command_for_key(KeyCode::KeyJ), Some(Command::MoveLeft));
        assert_eq!(command_for_key(KeyCode::KeyL), Some(Command::MoveRight));
        assert_eq!(command_for_key(KeyCode::KeyF), Some(Command::FieldGoal));
        assert_eq!(command_for_key(KeyCode::KeyR), Some(Command::Reset));
        assert_eq!(command_for_key(KeyCode::Digit3), Some(Command::SpawnMany(1000)));
        assert_eq!(command_for_key(KeyCode::Space), None);
    }
}
