use bevy::input::InputPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::window::PresentMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use sandbox::{
    physics::RapierBackend,
    plugins::{exit_after_budget_system, FrameBudget, GizmoRenderPlugin, SandboxPlugin},
    resources::{ClockSource, SimulationConfig},
    scene::{
        BoxWallScript, FallingBoxesScript, RugbyScript, Scene, SceneError, SceneScript,
        SimulationEngine,
    },
    utils::SimError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SceneChoice {
    /// Catapult field goals on the medieval pitch
    Rugby,
    /// A kicked column of boxes
    Boxes,
    /// A box wall under fire
    Wall,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Scripted rigid-body physics sandbox")]
struct Cli {
    #[arg(long, value_enum, default_value = "rugby")]
    scene: SceneChoice,

    /// YAML configuration, defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run without a window
    #[arg(long)]
    headless: bool,

    /// Frames to simulate before exiting in headless mode
    #[arg(long, default_value_t = 600)]
    frames: u64,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("Failed to start sandbox: {err}");
    }
}

fn run(cli: &Cli) -> Result<(), SimError> {
    let config = match &cli.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };

    let backend = RapierBackend::new(config.physics.gravity).map_err(SceneError::from)?;
    let mut scene = Scene::new(Box::new(backend), ClockSource::new(config.physics.timing));
    let dt = config.physics.step_duration();

    match cli.scene {
        SceneChoice::Rugby => {
            let script = RugbyScript::new(&mut scene, &config.rugby)?;
            launch(SimulationEngine::new(scene, script, dt), &config, cli)
        }
        SceneChoice::Boxes => {
            let script = FallingBoxesScript::new(&mut scene)?;
            launch(SimulationEngine::new(scene, script, dt), &config, cli)
        }
        SceneChoice::Wall => {
            let script = BoxWallScript::new(&mut scene)?;
            launch(SimulationEngine::new(scene, script, dt), &config, cli)
        }
    }
}

fn launch<S: SceneScript>(
    engine: SimulationEngine<S>,
    config: &SimulationConfig,
    cli: &Cli,
) -> Result<(), SimError> {
    let mut app = App::new();
    let time_step = f64::from(config.physics.time_step);

    if cli.headless {
        app.add_plugins((MinimalPlugins, InputPlugin, LogPlugin::default()))
            .insert_resource(FrameBudget(cli.frames))
            .add_systems(PostUpdate, exit_after_budget_system::<S>);
    } else {
        let render = &config.render;
        app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: render.title.clone(),
                resolution: (render.screen_width as f32, render.screen_height as f32).into(),
                present_mode: if render.vsync {
                    PresentMode::AutoVsync
                } else {
                    PresentMode::AutoNoVsync
                },
                ..default()
            }),
            ..default()
        }))
        .add_plugins(GizmoRenderPlugin::<S>::new(render.fov));
    }

    info!(
        "Starting {} scene on {} at {:.4}s per step",
        engine.script().name(),
        engine.scene().backend_name(),
        time_step
    );
    app.insert_resource(engine)
        .add_plugins(SandboxPlugin::<S>::new(time_step))
        .run();
    Ok(())
}
