mod events;
pub mod scripts;

pub use events::{CollisionEvent, CollisionKind, EventSink, SinkWatch};
pub use scripts::{
    CannonBattery, Catapult, CatapultParts, DoorCycle, DropBox, GoalCelebration, JoustTeams,
    WallDebris,
};
