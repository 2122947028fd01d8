//! Timed and event-driven behaviours layered over a scene.

mod cannons;
mod catapult;
mod debris;
mod door;
mod drop_box;
mod goal_event;
mod jousters;

pub use cannons::{CannonBattery, Projectile};
pub use catapult::{Catapult, CatapultParts};
pub use debris::{WallDebris, DEBRIS_DROP};
pub use door::{DoorCycle, DoorPhase, CLOSE_DRIVE, OPEN_DRIVE};
pub use drop_box::DropBox;
pub use goal_event::{GoalCelebration, GOAL_IMPULSES};
pub use jousters::{JoustTeams, TEAM_ONE_CHARGE, TEAM_TWO_CHARGE};
