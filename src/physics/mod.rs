pub mod error;
pub mod filter;
pub mod rapier;
pub mod traits;

pub use error::PhysicsError;
pub use filter::{classify, FilterState, FilterTag, PairOutcome, ACTOR0, ACTOR1, ACTOR2, ACTOR3};
pub use rapier::RapierBackend;
pub use traits::{ContactReport, PhysicsBackend, StepResult, TouchStatus, TriggerReport};
