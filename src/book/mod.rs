pub mod depth;
pub mod simulate;

pub use depth::{DepthLevel, MatchEvent, SimulationResult};
pub use simulate::{simulate_spend, simulate_take};
