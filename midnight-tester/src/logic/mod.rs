pub mod reports;
pub mod seeds;
pub mod simulation;

pub use reports::{SamplingReport, SimulationReport};
pub use seeds::resolve_seed_inputs;
pub use simulation::{SimulationConfig, parse_strategies, run_sampling, run_simulations};
