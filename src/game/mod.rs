// public modules
pub mod driver;
pub mod history;
pub mod state;

pub use driver::{fictitious_play, FictitiousPlay};
pub use history::{GameHistory, IterationRecord, ParetoPoint};
pub use state::GameState;
