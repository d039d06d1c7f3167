// Modules
pub mod auditor;
pub mod average;
pub mod config;
pub mod constants;
pub mod cost;
pub mod data;
pub mod errors;
pub mod game;
pub mod learner;
pub mod metric;
pub mod observer;
pub mod oracle;
pub mod regression;
pub mod utils;

// Individual classes, and functions
pub use auditor::{AuditResult, Auditor, DisparitySign, RegressionAuditor};
pub use config::{GameConfig, GameIO};
pub use data::{generate_synthetic, DataLoader, Dataset, Matrix, OwnedDataset, SyntheticLoader};
pub use errors::FairnessError;
pub use game::{fictitious_play, FictitiousPlay, GameHistory, ParetoPoint};
pub use learner::CostSensitiveLearner;
pub use observer::{JsonPlotter, Observers, Plotter, Visualizer};
pub use oracle::DecisionOracle;
pub use regression::{LinearModel, RegressionMethod, Regressor};
