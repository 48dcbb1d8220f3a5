pub mod fx_refresh;
pub mod runner;

pub use fx_refresh::FxRefreshJob;
pub use runner::JobRunner;
