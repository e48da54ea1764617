pub mod benchmark;
pub mod chart;
pub mod history;
pub mod period;
pub mod query;
pub mod scenario;
pub mod series;
pub mod settings;
pub mod window;
