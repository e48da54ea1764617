pub mod analytics_service;
pub mod chart_service;
pub mod history_service;

// Pure pipeline stages
pub mod impact;
pub mod merger;
pub mod normalizer;
pub mod projection;
pub mod zoom;
