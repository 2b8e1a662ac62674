pub mod champion_image;
pub mod config;
pub mod dataset;
pub mod logging;
pub mod projections;
pub mod state;
