pub mod models;
pub mod impact;

pub use models::*;
pub use impact::{position_impact, rollup};
