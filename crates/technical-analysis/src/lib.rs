pub mod indicators;
pub mod classifier;
pub mod analyzer;


pub use indicators::*;
pub use classifier::*;
pub use analyzer::*;
