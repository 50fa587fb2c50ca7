pub mod classifier;
pub mod criterion;
pub mod node;
pub mod params;
