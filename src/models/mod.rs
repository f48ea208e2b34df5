pub mod analysis;
pub mod workflow;
