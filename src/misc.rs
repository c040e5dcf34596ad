pub mod log_density;
pub mod shape;
