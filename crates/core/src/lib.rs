pub mod capture;
pub mod detection;
pub mod pipeline;
pub mod sampling;
pub mod shared;
