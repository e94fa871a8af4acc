pub mod messages;
mod turning_point;

pub use turning_point::*;
