/// Group of useful computations
pub mod computations;
pub mod type_range;

pub use computations::*;
pub use type_range::TypeRange;
