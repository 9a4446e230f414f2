pub mod floating_point;
pub mod invertible;

pub use floating_point::*;
pub use invertible::*;
