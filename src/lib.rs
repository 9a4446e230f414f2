mod error;
mod knot;
mod misc;
mod sequence;

pub mod prelude {
    pub use crate::error::*;
    pub use crate::knot::*;
    pub use crate::misc::*;
    pub use crate::sequence::*;
}
