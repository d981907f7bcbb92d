pub mod application;
pub mod enums;

pub use application::*;
pub use enums::*;
