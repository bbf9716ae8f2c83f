pub mod decoder;
pub mod grammar;
pub mod grid;
pub mod payload;
pub mod shape;

pub use decoder::*;
pub use grammar::*;
pub use grid::*;
pub use payload::*;
pub use shape::*;
