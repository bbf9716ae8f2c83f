pub mod game_state;
pub mod ships;
pub mod widget;

pub use game_state::*;
pub use ships::*;
pub use widget::*;
