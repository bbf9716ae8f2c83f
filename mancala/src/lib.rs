pub mod beads;
pub mod game_state;
pub mod widget;

pub use beads::*;
pub use game_state::*;
pub use widget::*;
