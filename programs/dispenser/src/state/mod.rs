pub mod dispenser_state;

pub use dispenser_state::*;
