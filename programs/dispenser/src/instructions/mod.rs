pub mod initialize_dispenser;
pub mod deposit_tokens;
pub mod withdraw;
pub mod emit_dispenser_status;

pub use initialize_dispenser::*;
pub use deposit_tokens::*;
pub use withdraw::*;
pub use emit_dispenser_status::*;
