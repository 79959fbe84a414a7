pub mod spinner;
pub mod timer;

pub use spinner::{Outcome, Spinner, SpinnerController};
pub use timer::InactivityTimer;
