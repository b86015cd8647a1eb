// App module for the program map
// Holds application state and input handling

pub mod input;
pub mod state;

pub use input::{handle_input, handle_mouse};
pub use state::{App, AppScreen, FilterChip, Focus};
