mod headless;
mod loop_handler;

pub use headless::{build_headless_stats, run_headless, HeadlessProgram, HeadlessStats};
pub use loop_handler::run;
