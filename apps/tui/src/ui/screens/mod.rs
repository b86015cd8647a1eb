pub mod details;
pub mod help;
pub mod map;
