pub mod grid;
pub mod pump;
pub mod time;
