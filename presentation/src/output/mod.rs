pub mod color;
pub mod console;
pub mod events;
