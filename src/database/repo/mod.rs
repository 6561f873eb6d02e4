pub mod bands;
pub mod events;
pub mod musicians;
pub mod songs;
pub mod tokens;
