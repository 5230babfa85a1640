pub mod directory;
pub mod path;
pub mod progress;
