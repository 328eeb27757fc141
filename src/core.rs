pub mod cache;
pub mod clock;
pub mod hour;
pub mod loader;
pub mod point;
pub mod scheduler;
pub mod stats;
pub mod summary;
