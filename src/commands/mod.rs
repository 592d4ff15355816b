// Command handlers module
pub mod logs;
pub mod start;

// Re-exports for cleaner imports
pub use logs::execute as logs;
pub use start::execute as start;
