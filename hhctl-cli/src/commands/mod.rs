//! Action implementations for the hhctl CLI

pub mod clean;
pub mod load;
pub mod menu;
pub mod show;

// Re-export the entry points for flat access from main.rs
pub use clean::run_clean;
pub use load::run_load;
pub use menu::run_menu;
pub use show::run_show;
