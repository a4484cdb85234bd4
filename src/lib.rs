pub mod board;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod database;
pub mod models;
pub mod tui;
pub mod utils;

pub use config::Config;
pub use database::Database;
pub use models::{DiaryEntry, Status, Todo};
pub use utils::Profile;
