pub mod app;
pub mod config;
pub mod deletion;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;
pub mod store;
pub mod tasks;
pub mod window;

pub use app::router;
pub use state::AppState;
pub use storage::load_data;
