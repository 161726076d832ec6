pub mod config;
pub mod handlers;
pub mod server;
pub mod session;
pub mod state;

pub use config::ServerConfig;
pub use server::{create_router, run_server};
pub use state::AppState;
