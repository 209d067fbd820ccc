pub mod admin;
pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod session;
pub mod store;
pub mod upload;

pub use api::ApiClient;
pub use error::{ClientError, ClientResult};
pub use session::{AuthState, Session};
pub use store::Store;
