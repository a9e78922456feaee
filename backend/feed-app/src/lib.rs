//! Feed client core
//!
//! Identity state, the posts data client and the home page components
//! (composer, feed, post view, page shell), rendered to a markup tree.

pub mod api;
pub mod app;
pub mod components;
pub mod config;
pub mod data_client;
pub mod error;
pub mod identity;
pub mod models;
pub mod resource;
pub mod time;
pub mod toast;
pub mod view;

pub use app::App;
pub use config::Config;
pub use data_client::DataClient;
pub use error::{AppError, Result};
pub use identity::{Identity, IdentityHandle, IdentityProvider, IdentityState};
pub use resource::Resource;
pub use toast::Toaster;
