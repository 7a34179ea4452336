pub mod animation;
pub mod app;
pub mod app_state;
pub mod astronomy;
pub mod config;
pub mod error;
pub mod geolocation;
pub mod http;
pub mod hud;
pub mod logging;
pub mod render;
pub mod sky;
pub mod weather;
