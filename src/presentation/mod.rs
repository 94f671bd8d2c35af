// Presentation layer - HTTP surface for the rendering client
pub mod app_state;
pub mod handlers;
