pub mod client;
pub mod config;
pub mod error;
pub mod generation;
pub mod model;
pub mod web;

use tera::Tera;

use generation::Generator;

// App state structure
pub struct AppState {
    pub tera: Tera,
    pub generator: Generator,
    pub model_name: String,
}
