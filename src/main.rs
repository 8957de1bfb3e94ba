use actix_web::{web::Data, App, HttpServer};
use actix_files as fs;
use dotenv::dotenv;
use log::{error, info, warn};
use std::sync::Arc;
use tera::Tera;

use template_fill::config::AppConfig;
use template_fill::generation::Generator;
use template_fill::model::{CompletionProvider, OpenAiProvider};
use template_fill::web::routes;
use template_fill::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting template fill server");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Without a key the server still starts; generate requests answer 500
    let provider: Option<Arc<dyn CompletionProvider>> = match &config.api_key {
        Some(key) => match OpenAiProvider::new(key.clone(), &config.provider) {
            Ok(provider) => Some(Arc::new(provider)),
            Err(e) => {
                error!("Failed to initialize OpenAI client: {}", e);
                std::process::exit(1);
            }
        },
        None => {
            warn!("OPENAI_API_KEY is not set; generation requests will fail");
            None
        }
    };

    // Initialize template engine
    let mut tera = match Tera::new("templates/**/*") {
        Ok(t) => t,
        Err(e) => {
            error!("Template parsing error: {}", e);
            std::process::exit(1);
        }
    };
    tera.autoescape_on(vec![".html"]);

    let app_state = Data::new(AppState {
        tera,
        generator: Generator::new(provider),
        model_name: config.provider.model.clone(),
    });

    info!("Listening on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .configure(routes::configure)
            .service(fs::Files::new("/static", "./static"))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
