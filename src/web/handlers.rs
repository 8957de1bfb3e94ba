use actix_web::{web, HttpResponse, Responder};
use log::error;
use serde::Serialize;
use serde_json::json;
use tera::Context;

use crate::error::GenerationError;
use crate::web::models::GenerationRequest;
use crate::AppState;

pub const GENERATE_PATH: &str = "/api/generate";

#[derive(Serialize)]
struct IndexView<'a> {
    model: &'a str,
    provider: Option<&'a str>,
    configured: bool,
    endpoint: &'a str,
}

pub async fn index(data: web::Data<AppState>) -> impl Responder {
    let view = IndexView {
        model: &data.model_name,
        provider: data.generator.provider_name(),
        configured: data.generator.is_configured(),
        endpoint: GENERATE_PATH,
    };

    let rendered = Context::from_serialize(&view).and_then(|ctx| data.tera.render("index.html", &ctx));
    match rendered {
        Ok(html) => HttpResponse::Ok().content_type("text/html").body(html),
        Err(e) => {
            error!("Template error: {}", e);
            HttpResponse::InternalServerError().body("Template error")
        }
    }
}

// Reports whether generation can run, not just that the process is up
pub async fn health_check(data: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "provider": data.generator.provider_name(),
        "model": data.model_name,
    }))
}

pub async fn generate(
    data: web::Data<AppState>,
    req: web::Json<GenerationRequest>,
) -> Result<HttpResponse, GenerationError> {
    let result = data.generator.generate(&req).await?;
    Ok(HttpResponse::Ok().json(result))
}
