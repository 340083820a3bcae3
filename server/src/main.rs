//! Static host for the portal frontend.
//!
//! Serves the embedded frontend bundle, exposes the runtime configuration
//! the frontend needs (`GET /config.json`), and opens the browser on
//! startup. The roleplay REST API itself is an external service — nothing
//! here implements any of its endpoints.

mod config;

use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use common::model::config::RuntimeConfig;
use env_logger::Env;
use include_dir::{include_dir, Dir};
use log::info;
use mime_guess::from_path;
use std::thread;
use std::time::Duration;

use crate::config::ServerConfig;

static STATIC_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/static/dist");

async fn serve_embedded(req: HttpRequest) -> HttpResponse {
    let path = req.path().trim_start_matches('/');
    let file_path = if path.is_empty() { "index.html" } else { path };

    match STATIC_DIR.get_file(file_path) {
        Some(file) => {
            let mime = from_path(file_path).first_or_octet_stream();
            HttpResponse::Ok()
                .content_type(mime.as_ref())
                .body(file.contents().to_vec())
        }
        None => match STATIC_DIR.get_file("index.html") {
            Some(index) => HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body(index.contents().to_vec()),
            None => HttpResponse::NotFound().body("Not Found"),
        },
    }
}

async fn serve_config(config: web::Data<ServerConfig>) -> HttpResponse {
    HttpResponse::Ok().json(RuntimeConfig {
        api_base_url: config.api_base_url.clone(),
    })
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = ServerConfig::from_env();
    let url = config.url();

    {
        let _url_clone = url.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(500));
            let _ = webbrowser::open(&_url_clone);
        });
    }

    info!(
        "Server running at {} (roleplay API: {})",
        url, config.api_base_url
    );

    let bind = (config.host.clone(), config.port);
    let config = web::Data::new(config);
    HttpServer::new(move || {
        App::new()
            .app_data(config.clone())
            .route("/config.json", web::get().to(serve_config))
            .default_service(web::route().to(serve_embedded))
    })
    .bind(bind)?
    .run()
    .await
}
