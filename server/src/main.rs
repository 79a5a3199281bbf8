use std::path::PathBuf;

use actix_cors::Cors;
use actix_web::{App, HttpServer};

use server::canvas_store::CanvasStore;
use server::handlers;
use server::server::spawn_server;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let bind = std::env::var("WHITEBOARD_BIND").unwrap_or_else(|_| "127.0.0.1:8080".into());
    let data_dir = match std::env::var("WHITEBOARD_DATA_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => std::env::current_dir()?,
    };

    let store = CanvasStore::new(data_dir);
    let srv_tx = spawn_server(store.clone());

    log::info!("listening on {}", bind);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000")
            .allow_any_method()
            .allow_any_header()
            .supports_credentials();

        App::new()
            .wrap(cors)
            .data(srv_tx.clone())
            .data(store.clone())
            .configure(handlers::root)
    })
    .bind(bind)?
    .run()
    .await
}
