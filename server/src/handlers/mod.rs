use actix_web::web;

use crate::connection::ws_index;

mod canvases;

pub fn root(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/ws").route(web::get().to(ws_index)));

    canvases::configure_canvas_handlers(cfg);
}
