use actix_web::{error, web, HttpResponse, Responder, Result};
use serde::Deserialize;
use system::serde_json::json;
use system::{CanvasId, RawElement, UserId};

use crate::canvas_store::{CanvasStore, StoreError};

pub fn configure_canvas_handlers(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/canvases")
            .service(
                web::resource("")
                    .route(web::post().to(create))
                    .route(web::get().to(list)),
            )
            .service(
                web::resource("/{canvas_id}")
                    .route(web::get().to(load))
                    .route(web::put().to(save)),
            )
            .service(
                web::resource("/{canvas_id}/shares")
                    .route(web::post().to(share))
                    .route(web::delete().to(unshare)),
            ),
    );
}

fn store_error(err: StoreError) -> error::Error {
    match err {
        StoreError::NotFound => error::ErrorNotFound("canvas not found"),
        StoreError::AccessDenied => error::ErrorForbidden("canvas not accessible by this user"),
        StoreError::Invalid(reason) => error::ErrorBadRequest(reason),
        err => error::ErrorInternalServerError(err.to_string()),
    }
}

// Authentication is handled in front of these routes; handlers take the
// caller's account id as given.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    user_id: UserId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasPath {
    canvas_id: CanvasId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCanvasBody {
    title: String,
    user_id: UserId,
}

async fn create(
    store: web::Data<CanvasStore>,
    body: web::Json<CreateCanvasBody>,
) -> Result<impl Responder> {
    let canvas_id = store
        .create(&body.title, &body.user_id)
        .await
        .map_err(store_error)?;
    Ok(HttpResponse::Created().json(json!({ "canvasId": canvas_id.to_string() })))
}

async fn list(
    store: web::Data<CanvasStore>,
    query: web::Query<UserQuery>,
) -> Result<impl Responder> {
    let canvases = store.list(&query.user_id).await.map_err(store_error)?;
    let items: Vec<_> = canvases
        .iter()
        .map(|(canvas_id, canvas)| {
            json!({
                "canvasId": canvas_id.to_string(),
                "title": canvas.title,
                "owner": canvas.owner,
                "sharedWith": canvas.shared_with,
            })
        })
        .collect();
    Ok(HttpResponse::Ok().json(items))
}

async fn load(
    store: web::Data<CanvasStore>,
    path: web::Path<CanvasPath>,
    query: web::Query<UserQuery>,
) -> Result<impl Responder> {
    let canvas = store
        .load(&path.canvas_id, &query.user_id)
        .await
        .map_err(store_error)?;
    Ok(HttpResponse::Ok().json(canvas))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveCanvasBody {
    user_id: UserId,
    elements: Vec<RawElement>,
}

/// Explicit save of the caller's current view. Elements without a
/// recognized type are dropped before they reach the store.
async fn save(
    store: web::Data<CanvasStore>,
    path: web::Path<CanvasPath>,
    body: web::Json<SaveCanvasBody>,
) -> Result<impl Responder> {
    let SaveCanvasBody { user_id, elements } = body.into_inner();
    let elements = elements
        .into_iter()
        .filter_map(RawElement::into_element)
        .collect();

    let canvas = store
        .save_elements(&path.canvas_id, &user_id, elements)
        .await
        .map_err(store_error)?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "elements": canvas.elements.len(),
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareBody {
    user_id: UserId,
    target_user_id: UserId,
}

async fn share(
    store: web::Data<CanvasStore>,
    path: web::Path<CanvasPath>,
    body: web::Json<ShareBody>,
) -> Result<impl Responder> {
    let canvas = store
        .share(&path.canvas_id, &body.user_id, &body.target_user_id)
        .await
        .map_err(store_error)?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "canvas shared",
        "sharedWith": canvas.shared_with,
    })))
}

async fn unshare(
    store: web::Data<CanvasStore>,
    path: web::Path<CanvasPath>,
    body: web::Json<ShareBody>,
) -> Result<impl Responder> {
    let canvas = store
        .unshare(&path.canvas_id, &body.user_id, &body.target_user_id)
        .await
        .map_err(store_error)?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "user removed from the shared list",
        "sharedWith": canvas.shared_with,
    })))
}
