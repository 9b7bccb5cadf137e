//! HTTP routes
//!
//! ```text
//! GET    /health
//! POST   /sessions
//! GET    /sessions/{id}
//! DELETE /sessions/{id}
//! POST   /sessions/{id}/search     {"query": "..."}
//! POST   /sessions/{id}/building   {"id": "b1"}
//! POST   /sessions/{id}/store      {"id": "s2"}
//! POST   /sessions/{id}/category   {"category": "Coffee" | "All"}
//! POST   /sessions/{id}/product    {"id": "prod-s2-0"}
//! DELETE /sessions/{id}/product
//! POST   /sessions/{id}/reset
//! ```
//!
//! Every session route replies with the current view; action routes add the
//! scroll cues produced by the action.

use crate::error::{handle_rejection, ApiError};
use crate::session::AppState;
use duka_core::{DirectoryView, Dispatch, ScrollTarget};
use duka_model::{BuildingId, CategoryFilter, ProductId, StoreId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

const MAX_BODY_BYTES: u64 = 16 * 1024;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub category: String,
}

/// Reply to every session route
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionReply {
    pub session: String,
    pub view: DirectoryView,
    pub scroll: Vec<ScrollTarget>,
    pub discarded: usize,
}

impl SessionReply {
    fn new(session: &str, view: DirectoryView, dispatch: Dispatch) -> Self {
        Self {
            session: session.to_string(),
            view,
            scroll: dispatch.scroll,
            discarded: dispatch.discarded,
        }
    }
}

/// All routes, with rejection handling, CORS and request tracing
///
/// CORS wraps the recovered routes so error replies carry the same
/// allow-origin headers as successful ones.
pub fn routes(state: AppState) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
        .allow_header("content-type")
        .max_age(3600);

    health()
        .or(sessions(state))
        .recover(handle_rejection)
        .with(cors)
        .with(warp::trace::request())
}

fn health() -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("health").and(warp::get()).map(|| {
        warp::reply::json(&serde_json::json!({
            "status": "ok",
            "version": crate::VERSION,
        }))
    })
}

fn sessions(state: AppState) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let create = warp::path!("sessions")
        .and(warp::post())
        .and(with_state(state.clone()))
        .and_then(create_session_handler);

    let show = warp::path!("sessions" / String)
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(show_session_handler);

    let close = warp::path!("sessions" / String)
        .and(warp::delete())
        .and(with_state(state.clone()))
        .and_then(close_session_handler);

    let search = warp::path!("sessions" / String / "search")
        .and(warp::post())
        .and(json_body::<SearchRequest>())
        .and(with_state(state.clone()))
        .and_then(search_handler);

    let building = warp::path!("sessions" / String / "building")
        .and(warp::post())
        .and(json_body::<SelectRequest>())
        .and(with_state(state.clone()))
        .and_then(select_building_handler);

    let store = warp::path!("sessions" / String / "store")
        .and(warp::post())
        .and(json_body::<SelectRequest>())
        .and(with_state(state.clone()))
        .and_then(select_store_handler);

    let category = warp::path!("sessions" / String / "category")
        .and(warp::post())
        .and(json_body::<CategoryRequest>())
        .and(with_state(state.clone()))
        .and_then(select_category_handler);

    let focus = warp::path!("sessions" / String / "product")
        .and(warp::post())
        .and(json_body::<SelectRequest>())
        .and(with_state(state.clone()))
        .and_then(focus_product_handler);

    let unfocus = warp::path!("sessions" / String / "product")
        .and(warp::delete())
        .and(with_state(state.clone()))
        .and_then(clear_focus_handler);

    let reset = warp::path!("sessions" / String / "reset")
        .and(warp::post())
        .and(with_state(state))
        .and_then(reset_handler);

    create
        .or(show)
        .or(close)
        .or(search)
        .or(building)
        .or(store)
        .or(category)
        .or(focus)
        .or(unfocus)
        .or(reset)
}

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

fn json_body<T: DeserializeOwned + Send>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

fn reply(session: &str, view: DirectoryView, dispatch: Dispatch) -> warp::reply::Json {
    warp::reply::json(&SessionReply::new(session, view, dispatch))
}

async fn create_session_handler(state: AppState) -> Result<impl Reply, Rejection> {
    let (id, controller) = state.create().await;
    let dispatch = controller.load_buildings().await;
    let session = id.to_string();

    Ok(warp::reply::with_status(
        reply(&session, controller.view(), dispatch),
        StatusCode::CREATED,
    ))
}

async fn show_session_handler(id: String, state: AppState) -> Result<impl Reply, Rejection> {
    let controller = state.get(&id).await?;
    Ok(reply(&id, controller.view(), Dispatch::default()))
}

async fn close_session_handler(id: String, state: AppState) -> Result<impl Reply, Rejection> {
    state.remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn search_handler(id: String, body: SearchRequest, state: AppState) -> Result<impl Reply, Rejection> {
    let controller = state.get(&id).await?;
    let dispatch = controller.search(&body.query).await;
    Ok(reply(&id, controller.view(), dispatch))
}

async fn select_building_handler(id: String, body: SelectRequest, state: AppState) -> Result<impl Reply, Rejection> {
    let controller = state.get(&id).await?;
    let dispatch = controller
        .select_building(&BuildingId::from(body.id))
        .await
        .map_err(ApiError::from)?;
    Ok(reply(&id, controller.view(), dispatch))
}

async fn select_store_handler(id: String, body: SelectRequest, state: AppState) -> Result<impl Reply, Rejection> {
    let controller = state.get(&id).await?;
    let dispatch = controller
        .select_store(&StoreId::from(body.id))
        .await
        .map_err(ApiError::from)?;
    Ok(reply(&id, controller.view(), dispatch))
}

async fn select_category_handler(id: String, body: CategoryRequest, state: AppState) -> Result<impl Reply, Rejection> {
    let controller = state.get(&id).await?;
    let dispatch = controller
        .select_category(CategoryFilter::from(body.category))
        .await;
    Ok(reply(&id, controller.view(), dispatch))
}

async fn focus_product_handler(id: String, body: SelectRequest, state: AppState) -> Result<impl Reply, Rejection> {
    let controller = state.get(&id).await?;
    let dispatch = controller
        .focus_product(&ProductId::from(body.id))
        .await
        .map_err(ApiError::from)?;
    Ok(reply(&id, controller.view(), dispatch))
}

async fn clear_focus_handler(id: String, state: AppState) -> Result<impl Reply, Rejection> {
    let controller = state.get(&id).await?;
    let dispatch = controller.clear_focus().await;
    Ok(reply(&id, controller.view(), dispatch))
}

async fn reset_handler(id: String, state: AppState) -> Result<impl Reply, Rejection> {
    let controller = state.get(&id).await?;
    let dispatch = controller.reset().await;
    Ok(reply(&id, controller.view(), dispatch))
}
