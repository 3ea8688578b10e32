#![warn(clippy::unwrap_used, clippy::expect_used)]

use crate::errors::http::HTTPError;
use crate::errors::logger::LoggerMiddleware;
use crate::errors::reason::ReasonCode;
use crate::errors::AppError;
use actix_cors::Cors;
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use offchain::{storage::Storage, HistoryEntry, OffchainStore, RootCommitment, Snapshot};
use serde::{Deserialize, Serialize};
use smt::hash::Digest;
use std::sync::Arc;

/// The store behind the server, over whichever backend `main` opened
pub type Store = OffchainStore<Arc<dyn Storage>>;

struct RouteState {
    store: Arc<Store>,
}

#[get("/")]
async fn root() -> impl Responder {
    HttpResponse::Ok()
        .content_type("application/json")
        .body(format!(
            "{{ \"server\": \"storage_server\", \"version\": \"{}\" }}",
            env!("CARGO_PKG_VERSION")
        ))
}

#[get("/v0/health")]
async fn health(state: web::Data<RouteState>) -> impl Responder {
    let store = Arc::clone(&state.store);
    match web::block(move || store.health()).await {
        Ok(Ok(())) => HttpResponse::Ok(),
        Ok(Err(err)) => {
            tracing::error!(error = %err, "health check failed");
            HttpResponse::ServiceUnavailable()
        }
        Err(_) => HttpResponse::ServiceUnavailable(),
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PublicKeyResponse {
    public_key: String,
}

#[get("/v0/public-key")]
async fn public_key(state: web::Data<RouteState>) -> web::Json<PublicKeyResponse> {
    web::Json(PublicKeyResponse {
        public_key: state.store.public_key().to_hex(),
    })
}

#[derive(Debug, Deserialize)]
struct GetItemsQuery {
    owner: String,
    root: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ItemsResponse {
    items: Snapshot,
}

#[tracing::instrument(skip(state))]
#[get("/v0/items")]
async fn get_items(
    state: web::Data<RouteState>,
    query: web::Query<GetItemsQuery>,
) -> Result<web::Json<ItemsResponse>, HTTPError> {
    let GetItemsQuery { owner, root } = query.into_inner();

    let Some(root) = Digest::from_hex(&root) else {
        return Err(HTTPError::new(
            ReasonCode::RootInvalid,
            Some(Box::new(AppError::InvalidRoot(root))),
        ));
    };

    let store = Arc::clone(&state.store);
    let items = web::block(move || store.get_snapshot(&owner, root)).await??;

    Ok(web::Json(ItemsResponse { items }))
}

#[derive(Debug, Serialize, Deserialize)]
struct PutItemsRequest {
    owner: String,
    height: usize,
    items: Snapshot,
}

#[tracing::instrument(skip(state, body), fields(owner = %body.owner, height = body.height))]
#[post("/v0/items")]
async fn put_items(
    state: web::Data<RouteState>,
    body: web::Json<PutItemsRequest>,
) -> Result<web::Json<RootCommitment>, HTTPError> {
    let PutItemsRequest {
        owner,
        height,
        items,
    } = body.into_inner();

    let store = Arc::clone(&state.store);
    let commitment = web::block(move || store.put_snapshot(&owner, height, items)).await??;

    Ok(web::Json(commitment))
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    owner: String,
}

#[get("/v0/history")]
async fn history(
    state: web::Data<RouteState>,
    query: web::Query<HistoryQuery>,
) -> Result<web::Json<Vec<HistoryEntry>>, HTTPError> {
    let owner = query.into_inner().owner;

    let store = Arc::clone(&state.store);
    let history = web::block(move || store.history(&owner)).await??;

    Ok(web::Json(history))
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(root)
        .service(health)
        .service(public_key)
        .service(get_items)
        .service(put_items)
        .service(history);
}

#[tracing::instrument(skip(store))]
pub fn create_rpc_server(rpc_laddr: String, store: Arc<Store>) -> Result<Server, std::io::Error> {
    Ok(HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(RouteState {
                store: Arc::clone(&store),
            }))
            .wrap(LoggerMiddleware)
            .wrap(cors)
            .configure(routes)
    })
    .bind(rpc_laddr)?
    .run())
}
