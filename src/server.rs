//! REST API for rescat.
//!
//! Provides an HTTP front-end with JSON endpoints over one shared
//! [`ResourceCatalog`]. Callers identify themselves with a `session` field;
//! the catalog remembers each session's last best match so that `/delete`
//! can only remove what that session has just found.
//!
//! ## Endpoints
//!
//! - `POST /store` - Store a link with its description
//! - `POST /search` - Find the best match (semantic, then keyword)
//! - `POST /delete` - Delete the session's last match by link
//! - `POST /delete_all` - Delete every resource
//! - `POST /list` - List resources in a category
//!
//! ## Usage
//!
//! ```rust,no_run
//! use actix_web::{web, App, HttpServer};
//! use rescat::{CatalogConfig, ResourceCatalog};
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let config = CatalogConfig::default();
//!     let catalog = ResourceCatalog::open(&config).expect("catalog");
//!     let data = web::Data::new(catalog);
//!
//!     HttpServer::new(move || App::new().app_data(data.clone()).configure(rescat::server::config))
//!         .bind(&config.bind_addr)?
//!         .run()
//!         .await
//! }
//! ```

use actix_web::{web, HttpResponse, Responder};
use serde::{Serialize, Deserialize};
use crate::{AddOutcome, CatalogError, Reply, Resource, ResourceCatalog, SearchOutcome};
use tracing::error;

// --- Request structs ---

#[derive(Deserialize)]
struct StoreRequest {
    #[serde(default)]
    category: String,
    link: String,
    description: String,
}

#[derive(Deserialize)]
struct SearchRequest {
    session: String,
    query: String,
}

#[derive(Deserialize)]
struct DeleteRequest {
    session: String,
    link: String,
}

#[derive(Deserialize)]
struct ListRequest {
    #[serde(default)]
    category: String,
}

// --- Response structs ---

#[derive(Serialize)]
struct StoreResponse {
    #[serde(flatten)]
    reply: Reply,
    indexed: bool,
    resource: Resource,
}

#[derive(Serialize)]
struct SearchResponse {
    #[serde(flatten)]
    reply: Reply,
    best_match: bool,
    matches: Vec<Resource>,
}

#[derive(Serialize)]
struct ListResponse {
    count: usize,
    results: Vec<Resource>,
}

/// Error replies keep the catalog's message; only the status differs.
fn failure(err: CatalogError) -> HttpResponse {
    let mut builder = match &err {
        CatalogError::InvalidInput(_) => HttpResponse::BadRequest(),
        CatalogError::DuplicateLink(_) => HttpResponse::Conflict(),
        CatalogError::NoMatchingSession | CatalogError::NotFound(_) => HttpResponse::NotFound(),
        CatalogError::StorageUnavailable(_) | CatalogError::IndexPersistenceError(_) => {
            error!(error = %err, "catalog backend failure");
            HttpResponse::ServiceUnavailable()
        }
        CatalogError::EmbeddingUnavailable(_) | CatalogError::DimensionMismatch { .. } => {
            HttpResponse::InternalServerError()
        }
    };
    builder.json(Reply::from(err))
}

// --- Handlers ---

async fn store_handler(catalog: web::Data<ResourceCatalog>, body: web::Json<StoreRequest>) -> impl Responder {
    match catalog.add(&body.category, &body.link, &body.description) {
        Ok(outcome) => {
            let indexed = matches!(outcome, AddOutcome::Stored(_));
            let resource = outcome.resource().clone();
            HttpResponse::Ok().json(StoreResponse { reply: outcome.into(), indexed, resource })
        }
        Err(e) => failure(e),
    }
}

async fn search_handler(catalog: web::Data<ResourceCatalog>, body: web::Json<SearchRequest>) -> impl Responder {
    match catalog.search(&body.session, &body.query) {
        Ok(outcome) => {
            let (best_match, matches) = match &outcome {
                SearchOutcome::BestMatch(resource) => (true, vec![resource.clone()]),
                SearchOutcome::Matches(matches) => (false, matches.clone()),
                SearchOutcome::NoResults => (false, Vec::new()),
            };
            HttpResponse::Ok().json(SearchResponse { reply: outcome.into(), best_match, matches })
        }
        Err(e) => failure(e),
    }
}

async fn delete_handler(catalog: web::Data<ResourceCatalog>, body: web::Json<DeleteRequest>) -> impl Responder {
    match catalog.delete(&body.session, &body.link) {
        Ok(slot) => HttpResponse::Ok().json(Reply::from(slot)),
        Err(e) => failure(e),
    }
}

async fn delete_all_handler(catalog: web::Data<ResourceCatalog>) -> impl Responder {
    match catalog.delete_all() {
        Ok(()) => HttpResponse::Ok().json(Reply::from(())),
        Err(e) => failure(e),
    }
}

async fn list_handler(catalog: web::Data<ResourceCatalog>, body: web::Json<ListRequest>) -> impl Responder {
    match catalog.list(&body.category) {
        Ok(results) => HttpResponse::Ok().json(ListResponse { count: results.len(), results }),
        Err(e) => failure(e),
    }
}

/// Registers the routes. The caller supplies the catalog as
/// `web::Data<ResourceCatalog>` app data.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/store").route(web::post().to(store_handler)))
       .service(web::resource("/search").route(web::post().to(search_handler)))
       .service(web::resource("/delete").route(web::post().to(delete_handler)))
       .service(web::resource("/delete_all").route(web::post().to(delete_all_handler)))
       .service(web::resource("/list").route(web::post().to(list_handler)));
}
