use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::niche::RunConfig;
use crate::services::{export, NicheJobSender, RunStore, SearchJob};

#[derive(Deserialize)]
pub struct SearchBody {
    /// Comma-separated keywords, e.g. "coloring book bambini, attività 3 anni".
    keywords: String,
    max_pages: u8,
    max_bsr: u64,
    max_reviews: u64,
}

#[derive(Serialize)]
struct SearchResponse {
    job_id: Uuid,
}

#[post("/search")]
async fn start_search(
    store: web::Data<RunStore>,
    job_sender: web::Data<NicheJobSender>,
    body: web::Json<SearchBody>,
) -> HttpResponse {
    let config = match RunConfig::parse(
        &body.keywords,
        body.max_pages,
        body.max_bsr,
        body.max_reviews,
    ) {
        Ok(config) => config,
        Err(reason) => return HttpResponse::BadRequest().body(reason),
    };

    let job_id = store.register();
    match job_sender.sender.send(SearchJob { id: job_id, config }) {
        Ok(()) => HttpResponse::Ok().json(SearchResponse { job_id }),
        Err(e) => {
            log::error!("Niche search handler is gone: {:?}", e);
            HttpResponse::InternalServerError().body("Search worker unavailable")
        }
    }
}

#[get("/run/{id}")]
async fn run_status(store: web::Data<RunStore>, path: web::Path<Uuid>) -> HttpResponse {
    match store.status(*path) {
        Some(status) => HttpResponse::Ok().json(status),
        None => HttpResponse::NotFound().body("Unknown job id"),
    }
}

#[get("/run/{id}/csv")]
async fn run_csv(store: web::Data<RunStore>, path: web::Path<Uuid>) -> HttpResponse {
    match store.records(*path) {
        Some(records) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                "attachment; filename=\"idee_kdp.csv\"",
            ))
            .body(export::to_csv(&records)),
        None => HttpResponse::NotFound().body("Job unknown or not finished yet"),
    }
}
