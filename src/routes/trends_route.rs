use actix_web::{get, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::services::{TrendPoint, TrendsClient};

#[derive(Deserialize)]
struct TrendsQuery {
    /// Comma-separated keywords.
    keywords: String,
}

#[derive(Serialize)]
struct KeywordTrends {
    keyword: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    points: Option<Vec<TrendPoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// One lookup per keyword; a failed keyword reports its error and the rest
/// keep going.
#[get("")]
async fn trends(
    trends_client: web::Data<TrendsClient>,
    query: web::Query<TrendsQuery>,
) -> HttpResponse {
    let mut out = vec![];

    for keyword in query
        .keywords
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
    {
        match trends_client.interest_over_time(keyword).await {
            Ok(points) => {
                if points.is_empty() {
                    log::warn!("No trend data for: {}", keyword);
                }
                out.push(KeywordTrends {
                    keyword: keyword.to_string(),
                    points: Some(points),
                    error: None,
                });
            }
            Err(e) => {
                log::error!("Trends lookup failed for '{}': {:?}", keyword, e);
                out.push(KeywordTrends {
                    keyword: keyword.to_string(),
                    points: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    HttpResponse::Ok().json(out)
}
