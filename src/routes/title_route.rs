use actix_web::{get, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::services::OpenaiClient;

const DEFAULT_TITLE_COUNT: u8 = 5;

#[derive(Deserialize)]
struct TitlesQuery {
    /// Comma-separated keywords.
    keywords: String,
    count: Option<u8>,
}

#[derive(Serialize)]
struct KeywordTitles {
    keyword: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    titles: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Title suggestions per keyword. A provider failure on one keyword is
/// reported in its slot and never aborts the siblings.
#[get("")]
async fn titles(
    openai_client: web::Data<OpenaiClient>,
    query: web::Query<TitlesQuery>,
) -> HttpResponse {
    let count = query.count.unwrap_or(DEFAULT_TITLE_COUNT);
    let mut out = vec![];

    for keyword in query
        .keywords
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
    {
        match openai_client.generate_titles(keyword, count).await {
            Ok(titles) => out.push(KeywordTitles {
                keyword: keyword.to_string(),
                titles: Some(titles),
                error: None,
            }),
            Err(e) => {
                log::error!("Title generation failed for '{}': {:?}", keyword, e);
                out.push(KeywordTitles {
                    keyword: keyword.to_string(),
                    titles: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    HttpResponse::Ok().json(out)
}
