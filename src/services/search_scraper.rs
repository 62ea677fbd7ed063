use scraper::{Html, Selector};
use url::Url;

use crate::domain::{niche::CandidateItem, numeric};

/// Total-count banner labels, per marketplace locale.
const TOTAL_RESULTS_LABELS: [&str; 2] = ["risultati per", "results for"];

pub struct SearchPageData {
    /// Candidates in document order, top to bottom. No dedup within a page.
    pub items: Vec<CandidateItem>,
    pub total_results: u64,
}

/// Pull the candidate list and the total-result banner out of one search
/// results page. Never fails: a container missing its title or link is
/// dropped, a missing review count degrades to 0, a missing banner to 0.
pub fn extract_results(page_source: &str, base_url: &Url) -> SearchPageData {
    let document = Html::parse_document(page_source);

    let container_selector = Selector::parse("div[data-component-type='s-search-result']").unwrap();
    let heading_selector = Selector::parse("h2").unwrap();
    let a_tag_selector = Selector::parse("a").unwrap();
    let review_selector = Selector::parse("span.a-size-base").unwrap();

    let total_results = extract_total_results(&document);

    let mut items = vec![];
    for container in document.select(&container_selector) {
        let title = container
            .select(&heading_selector)
            .next()
            .map(|heading| heading.text().collect::<String>().trim().to_string())
            .filter(|title| !title.is_empty());

        let title = match title {
            Some(title) => title,
            None => {
                log::warn!("Search result without a title, skipping");
                continue;
            }
        };

        let detail_url = container
            .select(&a_tag_selector)
            .filter_map(|a_tag| a_tag.value().attr("href"))
            .next()
            .and_then(|href| base_url.join(href).ok());

        let detail_url = match detail_url {
            Some(url) => url.to_string(),
            None => {
                log::warn!("Search result '{}' without a usable link, skipping", title);
                continue;
            }
        };

        let review_text = container
            .select(&review_selector)
            .next()
            .map(|span| span.text().collect::<String>());
        // A listing with no reviews yet is a valid candidate, not a failure.
        let review_count = numeric::count_or_zero(review_text.as_deref());

        items.push(CandidateItem {
            title,
            detail_url,
            review_count,
        });
    }

    SearchPageData {
        items,
        total_results,
    }
}

fn extract_total_results(document: &Html) -> u64 {
    let span_selector = Selector::parse("span").unwrap();

    document
        .select(&span_selector)
        .map(|span| span.text().collect::<String>())
        .find(|text| {
            TOTAL_RESULTS_LABELS
                .iter()
                .any(|label| text.contains(label))
        })
        .map(|text| numeric::leading_count(&text))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://www.amazon.it").unwrap()
    }

    fn result_container(title: &str, href: &str, reviews: &str) -> String {
        format!(
            r#"<div data-component-type="s-search-result">
                <h2><span>{title}</span></h2>
                <a href="{href}">link</a>
                <span class="a-size-base">{reviews}</span>
            </div>"#
        )
    }

    #[test]
    fn extracts_items_in_document_order_with_absolute_links() {
        let html = format!(
            "<html><body>
                <span>1-16 di oltre 50.000 risultati per \"gatti\"</span>
                {}{}
            </body></html>",
            result_container("Libro uno", "/dp/B001", "1.204"),
            result_container("Libro due", "https://www.amazon.it/dp/B002", "17"),
        );

        let page = extract_results(&html, &base_url());

        assert_eq!(page.total_results, 116);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].title, "Libro uno");
        assert_eq!(page.items[0].detail_url, "https://www.amazon.it/dp/B001");
        assert_eq!(page.items[0].review_count, 1204);
        assert_eq!(page.items[1].title, "Libro due");
        assert_eq!(page.items[1].review_count, 17);
    }

    #[test]
    fn container_without_title_is_dropped() {
        let html = format!(
            "<html><body>
                <div data-component-type=\"s-search-result\"><a href=\"/dp/B003\">no heading</a></div>
                {}
            </body></html>",
            result_container("Libro valido", "/dp/B004", "3"),
        );

        let page = extract_results(&html, &base_url());

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].title, "Libro valido");
    }

    #[test]
    fn container_without_link_is_dropped() {
        let html = r#"<html><body>
            <div data-component-type="s-search-result"><h2>Senza link</h2></div>
        </body></html>"#;

        let page = extract_results(html, &base_url());

        assert!(page.items.is_empty());
    }

    #[test]
    fn missing_review_count_defaults_to_zero() {
        let html = r#"<html><body>
            <div data-component-type="s-search-result">
                <h2>Nessuna recensione</h2>
                <a href="/dp/B005">link</a>
            </div>
        </body></html>"#;

        let page = extract_results(html, &base_url());

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].review_count, 0);
    }

    #[test]
    fn non_numeric_review_count_defaults_to_zero() {
        let html = format!(
            "<html><body>{}</body></html>",
            result_container("Libro", "/dp/B006", "Copertina flessibile"),
        );

        let page = extract_results(&html, &base_url());

        assert_eq!(page.items[0].review_count, 0);
    }

    #[test]
    fn missing_total_banner_defaults_to_zero() {
        let html = format!(
            "<html><body>{}</body></html>",
            result_container("Libro", "/dp/B007", "5"),
        );

        let page = extract_results(&html, &base_url());

        assert_eq!(page.total_results, 0);
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn english_total_banner_is_recognized() {
        let html = "<html><body><span>4.000 results for \"cats\"</span></body></html>";

        let page = extract_results(html, &base_url());

        assert_eq!(page.total_results, 4000);
        assert!(page.items.is_empty());
    }
}
