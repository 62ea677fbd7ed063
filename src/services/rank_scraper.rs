use scraper::{ElementRef, Html, Selector};

use crate::domain::numeric;

/// Row labels under which the marketplace publishes the best-sellers rank.
const RANK_LABELS: [&str; 2] = ["posizione nella classifica", "best sellers rank"];

/// Read the best-sellers rank off a product detail page. Returns None when
/// the label row, the value cell or the numeric parse is missing; a detail
/// page without a published rank is a valid page, not an error, and the item
/// is simply never eligible for the result set.
pub fn extract_rank(page_source: &str) -> Option<u64> {
    let document = Html::parse_document(page_source);

    let th_selector = Selector::parse("th").unwrap();
    let span_selector = Selector::parse("span").unwrap();

    let label_cell = document.select(&th_selector).find(|th| {
        let text = th.text().collect::<String>().to_lowercase();
        RANK_LABELS.iter().any(|label| text.contains(label))
    })?;

    let value_cell = label_cell
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == "td")?;

    let value_text = value_cell
        .select(&span_selector)
        .next()
        .map(|span| span.text().collect::<String>())
        .unwrap_or_else(|| value_cell.text().collect::<String>());

    numeric::rank_token(&value_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail_page(label: &str, value: &str) -> String {
        format!(
            r#"<html><body><table><tbody>
                <tr><th>{label}</th><td><span>{value}</span></td></tr>
            </tbody></table></body></html>"#
        )
    }

    #[test]
    fn reads_rank_from_labelled_row() {
        let html = detail_page("Posizione nella classifica Bestseller", "#1.403 in Libri");
        assert_eq!(extract_rank(&html), Some(1403));
    }

    #[test]
    fn english_label_is_recognized() {
        let html = detail_page("Best Sellers Rank", "#2,501 in Books");
        assert_eq!(extract_rank(&html), Some(2501));
    }

    #[test]
    fn falls_back_to_cell_text_without_span() {
        let html = r#"<html><body><table>
            <tr><th>Posizione nella classifica</th><td>#99 in Libri</td></tr>
        </table></body></html>"#;
        assert_eq!(extract_rank(html), Some(99));
    }

    #[test]
    fn missing_label_row_yields_absent() {
        let html = r#"<html><body><table>
            <tr><th>Editore</th><td><span>Indipendente</span></td></tr>
        </table></body></html>"#;
        assert_eq!(extract_rank(html), None);
    }

    #[test]
    fn label_without_value_cell_yields_absent() {
        let html = r#"<html><body><table>
            <tr><th>Posizione nella classifica</th></tr>
        </table></body></html>"#;
        assert_eq!(extract_rank(html), None);
    }

    #[test]
    fn non_numeric_value_yields_absent_not_zero() {
        let html = detail_page("Posizione nella classifica", "n/d in Libri");
        assert_eq!(extract_rank(&html), None);
    }

    #[test]
    fn empty_page_yields_absent() {
        assert_eq!(extract_rank(""), None);
    }
}
