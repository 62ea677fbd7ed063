use itertools::Itertools;

use crate::domain::niche::ResultRecord;

const HEADER: &str = "Keyword,Title,Link,Rank,ReviewCount";

/// Render the accumulated records as CSV, one row per record in accumulation
/// order. Fields containing separators, quotes or line breaks are quoted
/// RFC-4180 style; marketplace titles love commas.
pub fn to_csv(records: &[ResultRecord]) -> String {
    let rows = records.iter().map(|record| {
        [
            escape(&record.keyword),
            escape(&record.title),
            escape(&record.detail_url),
            record.rank.to_string(),
            record.review_count.to_string(),
        ]
        .into_iter()
        .join(",")
    });

    let mut csv = std::iter::once(HEADER.to_string()).chain(rows).join("\n");
    csv.push('\n');
    csv
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
