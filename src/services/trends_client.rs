use anyhow::{anyhow, Context};
use fake_user_agent::get_rua;
use serde::Serialize;
use serde_json::{json, Value};

use crate::configuration::TrendsSettings;

/// Client for the Google Trends widget API. The API is a two-step dance:
/// an explore call hands out a short-lived token per widget, and the token
/// unlocks the actual interest-over-time series.
pub struct TrendsClient {
    client: reqwest::Client,
    settings: TrendsSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: String,
    pub value: u64,
}

impl TrendsClient {
    pub fn new(settings: TrendsSettings) -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .unwrap();

        TrendsClient { client, settings }
    }

    /// Popularity time series for one keyword over the configured locale and
    /// timeframe. An empty vector means the keyword has no data; transport
    /// and token failures are errors the caller reports per keyword.
    pub async fn interest_over_time(&self, keyword: &str) -> anyhow::Result<Vec<TrendPoint>> {
        let explore_req = json!({
            "comparisonItem": [{
                "keyword": keyword,
                "geo": self.settings.geo,
                "time": self.settings.timeframe,
            }],
            "category": 0,
            "property": "",
        });

        let explore_body = self
            .client
            .get(format!("{}/api/explore", self.settings.base_url))
            .header("User-Agent", get_rua())
            .query(&[
                ("hl", self.settings.hl.as_str()),
                ("tz", &self.settings.tz.to_string()),
                ("req", &explore_req.to_string()),
            ])
            .send()
            .await
            .context("Trends explore request failed")?
            .text()
            .await
            .context("Failed to read the explore response")?;

        let (token, widget_request) = parse_timeseries_widget(&explore_body)?;

        let timeline_body = self
            .client
            .get(format!("{}/api/widgetdata/multiline", self.settings.base_url))
            .header("User-Agent", get_rua())
            .query(&[
                ("hl", self.settings.hl.as_str()),
                ("tz", &self.settings.tz.to_string()),
                ("req", &widget_request.to_string()),
                ("token", &token),
            ])
            .send()
            .await
            .context("Trends widgetdata request failed")?
            .text()
            .await
            .context("Failed to read the widgetdata response")?;

        parse_timeline(&timeline_body)
    }
}

/// Trends responses open with an anti-scraping prefix like `)]}'` before the
/// JSON payload starts.
fn strip_envelope(body: &str) -> &str {
    match body.find('{') {
        Some(start) => &body[start..],
        None => body,
    }
}

/// Pick the TIMESERIES widget's token and request payload out of the explore
/// response.
fn parse_timeseries_widget(body: &str) -> anyhow::Result<(String, Value)> {
    let parsed: Value =
        serde_json::from_str(strip_envelope(body)).context("Explore response is not JSON")?;

    let widgets = parsed["widgets"]
        .as_array()
        .ok_or_else(|| anyhow!("No widgets in the explore response"))?;

    let widget = widgets
        .iter()
        .find(|widget| widget["id"] == "TIMESERIES")
        .ok_or_else(|| anyhow!("No TIMESERIES widget in the explore response"))?;

    let token = widget["token"]
        .as_str()
        .ok_or_else(|| anyhow!("TIMESERIES widget has no token"))?
        .to_string();

    Ok((token, widget["request"].clone()))
}

/// Read the interest-over-time points. A response without timeline data is a
/// keyword with no popularity data, not an error.
fn parse_timeline(body: &str) -> anyhow::Result<Vec<TrendPoint>> {
    let parsed: Value =
        serde_json::from_str(strip_envelope(body)).context("Widgetdata response is not JSON")?;

    let points = match parsed["default"]["timelineData"].as_array() {
        Some(points) => points,
        None => return Ok(vec![]),
    };

    Ok(points
        .iter()
        .map(|point| TrendPoint {
            date: point["formattedTime"]
                .as_str()
                .or_else(|| point["formattedAxisTime"].as_str())
                .unwrap_or_default()
                .to_string(),
            value: point["value"][0].as_u64().unwrap_or(0),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widget_token_and_request_come_from_the_timeseries_widget() {
        let body = r#")]}'
        {"widgets":[
            {"id":"RELATED_QUERIES","token":"wrong"},
            {"id":"TIMESERIES","token":"abc123","request":{"time":"2024-01-01 2025-01-01"}}
        ]}"#;

        let (token, request) = parse_timeseries_widget(body).unwrap();
        assert_eq!(token, "abc123");
        assert_eq!(request["time"], "2024-01-01 2025-01-01");
    }

    #[test]
    fn explore_response_without_timeseries_widget_is_an_error() {
        let body = r#"{"widgets":[{"id":"RELATED_QUERIES","token":"x"}]}"#;
        assert!(parse_timeseries_widget(body).is_err());
    }

    #[test]
    fn garbage_explore_response_is_an_error() {
        assert!(parse_timeseries_widget("captcha page").is_err());
    }

    #[test]
    fn timeline_points_are_extracted_in_order() {
        let body = r#")]}',
        {"default":{"timelineData":[
            {"formattedTime":"gen 2025","value":[42]},
            {"formattedTime":"feb 2025","value":[58]}
        ]}}"#;

        let points = parse_timeline(body).unwrap();
        assert_eq!(
            points,
            vec![
                TrendPoint { date: "gen 2025".to_string(), value: 42 },
                TrendPoint { date: "feb 2025".to_string(), value: 58 },
            ]
        );
    }

    #[test]
    fn missing_timeline_data_means_an_empty_series() {
        let body = r#"{"default":{}}"#;
        assert_eq!(parse_timeline(body).unwrap(), vec![]);
    }
}
