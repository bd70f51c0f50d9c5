use crate::error::EpicError;
use crate::image::{EpicImage, ImageryType};
use chrono::NaiveDate;
use reqwest::StatusCode;

/// Client for the EPIC listing API. One GET per (date, imagery type) pair
/// returns the metadata for every image captured that day.
pub struct EpicImageClient {
    client: reqwest::Client,
    api_root: String,
    api_key: String,
}

impl EpicImageClient {
    pub fn new(api_root: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_root: api_root.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Fetches the image listing for the given date. Without a date the API
    /// answers with the most recent available day.
    pub async fn fetch(
        self: &Self,
        date: Option<NaiveDate>,
        imagery_type: ImageryType,
    ) -> Result<Vec<EpicImage>, EpicError> {
        let url = image_list_url(&self.api_root, date, imagery_type);
        tracing::debug!(%url, "requesting image listing");

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| EpicError::Transport(e.into()))?;

        let status = response.status();
        let body: BodyResult = response.text().await.map_err(Into::into);
        classify_listing(status, body)
    }
}

type BodyResult = Result<String, Box<dyn std::error::Error + Send + Sync>>;

/// Sorts one listing response into the error model. Any non-200 status is an
/// upstream failure carrying a best-effort body, a body-read fault at 200 is
/// a transport fault, and an empty 200 body is its own kind.
pub(crate) fn classify_listing(
    status: StatusCode,
    body: BodyResult,
) -> Result<Vec<EpicImage>, EpicError> {
    if status != StatusCode::OK {
        return Err(EpicError::Upstream {
            status: status.as_u16(),
            body: body.ok().filter(|b| !b.is_empty()),
        });
    }
    let body = body.map_err(EpicError::Transport)?;
    decode_listing(&body)
}

/// `<api_root>/<imagery_type>/date/<YYYY-MM-DD>`, with an empty trailing
/// segment when no date is given.
pub(crate) fn image_list_url(
    api_root: &str,
    date: Option<NaiveDate>,
    imagery_type: ImageryType,
) -> String {
    let date_segment = date.map(|d| d.format("%Y-%m-%d").to_string());
    format!(
        "{}/{}/date/{}",
        api_root,
        imagery_type,
        date_segment.as_deref().unwrap_or("")
    )
}

pub(crate) fn decode_listing(body: &str) -> Result<Vec<EpicImage>, EpicError> {
    if body.trim().is_empty() {
        return Err(EpicError::EmptyResponse);
    }
    serde_json::from_str(body).map_err(EpicError::Decode)
}
