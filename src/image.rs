//! Model types for the EPIC listing payload and the closed parameter sets.
use chrono::{NaiveDate, NaiveDateTime};
use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;

/// One entry of the daily image listing. Built once by deserializing a fetch
/// response element and never mutated afterwards.
#[derive(Deserialize, Clone, Debug)]
pub struct EpicImage {
    pub identifier: String,
    /// File name of the image in the archive. The API sometimes publishes
    /// metadata before the file name is known.
    #[serde(default)]
    pub image: Option<String>,
    /// Capture timestamp as the API sends it, e.g. "2021-07-01 00:08:12".
    #[serde(default)]
    pub date: Option<String>,
}

impl EpicImage {
    /// The capture date, if the raw field is present and parseable. Absent and
    /// malformed collapse to `None`; a malformed value is only logged.
    pub fn date(self: &Self) -> Option<NaiveDate> {
        let raw = self.date.as_deref()?;
        let parsed = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
            .map(|dt| dt.date())
            .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));
        match parsed {
            Ok(date) => Some(date),
            Err(_) => {
                tracing::warn!(identifier = %self.identifier, raw, "unparseable image date");
                None
            }
        }
    }
}

/// The four product categories the EPIC API serves.
#[derive(ValueEnum, Copy, Clone, PartialEq, Eq, Debug)]
pub enum ImageryType {
    Natural,
    Enhanced,
    Aerosol,
    Cloud,
}

impl ImageryType {
    pub fn as_str(self: &Self) -> &'static str {
        match self {
            ImageryType::Natural => "natural",
            ImageryType::Enhanced => "enhanced",
            ImageryType::Aerosol => "aerosol",
            ImageryType::Cloud => "cloud",
        }
    }
}

impl fmt::Display for ImageryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(ValueEnum, Copy, Clone, PartialEq, Eq, Debug)]
pub enum ImageFormat {
    Png,
    Jpg,
}

impl ImageFormat {
    pub fn as_str(self: &Self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpg => "jpg",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(date: Option<&str>) -> EpicImage {
        EpicImage {
            identifier: "20210701000830".to_string(),
            image: Some("epic_1b_20210701000830".to_string()),
            date: date.map(|d| d.to_string()),
        }
    }

    #[test]
    fn test_date_from_datetime_form() {
        let img = image(Some("2021-07-01 00:08:12"));
        assert_eq!(img.date(), NaiveDate::from_ymd_opt(2021, 7, 1));
    }

    #[test]
    fn test_date_from_date_only_form() {
        let img = image(Some("2021-07-01"));
        assert_eq!(img.date(), NaiveDate::from_ymd_opt(2021, 7, 1));
    }

    #[test]
    fn test_date_absent_and_malformed_both_none() {
        assert_eq!(image(None).date(), None);
        assert_eq!(image(Some("first of july")).date(), None);
    }

    #[test]
    fn test_deserialize_listing_entry() {
        let payload = r#"{
            "identifier": "20210701000830",
            "image": "epic_1b_20210701000830",
            "date": "2021-07-01 00:08:12",
            "caption": "This image was taken by NASA's EPIC camera"
        }"#;
        let img: EpicImage = serde_json::from_str(payload).unwrap();
        assert_eq!(img.identifier, "20210701000830");
        assert_eq!(img.image.as_deref(), Some("epic_1b_20210701000830"));
    }

    #[test]
    fn test_deserialize_entry_without_image_or_date() {
        let img: EpicImage = serde_json::from_str(r#"{"identifier": "x"}"#).unwrap();
        assert_eq!(img.image, None);
        assert_eq!(img.date(), None);
    }

    #[test]
    fn test_wire_names_are_lowercase() {
        assert_eq!(ImageryType::Natural.to_string(), "natural");
        assert_eq!(ImageryType::Cloud.to_string(), "cloud");
        assert_eq!(ImageFormat::Png.to_string(), "png");
        assert_eq!(ImageFormat::Jpg.to_string(), "jpg");
    }
}
