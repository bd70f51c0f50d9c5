use crate::archive::ImageArchiver;
use crate::client::EpicImageClient;
use crate::error::EpicError;
use crate::image::{EpicImage, ImageFormat, ImageryType};
use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Outcome of one day's run: how many images the listing announced, how many
/// landed on disk, and which ones were skipped for missing metadata.
#[derive(Deserialize, Serialize, Debug)]
pub struct DownloadReport {
    pub found: usize,
    pub stored: usize,
    pub skipped: Vec<SkippedImage>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct SkippedImage {
    pub identifier: String,
    pub missing: String,
}

impl DownloadReport {
    pub fn write<P: AsRef<Path>>(self: &Self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    #[allow(dead_code)]
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let report: Self = serde_json::from_str(&content)?;
        Ok(report)
    }
}

/// Fetches one day's listing and archives every image in the order the API
/// returned them.
pub async fn download_day(
    client: &EpicImageClient,
    archiver: &ImageArchiver,
    dest_root: &Path,
    date: Option<NaiveDate>,
    imagery_type: ImageryType,
    image_format: ImageFormat,
) -> Result<DownloadReport, EpicError> {
    let images = client.fetch(date, imagery_type).await?;
    tracing::info!(found = images.len(), %imagery_type, "images found");
    archive_batch(archiver, &images, dest_root, imagery_type, image_format).await
}

/// Archives a batch strictly in sequence. A record with missing metadata is
/// logged and skipped; every other failure aborts the batch, since it usually
/// means the archive or the disk is unusable as a whole.
pub async fn archive_batch(
    archiver: &ImageArchiver,
    images: &[EpicImage],
    dest_root: &Path,
    imagery_type: ImageryType,
    image_format: ImageFormat,
) -> Result<DownloadReport, EpicError> {
    let mut report = DownloadReport {
        found: images.len(),
        stored: 0,
        skipped: vec![],
    };

    for image in images {
        match archiver
            .store(image, dest_root, imagery_type, image_format)
            .await
        {
            Ok(()) => {
                tracing::info!(identifier = %image.identifier, "stored");
                report.stored += 1;
            }
            Err(err) => match err.missing_information() {
                Some(field) => {
                    tracing::info!(identifier = %image.identifier, field, "skipped, missing information");
                    report.skipped.push(SkippedImage {
                        identifier: image.identifier.clone(),
                        missing: field.to_string(),
                    });
                }
                None => return Err(err),
            },
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn image(identifier: &str, name: Option<&str>, date: Option<&str>) -> EpicImage {
        EpicImage {
            identifier: identifier.to_string(),
            image: name.map(|n| n.to_string()),
            date: date.map(|d| d.to_string()),
        }
    }

    fn seed_archive(root: &Path, name: &str) {
        let dir = root.join("natural/2021/07/01/png");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{}.png", name)), b"png").unwrap();
    }

    #[tokio::test]
    async fn test_batch_skips_incomplete_records_and_continues() {
        let archive = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        seed_archive(archive.path(), "epic_1b_a");
        seed_archive(archive.path(), "epic_1b_c");

        let archiver = ImageArchiver::new(archive.path().to_str().unwrap());
        let images = vec![
            image("a", Some("epic_1b_a"), Some("2021-07-01 00:08:12")),
            image("b", None, Some("2021-07-01 01:13:45")),
            image("c", Some("epic_1b_c"), Some("2021-07-01 02:19:18")),
        ];

        let report = archive_batch(
            &archiver,
            &images,
            dest.path(),
            ImageryType::Natural,
            ImageFormat::Png,
        )
        .await
        .unwrap();

        assert_eq!(report.found, 3);
        assert_eq!(report.stored, 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].identifier, "b");
        assert_eq!(report.skipped[0].missing, "name");
        assert_eq!(dest.path().join("2021-07-01/epic_1b_c.png").exists(), true);
    }

    #[tokio::test]
    async fn test_batch_aborts_on_copy_failure() {
        let archive = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        seed_archive(archive.path(), "epic_1b_b");

        let archiver = ImageArchiver::new(archive.path().to_str().unwrap());
        // First record's file is absent from the archive, the batch must stop
        // before reaching the second.
        let images = vec![
            image("a", Some("epic_1b_gone"), Some("2021-07-01 00:08:12")),
            image("b", Some("epic_1b_b"), Some("2021-07-01 01:13:45")),
        ];

        let err = archive_batch(
            &archiver,
            &images,
            dest.path(),
            ImageryType::Natural,
            ImageFormat::Png,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, EpicError::Copy { .. }));
        assert_eq!(dest.path().join("2021-07-01/epic_1b_b.png").exists(), false);
    }

    #[tokio::test]
    async fn test_batch_shares_date_directory() {
        let archive = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        seed_archive(archive.path(), "epic_1b_a");
        seed_archive(archive.path(), "epic_1b_b");

        let archiver = ImageArchiver::new(archive.path().to_str().unwrap());
        let images = vec![
            image("a", Some("epic_1b_a"), Some("2021-07-01 00:08:12")),
            image("b", Some("epic_1b_b"), Some("2021-07-01 01:13:45")),
        ];

        let report = archive_batch(
            &archiver,
            &images,
            dest.path(),
            ImageryType::Natural,
            ImageFormat::Png,
        )
        .await
        .unwrap();

        assert_eq!(report.stored, 2);
        assert_eq!(dest.path().join("2021-07-01/epic_1b_a.png").exists(), true);
        assert_eq!(dest.path().join("2021-07-01/epic_1b_b.png").exists(), true);
    }

    #[test]
    fn test_report_round_trip() {
        let dir = TempDir::new().unwrap();
        let path: PathBuf = dir.path().join("report.json");
        let report = DownloadReport {
            found: 2,
            stored: 1,
            skipped: vec![SkippedImage {
                identifier: "b".to_string(),
                missing: "date".to_string(),
            }],
        };
        report.write(&path).unwrap();

        let report = DownloadReport::read(&path).unwrap();
        assert_eq!(report.found, 2);
        assert_eq!(report.stored, 1);
        assert_eq!(report.skipped[0].missing, "date");
    }
}
