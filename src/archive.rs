use crate::error::EpicError;
use crate::image::{EpicImage, ImageFormat, ImageryType};
use chrono::{Datelike, NaiveDate};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Copies single images out of the date-and-type partitioned EPIC archive into
/// a local folder tree with one directory per capture date.
///
/// The archive root can be a local directory or an `http(s)` base URL; the
/// public archive lives behind HTTP, a mirrored copy on disk works the same
/// way.
pub struct ImageArchiver {
    client: reqwest::Client,
    archive_root: String,
}

impl ImageArchiver {
    pub fn new(archive_root: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            archive_root: archive_root.trim_end_matches('/').to_string(),
        }
    }

    /// Copies one image into `<dest_root>/<YYYY-MM-DD>/<name>.<format>`.
    ///
    /// Fails with `MissingInformation` when the record has no file name or no
    /// parseable date; the name is checked first. An existing destination file
    /// is overwritten. A directory created before a later failure stays.
    pub async fn store(
        self: &Self,
        image: &EpicImage,
        dest_root: &Path,
        imagery_type: ImageryType,
        image_format: ImageFormat,
    ) -> Result<(), EpicError> {
        let name = image
            .image
            .as_deref()
            .ok_or(EpicError::MissingInformation("name"))?;
        let date = image.date().ok_or(EpicError::MissingInformation("date"))?;

        let image_name = format!("{}.{}", name, image_format);
        let dest_dir = dest_root.join(date.format("%Y-%m-%d").to_string());
        fs::create_dir_all(&dest_dir).map_err(|source| EpicError::Copy {
            path: dest_dir.clone(),
            source,
        })?;

        let source = archive_location(
            &self.archive_root,
            date,
            imagery_type,
            image_format,
            &image_name,
        );
        let dest = dest_dir.join(&image_name);
        tracing::debug!(%source, dest = %dest.display(), "copying image");

        if source.starts_with("http://") || source.starts_with("https://") {
            self.copy_from_url(&source, &dest).await
        } else {
            fs::copy(&source, &dest).map(|_| ()).map_err(|e| {
                // Name the archive file when it is the missing piece, the
                // destination otherwise.
                if e.kind() == io::ErrorKind::NotFound {
                    copy_error(Path::new(&source), e)
                } else {
                    copy_error(&dest, e)
                }
            })
        }
    }

    async fn copy_from_url(self: &Self, source: &str, dest: &Path) -> Result<(), EpicError> {
        let response = self
            .client
            .get(source)
            .send()
            .await
            .map_err(|e| copy_error(Path::new(source), io::Error::other(e)))?;

        if !response.status().is_success() {
            let e = io::Error::other(format!("archive answered {}", response.status()));
            return Err(copy_error(Path::new(source), e));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| copy_error(Path::new(source), io::Error::other(e)))?;
        fs::write(dest, &bytes).map_err(|e| copy_error(dest, e))
    }
}

fn copy_error(path: &Path, source: io::Error) -> EpicError {
    EpicError::Copy {
        path: path.to_path_buf(),
        source,
    }
}

/// `<archive_root>/<imagery_type>/<YYYY>/<MM>/<DD>/<format>/<image_name>`.
/// The partition comes from the image's own capture date, not from the date
/// the listing was fetched for.
pub(crate) fn archive_location(
    archive_root: &str,
    date: NaiveDate,
    imagery_type: ImageryType,
    image_format: ImageFormat,
    image_name: &str,
) -> String {
    format!(
        "{}/{}/{:04}/{:02}/{:02}/{}/{}",
        archive_root,
        imagery_type,
        date.year(),
        date.month(),
        date.day(),
        image_format,
        image_name
    )
}

#[allow(dead_code)]
pub(crate) fn destination_path(dest_root: &Path, date: NaiveDate, image_name: &str) -> PathBuf {
    dest_root
        .join(date.format("%Y-%m-%d").to_string())
        .join(image_name)
}
