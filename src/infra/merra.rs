//! MERRA-2 single-level diagnostics downloader.
//!
//! Pulls hourly slab files (`tavg1_2d_slv_Nx`) from the GES DISC archive
//! for offline analysis. Access requires an Earthdata Login token.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::fetch::auth::ApiKey;
use crate::fetch::{BasicClient, HttpClient};

const MERRA_BASE_URL: &str =
    "https://goldsmr4.gesdisc.eosdis.nasa.gov/data/MERRA2/M2T1NXSLV.5.12.4";

/// MERRA-2 production stream for a given year. The archive bakes the
/// stream number into every file name, so a wrong stream is a 404.
pub fn stream_id(year: i32) -> Result<u32> {
    match year {
        1980..=1991 => Ok(100),
        1992..=2000 => Ok(200),
        2001..=2010 => Ok(300),
        y if y >= 2011 => Ok(400),
        _ => bail!("year {year} predates the MERRA-2 record"),
    }
}

/// Archive file name for one day of the single-level collection.
pub fn archive_file_name(year: i32, month: u32, day: u32) -> Result<String> {
    let stream = stream_id(year)?;
    Ok(format!(
        "MERRA2_{stream}.tavg1_2d_slv_Nx.{year}{month:02}{day:02}.nc4"
    ))
}

pub struct MerraArchive {
    http: ApiKey<BasicClient>,
    base_url: String,
}

impl MerraArchive {
    pub fn new(token: String) -> Self {
        Self {
            http: ApiKey::bearer(BasicClient::new(), token),
            base_url: MERRA_BASE_URL.to_string(),
        }
    }

    /// Points the archive at a different host, for tests against a mock
    /// server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn archive_url(&self, year: i32, month: u32, day: u32) -> Result<String> {
        let file_name = archive_file_name(year, month, day)?;
        Ok(format!("{}/{year}/{month:02}/{file_name}", self.base_url))
    }

    /// Downloads one day's file into `output_dir`, streaming the body to
    /// disk. A file that already exists locally is kept as is; the body
    /// streams into a scratch name and is renamed into place once
    /// complete, so an interrupted run is refetched rather than skipped.
    pub async fn download_day(
        &self,
        year: i32,
        month: u32,
        day: u32,
        output_dir: &Path,
    ) -> Result<PathBuf> {
        let file_name = archive_file_name(year, month, day)?;
        let output_path = output_dir.join(&file_name);

        if output_path.exists() {
            info!(file = %file_name, "Already on disk, skipping");
            return Ok(output_path);
        }

        let url = self.archive_url(year, month, day)?;
        info!(file = %file_name, "Downloading");

        let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);
        let mut resp = self.http.execute(req).await?;
        if !resp.status().is_success() {
            bail!("archive returned status {} for {}", resp.status(), url);
        }

        // A torn download must never satisfy the exists() check above
        let part_path = output_dir.join(format!("{file_name}.part"));
        let mut file = File::create(&part_path).await?;
        while let Some(chunk) = resp.chunk().await? {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        drop(file);
        tokio::fs::rename(&part_path, &output_path).await?;

        Ok(output_path)
    }

    /// Downloads the same calendar day across a span of years.
    ///
    /// A failed year is logged and skipped rather than aborting the pull,
    /// and each request is followed by a short pause to stay polite to
    /// the archive. Returns how many files ended up on disk.
    pub async fn download_range(
        &self,
        month: u32,
        day: u32,
        start_year: i32,
        end_year: i32,
        output_dir: &Path,
    ) -> Result<usize> {
        std::fs::create_dir_all(output_dir)?;

        let mut completed = 0;
        for year in start_year..=end_year {
            match self.download_day(year, month, day, output_dir).await {
                Ok(_) => completed += 1,
                Err(e) => warn!(year, error = %e, "Download failed, continuing"),
            }
            tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        }

        Ok(completed)
    }
}
