//! NASA POWER API client.
//!
//! POWER serves long-term climatological normals and daily historical
//! series per coordinate. The climatology endpoint backs live analysis;
//! the daily endpoint supplies ground-truth actuals for validation runs.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;
use url::Url;

use crate::error::DataError;
use crate::fetch::auth::UrlParam;
use crate::fetch::{BasicClient, HttpClient};
use crate::models::MonthlyClimate;
use crate::scoring::evaluate::MISSING_THRESHOLD;
use crate::services::ClimatologyProvider;

const POWER_BASE_URL: &str = "https://power.larc.nasa.gov";
const CLIMATOLOGY_PATH: &str = "/api/temporal/climatology/point";
const DAILY_PATH: &str = "/api/temporal/daily/point";

/// Everything the comfort analysis reads, requested in one call.
const CLIMATOLOGY_PARAMETERS: &str =
    "T2M,T2M_MAX,T2M_MIN,WS10M,WS10M_MAX,RH2M,PRECTOTCORR,ALLSKY_SFC_SW_DWN,KT";

#[derive(Deserialize)]
struct PowerResponse {
    #[serde(default)]
    header: Option<PowerHeader>,
    properties: PowerProperties,
}

#[derive(Deserialize)]
struct PowerHeader {
    title: Option<String>,
}

#[derive(Deserialize)]
struct PowerProperties {
    /// Parameter name to series, keyed by `JAN`..`DEC` plus `ANN` for
    /// climatology or `YYYYMMDD` for daily data.
    #[serde(default)]
    parameter: HashMap<String, HashMap<String, f64>>,
}

pub struct PowerClient {
    http: Box<dyn HttpClient>,
    base_url: String,
}

impl PowerClient {
    /// A client for the public POWER API. Anonymous access works; a key
    /// raises the rate limit and is sent as an `api_key` query parameter.
    pub fn new(api_key: Option<String>) -> Self {
        let http: Box<dyn HttpClient> = match api_key {
            Some(key) => Box::new(UrlParam {
                inner: BasicClient::new(),
                param_name: "api_key".to_string(),
                key,
            }),
            None => Box::new(BasicClient::new()),
        };

        Self {
            http,
            base_url: POWER_BASE_URL.to_string(),
        }
    }

    /// Points the client at a different host, for tests against a mock
    /// server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn get_json(&self, url: Url) -> Result<PowerResponse, DataError> {
        let req = reqwest::Request::new(reqwest::Method::GET, url);
        let resp = self.http.execute(req).await?;

        if !resp.status().is_success() {
            return Err(DataError::Status(resp.status()));
        }

        Ok(resp.json::<PowerResponse>().await?)
    }

    /// Daily 2-meter temperatures over whole calendar years, in date order.
    ///
    /// POWER pads days it has no value for with its missing-data code, so
    /// those entries are dropped rather than returned as readings.
    pub async fn daily_temperatures(
        &self,
        lat: f64,
        lon: f64,
        start_year: i32,
        end_year: i32,
    ) -> Result<Vec<(NaiveDate, f64)>, DataError> {
        let url = Url::parse_with_params(
            &format!("{}{}", self.base_url, DAILY_PATH),
            &[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                ("start", format!("{start_year}0101")),
                ("end", format!("{end_year}1231")),
                ("community", "RE".to_string()),
                ("parameters", "T2M".to_string()),
                ("format", "JSON".to_string()),
            ],
        )?;

        let data = self.get_json(url).await?;
        let series = data
            .properties
            .parameter
            .get("T2M")
            .ok_or_else(|| DataError::MissingData("daily T2M series absent".to_string()))?;

        let mut days: Vec<(NaiveDate, f64)> = series
            .iter()
            .filter_map(|(stamp, value)| {
                let date = NaiveDate::parse_from_str(stamp, "%Y%m%d").ok()?;
                (*value > MISSING_THRESHOLD).then_some((date, *value))
            })
            .collect();
        days.sort_by_key(|(date, _)| *date);

        Ok(days)
    }
}

#[async_trait::async_trait]
impl ClimatologyProvider for PowerClient {
    async fn monthly_climatology(
        &self,
        lat: f64,
        lon: f64,
        month: u32,
    ) -> Result<MonthlyClimate, DataError> {
        let key = month_key(month)?;

        let url = Url::parse_with_params(
            &format!("{}{}", self.base_url, CLIMATOLOGY_PATH),
            &[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                ("community", "RE".to_string()),
                ("parameters", CLIMATOLOGY_PARAMETERS.to_string()),
                ("format", "JSON".to_string()),
            ],
        )?;

        let data = self.get_json(url).await?;
        let location = data.header.and_then(|h| h.title);
        let parameter = &data.properties.parameter;
        let field = |name: &str| parameter.get(name).and_then(|series| series.get(&key)).copied();

        Ok(MonthlyClimate {
            location,
            temp_avg: field("T2M"),
            temp_min: field("T2M_MIN"),
            temp_max: field("T2M_MAX"),
            wind_avg: field("WS10M"),
            wind_max: field("WS10M_MAX"),
            humidity_avg: field("RH2M"),
            precip_avg_daily: field("PRECTOTCORR"),
            clearness_index: field("KT"),
        })
    }
}

/// POWER keys climatology series by upper-cased month abbreviation.
fn month_key(month: u32) -> Result<String, DataError> {
    let date = NaiveDate::from_ymd_opt(2000, month, 1).ok_or(DataError::InvalidMonth(month))?;
    Ok(date.format("%b").to_string().to_uppercase())
}
