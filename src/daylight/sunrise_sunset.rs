use super::{DaylightWindow, Provider};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use std::error::Error;
use std::time::Duration;

const API_URL: &str = "https://api.sunrise-sunset.org/json";
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Deserialize, Debug)]
struct Response {
    results: Results,
}

#[derive(Deserialize, Debug)]
struct Results {
    civil_twilight_begin: String,
    civil_twilight_end: String,
}

/// Daylight times from https://sunrise-sunset.org, keyed by coordinates.
pub struct SunriseSunset {
    client: reqwest::blocking::Client,
    latitude: f64,
    longitude: f64,
}

impl SunriseSunset {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, Box<dyn Error>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            latitude,
            longitude,
        })
    }
}

impl Provider for SunriseSunset {
    fn fetch_window(&self) -> Result<DaylightWindow, Box<dyn Error>> {
        let response: Response = self
            .client
            .get(API_URL)
            .query(&[
                ("lat", self.latitude.to_string()),
                ("lng", self.longitude.to_string()),
                ("date", "today".to_string()),
            ])
            .send()?
            .error_for_status()?
            .json()?;

        window_for(
            Utc::now().date_naive(),
            &response.results.civil_twilight_begin,
            &response.results.civil_twilight_end,
        )
    }
}

/// The service reports bare 12-hour UTC clock readings; anchor them to
/// the given date to get absolute timestamps.
fn window_for(date: NaiveDate, begin: &str, end: &str) -> Result<DaylightWindow, Box<dyn Error>> {
    Ok(DaylightWindow {
        dawn: at(date, begin)?,
        dusk: at(date, end)?,
    })
}

fn at(date: NaiveDate, time: &str) -> Result<DateTime<Utc>, Box<dyn Error>> {
    let time = NaiveTime::parse_from_str(time, "%I:%M:%S %p")?;
    Ok(date.and_time(time).and_utc())
}
