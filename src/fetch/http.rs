use std::error::Error;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Grabs snapshot bytes with a single blocking GET per capture.
pub struct Fetcher {
    client: reqwest::blocking::Client,
    url: String,
}

impl Fetcher {
    pub fn new(url: &str) -> Result<Self, Box<dyn Error>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

impl super::Fetch for Fetcher {
    fn fetch(&self) -> Result<Vec<u8>, Box<dyn Error>> {
        let response = self.client.get(&self.url).send()?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }
}
