use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;
use std::error::Error;

pub mod sunrise_sunset;

/// Civil-twilight bounds for the current UTC day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaylightWindow {
    pub dawn: DateTime<Utc>,
    pub dusk: DateTime<Utc>,
}

#[cfg_attr(test, automock)]
pub trait Provider {
    fn fetch_window(&self) -> Result<DaylightWindow, Box<dyn Error>>;
}

/// Answers "is it light enough outside to bother capturing".
///
/// Until the first successful refresh it assumes night, which is the
/// safer default when uncertain.
pub struct Oracle {
    provider: Box<dyn Provider>,
    window: Option<DaylightWindow>,
}

impl Oracle {
    pub fn new(provider: Box<dyn Provider>) -> Self {
        Self {
            provider,
            window: None,
        }
    }

    /// Fetch today's window; on failure the previous one stays in effect.
    pub fn refresh(&mut self) -> Result<(), Box<dyn Error>> {
        let window = self.provider.fetch_window()?;

        log::info!("Daylight begins: {}", window.dawn.format("%Y-%m-%d %H:%M:%S UTC"));
        log::info!("Daylight ends: {}", window.dusk.format("%Y-%m-%d %H:%M:%S UTC"));

        self.window = Some(window);
        Ok(())
    }

    pub fn is_daylight(&self, now: DateTime<Utc>) -> bool {
        match self.window {
            Some(window) => now > window.dawn && now < window.dusk,
            None => false,
        }
    }

    pub fn window(&self) -> Option<DaylightWindow> {
        self.window
    }
}
