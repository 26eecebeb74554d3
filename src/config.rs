use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Png,
    Jpeg,
}

impl Format {
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Png => "png",
            Format::Jpeg => "jpg",
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "camgrab",
    version,
    about = "Grab webcam snapshots off the internet at regular intervals"
)]
pub struct Config {
    #[arg(help = "Base interval between grabs, in seconds")]
    pub interval: u64,

    #[arg(help = "URL of the webcam snapshot image")]
    pub url: String,

    #[arg(help = "Directory to save accepted images into")]
    pub target_dir: PathBuf,

    #[arg(
        short,
        long,
        default_value_t = 0.0,
        help = "Discard images below this B/W light level, in percent"
    )]
    pub light: f64,

    #[arg(
        long,
        value_enum,
        default_value_t = Format::Png,
        help = "Image format for saved files"
    )]
    pub format: Format,

    #[arg(
        short,
        long,
        num_args = 2,
        value_names = ["LAT", "LON"],
        allow_negative_numbers = true,
        help = "Latitude and longitude; only grab during civil daylight hours"
    )]
    pub daylight: Option<Vec<f64>>,
}

impl Config {
    pub fn daylight_coords(&self) -> Option<(f64, f64)> {
        self.daylight.as_ref().map(|coords| (coords[0], coords[1]))
    }
}
