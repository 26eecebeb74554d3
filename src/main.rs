use clap::Parser;
use std::sync::atomic::Ordering;

mod config;
mod daylight;
mod fetch;
mod frame;
mod scheduler;
mod store;

fn main() {
    let panic_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        panic_hook(panic_info);
        std::process::exit(1);
    }));

    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = config::Config::parse();
    log::debug!("Using {:#?}", config);

    log::info!("Interval: {} seconds", config.interval);
    log::info!("URL: {}", config.url);
    log::info!("Directory: {}", config.target_dir.display());
    log::info!("Light level threshold: {}%", config.light);

    let fetcher = match fetch::http::Fetcher::new(&config.url) {
        Ok(fetcher) => fetcher,
        Err(err) => panic!("Unable to initialize HTTP client: {}", err),
    };

    let oracle = config.daylight_coords().map(|(latitude, longitude)| {
        match daylight::sunrise_sunset::SunriseSunset::new(latitude, longitude) {
            Ok(provider) => daylight::Oracle::new(Box::new(provider)),
            Err(err) => panic!("Unable to initialize daylight provider: {}", err),
        }
    });

    let store = match store::Store::new(&config.target_dir, config.format) {
        Ok(store) => store,
        Err(err) => panic!(
            "Unable to prepare target directory '{}': {}",
            config.target_dir.display(),
            err
        ),
    };

    let mut scheduler = scheduler::Scheduler::new(
        Box::new(fetcher),
        oracle,
        store,
        config.interval,
        config.light,
    );

    let stop = scheduler.stop_flag();
    ctrlc::set_handler(move || stop.store(true, Ordering::Relaxed))
        .expect("Unable to install interrupt handler");

    log::info!("Grabbing from {}, press CTRL-C to quit", config.url);
    scheduler.run();
}
