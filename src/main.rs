use anyhow::{Context, Result};
use metar_monitor::airport_data::{AirportDataManager, AirportStatus};
use metar_monitor::config::MonitorConfig;
use metar_monitor::modes::{self, DisplayMode};
use metar_monitor::status::StatusColor;
use std::thread;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(config: &MonitorConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .with_context(|| format!("Invalid log level '{}'", config.logging.level))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    Ok(())
}

fn colored(color: StatusColor, text: &str) -> String {
    format!("{}{}{}", color.ansi(), text, StatusColor::reset())
}

fn print_status(status: &AirportStatus) {
    let headline = format!(
        "{} ({}): {}{}",
        status.icao, status.name, status.category, status.warning
    );
    println!("  {}", colored(status.color, &headline));

    if let Some(raw) = &status.raw_metar {
        println!("    {raw}");
    }

    for (hours, snapshot) in &status.taf.forecasts {
        println!(
            "    +{hours:>2}h: {}{}",
            colored(snapshot.color, &snapshot.summary),
            snapshot.warning
        );
    }
}

fn print_mode_view(mode: DisplayMode, statuses: &[AirportStatus], visited: &[String]) {
    println!(
        "{} view",
        colored(mode.indicator_color(), &mode.to_string())
    );

    for status in statuses {
        let color = modes::color_for_mode(mode, status, visited);
        println!("  {}", colored(color, &status.icao));
    }
}

fn main() -> Result<()> {
    let config = MonitorConfig::load()?;
    init_logging(&config)?;

    info!("Starting metar-monitor v{}", metar_monitor::VERSION);

    let interval = Duration::from_secs(config.update_interval_seconds);
    let forecast_hours = config.forecast_hours.clone();
    let visited = config.visited_airports.clone();
    let mut manager = AirportDataManager::new(config)?;
    let mut mode = DisplayMode::Metar;

    loop {
        if !manager.update() {
            error!("Update cycle degraded; displaying whatever data arrived");
        }

        println!();
        for status in manager.statuses() {
            print_status(status);
        }

        println!();
        print_mode_view(mode, manager.statuses(), &visited);
        mode = mode.next(&forecast_hours);

        info!(
            "Next update in {} seconds",
            interval.as_secs()
        );
        thread::sleep(interval);
    }
}
