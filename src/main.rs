use anyhow::Result;
use chrono::Local;
use iot_sensor_sim::config::Config;
use iot_sensor_sim::session::Session;
use iot_sensor_sim::telemetry::init_tracing;
use tracing::info;

fn main() -> Result<()> {
    init_tracing();

    let cfg = Config::load()?;

    let mut session = Session::new();
    session.apply_sensor_settings(cfg.sensors.settings());
    session.generate(&cfg.generator);
    session.save(&cfg.data.csv_path)?;

    let anchor = cfg
        .chart
        .anchor
        .clone()
        .unwrap_or_else(|| Local::now().date_naive().format("%Y-%m-%d").to_string());

    let result = session.render(cfg.chart.granularity, &anchor)?;

    info!(
        granularity = %cfg.chart.granularity,
        anchor = %anchor,
        energy_kwh = result.totals.energy_kwh,
        hot_water_l = result.totals.hot_water_l,
        cold_water_l = result.totals.cold_water_l,
        "window aggregated"
    );

    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}
