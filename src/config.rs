use crate::domain::SensorKind;
use crate::simulation::GeneratorConfig;
use crate::window::Granularity;
use anyhow::Result;
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    pub sensors: SensorToggles,
    pub chart: ChartConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig { pub csv_path: String }

#[derive(Debug, Clone, Deserialize)]
pub struct SensorToggles {
    pub energy: bool,
    pub hot_water: bool,
    pub cold_water: bool,
    pub temperature: bool,
    pub humidity: bool,
}

impl SensorToggles {
    pub fn settings(&self) -> Vec<(SensorKind, bool)> {
        vec![
            (SensorKind::Energy, self.energy),
            (SensorKind::HotWater, self.hot_water),
            (SensorKind::ColdWater, self.cold_water),
            (SensorKind::Temperature, self.temperature),
            (SensorKind::Humidity, self.humidity),
        ]
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    pub granularity: Granularity,
    pub anchor: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("IOTSIM__").split("__"));
        Ok(figment.extract()?)
    }
}
