mod settings;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::{
    DeliverySettings, DeviceSettings, LogSettings, ScheduleSettings, ServerSettings, Settings,
    SpoolSettings,
};

/// Loads the configuration from the default file and environment variables.
/// Merges the configuration with default values.
/// Returns a `Settings` struct covering every section of the relay.
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(Environment::default().separator("__"));

    let config = builder.build()?;

    // Try to deserialize what is available, then merge with defaults.
    let partial: PartialSettings = config.try_deserialize()?;
    Ok(merge(partial, Settings::default()))
}

pub(crate) fn merge(partial: PartialSettings, default: Settings) -> Settings {
    let device = partial.device;
    let server = partial.server;
    let spool = partial.spool;
    let delivery = partial.delivery;
    let schedule = partial.schedule;
    let log = partial.log;

    Settings {
        device: DeviceSettings {
            name: device
                .and_then(|d| d.name)
                .unwrap_or(default.device.name),
        },
        server: ServerSettings {
            host: server
                .as_ref()
                .and_then(|s| s.host.clone())
                .unwrap_or(default.server.host),
            http_port: server
                .as_ref()
                .and_then(|s| s.http_port)
                .unwrap_or(default.server.http_port),
            udp_port: server
                .as_ref()
                .and_then(|s| s.udp_port)
                .unwrap_or(default.server.udp_port),
        },
        spool: SpoolSettings {
            directory: spool
                .and_then(|s| s.directory)
                .unwrap_or(default.spool.directory),
        },
        delivery: DeliverySettings {
            gateway_url: delivery
                .as_ref()
                .and_then(|d| d.gateway_url.clone())
                .or(default.delivery.gateway_url),
            api_key: delivery
                .as_ref()
                .and_then(|d| d.api_key.clone())
                .or(default.delivery.api_key),
            success_status: delivery
                .as_ref()
                .and_then(|d| d.success_status)
                .unwrap_or(default.delivery.success_status),
            mqtt_host: delivery
                .as_ref()
                .and_then(|d| d.mqtt_host.clone())
                .or(default.delivery.mqtt_host),
            mqtt_port: delivery
                .as_ref()
                .and_then(|d| d.mqtt_port)
                .unwrap_or(default.delivery.mqtt_port),
            send_timeout_secs: delivery
                .as_ref()
                .and_then(|d| d.send_timeout_secs)
                .unwrap_or(default.delivery.send_timeout_secs),
        },
        schedule: ScheduleSettings {
            sweep_interval_secs: schedule
                .as_ref()
                .and_then(|s| s.sweep_interval_secs)
                .unwrap_or(default.schedule.sweep_interval_secs),
            report_interval_secs: schedule
                .as_ref()
                .and_then(|s| s.report_interval_secs)
                .unwrap_or(default.schedule.report_interval_secs),
        },
        log: LogSettings {
            level: log.and_then(|l| l.level).unwrap_or(default.log.level),
        },
    }
}
