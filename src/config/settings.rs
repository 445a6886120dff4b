use serde::Deserialize;

/// Top-level configuration settings for the relay.
///
/// Groups the device identity, listener, spool, delivery, scheduling and
/// logging settings.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub device: DeviceSettings,
    pub server: ServerSettings,
    pub spool: SpoolSettings,
    pub delivery: DeliverySettings,
    pub schedule: ScheduleSettings,
    pub log: LogSettings,
}

/// Identity of this relay; used as the source of counter reports and as the
/// MQTT client id.
#[derive(Debug, Deserialize, Clone)]
pub struct DeviceSettings {
    pub name: String,
}

/// Inbound listener settings: bind host and the two submission ports.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub http_port: u16,
    pub udp_port: u16,
}

/// Where the on-disk queue lives.
#[derive(Debug, Deserialize, Clone)]
pub struct SpoolSettings {
    pub directory: String,
}

/// Outbound transport settings.
///
/// Leaving `gateway_url` or `mqtt_host` unset disables that transport
/// without failing startup.
#[derive(Debug, Deserialize, Clone)]
pub struct DeliverySettings {
    pub gateway_url: Option<String>,
    pub api_key: Option<String>,
    pub success_status: u16,
    pub mqtt_host: Option<String>,
    pub mqtt_port: u16,
    pub send_timeout_secs: u64,
}

/// Intervals of the two periodic tasks.
#[derive(Debug, Deserialize, Clone)]
pub struct ScheduleSettings {
    pub sweep_interval_secs: u64,
    pub report_interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Default, Deserialize)]
pub struct PartialSettings {
    pub device: Option<PartialDeviceSettings>,
    pub server: Option<PartialServerSettings>,
    pub spool: Option<PartialSpoolSettings>,
    pub delivery: Option<PartialDeliverySettings>,
    pub schedule: Option<PartialScheduleSettings>,
    pub log: Option<PartialLogSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialDeviceSettings {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub http_port: Option<u16>,
    pub udp_port: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct PartialSpoolSettings {
    pub directory: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PartialDeliverySettings {
    pub gateway_url: Option<String>,
    pub api_key: Option<String>,
    pub success_status: Option<u16>,
    pub mqtt_host: Option<String>,
    pub mqtt_port: Option<u16>,
    pub send_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct PartialScheduleSettings {
    pub sweep_interval_secs: Option<u64>,
    pub report_interval_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLogSettings {
    pub level: Option<String>,
}

/// Provides default values for `Settings`.
///
/// Ensures the relay can start with no configuration at all; with the
/// defaults it spools locally and has no transports configured.
impl Default for Settings {
    fn default() -> Self {
        Self {
            device: DeviceSettings {
                name: "edge-relay".to_string(),
            },
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                http_port: 3553,
                udp_port: 54545,
            },
            spool: SpoolSettings {
                directory: "/var/spool/edgerelay".to_string(),
            },
            delivery: DeliverySettings {
                gateway_url: None,
                api_key: None,
                success_status: 202,
                mqtt_host: None,
                mqtt_port: 1883,
                send_timeout_secs: 2,
            },
            schedule: ScheduleSettings {
                sweep_interval_secs: 60,
                report_interval_secs: 60,
            },
            log: LogSettings {
                level: "info".to_string(),
            },
        }
    }
}
