//! Collector endpoint and Wi-Fi credentials are resolved at compile time
//! (`option_env!`); the resulting [`ReporterConfig`] value is injected into
//! the constructors once at boot.

// 30s: per-attempt budget for one authenticate-and-associate try.
pub const LINK_CONNECT_TIMEOUT_MS: u32 = 30_000;
// Fixed pacing between failed attempts; no ceiling, no exponential growth.
pub const LINK_RETRY_PACING_MS: u32 = 5_000;

// Fast cadence while the collector answers, slower while it does not.
pub const REPORT_COOLDOWN_NORMAL_MS: u32 = 1_000;
pub const REPORT_COOLDOWN_EXTENDED_MS: u32 = 5_000;

// Upper bound for the encoded request path, query string included.
pub const URL_PATH_MAX: usize = 256;

pub const STATS_LOG_EVERY_CYCLES: u32 = 60;

const COLLECTOR_HOST_DEFAULT: &str = "192.168.0.130";
const COLLECTOR_PORT_DEFAULT: u16 = 3000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReporterConfig {
    pub collector_host: &'static str,
    pub collector_port: u16,
    pub wifi_ssid: &'static str,
    pub wifi_password: &'static str,
}

impl ReporterConfig {
    pub fn compiled() -> Self {
        // An unparseable port is operator input; fall back instead of
        // failing the boot.
        let collector_port = option_env!("PADLOG_COLLECTOR_PORT")
            .and_then(|raw| raw.parse::<u16>().ok())
            .unwrap_or(COLLECTOR_PORT_DEFAULT);

        Self {
            collector_host: option_env!("PADLOG_COLLECTOR_HOST").unwrap_or(COLLECTOR_HOST_DEFAULT),
            collector_port,
            wifi_ssid: option_env!("PADLOG_WIFI_SSID")
                .or(option_env!("SSID"))
                .unwrap_or(""),
            wifi_password: option_env!("PADLOG_WIFI_PASSWORD")
                .or(option_env!("PASSWORD"))
                .unwrap_or(""),
        }
    }
}
