use std::io;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info,tower_http=info,axum=info";

/// Output format selected through `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    /// `json` (any case) selects JSON lines; everything else stays compact.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Initialize tracing subscriber with sensible defaults and stdout writer.
/// - Respects `RUST_LOG` if set
/// - Falls back to `info,tower_http=info,axum=info`
pub fn init_logging_default() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// Initialize tracing subscriber with JSON structured output, one object per line.
pub fn init_logging_json() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .json()
        .with_writer(io::stdout)
        .try_init();
}

/// Pick the format from `LOG_FORMAT` and install the global subscriber.
/// Calling it twice is harmless; the second install is ignored.
pub fn init_from_env() -> LogFormat {
    let format = LogFormat::parse(std::env::var("LOG_FORMAT").ok().as_deref());
    match format {
        LogFormat::Compact => init_logging_default(),
        LogFormat::Json => init_logging_json(),
    }
    format
}

#[cfg(test)]
mod tests {
    use super::LogFormat;

    #[test]
    fn json_is_case_insensitive() {
        assert_eq!(LogFormat::parse(Some("JSON")), LogFormat::Json);
        assert_eq!(LogFormat::parse(Some(" json ")), LogFormat::Json);
    }

    #[test]
    fn unknown_or_missing_falls_back_to_compact() {
        assert_eq!(LogFormat::parse(None), LogFormat::Compact);
        assert_eq!(LogFormat::parse(Some("pretty")), LogFormat::Compact);
    }
}
