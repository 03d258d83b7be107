//! Logging setup
//!
//! Provider plugins talk to Terraform over stdout, so logs always go to
//! stderr. The filter comes from `KION_LOG` (full `EnvFilter` syntax), then
//! from Terraform's `TF_LOG` level, and defaults to `warn`.

use tracing::Level;
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "warn";

/// Map a `TF_LOG` value onto a tracing level
fn tf_log_level(value: &str) -> Option<Level> {
    match value.trim().to_ascii_uppercase().as_str() {
        "TRACE" | "JSON" => Some(Level::TRACE),
        "DEBUG" => Some(Level::DEBUG),
        "INFO" => Some(Level::INFO),
        "WARN" => Some(Level::WARN),
        "ERROR" => Some(Level::ERROR),
        _ => None,
    }
}

fn filter_directive(kion_log: Option<&str>, tf_log: Option<&str>) -> String {
    if let Some(directive) = kion_log.filter(|d| !d.trim().is_empty()) {
        return directive.to_string();
    }
    tf_log
        .and_then(tf_log_level)
        .map(|level| level.to_string().to_lowercase())
        .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string())
}

/// Install the global subscriber. Calling it again is harmless.
pub fn init() {
    let kion_log = std::env::var("KION_LOG").ok();
    let tf_log = std::env::var("TF_LOG").ok();
    let directive = filter_directive(kion_log.as_deref(), tf_log.as_deref());

    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|err| {
        eprintln!("Ignoring invalid log filter {:?}: {}", directive, err);
        EnvFilter::new(DEFAULT_DIRECTIVE)
    });

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("kion-client logging initialised with filter: {}", directive);
    }
}
