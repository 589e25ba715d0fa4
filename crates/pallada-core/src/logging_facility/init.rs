//! Logging initialization module

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output for development
    Development,
    /// JSON structured output for production
    Production,
    /// No output; tests install their own capture layer
    Test,
}

impl Profile {
    fn default_directive(self) -> &'static str {
        match self {
            Profile::Development => "pallada=debug",
            Profile::Production | Profile::Test => "pallada=info",
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility with the profile's default filter.
///
/// `RUST_LOG` takes precedence over the profile default when set.
/// Only the first call has any effect.
pub fn init(profile: Profile) {
    init_with_filter(profile, None);
}

/// Initialize the logging facility with an explicit filter directive
/// (e.g. `"pallada=trace"`), falling back to `RUST_LOG` and then the
/// profile default.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init_with_filter(profile: Profile, directive: Option<&str>) {
    INIT_ONCE.call_once(|| {
        let filter = match directive {
            Some(d) => EnvFilter::new(d),
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(profile.default_directive())),
        };
        match profile {
            Profile::Development => {
                tracing_subscriber::fmt()
                    .with_writer(std::io::stderr)
                    .with_env_filter(filter)
                    .init();
            }
            Profile::Production => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_env_filter(filter)
                    .init();
            }
            Profile::Test => {
                tracing_subscriber::registry().init();
            }
        }
    });
}
