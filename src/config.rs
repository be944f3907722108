use figment::Figment;
use figment::providers::Env;
use std::sync::OnceLock;

static CONFIG: OnceLock<Figment> = OnceLock::new();

/// Configuration from `DERMADETECT_`-prefixed environment variables.
pub fn get_config() -> &'static Figment {
    CONFIG.get_or_init(|| Figment::new().merge(Env::prefixed("DERMADETECT_")))
}
