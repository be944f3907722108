//! dermadetect settings, which are configurable using environment variables.
use camino::Utf8PathBuf;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct DermaSettings {
    /// Base URL of the DermaDetect backend. Only required by operations which make requests.
    #[serde(default)]
    pub api_url: Option<String>,
    /// Give up on a request after this long. Unset means wait indefinitely.
    #[serde(default, with = "humantime_serde")]
    pub request_timeout: Option<Duration>,
    /// Where downloaded reports are saved.
    #[serde(default = "default_output_dir")]
    pub output_dir: Utf8PathBuf,
}

fn default_output_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Figment;
    use figment::providers::Env;

    fn extract() -> DermaSettings {
        Figment::new()
            .merge(Env::prefixed("DERMADETECT_"))
            .extract()
            .unwrap()
    }

    #[test]
    fn test_settings_from_env() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("DERMADETECT_API_URL", "http://derma.local:8000");
            jail.set_env("DERMADETECT_REQUEST_TIMEOUT", "30s");
            jail.set_env("DERMADETECT_OUTPUT_DIR", "/tmp/reports");
            let settings = extract();
            assert_eq!(settings.api_url.as_deref(), Some("http://derma.local:8000"));
            assert_eq!(settings.request_timeout, Some(Duration::from_secs(30)));
            assert_eq!(settings.output_dir, Utf8PathBuf::from("/tmp/reports"));
            Ok(())
        });
    }

    #[test]
    fn test_settings_defaults() {
        figment::Jail::expect_with(|_jail| {
            let settings = extract();
            assert!(settings.api_url.is_none());
            assert!(settings.request_timeout.is_none());
            assert_eq!(settings.output_dir, Utf8PathBuf::from("."));
            Ok(())
        });
    }
}
