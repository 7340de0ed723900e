use std::{collections::HashMap, fs, path::Path};

use anyhow::Context;
use contact::relay::EMAILJS_SEND_ENDPOINT;
use shared::{content::RECIPIENT_ADDRESS, protocol::RelayCredentials};
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "portfolio.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub relay: RelayCredentials,
    pub relay_endpoint: String,
    pub recipient_address: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            relay: RelayCredentials::default(),
            relay_endpoint: EMAILJS_SEND_ENDPOINT.into(),
            recipient_address: RECIPIENT_ADDRESS.into(),
        }
    }
}

impl Settings {
    pub fn relay_endpoint_url(&self) -> anyhow::Result<Url> {
        Url::parse(&self.relay_endpoint)
            .with_context(|| format!("invalid relay endpoint '{}'", self.relay_endpoint))
    }
}

/// File values first, then environment. Missing relay credentials are left
/// empty; the relay reports them when a message is sent.
pub fn load_settings(path: &Path) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        apply_file(&mut settings, &raw);
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());

    settings
}

fn apply_file(settings: &mut Settings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) else {
        tracing::warn!("ignoring malformed settings file");
        return;
    };

    if let Some(v) = file_cfg.get("emailjs_service_id") {
        settings.relay.service_id = v.clone();
    }
    if let Some(v) = file_cfg.get("emailjs_template_id") {
        settings.relay.template_id = v.clone();
    }
    if let Some(v) = file_cfg.get("emailjs_public_key") {
        settings.relay.public_key = v.clone();
    }
    if let Some(v) = file_cfg.get("relay_endpoint") {
        settings.relay_endpoint = v.clone();
    }
    if let Some(v) = file_cfg.get("recipient_address") {
        settings.recipient_address = v.clone();
    }
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    for key in ["VITE_EMAILJS_SERVICE_ID", "APP__EMAILJS_SERVICE_ID"] {
        if let Some(v) = lookup(key) {
            settings.relay.service_id = v;
        }
    }
    for key in ["VITE_EMAILJS_TEMPLATE_ID", "APP__EMAILJS_TEMPLATE_ID"] {
        if let Some(v) = lookup(key) {
            settings.relay.template_id = v;
        }
    }
    for key in ["VITE_EMAILJS_PUBLIC_KEY", "APP__EMAILJS_PUBLIC_KEY"] {
        if let Some(v) = lookup(key) {
            settings.relay.public_key = v;
        }
    }
    if let Some(v) = lookup("APP__RELAY_ENDPOINT") {
        settings.relay_endpoint = v;
    }
    if let Some(v) = lookup("APP__RECIPIENT_ADDRESS") {
        settings.recipient_address = v;
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let pairs: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| pairs.get(key).cloned()
    }

    #[test]
    fn defaults_point_at_hosted_relay_and_static_recipient() {
        let settings = Settings::default();
        assert_eq!(settings.relay_endpoint, EMAILJS_SEND_ENDPOINT);
        assert_eq!(settings.recipient_address, RECIPIENT_ADDRESS);
        assert!(settings.relay.service_id.is_empty());
        settings.relay_endpoint_url().expect("default endpoint parses");
    }

    #[test]
    fn reads_credentials_from_settings_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "emailjs_service_id = \"service_file\"\n\
             emailjs_template_id = \"template_file\"\n\
             emailjs_public_key = \"pk_file\"\n\
             recipient_address = \"me@example.com\""
        )
        .expect("write settings");

        let settings = load_settings(file.path());

        assert_eq!(settings.relay.service_id, "service_file");
        assert_eq!(settings.relay.template_id, "template_file");
        assert_eq!(settings.relay.public_key, "pk_file");
        assert_eq!(settings.recipient_address, "me@example.com");
    }

    #[test]
    fn environment_overrides_file_and_app_prefix_wins() {
        let mut settings = Settings::default();
        apply_file(&mut settings, "emailjs_service_id = \"service_file\"");
        apply_env(
            &mut settings,
            env_from(&[
                ("VITE_EMAILJS_SERVICE_ID", "service_vite"),
                ("APP__EMAILJS_SERVICE_ID", "service_app"),
                ("VITE_EMAILJS_PUBLIC_KEY", "pk_vite"),
                ("APP__RELAY_ENDPOINT", "http://127.0.0.1:9/send"),
            ]),
        );

        assert_eq!(settings.relay.service_id, "service_app");
        assert_eq!(settings.relay.public_key, "pk_vite");
        assert_eq!(settings.relay_endpoint, "http://127.0.0.1:9/send");
    }

    #[test]
    fn malformed_file_is_ignored() {
        let mut settings = Settings::default();
        apply_file(&mut settings, "this is = = not toml");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn rejects_unparseable_endpoint() {
        let settings = Settings {
            relay_endpoint: "not a url".into(),
            ..Settings::default()
        };
        assert!(settings.relay_endpoint_url().is_err());
    }
}
