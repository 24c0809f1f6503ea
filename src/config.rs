use std::net::SocketAddr;

use reqwest::Url;

use crate::forwarder::ForwarderConfig;
use crate::log_store::DEFAULT_LOG_CAPACITY;
use crate::types::ForwardTarget;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

const DEFAULT_FACEBOOK_TARGETS: &[&str] = &[
    "https://bo.ge/facebook/hook/facebook",
    "https://omni.bo.ge/",
];

const DEFAULT_INSTAGRAM_TARGETS: &[&str] = &[
    "https://bo.ge/instagram/hook/instagram",
    "https://omni.bo.ge/instagram",
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid bind address: {value}")]
    BindAddr { var: &'static str, value: String },
    #[error("{var} is not a valid forward target list: {reason}")]
    Targets { var: &'static str, reason: String },
}

#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    pub forward_targets: Vec<ForwardTarget>,
    pub verify_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub bind_addr: SocketAddr,
    pub log_capacity: usize,
    pub inspector_api_token: Option<String>,
    pub forwarder: ForwarderConfig,
    pub facebook: ProviderSettings,
    pub instagram: ProviderSettings,
}

impl RouterConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source. Malformed
    /// numbers fall back to their defaults; malformed addresses and target
    /// lists are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_raw = non_empty(lookup("ROUTER_BIND_ADDR"))
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::BindAddr {
                var: "ROUTER_BIND_ADDR",
                value: bind_raw.clone(),
            })?;

        let mut log_capacity = DEFAULT_LOG_CAPACITY;
        if let Some(value) = lookup("LOG_CAPACITY")
            && let Ok(parsed) = value.trim().parse::<usize>()
        {
            log_capacity = parsed.max(1);
        }

        let mut forwarder = ForwarderConfig::default();
        if let Some(value) = lookup("FORWARD_TIMEOUT_MS")
            && let Ok(parsed) = value.trim().parse::<u64>()
        {
            forwarder.timeout_ms = parsed.max(1);
        }
        if let Some(value) = non_empty(lookup("FORWARD_USER_AGENT")) {
            forwarder.user_agent = value;
        }

        let facebook = ProviderSettings {
            forward_targets: targets_from(
                "FACEBOOK_FORWARD_TARGETS",
                lookup("FACEBOOK_FORWARD_TARGETS"),
                DEFAULT_FACEBOOK_TARGETS,
            )?,
            verify_token: non_empty(lookup("FACEBOOK_VERIFY_TOKEN")),
        };
        let instagram = ProviderSettings {
            forward_targets: targets_from(
                "INSTAGRAM_FORWARD_TARGETS",
                lookup("INSTAGRAM_FORWARD_TARGETS"),
                DEFAULT_INSTAGRAM_TARGETS,
            )?,
            verify_token: non_empty(lookup("INSTAGRAM_VERIFY_TOKEN")),
        };

        Ok(Self {
            bind_addr,
            log_capacity,
            inspector_api_token: non_empty(lookup("INSPECTOR_API_TOKEN")),
            forwarder,
            facebook,
            instagram,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn targets_from(
    var: &'static str,
    raw: Option<String>,
    defaults: &[&str],
) -> Result<Vec<ForwardTarget>, ConfigError> {
    match non_empty(raw) {
        Some(raw) => parse_targets(&raw).map_err(|reason| ConfigError::Targets { var, reason }),
        None => Ok(defaults.iter().map(|url| ForwardTarget::new(*url)).collect()),
    }
}

/// Accepts either a JSON array of targets or a comma-separated list of URLs.
fn parse_targets(raw: &str) -> Result<Vec<ForwardTarget>, String> {
    let targets: Vec<ForwardTarget> = if raw.starts_with('[') {
        serde_json::from_str(raw).map_err(|err| err.to_string())?
    } else {
        raw.split(',')
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(ForwardTarget::new)
            .collect()
    };

    for target in &targets {
        let url = Url::parse(&target.url).map_err(|err| format!("{}: {err}", target.url))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(format!("{}: scheme must be http or https", target.url));
        }
    }

    Ok(targets)
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<RouterConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        RouterConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config_from(&[]).expect("config");

        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.log_capacity, DEFAULT_LOG_CAPACITY);
        assert_eq!(config.forwarder.timeout_ms, 10_000);
        assert_eq!(config.facebook.forward_targets.len(), 2);
        assert_eq!(config.instagram.forward_targets.len(), 2);
        assert!(config.facebook.verify_token.is_none());
        assert!(config.inspector_api_token.is_none());
    }

    #[test]
    fn comma_separated_targets() {
        let config = config_from(&[(
            "FACEBOOK_FORWARD_TARGETS",
            "https://a.example.com/hook, http://b.example.com/hook,",
        )])
        .expect("config");

        let urls: Vec<&str> = config
            .facebook
            .forward_targets
            .iter()
            .map(|target| target.url.as_str())
            .collect();
        assert_eq!(urls, vec!["https://a.example.com/hook", "http://b.example.com/hook"]);
    }

    #[test]
    fn json_targets_keep_headers() {
        let config = config_from(&[(
            "INSTAGRAM_FORWARD_TARGETS",
            r#"[{"url":"https://a.example.com/ig","headers":{"authorization":"Bearer x"}}]"#,
        )])
        .expect("config");

        let target = &config.instagram.forward_targets[0];
        assert_eq!(target.url, "https://a.example.com/ig");
        assert_eq!(
            target.headers.get("authorization").map(String::as_str),
            Some("Bearer x")
        );
    }

    #[test]
    fn invalid_targets_are_rejected() {
        let err = config_from(&[("FACEBOOK_FORWARD_TARGETS", "ftp://files.example.com")])
            .expect_err("scheme must be rejected");
        assert!(matches!(
            err,
            ConfigError::Targets {
                var: "FACEBOOK_FORWARD_TARGETS",
                ..
            }
        ));

        assert!(config_from(&[("INSTAGRAM_FORWARD_TARGETS", "[{\"nope\":1}]")]).is_err());
    }

    #[test]
    fn malformed_numbers_fall_back_and_tokens_trim() {
        let config = config_from(&[
            ("LOG_CAPACITY", "lots"),
            ("FORWARD_TIMEOUT_MS", "0"),
            ("FACEBOOK_VERIFY_TOKEN", "  verify-me  "),
            ("INSPECTOR_API_TOKEN", "   "),
        ])
        .expect("config");

        assert_eq!(config.log_capacity, DEFAULT_LOG_CAPACITY);
        assert_eq!(config.forwarder.timeout_ms, 1);
        assert_eq!(config.facebook.verify_token.as_deref(), Some("verify-me"));
        assert!(config.inspector_api_token.is_none());
    }

    #[test]
    fn bad_bind_address_is_an_error() {
        assert!(matches!(
            config_from(&[("ROUTER_BIND_ADDR", "localhost")]),
            Err(ConfigError::BindAddr { .. })
        ));
    }
}
