use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "webhook-router/1.0";

#[derive(Debug, Clone)]
pub struct ForwarderConfig {
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl ForwarderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ForwarderConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
