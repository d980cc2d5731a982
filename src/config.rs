use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    pub upstream: UpstreamConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct UpstreamConfig {
    pub api_url: String,
    /// Per-request timeout, in seconds, applied to every upstream call.
    pub timeout: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_parses() {
        let config: Config = toml::from_str(include_str!("../config/config.toml"))
            .expect("embedded config must parse");
        assert!(config.upstream.api_url.starts_with("http"));
        assert!(config.upstream.timeout > 0);
    }
}
