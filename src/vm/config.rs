use serde::Deserialize;

/// Tunable runtime limits. Loaded from TOML, with environment overrides
/// (optionally via a `.env` file) applied on top.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct VmConfig {
    /// Global cap on dispatched instructions per VM lifetime tick counter.
    pub step_limit: u64,
    /// Hard bound on ancestor-chain walks.
    pub ancestor_limit: usize,
    /// Maximum simultaneously active scopes.
    pub max_call_depth: usize,
    /// Digits shown when formatting floats for `put`.
    pub float_precision: u8,
}

impl Default for VmConfig {
    fn default() -> Self {
        VmConfig {
            step_limit: 10_000_000,
            ancestor_limit: 100,
            max_call_depth: 50,
            float_precision: 4,
        }
    }
}

impl VmConfig {
    pub fn from_toml(text: &str) -> Result<VmConfig, toml::de::Error> {
        let mut config: VmConfig = toml::from_str(text)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Reads overrides from the process environment, loading a `.env` file
    /// first when one is present.
    pub fn apply_env_overrides(&mut self) {
        let _ = dotenvy::dotenv();
        if let Some(v) = env_parse("SHOCKVM_STEP_LIMIT") {
            self.step_limit = v;
        }
        if let Some(v) = env_parse("SHOCKVM_ANCESTOR_LIMIT") {
            self.ancestor_limit = v;
        }
        if let Some(v) = env_parse("SHOCKVM_CALL_DEPTH") {
            self.max_call_depth = v;
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
