//! Analytics engine configuration.

use serde::{Deserialize, Serialize};

fn default_demo_prefixes() -> Vec<String> {
    vec!["demo-".into(), "demo_".into(), "sample-".into()]
}

const fn default_strict_validation() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Route every learner read to the synthetic generator.
    #[serde(default)]
    pub demo_mode: bool,

    /// Learner ID prefixes that are always served synthetic data.
    #[serde(default = "default_demo_prefixes")]
    pub demo_prefixes: Vec<String>,

    /// Reject inconsistent completion input instead of recording it.
    #[serde(default = "default_strict_validation")]
    pub strict_validation: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            demo_mode: false,
            demo_prefixes: default_demo_prefixes(),
            strict_validation: default_strict_validation(),
        }
    }
}

impl EngineConfig {
    /// Whether `learner_id` is served by the synthetic generator.
    #[must_use]
    pub fn is_demo_learner(&self, learner_id: &str) -> bool {
        self.demo_mode
            || self
                .demo_prefixes
                .iter()
                .any(|prefix| learner_id.starts_with(prefix.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = EngineConfig::default();
        assert!(!config.demo_mode);
        assert!(config.strict_validation);
        assert_eq!(config.demo_prefixes, vec!["demo-", "demo_", "sample-"]);
    }

    #[test]
    fn demo_prefix_classification() {
        let config = EngineConfig::default();
        assert!(config.is_demo_learner("demo-advanced-kid"));
        assert!(config.is_demo_learner("sample-struggling"));
        assert!(!config.is_demo_learner("kid-42"));
        assert!(!config.is_demo_learner("my-demo-kid"));
    }

    #[test]
    fn demo_mode_routes_everyone() {
        let config = EngineConfig {
            demo_mode: true,
            ..Default::default()
        };
        assert!(config.is_demo_learner("kid-42"));
    }
}
