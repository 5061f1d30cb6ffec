//! Compiler configuration.

use serde::{Deserialize, Serialize};

use crate::error::{CriteriaError, CriteriaResult};
use crate::types::ScoreMode;

/// Configuration for [`CriteriaQueryCompiler`](crate::search::CriteriaQueryCompiler).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Score accumulation for nested envelopes (default: `avg`).
    #[serde(default = "default_nested_score_mode")]
    pub nested_score_mode: ScoreMode,

    /// Analyze wildcard terms in CONTAINS/STARTS_WITH/ENDS_WITH queries
    /// (default: true).
    #[serde(default = "default_analyze_wildcard")]
    pub analyze_wildcard: bool,

    /// Edit distance forwarded to FUZZY leaves, e.g. `"AUTO"` or `"2"`.
    /// The engine default applies when unset.
    #[serde(default)]
    pub fuzziness: Option<String>,

    /// Score mode for HAS_CHILD when the relationship names none
    /// (default: `none`).
    #[serde(default)]
    pub child_score_mode: ScoreMode,

    /// Maximum sub-criteria and relationship nesting depth (default: 32).
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_nested_score_mode() -> ScoreMode {
    ScoreMode::Avg
}

fn default_analyze_wildcard() -> bool {
    true
}

fn default_max_depth() -> usize {
    32
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            nested_score_mode: default_nested_score_mode(),
            analyze_wildcard: default_analyze_wildcard(),
            fuzziness: None,
            child_score_mode: ScoreMode::default(),
            max_depth: default_max_depth(),
        }
    }
}

impl CompilerConfig {
    /// Parses and validates a configuration from JSON. Missing keys take
    /// their defaults.
    pub fn from_json_str(source: &str) -> CriteriaResult<Self> {
        let config: CompilerConfig =
            serde_json::from_str(source).map_err(|e| CriteriaError::InvalidConfig {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for values the compiler cannot work with.
    pub fn validate(&self) -> CriteriaResult<()> {
        if self.max_depth == 0 {
            return Err(CriteriaError::InvalidConfig {
                message: "max_depth must be at least 1".to_string(),
            });
        }
        if let Some(ref fuzziness) = self.fuzziness {
            if fuzziness.trim().is_empty() {
                return Err(CriteriaError::InvalidConfig {
                    message: "fuzziness must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CompilerConfig::default();
        assert_eq!(config.nested_score_mode, ScoreMode::Avg);
        assert!(config.analyze_wildcard);
        assert_eq!(config.fuzziness, None);
        assert_eq!(config.child_score_mode, ScoreMode::None);
        assert_eq!(config.max_depth, 32);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = CompilerConfig::from_json_str(r#"{ "fuzziness": "AUTO" }"#).unwrap();
        assert_eq!(config.fuzziness.as_deref(), Some("AUTO"));
        assert_eq!(config.max_depth, 32);
        assert_eq!(config.nested_score_mode, ScoreMode::Avg);
    }

    #[test]
    fn test_from_json_parses_score_modes() {
        let config = CompilerConfig::from_json_str(
            r#"{ "nested_score_mode": "max", "child_score_mode": "sum" }"#,
        )
        .unwrap();
        assert_eq!(config.nested_score_mode, ScoreMode::Max);
        assert_eq!(config.child_score_mode, ScoreMode::Sum);
    }

    #[test]
    fn test_invalid_config() {
        let err = CompilerConfig::from_json_str(r#"{ "max_depth": 0 }"#).unwrap_err();
        assert!(matches!(err, CriteriaError::InvalidConfig { .. }));
        assert!(!err.is_query_error());

        let err = CompilerConfig::from_json_str(r#"{ "fuzziness": " " }"#).unwrap_err();
        assert!(matches!(err, CriteriaError::InvalidConfig { .. }));

        let err = CompilerConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, CriteriaError::InvalidConfig { .. }));
    }
}
