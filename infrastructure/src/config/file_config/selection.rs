//! Selection configuration from TOML (`[selection]` section)

use marquee_application::SelectionConfig;
use marquee_domain::{
    ConfigIssue, ConfigIssueCode, DEFAULT_RUNOFF_ALTERNATIONS, SelectionMethod,
    normalize_alternations,
};
use serde::{Deserialize, Serialize};

/// Raw selection configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSelectionConfig {
    /// Method name: score, loved, approval, battle, roulette, decider
    pub method: String,
    /// Drop disliked nominations before selecting
    pub filter_dislikes: bool,
    /// Runoff highlight alternations in a battle royale
    pub runoff_alternations: usize,
    /// Fixed seed for reproducible runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for FileSelectionConfig {
    fn default() -> Self {
        Self {
            method: "score".to_string(),
            filter_dislikes: false,
            runoff_alternations: DEFAULT_RUNOFF_ALTERNATIONS,
            seed: None,
        }
    }
}

impl FileSelectionConfig {
    /// Parse method string into SelectionMethod
    pub fn parse_method(&self) -> (SelectionMethod, Vec<ConfigIssue>) {
        match self.method.parse::<SelectionMethod>() {
            Ok(method) => (method, vec![]),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "selection.method".to_string(),
                        value: self.method.clone(),
                        valid_values: SelectionMethod::NAMES.iter().map(|s| s.to_string()).collect(),
                    },
                    format!(
                        "selection.method: unknown value '{}', falling back to 'score'",
                        self.method
                    ),
                );
                (SelectionMethod::default(), vec![issue])
            }
        }
    }

    /// Runoff alternations rounded up to an even count of at least 2
    pub fn parse_runoff_alternations(&self) -> (usize, Vec<ConfigIssue>) {
        let effective = normalize_alternations(self.runoff_alternations);
        if effective == self.runoff_alternations {
            return (effective, vec![]);
        }
        let issue = ConfigIssue::warning(
            ConfigIssueCode::UnevenRunoffAlternations {
                configured: self.runoff_alternations,
                effective,
            },
            format!(
                "selection.runoff_alternations: {} is not an even number of at least 2, using {}",
                self.runoff_alternations, effective
            ),
        );
        (effective, vec![issue])
    }

    /// Build the application-level config, collecting issues
    pub fn to_selection_config(&self) -> (SelectionConfig, Vec<ConfigIssue>) {
        let (method, mut issues) = self.parse_method();
        let (alternations, alt_issues) = self.parse_runoff_alternations();
        issues.extend(alt_issues);

        let config = SelectionConfig::default()
            .with_method(method)
            .with_filter_dislikes(self.filter_dislikes)
            .with_runoff_alternations(alternations)
            .with_seed(self.seed);
        (config, issues)
    }
}
