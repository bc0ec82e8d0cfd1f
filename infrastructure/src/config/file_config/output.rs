//! `[output]` section
//!
//! ```toml
//! [output]
//! format = "json"   # text (default) | json
//! color = false     # plain text even on a terminal
//! ```
//!
//! Both keys are defaults only. `--output` replaces `format`, and
//! `--no-color` or `--quiet` win over `color = true`.

use marquee_domain::OutputFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Unset means text, so `marquee config` omits it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
    /// Colored tables and podium highlights
    ///
    /// Only ever turns color off; a terminal without color support stays
    /// plain when this is `true`.
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}
