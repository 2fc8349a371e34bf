//! Per-job processing options.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Options supplied at submission time that shape the pipeline.
///
/// The translation stage runs only when `target_language` is set; the
/// embedding stage runs only when `burn_in` is true.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProcessingOptions {
    /// Language the transcript should be translated into.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_language: Option<String>,

    /// Whether subtitles should be burned into the source video.
    #[serde(default)]
    pub burn_in: bool,
}

impl ProcessingOptions {
    pub fn wants_translation(&self) -> bool {
        self.target_language.is_some()
    }

    pub fn wants_burn_in(&self) -> bool {
        self.burn_in
    }
}
