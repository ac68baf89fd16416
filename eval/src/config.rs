//! Transduce configuration merging.
//!
//! Applies case-specific overrides to the default transduce configuration.

use anyhow::Result;
use transduce::io::config::TransduceConfig;

use crate::case::CaseConfig;

/// Apply case configuration overrides to the base config.
pub fn apply_case_config(
    mut base: TransduceConfig,
    overrides: &CaseConfig,
) -> Result<TransduceConfig> {
    if let Some(max_input_len) = overrides.max_input_len {
        base.max_input_len = max_input_len;
    }
    base.validate()?;
    Ok(base)
}
