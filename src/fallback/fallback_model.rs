use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_SAFE_ASSET;

/// What to do with a holding whose price floor breaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackStrategy {
    /// Liquidate the breached holding to cash.
    #[default]
    HoldCash,
    /// Switch into the designated safe asset.
    SwitchSafe,
    /// Switch into the strongest-trending other holding.
    SwitchBest,
}

/// Per-user fallback configuration, mutated only via an explicit settings
/// update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackPolicy {
    pub strategy: FallbackStrategy,
    pub safe_asset: Option<String>,
}

impl FallbackPolicy {
    /// The switch target used by the safe-asset branches: the configured
    /// asset uppercased, or the default when none is set.
    pub fn safe_target(&self) -> String {
        self.safe_asset
            .as_deref()
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SAFE_ASSET.to_string())
    }
}

/// The decision record handed back to the caller. Executing the trade is the
/// holdings module's concern; this type mutates nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FallbackDecision {
    Liquidate,
    Switch { target: String },
}
