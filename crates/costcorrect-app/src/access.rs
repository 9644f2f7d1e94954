//! Subscription tier gate
//!
//! Multi-floor analysis and cost estimation are Pro features.

use costcorrect_types::{Error, Result, Tier};

pub const UPGRADE_MESSAGE: &str =
    "Multi-floor analysis and cost estimation are Pro features. Please upgrade your account.";

/// Check that `tier` may request `floors` and cost estimation
pub fn authorize(tier: Tier, floors: u32, estimate_prices: bool) -> Result<()> {
    if tier == Tier::Free && (floors > 1 || estimate_prices) {
        return Err(Error::PaymentRequired(UPGRADE_MESSAGE.to_string()));
    }
    Ok(())
}
