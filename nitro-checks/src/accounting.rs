//! Balance and gas identities asserted by the scenarios

use alloy::{primitives::U256, rpc::types::TransactionReceipt};
use std::fmt::{Debug, Display};
use tracing::debug;

use crate::error::CheckError;

/// Gas unit constants
pub const GWEI: u64 = 1_000_000_000;

/// Intrinsic gas of a plain value transfer
pub const TRANSFER_GAS: u64 = 21_000;

/// What a transaction cost its sender, as reported by the receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasCharge {
    pub gas_used: u64,
    pub effective_gas_price: u128,
}

impl GasCharge {
    pub fn from_receipt(receipt: &TransactionReceipt) -> Self {
        Self {
            gas_used: receipt.gas_used,
            effective_gas_price: receipt.effective_gas_price,
        }
    }

    /// `gas_used * effective_gas_price`
    pub fn fee(&self) -> U256 {
        U256::from(self.gas_used) * U256::from(self.effective_gas_price)
    }
}

/// Check that the sender's balance dropped by exactly `value_sent + fee`
///
/// A balance that went up is reported as a mismatch rather than wrapping.
pub fn expect_balance_delta(
    before: U256,
    after: U256,
    value_sent: U256,
    charge: GasCharge,
) -> Result<(), CheckError> {
    let spent = before.checked_sub(after).ok_or_else(|| {
        CheckError::mismatch("sender balance after transaction", format!("<= {before}"), after)
    })?;
    let paid_for_gas = spent.checked_sub(value_sent).ok_or_else(|| {
        CheckError::mismatch("balance drop covering the sent value", format!(">= {value_sent}"), spent)
    })?;
    debug!(%spent, %paid_for_gas, fee = %charge.fee(), "Comparing balance delta with receipt fee");
    expect_eq("balance delta minus value vs gasUsed * effectiveGasPrice", charge.fee(), paid_for_gas)
}

/// Check that execution consumed the gas the node estimated
///
/// `tolerance_bps` is how far above `gasUsed` the estimate may be, in basis
/// points of the estimate. Zero requires `gasUsed == estimate`.
pub fn expect_gas_matches_estimate(
    estimate: u64,
    charge: GasCharge,
    tolerance_bps: u64,
) -> Result<(), CheckError> {
    if tolerance_bps == 0 {
        return expect_eq("gasUsed vs eth_estimateGas", estimate, charge.gas_used);
    }
    let overshoot = estimate.checked_sub(charge.gas_used).ok_or_else(|| {
        CheckError::mismatch("gasUsed vs eth_estimateGas", format!("<= {estimate}"), charge.gas_used)
    })?;
    let allowed = u128::from(estimate) * u128::from(tolerance_bps) / 10_000;
    if u128::from(overshoot) > allowed {
        return Err(CheckError::mismatch(
            "eth_estimateGas overshoot over gasUsed",
            format!("<= {allowed}"),
            overshoot,
        ));
    }
    Ok(())
}

pub fn expect_eq<T>(what: &str, expected: T, actual: T) -> Result<(), CheckError>
where
    T: PartialEq + Display + Debug,
{
    if expected == actual {
        Ok(())
    } else {
        Err(CheckError::mismatch(what, expected, actual))
    }
}
