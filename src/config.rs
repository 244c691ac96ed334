//! Ledger configuration.
//!
//! Defaults are permissive: a 1% account interest rate and no sign checks on
//! amounts. Both can be changed through environment variables when the CLI
//! starts.

use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

/// Environment variable holding the default account interest rate (fraction).
pub const INTEREST_RATE_VAR: &str = "LEDGER_INTEREST_RATE";

/// Environment variable selecting the [`AmountPolicy`].
pub const AMOUNT_POLICY_VAR: &str = "LEDGER_AMOUNT_POLICY";

/// How the ledger treats negative amounts passed by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AmountPolicy {
    /// Accept any amount. A negative deposit acts as a withdrawal that
    /// bypasses the insufficient-funds check.
    #[default]
    Permissive,

    /// Reject negative initial deposits, deposits, withdrawals, loan amounts
    /// and repayments with [`LedgerError::InvalidAmount`].
    RejectNegative,
}

impl FromStr for AmountPolicy {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "permissive" => Ok(AmountPolicy::Permissive),
            "reject-negative" | "reject_negative" => Ok(AmountPolicy::RejectNegative),
            _ => Err(LedgerError::InvalidConfig {
                key: AMOUNT_POLICY_VAR,
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Interest rate given to every new account, as a fraction (`0.01` = 1%).
    pub default_interest_rate: Decimal,

    pub amount_policy: AmountPolicy,
}

impl LedgerConfig {
    /// Builds a configuration from `LEDGER_INTEREST_RATE` and
    /// `LEDGER_AMOUNT_POLICY`, falling back to defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`LedgerConfig::from_env`] with a caller-supplied variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = LedgerConfig::default();

        if let Some(raw) = lookup(INTEREST_RATE_VAR) {
            config.default_interest_rate =
                Decimal::from_str(raw.trim()).map_err(|_| LedgerError::InvalidConfig {
                    key: INTEREST_RATE_VAR,
                    value: raw.clone(),
                })?;
        }

        if let Some(raw) = lookup(AMOUNT_POLICY_VAR) {
            config.amount_policy = raw.parse()?;
        }

        Ok(config)
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            default_interest_rate: Decimal::new(1, 2),
            amount_policy: AmountPolicy::Permissive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = LedgerConfig::default();
        assert_eq!(config.default_interest_rate.to_string(), "0.01");
        assert_eq!(config.amount_policy, AmountPolicy::Permissive);
    }

    #[test]
    fn test_lookup_overrides_defaults() {
        let config = LedgerConfig::from_lookup(lookup_from(&[
            (INTEREST_RATE_VAR, " 0.05 "),
            (AMOUNT_POLICY_VAR, "Reject-Negative"),
        ]))
        .unwrap();

        assert_eq!(config.default_interest_rate, Decimal::from_str("0.05").unwrap());
        assert_eq!(config.amount_policy, AmountPolicy::RejectNegative);
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let err = LedgerConfig::from_lookup(lookup_from(&[(INTEREST_RATE_VAR, "lots")]))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InvalidConfig { key: INTEREST_RATE_VAR, .. }
        ));

        let err = LedgerConfig::from_lookup(lookup_from(&[(AMOUNT_POLICY_VAR, "strict")]))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InvalidConfig { key: AMOUNT_POLICY_VAR, .. }
        ));
    }
}
