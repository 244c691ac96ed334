//! Loans held against an account.

use crate::error::{LedgerError, Result};
use crate::money::Money;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// A loan owned by exactly one account.
///
/// The owning account removes the loan as soon as a repayment brings
/// `remaining_balance` to zero or below. A loan opened with a zero or negative
/// principal stays open until the first repayment, of any size, settles it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Loan {
    /// Amount originally borrowed.
    pub principal: Money,

    /// Annual rate in percent, as supplied by the applicant. Informational only.
    pub interest_rate: Decimal,

    pub term_months: u32,

    /// Amount still owed. Starts equal to `principal`.
    pub remaining_balance: Money,

    pub start_time: DateTime<Utc>,
}

impl Loan {
    pub fn new(principal: Money, interest_rate: Decimal, term_months: u32) -> Self {
        Loan {
            principal,
            interest_rate,
            term_months,
            remaining_balance: principal,
            start_time: Utc::now(),
        }
    }

    /// Applies a payment and returns `true` when the loan is settled.
    ///
    /// Overpayment is accepted and drives the remaining balance negative. On
    /// overflow the loan is left unchanged.
    pub fn apply_payment(&mut self, payment: Money) -> Result<bool> {
        self.remaining_balance = self
            .remaining_balance
            .checked_sub(payment)
            .ok_or(LedgerError::AmountOutOfRange {
                operation: "loan repayment",
            })?;
        Ok(self.remaining_balance <= Money::ZERO)
    }
}

/// Outcome of a successful repayment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanRepayment {
    /// The loan was settled and removed from the account.
    FullyRepaid,

    /// The loan remains open with the given balance.
    Outstanding(Money),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_new_loan_owes_full_principal() {
        let loan = Loan::new(Money::from(1000), Decimal::from(5), 12);
        assert_eq!(loan.remaining_balance, loan.principal);
        assert_eq!(loan.term_months, 12);
    }

    #[test]
    fn test_payment_settles_at_zero_or_below() {
        let mut loan = Loan::new(Money::from(1000), Decimal::from(5), 12);
        assert!(!loan.apply_payment(Money::from(400)).unwrap());
        assert_eq!(loan.remaining_balance, Money::from(600));
        assert!(loan.apply_payment(Money::from(600)).unwrap());

        let mut overpaid = Loan::new(Money::from(100), Decimal::from(5), 12);
        assert!(overpaid.apply_payment(Money::from(150)).unwrap());
        assert_eq!(overpaid.remaining_balance, Money::from(-50));
    }

    #[test]
    fn test_zero_principal_settles_on_zero_payment() {
        let mut loan = Loan::new(Money::ZERO, Decimal::from(5), 12);
        assert!(loan.apply_payment(Money::ZERO).unwrap());
    }

    #[test]
    fn test_overflowing_payment_leaves_loan_unchanged() {
        let huge = Money::from_str("7922816251426433759354395").unwrap();
        let mut loan = Loan::new(-huge, Decimal::from(5), 12);

        assert!(matches!(
            loan.apply_payment(huge),
            Err(LedgerError::AmountOutOfRange { .. })
        ));
        assert_eq!(loan.remaining_balance, -huge);
    }
}
