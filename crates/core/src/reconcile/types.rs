//! Domain types for balance reconciliation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Running balances held on a member account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberBalances {
    /// Cumulative net earnings.
    pub take_home_total: Decimal,
    /// Amount the member owes the business.
    pub total_owe: Decimal,
    /// Amount the business owes the member.
    pub total_owed: Decimal,
}

impl MemberBalances {
    /// A zeroed balance set, as held by a freshly registered member.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            take_home_total: Decimal::ZERO,
            total_owe: Decimal::ZERO,
            total_owed: Decimal::ZERO,
        }
    }

    /// True if the owe/owed pair satisfies the mutual-cancellation
    /// invariant: both non-negative, at most one non-zero.
    #[must_use]
    pub fn owe_owed_consistent(&self) -> bool {
        self.total_owe >= Decimal::ZERO
            && self.total_owed >= Decimal::ZERO
            && (self.total_owe.is_zero() || self.total_owed.is_zero())
    }
}

/// Financial figures carried by a finalized drop.
///
/// All fields are monetary amounts; callers are expected to pass
/// non-negative values (enforced by `Reconciler::validate_figures`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropFigures {
    /// Portion of the drop's total allocated to the member.
    pub member_cut: Decimal,
    /// Portion of the drop's total allocated to the business.
    pub business_cut: Decimal,
    /// Amount the member must remit to the business from this drop.
    pub member_owes: Decimal,
    /// Amount the business must remit to the member from this drop.
    pub business_owes: Decimal,
}

/// The outcome of applying or reversing a drop: new balances for the
/// member and the new take-home total for the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconciledBalances {
    /// New member balances.
    pub member: MemberBalances,
    /// New owner take-home total.
    pub owner_take_home: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_zero_balances_are_consistent() {
        assert!(MemberBalances::zero().owe_owed_consistent());
    }

    #[test]
    fn test_both_sides_positive_is_inconsistent() {
        let balances = MemberBalances {
            take_home_total: dec!(0),
            total_owe: dec!(10),
            total_owed: dec!(5),
        };
        assert!(!balances.owe_owed_consistent());
    }

    #[test]
    fn test_one_side_positive_is_consistent() {
        let balances = MemberBalances {
            take_home_total: dec!(100),
            total_owe: dec!(25),
            total_owed: dec!(0),
        };
        assert!(balances.owe_owed_consistent());
    }
}
