//! The balance reconciler.
//!
//! Pure functions computing balance deltas; no I/O. The db crate persists
//! the results inside a single database transaction.

use rust_decimal::Decimal;

use super::error::ReconcileError;
use super::types::{DropFigures, MemberBalances, ReconciledBalances};

/// Balance reconciler for drop finalization, reversal, and settlement.
pub struct Reconciler;

impl Reconciler {
    /// Rejects negative monetary figures before any transaction opens.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::NegativeAmount` naming the first offending
    /// field.
    pub fn validate_figures(figures: &DropFigures) -> Result<(), ReconcileError> {
        let fields = [
            (figures.member_cut, "memberCut"),
            (figures.business_cut, "businessCut"),
            (figures.member_owes, "memberOwes"),
            (figures.business_owes, "businessOwes"),
        ];
        for (amount, field) in fields {
            if amount < Decimal::ZERO {
                return Err(ReconcileError::NegativeAmount { field });
            }
        }
        Ok(())
    }

    /// Applies a finalized drop's figures to the current balances.
    ///
    /// The accounting policy, in order:
    /// 1. The drop's net new debt each direction is the signed difference
    ///    of `member_owes` and `business_owes`; only the positive side
    ///    contributes.
    /// 2. Each side is added to the member's current owe/owed total.
    /// 3. Mutual cancellation: the larger combined side keeps the
    ///    difference, the other becomes zero; equal sides cancel to zero.
    /// 4. Cuts accumulate into the member's and owner's take-home totals.
    ///
    /// Output owe/owed totals are both >= 0 and never simultaneously
    /// positive.
    #[must_use]
    pub fn apply(
        member: &MemberBalances,
        owner_take_home: Decimal,
        figures: &DropFigures,
    ) -> ReconciledBalances {
        let raw_owe = figures.member_owes - figures.business_owes;
        let raw_owed = figures.business_owes - figures.member_owes;

        let combined_owe = member.total_owe + raw_owe.max(Decimal::ZERO);
        let combined_owed = member.total_owed + raw_owed.max(Decimal::ZERO);

        let (total_owe, total_owed) = if combined_owe > combined_owed {
            (combined_owe - combined_owed, Decimal::ZERO)
        } else if combined_owed > combined_owe {
            (Decimal::ZERO, combined_owed - combined_owe)
        } else {
            (Decimal::ZERO, Decimal::ZERO)
        };

        ReconciledBalances {
            member: MemberBalances {
                take_home_total: member.take_home_total + figures.member_cut,
                total_owe,
                total_owed,
            },
            owner_take_home: owner_take_home + figures.business_cut,
        }
    }

    /// Reverses a drop's contribution to the balances on delete.
    ///
    /// Cuts are subtracted from the take-home totals and the raw owes
    /// figures from the owe/owed totals, each clamped to >= 0
    /// independently. This deliberately does NOT re-run the cancellation
    /// algorithm: reversal makes no attempt to reconstruct
    /// pre-cancellation state, so finalize/reverse cycles are not
    /// guaranteed idempotent on owe/owed when cancellation occurred.
    #[must_use]
    pub fn reverse(
        member: &MemberBalances,
        owner_take_home: Decimal,
        figures: &DropFigures,
    ) -> ReconciledBalances {
        ReconciledBalances {
            member: MemberBalances {
                take_home_total: decrement_floor(member.take_home_total, figures.member_cut),
                total_owe: decrement_floor(member.total_owe, figures.member_owes),
                total_owed: decrement_floor(member.total_owed, figures.business_owes),
            },
            owner_take_home: decrement_floor(owner_take_home, figures.business_cut),
        }
    }

    /// Settlement heuristic applied when an owner pays out a batch of
    /// drops: an owe/owed total is zeroed iff it equals the paid amount
    /// exactly. Partial payments leave the totals untouched.
    #[must_use]
    pub fn settle_exact(member: &MemberBalances, amount: Decimal) -> MemberBalances {
        MemberBalances {
            take_home_total: member.take_home_total,
            total_owe: if member.total_owe == amount {
                Decimal::ZERO
            } else {
                member.total_owe
            },
            total_owed: if member.total_owed == amount {
                Decimal::ZERO
            } else {
                member.total_owed
            },
        }
    }
}

/// Subtracts `by` from `current`, clamped to zero.
fn decrement_floor(current: Decimal, by: Decimal) -> Decimal {
    (current - by).max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn balances(take_home: Decimal, owe: Decimal, owed: Decimal) -> MemberBalances {
        MemberBalances {
            take_home_total: take_home,
            total_owe: owe,
            total_owed: owed,
        }
    }

    #[test]
    fn test_member_owes_accumulates() {
        // Fresh member, drop where the member owes the business 50.
        let figures = DropFigures {
            member_cut: dec!(120),
            business_cut: dec!(80),
            member_owes: dec!(50),
            business_owes: dec!(0),
        };
        let result = Reconciler::apply(&MemberBalances::zero(), dec!(0), &figures);

        assert_eq!(result.member.total_owe, dec!(50));
        assert_eq!(result.member.total_owed, dec!(0));
        assert_eq!(result.member.take_home_total, dec!(120));
        assert_eq!(result.owner_take_home, dec!(80));
    }

    #[test]
    fn test_mutual_cancellation_flips_direction() {
        // Member already owes 50; this drop has the business owing 70.
        let current = balances(dec!(0), dec!(50), dec!(0));
        let figures = DropFigures {
            member_owes: dec!(0),
            business_owes: dec!(70),
            ..DropFigures::default()
        };
        let result = Reconciler::apply(&current, dec!(0), &figures);

        assert_eq!(result.member.total_owe, dec!(0));
        assert_eq!(result.member.total_owed, dec!(20));
    }

    #[test]
    fn test_equal_sides_cancel_to_zero() {
        let current = balances(dec!(0), dec!(30), dec!(0));
        let figures = DropFigures {
            member_owes: dec!(0),
            business_owes: dec!(30),
            ..DropFigures::default()
        };
        let result = Reconciler::apply(&current, dec!(0), &figures);

        assert_eq!(result.member.total_owe, dec!(0));
        assert_eq!(result.member.total_owed, dec!(0));
    }

    #[test]
    fn test_within_drop_netting() {
        // Both directions present on one drop: only the net 15 owed
        // survives.
        let figures = DropFigures {
            member_owes: dec!(10),
            business_owes: dec!(25),
            ..DropFigures::default()
        };
        let result = Reconciler::apply(&MemberBalances::zero(), dec!(0), &figures);

        assert_eq!(result.member.total_owe, dec!(0));
        assert_eq!(result.member.total_owed, dec!(15));
    }

    #[test]
    fn test_reverse_decrements_cuts_exactly() {
        let current = balances(dec!(130), dec!(0), dec!(0));
        let figures = DropFigures {
            member_cut: dec!(30),
            business_cut: dec!(20),
            ..DropFigures::default()
        };
        let result = Reconciler::reverse(&current, dec!(90), &figures);

        assert_eq!(result.member.take_home_total, dec!(100));
        assert_eq!(result.owner_take_home, dec!(70));
    }

    #[test]
    fn test_reverse_floors_at_zero() {
        let current = balances(dec!(10), dec!(5), dec!(0));
        let figures = DropFigures {
            member_cut: dec!(30),
            business_cut: dec!(20),
            member_owes: dec!(50),
            business_owes: dec!(0),
        };
        let result = Reconciler::reverse(&current, dec!(15), &figures);

        assert_eq!(result.member.take_home_total, dec!(0));
        assert_eq!(result.member.total_owe, dec!(0));
        assert_eq!(result.owner_take_home, dec!(0));
    }

    #[test]
    fn test_finalize_then_reverse_restores_take_home() {
        let current = balances(dec!(200), dec!(0), dec!(0));
        let figures = DropFigures {
            member_cut: dec!(75),
            business_cut: dec!(25),
            member_owes: dec!(10),
            business_owes: dec!(0),
        };

        let applied = Reconciler::apply(&current, dec!(500), &figures);
        let reversed = Reconciler::reverse(&applied.member, applied.owner_take_home, &figures);

        assert_eq!(reversed.member.take_home_total, dec!(200));
        assert_eq!(reversed.owner_take_home, dec!(500));
    }

    #[test]
    fn test_reverse_does_not_undo_cancellation() {
        // Documented policy, not a bug to fix: once a finalize cancelled
        // owe against owed, reversal cannot reconstruct the pre-finalize
        // split.
        let current = balances(dec!(0), dec!(50), dec!(0));
        let figures = DropFigures {
            member_owes: dec!(0),
            business_owes: dec!(70),
            ..DropFigures::default()
        };

        let applied = Reconciler::apply(&current, dec!(0), &figures);
        assert_eq!(applied.member.total_owed, dec!(20));

        let reversed = Reconciler::reverse(&applied.member, applied.owner_take_home, &figures);
        // Pre-finalize state was owe=50/owed=0; reversal lands on 0/0.
        assert_eq!(reversed.member.total_owe, dec!(0));
        assert_eq!(reversed.member.total_owed, dec!(0));
    }

    #[test]
    fn test_settle_exact_match_zeroes_owe() {
        let current = balances(dec!(100), dec!(50), dec!(0));
        let settled = Reconciler::settle_exact(&current, dec!(50));

        assert_eq!(settled.total_owe, dec!(0));
        assert_eq!(settled.total_owed, dec!(0));
        assert_eq!(settled.take_home_total, dec!(100));
    }

    #[test]
    fn test_settle_partial_payment_is_ignored() {
        let current = balances(dec!(100), dec!(50), dec!(0));
        let settled = Reconciler::settle_exact(&current, dec!(30));

        assert_eq!(settled.total_owe, dec!(50));
    }

    #[test]
    fn test_settle_checks_both_sides_independently() {
        // Degenerate but possible via direct data: both sides equal the
        // paid amount, both get zeroed.
        let current = balances(dec!(0), dec!(40), dec!(40));
        let settled = Reconciler::settle_exact(&current, dec!(40));

        assert_eq!(settled.total_owe, dec!(0));
        assert_eq!(settled.total_owed, dec!(0));
    }

    #[rstest]
    #[case::member_cut(DropFigures { member_cut: dec!(-1), ..DropFigures::default() }, "memberCut")]
    #[case::business_cut(DropFigures { business_cut: dec!(-20), ..DropFigures::default() }, "businessCut")]
    #[case::member_owes(DropFigures { member_owes: dec!(-0.50), ..DropFigures::default() }, "memberOwes")]
    #[case::business_owes(DropFigures { business_owes: dec!(-0.01), ..DropFigures::default() }, "businessOwes")]
    fn test_validate_rejects_negative_figures(
        #[case] figures: DropFigures,
        #[case] field: &'static str,
    ) {
        assert_eq!(
            Reconciler::validate_figures(&figures),
            Err(ReconcileError::NegativeAmount { field })
        );
    }

    #[test]
    fn test_validate_accepts_zero_figures() {
        assert!(Reconciler::validate_figures(&DropFigures::default()).is_ok());
    }
}
