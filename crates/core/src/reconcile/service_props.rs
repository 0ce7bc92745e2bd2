//! Property tests for the balance reconciler.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::Reconciler;
use super::types::{DropFigures, MemberBalances};

/// Strategy for non-negative monetary amounts (two decimal places).
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for a consistent starting balance set: non-negative take-home,
/// at most one of owe/owed non-zero.
fn balances_strategy() -> impl Strategy<Value = MemberBalances> {
    (amount_strategy(), amount_strategy(), any::<bool>()).prop_map(
        |(take_home, side, owe_side)| MemberBalances {
            take_home_total: take_home,
            total_owe: if owe_side { side } else { Decimal::ZERO },
            total_owed: if owe_side { Decimal::ZERO } else { side },
        },
    )
}

fn figures_strategy() -> impl Strategy<Value = DropFigures> {
    (
        amount_strategy(),
        amount_strategy(),
        amount_strategy(),
        amount_strategy(),
    )
        .prop_map(
            |(member_cut, business_cut, member_owes, business_owes)| DropFigures {
                member_cut,
                business_cut,
                member_owes,
                business_owes,
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// After any finalize, owe/owed totals are both non-negative and at
    /// most one of them is non-zero.
    #[test]
    fn prop_apply_preserves_owe_owed_invariant(
        current in balances_strategy(),
        owner in amount_strategy(),
        figures in figures_strategy(),
    ) {
        let result = Reconciler::apply(&current, owner, &figures);
        prop_assert!(result.member.owe_owed_consistent());
    }

    /// Cuts accumulate exactly: finalize adds them, reverse subtracts
    /// them, restoring both take-home totals.
    #[test]
    fn prop_apply_then_reverse_restores_take_home(
        current in balances_strategy(),
        owner in amount_strategy(),
        figures in figures_strategy(),
    ) {
        let applied = Reconciler::apply(&current, owner, &figures);
        let reversed =
            Reconciler::reverse(&applied.member, applied.owner_take_home, &figures);

        prop_assert_eq!(reversed.member.take_home_total, current.take_home_total);
        prop_assert_eq!(reversed.owner_take_home, owner);
    }

    /// Reversal never produces a negative balance.
    #[test]
    fn prop_reverse_never_negative(
        current in balances_strategy(),
        owner in amount_strategy(),
        figures in figures_strategy(),
    ) {
        let result = Reconciler::reverse(&current, owner, &figures);

        prop_assert!(result.member.take_home_total >= Decimal::ZERO);
        prop_assert!(result.member.total_owe >= Decimal::ZERO);
        prop_assert!(result.member.total_owed >= Decimal::ZERO);
        prop_assert!(result.owner_take_home >= Decimal::ZERO);
    }

    /// Finalizing a sequence of drops yields take-home totals equal to the
    /// sums of the cuts, regardless of the owes traffic.
    #[test]
    fn prop_cuts_sum_over_sequence(
        figure_list in prop::collection::vec(figures_strategy(), 1..12),
    ) {
        let mut member = MemberBalances::zero();
        let mut owner = Decimal::ZERO;

        for figures in &figure_list {
            let result = Reconciler::apply(&member, owner, figures);
            member = result.member;
            owner = result.owner_take_home;
        }

        let member_sum: Decimal = figure_list.iter().map(|f| f.member_cut).sum();
        let owner_sum: Decimal = figure_list.iter().map(|f| f.business_cut).sum();

        prop_assert_eq!(member.take_home_total, member_sum);
        prop_assert_eq!(owner, owner_sum);
    }

    /// The settlement heuristic only ever zeroes totals, and only on an
    /// exact match.
    #[test]
    fn prop_settle_exact_is_all_or_nothing(
        current in balances_strategy(),
        amount in amount_strategy(),
    ) {
        let settled = Reconciler::settle_exact(&current, amount);

        prop_assert!(
            settled.total_owe == current.total_owe || settled.total_owe == Decimal::ZERO
        );
        prop_assert!(
            settled.total_owed == current.total_owed || settled.total_owed == Decimal::ZERO
        );
        prop_assert_eq!(settled.take_home_total, current.take_home_total);

        if current.total_owe != amount {
            prop_assert_eq!(settled.total_owe, current.total_owe);
        }
        if current.total_owed != amount {
            prop_assert_eq!(settled.total_owed, current.total_owed);
        }
    }

    /// Non-negative figures always pass validation.
    #[test]
    fn prop_validate_accepts_non_negative(figures in figures_strategy()) {
        prop_assert!(Reconciler::validate_figures(&figures).is_ok());
    }
}
