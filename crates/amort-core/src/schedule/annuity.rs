use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use super::{LoanRequest, PaymentRecord};
use crate::types::{Money, Rate};

/// Annuity (equal installment) schedule.
///
/// The installment is level across the whole term; the interest share
/// shrinks and the principal share grows as the balance amortizes. The
/// split is derived from the rounded installment and the rounded running
/// balance, so the final balance converges to zero only up to rounding
/// drift.
pub(super) fn compute(request: &LoanRequest) -> Vec<PaymentRecord> {
    let term = request.term_months;
    let rate = request.monthly_rate();
    let payment = level_payment(request.principal, rate, term);

    let mut records = Vec::with_capacity(term as usize);
    let mut remains = request.principal;

    for period in 1..=term {
        let interest = (remains * rate).round_dp(2);
        let principal_portion = (payment - interest).round_dp(2);
        remains = (remains - principal_portion).round_dp(2);

        records.push(PaymentRecord {
            period,
            payment_amount: payment,
            principal_portion,
            interest_portion: interest,
            remaining_balance: remains,
        });
    }

    records
}

/// Level installment from the standard annuity formula, rounded to 2 dp.
///
/// At a zero rate the closed form degenerates to 0/0; the limit is a
/// plain even split of the principal over the term.
fn level_payment(principal: Money, rate: Rate, term: u32) -> Money {
    if rate.is_zero() {
        return (principal / Decimal::from(term)).round_dp(2);
    }
    let factor = (Decimal::ONE + rate).powu(term as u64);
    (principal * rate * factor / (factor - Decimal::ONE)).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::super::{compute_schedule, LoanRequest, PaymentScheme};
    use super::level_payment;
    use rust_decimal_macros::dec;

    fn request() -> LoanRequest {
        LoanRequest {
            principal: dec!(120000),
            term_months: 12,
            annual_rate_percent: dec!(12),
            scheme: PaymentScheme::Annuity,
        }
    }

    #[test]
    fn test_level_payment_formula() {
        // 120000 * 0.01 * 1.01^12 / (1.01^12 - 1)
        assert_eq!(level_payment(dec!(120000), dec!(0.01), 12), dec!(10661.85));
    }

    #[test]
    fn test_level_payment_zero_rate_limit() {
        assert_eq!(level_payment(dec!(1200), dec!(0), 12), dec!(100.00));
    }

    #[test]
    fn test_installment_is_constant() {
        let schedule = compute_schedule(&request());
        for record in &schedule.records {
            assert_eq!(record.payment_amount, dec!(10661.85));
        }
    }

    #[test]
    fn test_first_period_split() {
        let schedule = compute_schedule(&request());
        let first = &schedule.records[0];
        assert_eq!(first.interest_portion, dec!(1200.00));
        assert_eq!(first.principal_portion, dec!(9461.85));
        assert_eq!(first.remaining_balance, dec!(110538.15));
    }

    #[test]
    fn test_second_period_compounds_on_rounded_balance() {
        let schedule = compute_schedule(&request());
        let second = &schedule.records[1];
        // 110538.15 * 0.01 rounded
        assert_eq!(second.interest_portion, dec!(1105.38));
        assert_eq!(second.principal_portion, dec!(9556.47));
        assert_eq!(second.remaining_balance, dec!(100981.68));
    }

    #[test]
    fn test_split_always_adds_up_to_installment() {
        let schedule = compute_schedule(&request());
        for record in &schedule.records {
            assert_eq!(
                record.principal_portion + record.interest_portion,
                record.payment_amount
            );
        }
    }

    #[test]
    fn test_interest_share_shrinks() {
        let schedule = compute_schedule(&request());
        for pair in schedule.records.windows(2) {
            assert!(pair[1].interest_portion < pair[0].interest_portion);
        }
    }

    #[test]
    fn test_final_balance_converges_with_drift() {
        // The rounded 10661.85 installment undershoots the exact annuity
        // by a fraction of a cent per period, leaving 0.06 at the end
        let schedule = compute_schedule(&request());
        let last = schedule.records.last().unwrap();
        assert_eq!(last.remaining_balance, dec!(0.06));
    }

    #[test]
    fn test_overpayment_matches_summed_rounded_series() {
        let schedule = compute_schedule(&request());
        assert_eq!(schedule.total_overpayment, dec!(7942.26));
    }
}
