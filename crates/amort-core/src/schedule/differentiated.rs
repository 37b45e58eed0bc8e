use rust_decimal::Decimal;

use super::{LoanRequest, PaymentRecord};

/// Differentiated (decreasing installment) schedule.
///
/// Principal repayment is flat every period; interest is charged on the
/// periods still outstanding, so the total installment shrinks as the
/// loan ages.
///
/// Rounding policy inherited from the calculator this replaces: principal,
/// interest and balance round to 2 dp, but the payment amount rounds the
/// unrounded subtotals to a whole unit. The asymmetry looks like an
/// oversight in the original and is kept for output compatibility.
pub(super) fn compute(request: &LoanRequest) -> Vec<PaymentRecord> {
    let term = request.term_months;
    let monthly_rate = request.monthly_rate();
    let principal_portion = request.principal / Decimal::from(term);

    let mut records = Vec::with_capacity(term as usize);
    let mut balance = request.principal;

    // The interest multiplier counts periods left including the current
    // one: term, term - 1, .., 1.
    for (period, remaining) in (1..=term).zip((1..=term).rev()) {
        let interest = principal_portion * Decimal::from(remaining) * monthly_rate;

        // Each period rounds the balance before the next subtracts, so
        // rounding compounds period-over-period.
        balance = (balance - principal_portion).round_dp(2);

        records.push(PaymentRecord {
            period,
            payment_amount: (principal_portion + interest).round_dp(0),
            principal_portion: principal_portion.round_dp(2),
            interest_portion: interest.round_dp(2),
            remaining_balance: balance,
        });
    }

    records
}

#[cfg(test)]
mod tests {
    use super::super::{compute_schedule, LoanRequest, PaymentScheme};
    use rust_decimal_macros::dec;

    fn request() -> LoanRequest {
        LoanRequest {
            principal: dec!(120000),
            term_months: 12,
            annual_rate_percent: dec!(12),
            scheme: PaymentScheme::Differentiated,
        }
    }

    #[test]
    fn test_principal_portion_is_constant() {
        let schedule = compute_schedule(&request());
        for record in &schedule.records {
            assert_eq!(record.principal_portion, dec!(10000.00));
        }
    }

    #[test]
    fn test_first_and_last_periods() {
        let schedule = compute_schedule(&request());

        let first = &schedule.records[0];
        // 10000 * 12 * 0.01
        assert_eq!(first.interest_portion, dec!(1200.00));
        // Whole-unit rounding of the unrounded subtotals
        assert_eq!(first.payment_amount, dec!(11200));
        assert_eq!(first.remaining_balance, dec!(110000.00));

        let last = &schedule.records[11];
        assert_eq!(last.interest_portion, dec!(100.00));
        assert_eq!(last.payment_amount, dec!(10100));
        assert_eq!(last.remaining_balance, dec!(0.00));
    }

    #[test]
    fn test_installments_decrease() {
        let schedule = compute_schedule(&request());
        for pair in schedule.records.windows(2) {
            assert!(pair[1].payment_amount < pair[0].payment_amount);
        }
    }

    #[test]
    fn test_overpayment_matches_summed_series() {
        // 100 * (12 + 11 + .. + 1)
        let schedule = compute_schedule(&request());
        assert_eq!(schedule.total_overpayment, dec!(7800.00));
    }

    #[test]
    fn test_rounding_drift_stays_within_bound() {
        // 1000 over 3 periods does not divide evenly; the compounding
        // 2 dp rounding leaves at most a cent per period
        let req = LoanRequest {
            principal: dec!(1000),
            term_months: 3,
            annual_rate_percent: dec!(10),
            scheme: PaymentScheme::Differentiated,
        };
        let schedule = compute_schedule(&req);
        let last = schedule.records.last().unwrap();
        assert!(last.remaining_balance.abs() <= dec!(0.03));
        for record in &schedule.records {
            assert_eq!(record.principal_portion, dec!(333.33));
        }
    }

    #[test]
    fn test_zero_rate_charges_no_interest() {
        let req = LoanRequest {
            principal: dec!(6000),
            term_months: 6,
            annual_rate_percent: dec!(0),
            scheme: PaymentScheme::Differentiated,
        };
        let schedule = compute_schedule(&req);
        for record in &schedule.records {
            assert_eq!(record.interest_portion, dec!(0.00));
            assert_eq!(record.payment_amount, dec!(1000));
        }
        assert_eq!(schedule.total_overpayment, dec!(0.00));
    }
}
