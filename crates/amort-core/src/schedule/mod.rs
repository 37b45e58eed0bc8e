//! Loan amortization schedules.
//!
//! Two alternative payment schemes under one contract: differentiated
//! (constant principal repayment, shrinking installments) and annuity
//! (constant installment, shifting principal/interest split).

mod annuity;
mod differentiated;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::AmortError;
use crate::types::*;
use crate::AmortResult;

/// Payment scheme selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentScheme {
    Differentiated,
    Annuity,
}

impl PaymentScheme {
    /// Map an external form/API token onto a scheme.
    ///
    /// Only the literal token "Annuity" selects the annuity scheme; any
    /// other value falls back to differentiated, matching the form this
    /// calculator replaces.
    pub fn from_token(token: &str) -> Self {
        if token == "Annuity" {
            PaymentScheme::Annuity
        } else {
            PaymentScheme::Differentiated
        }
    }

    /// Human-readable label for rendered reports.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentScheme::Differentiated => "Differentiated (decreasing installments)",
            PaymentScheme::Annuity => "Annuity (equal installments)",
        }
    }
}

/// Loan parameters for a single schedule calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanRequest {
    /// Borrowed sum, must be positive
    pub principal: Money,
    /// Number of monthly periods, at least 1
    pub term_months: u32,
    /// Nominal annual rate as a percentage (12 means 12%), non-negative
    pub annual_rate_percent: Rate,
    pub scheme: PaymentScheme,
}

impl LoanRequest {
    /// Annual percentage converted to a monthly fraction.
    pub fn monthly_rate(&self) -> Rate {
        self.annual_rate_percent / dec!(1200)
    }

    /// Range checks the engine itself does not perform.
    ///
    /// The boundary that collects raw input must run this before calling
    /// [`compute_schedule`]; [`build_schedule`] does it for you.
    pub fn validate(&self) -> AmortResult<()> {
        if self.principal <= Decimal::ZERO {
            return Err(AmortError::InvalidInput {
                field: "principal".into(),
                reason: "Loan principal must be positive".into(),
            });
        }
        if self.term_months == 0 {
            return Err(AmortError::InvalidInput {
                field: "term_months".into(),
                reason: "Loan term must be at least 1 month".into(),
            });
        }
        if self.annual_rate_percent < Decimal::ZERO {
            return Err(AmortError::InvalidInput {
                field: "annual_rate_percent".into(),
                reason: "Interest rate must not be negative".into(),
            });
        }
        Ok(())
    }
}

/// One period of an amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// 1-based period number
    pub period: u32,
    pub payment_amount: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub remaining_balance: Money,
}

/// Full ordered schedule plus the aggregate overpayment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub records: Vec<PaymentRecord>,
    /// Sum of the rounded per-period interest portions, rounded to 2 dp
    pub total_overpayment: Money,
}

impl Schedule {
    fn from_records(records: Vec<PaymentRecord>) -> Self {
        let total_overpayment = records
            .iter()
            .map(|r| r.interest_portion)
            .sum::<Decimal>()
            .round_dp(2);
        Schedule {
            records,
            total_overpayment,
        }
    }
}

/// Pure schedule computation.
///
/// Preconditions (not checked here, see [`LoanRequest::validate`]):
/// `principal > 0`, `term_months >= 1`, `annual_rate_percent >= 0`.
/// Input outside that contract is undefined and may panic on a zero
/// division rather than return an error.
pub fn compute_schedule(request: &LoanRequest) -> Schedule {
    let records = match request.scheme {
        PaymentScheme::Differentiated => differentiated::compute(request),
        PaymentScheme::Annuity => annuity::compute(request),
    };
    Schedule::from_records(records)
}

/// Validating entry point for boundaries (CLI, bindings): checks the
/// request, computes the schedule and wraps it in the standard envelope.
///
/// The annuity scheme can leave a small residual balance after the final
/// period because each period rounds before the next subtracts; anything
/// above one cent is surfaced as a warning instead of being hidden.
pub fn build_schedule(request: &LoanRequest) -> AmortResult<ComputationOutput<Schedule>> {
    let start = Instant::now();
    request.validate()?;

    let mut warnings: Vec<String> = Vec::new();
    let schedule = compute_schedule(request);

    if let Some(last) = schedule.records.last() {
        if last.remaining_balance.abs() > dec!(0.01) {
            warnings.push(format!(
                "Residual balance of {} after the final period (rounding drift)",
                last.remaining_balance
            ));
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Loan Amortization Schedule",
        &serde_json::json!({
            "principal": request.principal.to_string(),
            "term_months": request.term_months,
            "annual_rate_percent": request.annual_rate_percent.to_string(),
            "scheme": request.scheme.label(),
        }),
        warnings,
        elapsed,
        schedule,
    ))
}
