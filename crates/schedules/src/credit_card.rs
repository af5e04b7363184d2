use crate::error::ScheduleError;
use crate::loan::{LoanPayment, amortize, round_cents};
use core_types::{Money, Rate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use validation::{Checks, FieldReader, FromForm, Validate, ValidationErrors};

/// Payoffs longer than this (100 years) are reported as never finishing.
pub const MAX_PAYOFF_MONTHS: u32 = 1200;

/// Largest balance accepted by the form.
pub const MAX_BALANCE: Decimal = dec!(1000000000);

/// Form values for the credit-card payoff calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoffParams {
    pub balance: Money,
    /// Annual percentage rate as a fraction, applied monthly.
    pub apr: Rate,
    pub monthly_payment: Money,
}

impl PayoffParams {
    /// Interest accrued in the first month, rounded to cents.
    pub fn first_month_interest(&self) -> Money {
        round_cents(self.balance * self.apr / dec!(12))
    }
}

impl Validate for PayoffParams {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::new();
        checks
            .positive("balance", self.balance)
            .at_most("balance", self.balance, MAX_BALANCE)
            .between("apr", self.apr, Decimal::ZERO, Decimal::ONE)
            .positive("monthly_payment", self.monthly_payment);

        let interest = self.first_month_interest();
        checks.ensure(
            self.monthly_payment > interest,
            "monthly_payment",
            &format!("monthly payment must exceed the first month's interest of {interest}"),
        );
        checks.finish()
    }
}

impl FromForm for PayoffParams {
    fn read(reader: &mut FieldReader<'_>) -> Self {
        Self {
            balance: reader.decimal("balance"),
            apr: reader.percent("apr"),
            monthly_payment: reader.decimal("monthly_payment"),
        }
    }
}

/// The month-by-month payoff and its totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoffSchedule {
    pub payments: Vec<LoanPayment>,
    pub months: u32,
    pub total_interest: Money,
    pub total_paid: Money,
}

/// Simulates paying a fixed amount every month until the balance is cleared.
///
/// Fails with [`ScheduleError::PayoffTooLong`] when the balance would still be
/// open after [`MAX_PAYOFF_MONTHS`].
pub fn payoff_schedule(params: &PayoffParams) -> Result<PayoffSchedule, ScheduleError> {
    let monthly_rate = params.apr / dec!(12);
    // One extra month tells "cleared in the last allowed month" apart from "not cleared".
    let payments = amortize(params.balance, monthly_rate, params.monthly_payment, MAX_PAYOFF_MONTHS + 1);

    if payments.len() as u32 > MAX_PAYOFF_MONTHS {
        tracing::warn!(balance = %params.balance, payment = %params.monthly_payment, "Payoff exceeds month cap");
        return Err(ScheduleError::PayoffTooLong {
            months: MAX_PAYOFF_MONTHS,
        });
    }

    let months = payments.len() as u32;
    let total_interest = payments.iter().map(|p| p.interest).sum();
    let total_paid = payments.iter().map(|p| p.payment).sum();
    tracing::debug!(months, %total_interest, "Credit card payoff simulated");

    Ok(PayoffSchedule {
        payments,
        months,
        total_interest,
        total_paid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use validation::{FieldErrorKind, FormInput};

    #[test]
    fn zero_apr_divides_balance() {
        let params = PayoffParams {
            balance: dec!(1000),
            apr: Decimal::ZERO,
            monthly_payment: dec!(300),
        };
        let schedule = payoff_schedule(&params).unwrap();
        assert_eq!(schedule.months, 4);
        assert_eq!(schedule.payments[3].payment, dec!(100));
        assert_eq!(schedule.total_paid, dec!(1000));
    }

    #[test]
    fn interest_accrues_monthly() {
        let params = PayoffParams {
            balance: dec!(5000),
            apr: dec!(0.18),
            monthly_payment: dec!(200),
        };
        let schedule = payoff_schedule(&params).unwrap();
        assert_eq!(schedule.payments[0].interest, dec!(75));
        assert_eq!(schedule.payments[0].principal, dec!(125));
        assert_eq!(schedule.months, 32);
        assert_eq!(schedule.payments.last().unwrap().ending_balance, Decimal::ZERO);
        assert_eq!(schedule.total_paid, dec!(5000) + schedule.total_interest);
    }

    #[test]
    fn barely_covering_payment_hits_cap() {
        let params = PayoffParams {
            balance: dec!(100000),
            apr: dec!(0.012),
            monthly_payment: dec!(100.01),
        };
        assert!(params.validate().is_ok());
        assert!(matches!(
            payoff_schedule(&params),
            Err(ScheduleError::PayoffTooLong { months: 1200 })
        ));
    }

    #[test]
    fn payment_below_interest_is_a_cross_field_error() {
        let form = FormInput::new()
            .with("balance", "10000")
            .with("apr", "24")
            .with("monthly_payment", "150");
        let errors = PayoffParams::from_form(&form).unwrap_err();
        let error = errors.for_field("monthly_payment").next().unwrap();
        assert_eq!(error.kind, FieldErrorKind::CrossField);
        assert!(error.message.contains("200"));
    }
}
