use crate::error::ScheduleError;
use core_types::{Direction, Money, PeriodRecord, Rate};
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use validation::{Checks, FieldReader, FromForm, Validate, ValidationErrors};

/// Longest loan term accepted by the form (50 years).
pub const MAX_TERM_MONTHS: u32 = 600;

/// Largest principal accepted by the form.
pub const MAX_PRINCIPAL: Decimal = dec!(1000000000000);

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Rounds an amount to whole cents, half away from zero.
pub fn round_cents(amount: Money) -> Money {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// One monthly payment on an amortizing debt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanPayment {
    pub period: u32,
    pub beginning_balance: Money,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub ending_balance: Money,
}

impl LoanPayment {
    /// Projects the payment onto a plain balance record; the change is the principal repaid.
    pub fn to_period_record(&self) -> PeriodRecord {
        PeriodRecord::new(self.period, self.beginning_balance, self.principal, Direction::Decline)
    }
}

/// Form values for a fixed-rate, level-payment loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanParams {
    pub principal: Money,
    /// Annual nominal rate as a fraction, compounded monthly.
    pub annual_rate: Rate,
    pub term_months: u32,
}

impl Validate for LoanParams {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::new();
        checks
            .positive("principal", self.principal)
            .at_most("principal", self.principal, MAX_PRINCIPAL)
            .between("annual_rate", self.annual_rate, Decimal::ZERO, Decimal::ONE)
            .between("term_months", self.term_months, 1, MAX_TERM_MONTHS);
        checks.finish()
    }
}

impl FromForm for LoanParams {
    fn read(reader: &mut FieldReader<'_>) -> Self {
        Self {
            principal: reader.decimal("principal"),
            annual_rate: reader.percent("annual_rate"),
            term_months: reader.count("term_months"),
        }
    }
}

/// A full amortization table with totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanSchedule {
    pub monthly_payment: Money,
    pub payments: Vec<LoanPayment>,
    pub total_interest: Money,
    pub total_paid: Money,
}

/// The level monthly payment `P·r / (1 − (1+r)^−n)`, rounded to cents.
///
/// A zero rate pays the principal off in equal parts.
pub fn monthly_payment(params: &LoanParams) -> Result<Money, ScheduleError> {
    let n = params.term_months;
    if n == 0 {
        return Ok(params.principal);
    }
    let r = params.annual_rate / MONTHS_PER_YEAR;
    if r.is_zero() {
        return Ok(round_cents(params.principal / Decimal::from(n)));
    }
    let overflow = || ScheduleError::Overflow("monthly payment".to_string());
    // Discounting keeps every intermediate below the principal times the rate.
    let growth = (Decimal::ONE + r).checked_powi(i64::from(n)).ok_or_else(overflow)?;
    let remaining = Decimal::ONE.checked_div(growth).ok_or_else(overflow)?;
    let payment = params
        .principal
        .checked_mul(r)
        .and_then(|interest| interest.checked_div(Decimal::ONE - remaining))
        .ok_or_else(overflow)?;
    Ok(round_cents(payment))
}

/// Builds the month-by-month table for validated params.
///
/// Interest is rounded to cents each month. The final payment absorbs the
/// accumulated rounding so the balance closes at exactly zero.
pub fn amortization_schedule(params: &LoanParams) -> Result<LoanSchedule, ScheduleError> {
    let payment = monthly_payment(params)?;
    let r = params.annual_rate / MONTHS_PER_YEAR;
    let payments = amortize(params.principal, r, payment, params.term_months);

    let total_interest = payments.iter().map(|p| p.interest).sum();
    let total_paid = payments.iter().map(|p| p.payment).sum();
    tracing::debug!(
        principal = %params.principal,
        %payment,
        months = payments.len(),
        %total_interest,
        "Loan amortized"
    );

    Ok(LoanSchedule {
        monthly_payment: payment,
        payments,
        total_interest,
        total_paid,
    })
}

/// Repays `balance` at `payment` per month for at most `max_months` months.
///
/// Stops early once the balance reaches zero. The last month (either the
/// final permitted one or the one that clears the balance) pays the balance
/// plus its interest.
pub(crate) fn amortize(balance: Money, monthly_rate: Rate, payment: Money, max_months: u32) -> Vec<LoanPayment> {
    let mut payments = Vec::new();
    let mut beginning = balance;

    for period in 1..=max_months {
        if beginning <= Decimal::ZERO {
            break;
        }
        let interest = round_cents(beginning * monthly_rate);
        let mut principal = payment - interest;
        if period == max_months || principal >= beginning {
            principal = beginning;
        }
        let ending = beginning - principal;
        payments.push(LoanPayment {
            period,
            beginning_balance: beginning,
            payment: principal + interest,
            interest,
            principal,
            ending_balance: ending,
        });
        beginning = ending;
    }

    payments
}
