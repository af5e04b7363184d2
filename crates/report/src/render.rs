use crate::error::ReportError;
use crate::format::{format_currency, format_number, format_percent};
use crate::table::{summary_table, themed_table};
use comfy_table::Table;
use configuration::{DisplaySettings, Theme};
use conversions::{ConversionResult, DateSpan};
use core_types::{Money, PeriodRecord, verify_continuity};
use finance::{OptionParams, OptionPrice, VarResult};
use health::{BmiResult, BsaFormula, EnergyResult, HrvResult};
use rust_decimal::Decimal;
use schedules::{DepreciationSchedule, GrowthSchedule, LoanPayment, LoanSchedule, PayoffSchedule};
use serde::Serialize;

/// Pretty-printed JSON of any result.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Renders calculator results as themed terminal tables.
pub struct Renderer<'a> {
    display: &'a DisplaySettings,
    theme: Theme,
}

impl<'a> Renderer<'a> {
    pub fn new(display: &'a DisplaySettings, theme: Theme) -> Self {
        Self { display, theme }
    }

    fn money(&self, amount: Money) -> String {
        format_currency(amount, self.display)
    }

    fn join(tables: &[Table]) -> String {
        tables
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Period / Beginning / Change / Ending. Fails if the records do not chain.
    pub fn schedule_table(&self, records: &[PeriodRecord]) -> Result<Table, ReportError> {
        check_chain(records)?;
        let mut table = themed_table(self.theme, &["Period", "Beginning", "Change", "Ending"]);
        for record in records {
            table.add_row(vec![
                record.period.to_string(),
                self.money(record.beginning_value),
                self.money(record.periodic_change),
                self.money(record.ending_value),
            ]);
        }
        Ok(table)
    }

    fn payment_table(&self, payments: &[LoanPayment]) -> Result<Table, ReportError> {
        let records: Vec<PeriodRecord> = payments.iter().map(LoanPayment::to_period_record).collect();
        check_chain(&records)?;

        let mut table = themed_table(
            self.theme,
            &["Month", "Beginning", "Payment", "Interest", "Principal", "Ending"],
        );
        for p in payments {
            table.add_row(vec![
                p.period.to_string(),
                self.money(p.beginning_balance),
                self.money(p.payment),
                self.money(p.interest),
                self.money(p.principal),
                self.money(p.ending_balance),
            ]);
        }
        Ok(table)
    }

    pub fn depreciation(&self, schedule: &DepreciationSchedule) -> Result<String, ReportError> {
        let detail = self.schedule_table(&schedule.records)?;
        let book_value = schedule
            .records
            .last()
            .map(|r| r.ending_value)
            .unwrap_or(Decimal::ZERO);
        let summary = summary_table(
            self.theme,
            "Depreciation",
            &[
                ("Method", format!("{:?}", schedule.method)),
                ("Total depreciation", self.money(schedule.total_depreciation)),
                ("Final book value", self.money(book_value)),
            ],
        );
        Ok(Self::join(&[summary, detail]))
    }

    pub fn loan(&self, schedule: &LoanSchedule) -> Result<String, ReportError> {
        let detail = self.payment_table(&schedule.payments)?;
        let summary = summary_table(
            self.theme,
            "Loan",
            &[
                ("Monthly payment", self.money(schedule.monthly_payment)),
                ("Total interest", self.money(schedule.total_interest)),
                ("Total paid", self.money(schedule.total_paid)),
            ],
        );
        Ok(Self::join(&[summary, detail]))
    }

    pub fn payoff(&self, schedule: &PayoffSchedule) -> Result<String, ReportError> {
        let detail = self.payment_table(&schedule.payments)?;
        let summary = summary_table(
            self.theme,
            "Credit card payoff",
            &[
                ("Months to pay off", schedule.months.to_string()),
                ("Total interest", self.money(schedule.total_interest)),
                ("Total paid", self.money(schedule.total_paid)),
            ],
        );
        Ok(Self::join(&[summary, detail]))
    }

    pub fn growth(&self, schedule: &GrowthSchedule) -> Result<String, ReportError> {
        let detail = self.schedule_table(&schedule.records)?;
        let summary = summary_table(
            self.theme,
            "Compound growth",
            &[
                ("Final balance", self.money(schedule.final_balance)),
                ("Total contributions", self.money(schedule.total_contributions)),
                ("Total interest", self.money(schedule.total_interest)),
            ],
        );
        Ok(Self::join(&[summary, detail]))
    }

    pub fn var(&self, result: &VarResult) -> String {
        summary_table(
            self.theme,
            "Value at Risk",
            &[
                ("Confidence", format_percent(result.confidence.as_fraction(), 0)),
                ("Horizon (days)", result.horizon_days.to_string()),
                ("VaR", self.money(result.var_amount)),
                ("VaR (% of portfolio)", format_percent(result.var_fraction, 2)),
            ],
        )
        .to_string()
    }

    pub fn option(&self, params: &OptionParams, result: &OptionPrice) -> String {
        summary_table(
            self.theme,
            "Binomial option price",
            &[
                ("Option", format!("{:?} {:?}", params.style, params.kind)),
                ("Price", self.money(result.price)),
                ("Steps", result.steps.to_string()),
                ("Up factor", result.tree.up.round_dp(6).to_string()),
                ("Down factor", result.tree.down.round_dp(6).to_string()),
                ("Risk-neutral p", result.tree.probability_up.round_dp(6).to_string()),
            ],
        )
        .to_string()
    }

    pub fn bmi(&self, result: &BmiResult) -> String {
        summary_table(
            self.theme,
            "Body mass index",
            &[
                ("BMI", format_number(result.bmi, 1)),
                ("Category", result.category.label().to_string()),
            ],
        )
        .to_string()
    }

    pub fn bsa(&self, formula: BsaFormula, square_metres: f64) -> String {
        summary_table(
            self.theme,
            "Body surface area",
            &[
                ("Formula", format!("{formula:?}")),
                ("BSA (m²)", format_number(square_metres, 3)),
            ],
        )
        .to_string()
    }

    pub fn energy(&self, result: &EnergyResult) -> String {
        summary_table(
            self.theme,
            "Daily energy expenditure",
            &[
                ("BMR (kcal/day)", format_number(result.bmr, 0)),
                ("TDEE (kcal/day)", format_number(result.tdee, 0)),
            ],
        )
        .to_string()
    }

    pub fn activity_calories(&self, kcal: f64) -> String {
        summary_table(self.theme, "Activity", &[("Calories burned (kcal)", format_number(kcal, 1))]).to_string()
    }

    pub fn hrv(&self, result: &HrvResult) -> String {
        let ln = result
            .ln_rmssd
            .map(|v| format_number(v, 3))
            .unwrap_or_else(|| "n/a".to_string());
        summary_table(
            self.theme,
            "Heart rate variability",
            &[
                ("RMSSD (ms)", format_number(result.rmssd_ms, 2)),
                ("ln(RMSSD)", ln),
                ("Mean RR (ms)", format_number(result.mean_rr_ms, 1)),
            ],
        )
        .to_string()
    }

    pub fn conversion(&self, result: &ConversionResult) -> String {
        summary_table(
            self.theme,
            "Conversion",
            &[
                ("From", format!("{} {}", trim_float(result.value), result.from)),
                ("To", format!("{} {}", trim_float(result.converted), result.to)),
            ],
        )
        .to_string()
    }

    pub fn date_span(&self, span: &DateSpan) -> String {
        let sign = if span.reversed { "-" } else { "" };
        summary_table(
            self.theme,
            "Date difference",
            &[
                (
                    "Calendar",
                    format!("{sign}{} years, {} months, {} days", span.years, span.months, span.days),
                ),
                ("Total days", span.total_days.to_string()),
                ("Weeks", format!("{sign}{} weeks, {} days", span.weeks, span.remaining_days)),
                ("Weekdays", format!("{sign}{}", span.weekdays)),
            ],
        )
        .to_string()
    }
}

fn check_chain(records: &[PeriodRecord]) -> Result<(), ReportError> {
    verify_continuity(records).map_err(|e| {
        tracing::warn!(error = %e, periods = records.len(), "Refusing to render a broken schedule");
        ReportError::from(e)
    })
}

/// Up to six decimals without trailing zeros.
fn trim_float(value: f64) -> String {
    let text = format!("{value:.6}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Direction;
    use rust_decimal_macros::dec;
    use schedules::{DepreciationMethod, DepreciationParams, depreciation_schedule};

    fn example_schedule() -> DepreciationSchedule {
        depreciation_schedule(&DepreciationParams {
            cost: dec!(100000),
            salvage_value: dec!(10000),
            useful_life: 10,
            method: DepreciationMethod::DoubleDeclining,
            factor: dec!(2),
            switch_to_straight_line: false,
        })
    }

    #[test]
    fn depreciation_table_shows_formatted_periods() {
        let display = DisplaySettings::default();
        let text = Renderer::new(&display, Theme::Light)
            .depreciation(&example_schedule())
            .unwrap();
        assert!(text.contains("$100,000.00"));
        assert!(text.contains("$20,000.00"));
        assert!(text.contains("$13,421.77"));
        assert!(text.contains("$3,421.77"));
        assert!(text.contains("$90,000.00"));
    }

    #[test]
    fn broken_chain_is_not_rendered() {
        let records = vec![
            PeriodRecord::new(1, dec!(100), dec!(10), Direction::Decline),
            PeriodRecord::new(2, dec!(95), dec!(10), Direction::Decline),
        ];
        let display = DisplaySettings::default();
        let err = Renderer::new(&display, Theme::Dark)
            .schedule_table(&records)
            .unwrap_err();
        assert!(matches!(err, ReportError::Inconsistent(_)));
    }

    #[test]
    fn json_keeps_full_precision() {
        let json = to_json(&example_schedule()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["records"].as_array().unwrap().len(), 10);
        assert_eq!(value["method"], "double_declining");
        assert!(json.contains("13421.7728"));
    }

    #[test]
    fn float_trimming() {
        assert_eq!(trim_float(1.609344), "1.609344");
        assert_eq!(trim_float(212.0), "212");
        assert_eq!(trim_float(0.5), "0.5");
    }
}
