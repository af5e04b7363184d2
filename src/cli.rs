use clap::{Args, Parser, Subcommand};
use configuration::OutputFormat;
use std::path::PathBuf;
use validation::FormInput;

/// A catalog of financial, health and conversion calculators.
///
/// Every value is read as text and validated by the calculator, so a bad
/// number is reported against its field instead of aborting argument parsing.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file. Defaults to `tally.toml` in the working directory, if present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format for this run; overrides `defaults.output_format`.
    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` wins.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Depreciation schedule (double-declining by default).
    Depreciation(DepreciationArgs),
    /// Level-payment loan amortization schedule.
    Loan(LoanArgs),
    /// Months and interest to pay off a credit card with a fixed payment.
    Payoff(PayoffArgs),
    /// Compound interest growth with optional periodic contributions.
    Compound(CompoundArgs),
    /// Parametric (normal) Value at Risk.
    Var(VarArgs),
    /// Historical-simulation Value at Risk from observed returns.
    HistoricalVar(HistoricalVarArgs),
    /// Cox-Ross-Rubinstein binomial option price.
    #[command(name = "option")]
    OptionPrice(OptionArgs),
    /// Body mass index and category.
    Bmi(BmiArgs),
    /// Body surface area.
    Bsa(BsaArgs),
    /// Basal metabolic rate and total daily energy expenditure.
    Tdee(TdeeArgs),
    /// Calories burned by an activity, from its MET value.
    Met(MetArgs),
    /// Heart rate variability (RMSSD) from RR intervals.
    Rmssd(RmssdArgs),
    /// Convert a length, mass, volume or temperature.
    Convert(ConvertArgs),
    /// Calendar difference between two dates (YYYY-MM-DD).
    DateDiff(DateDiffArgs),
    /// Show or toggle the table theme.
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
}

#[derive(Subcommand)]
pub enum ThemeAction {
    /// Print the active theme.
    Show,
    /// Switch between light and dark and save the choice.
    Toggle,
}

/// Maps parsed flags onto the form fields a calculator reads.
pub trait ToForm {
    fn to_form(&self) -> FormInput;
}

#[derive(Args)]
pub struct DepreciationArgs {
    #[arg(long)]
    pub cost: Option<String>,
    #[arg(long)]
    pub salvage_value: Option<String>,
    /// Useful life in periods.
    #[arg(long)]
    pub useful_life: Option<String>,
    /// straight-line, ddb, declining-balance or syd.
    #[arg(long)]
    pub method: Option<String>,
    /// Declining-balance factor; defaults to `defaults.declining_factor`.
    #[arg(long)]
    pub factor: Option<String>,
    /// Switch to straight line once it gives the larger charge.
    #[arg(long)]
    pub switch_to_straight_line: bool,
}

impl ToForm for DepreciationArgs {
    fn to_form(&self) -> FormInput {
        let mut form = FormInput::new();
        form.insert_opt("cost", self.cost.as_deref());
        form.insert_opt("salvage_value", self.salvage_value.as_deref());
        form.insert_opt("useful_life", self.useful_life.as_deref());
        form.insert_opt("method", self.method.as_deref());
        form.insert_opt("factor", self.factor.as_deref());
        form.insert("switch_to_straight_line", self.switch_to_straight_line.to_string());
        form
    }
}

#[derive(Args)]
pub struct LoanArgs {
    #[arg(long)]
    pub principal: Option<String>,
    /// Annual interest rate in percent.
    #[arg(long)]
    pub annual_rate: Option<String>,
    #[arg(long)]
    pub term_months: Option<String>,
}

impl ToForm for LoanArgs {
    fn to_form(&self) -> FormInput {
        let mut form = FormInput::new();
        form.insert_opt("principal", self.principal.as_deref());
        form.insert_opt("annual_rate", self.annual_rate.as_deref());
        form.insert_opt("term_months", self.term_months.as_deref());
        form
    }
}

#[derive(Args)]
pub struct PayoffArgs {
    #[arg(long)]
    pub balance: Option<String>,
    /// Annual percentage rate in percent.
    #[arg(long)]
    pub apr: Option<String>,
    #[arg(long)]
    pub monthly_payment: Option<String>,
}

impl ToForm for PayoffArgs {
    fn to_form(&self) -> FormInput {
        let mut form = FormInput::new();
        form.insert_opt("balance", self.balance.as_deref());
        form.insert_opt("apr", self.apr.as_deref());
        form.insert_opt("monthly_payment", self.monthly_payment.as_deref());
        form
    }
}

#[derive(Args)]
pub struct CompoundArgs {
    #[arg(long)]
    pub principal: Option<String>,
    /// Nominal annual rate in percent.
    #[arg(long)]
    pub annual_rate: Option<String>,
    #[arg(long)]
    pub years: Option<String>,
    /// annually, semi-annually, quarterly, monthly or daily.
    #[arg(long)]
    pub frequency: Option<String>,
    /// Deposit added at the end of every compounding period.
    #[arg(long)]
    pub contribution: Option<String>,
}

impl ToForm for CompoundArgs {
    fn to_form(&self) -> FormInput {
        let mut form = FormInput::new();
        form.insert_opt("principal", self.principal.as_deref());
        form.insert_opt("annual_rate", self.annual_rate.as_deref());
        form.insert_opt("years", self.years.as_deref());
        form.insert_opt("frequency", self.frequency.as_deref());
        form.insert_opt("contribution", self.contribution.as_deref());
        form
    }
}

#[derive(Args)]
pub struct VarArgs {
    #[arg(long)]
    pub portfolio_value: Option<String>,
    /// Expected daily return in percent.
    #[arg(long, allow_hyphen_values = true)]
    pub mean_return: Option<String>,
    /// Daily volatility in percent.
    #[arg(long)]
    pub volatility: Option<String>,
    #[arg(long)]
    pub horizon_days: Option<String>,
    /// 90, 95 or 99.
    #[arg(long)]
    pub confidence: Option<String>,
}

impl ToForm for VarArgs {
    fn to_form(&self) -> FormInput {
        let mut form = FormInput::new();
        form.insert_opt("portfolio_value", self.portfolio_value.as_deref());
        form.insert_opt("mean_return", self.mean_return.as_deref());
        form.insert_opt("volatility", self.volatility.as_deref());
        form.insert_opt("horizon_days", self.horizon_days.as_deref());
        form.insert_opt("confidence", self.confidence.as_deref());
        form
    }
}

#[derive(Args)]
pub struct HistoricalVarArgs {
    #[arg(long)]
    pub portfolio_value: Option<String>,
    /// Observed returns in percent, comma separated.
    #[arg(long, allow_hyphen_values = true)]
    pub returns: Option<String>,
    #[arg(long)]
    pub confidence: Option<String>,
}

impl ToForm for HistoricalVarArgs {
    fn to_form(&self) -> FormInput {
        let mut form = FormInput::new();
        form.insert_opt("portfolio_value", self.portfolio_value.as_deref());
        form.insert_opt("returns", self.returns.as_deref());
        form.insert_opt("confidence", self.confidence.as_deref());
        form
    }
}

#[derive(Args)]
pub struct OptionArgs {
    #[arg(long)]
    pub spot: Option<String>,
    #[arg(long)]
    pub strike: Option<String>,
    /// Continuously compounded risk-free rate in percent.
    #[arg(long)]
    pub risk_free_rate: Option<String>,
    /// Annualized volatility in percent.
    #[arg(long)]
    pub volatility: Option<String>,
    #[arg(long)]
    pub expiry_years: Option<String>,
    #[arg(long)]
    pub steps: Option<String>,
    /// call or put.
    #[arg(long)]
    pub kind: Option<String>,
    /// european or american.
    #[arg(long)]
    pub style: Option<String>,
}

impl ToForm for OptionArgs {
    fn to_form(&self) -> FormInput {
        let mut form = FormInput::new();
        form.insert_opt("spot", self.spot.as_deref());
        form.insert_opt("strike", self.strike.as_deref());
        form.insert_opt("risk_free_rate", self.risk_free_rate.as_deref());
        form.insert_opt("volatility", self.volatility.as_deref());
        form.insert_opt("expiry_years", self.expiry_years.as_deref());
        form.insert_opt("steps", self.steps.as_deref());
        form.insert_opt("kind", self.kind.as_deref());
        form.insert_opt("style", self.style.as_deref());
        form
    }
}

#[derive(Args)]
pub struct BmiArgs {
    /// kg (metric) or lb (imperial).
    #[arg(long)]
    pub weight: Option<String>,
    /// cm (metric) or in (imperial).
    #[arg(long)]
    pub height: Option<String>,
    /// metric or imperial.
    #[arg(long)]
    pub units: Option<String>,
}

impl ToForm for BmiArgs {
    fn to_form(&self) -> FormInput {
        let mut form = FormInput::new();
        form.insert_opt("weight", self.weight.as_deref());
        form.insert_opt("height", self.height.as_deref());
        form.insert_opt("units", self.units.as_deref());
        form
    }
}

#[derive(Args)]
pub struct BsaArgs {
    #[arg(long)]
    pub weight_kg: Option<String>,
    #[arg(long)]
    pub height_cm: Option<String>,
    /// mosteller, du-bois, haycock or gehan-george.
    #[arg(long)]
    pub formula: Option<String>,
}

impl ToForm for BsaArgs {
    fn to_form(&self) -> FormInput {
        let mut form = FormInput::new();
        form.insert_opt("weight_kg", self.weight_kg.as_deref());
        form.insert_opt("height_cm", self.height_cm.as_deref());
        form.insert_opt("formula", self.formula.as_deref());
        form
    }
}

#[derive(Args)]
pub struct TdeeArgs {
    #[arg(long)]
    pub weight_kg: Option<String>,
    #[arg(long)]
    pub height_cm: Option<String>,
    #[arg(long)]
    pub age_years: Option<String>,
    /// female or male.
    #[arg(long)]
    pub sex: Option<String>,
    /// mifflin-st-jeor or harris-benedict.
    #[arg(long)]
    pub formula: Option<String>,
    /// sedentary, light, moderate, active or very-active.
    #[arg(long)]
    pub activity: Option<String>,
}

impl ToForm for TdeeArgs {
    fn to_form(&self) -> FormInput {
        let mut form = FormInput::new();
        form.insert_opt("weight_kg", self.weight_kg.as_deref());
        form.insert_opt("height_cm", self.height_cm.as_deref());
        form.insert_opt("age_years", self.age_years.as_deref());
        form.insert_opt("sex", self.sex.as_deref());
        form.insert_opt("formula", self.formula.as_deref());
        form.insert_opt("activity", self.activity.as_deref());
        form
    }
}

#[derive(Args)]
pub struct MetArgs {
    /// e.g. walking, running, cycling, swimming, yoga.
    #[arg(long)]
    pub activity: Option<String>,
    #[arg(long)]
    pub weight_kg: Option<String>,
    #[arg(long)]
    pub minutes: Option<String>,
}

impl ToForm for MetArgs {
    fn to_form(&self) -> FormInput {
        let mut form = FormInput::new();
        form.insert_opt("activity", self.activity.as_deref());
        form.insert_opt("weight_kg", self.weight_kg.as_deref());
        form.insert_opt("minutes", self.minutes.as_deref());
        form
    }
}

#[derive(Args)]
pub struct RmssdArgs {
    /// RR intervals in milliseconds, comma separated.
    #[arg(long)]
    pub rr_intervals_ms: Option<String>,
}

impl ToForm for RmssdArgs {
    fn to_form(&self) -> FormInput {
        let mut form = FormInput::new();
        form.insert_opt("rr_intervals_ms", self.rr_intervals_ms.as_deref());
        form
    }
}

#[derive(Args)]
pub struct ConvertArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub value: Option<String>,
    /// Unit symbol, e.g. km, lb, gal, c.
    #[arg(long)]
    pub from: Option<String>,
    #[arg(long)]
    pub to: Option<String>,
}

impl ToForm for ConvertArgs {
    fn to_form(&self) -> FormInput {
        let mut form = FormInput::new();
        form.insert_opt("value", self.value.as_deref());
        form.insert_opt("from", self.from.as_deref());
        form.insert_opt("to", self.to.as_deref());
        form
    }
}

#[derive(Args)]
pub struct DateDiffArgs {
    #[arg(long)]
    pub start: Option<String>,
    #[arg(long)]
    pub end: Option<String>,
}

impl ToForm for DateDiffArgs {
    fn to_form(&self) -> FormInput {
        let mut form = FormInput::new();
        form.insert_opt("start", self.start.as_deref());
        form.insert_opt("end", self.end.as_deref());
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_become_form_fields() {
        let cli = Cli::try_parse_from([
            "tally",
            "depreciation",
            "--cost",
            "100000",
            "--salvage-value",
            "10000",
            "--useful-life",
            "ten",
        ])
        .unwrap();
        let Commands::Depreciation(args) = cli.command else {
            panic!("expected depreciation");
        };
        let form = args.to_form();
        assert_eq!(form.get("cost"), Some("100000"));
        assert_eq!(form.get("useful_life"), Some("ten"));
        assert_eq!(form.get("method"), None);
        assert_eq!(form.get("switch_to_straight_line"), Some("false"));
    }

    #[test]
    fn negative_values_are_accepted_where_meaningful() {
        let cli = Cli::try_parse_from(["tally", "convert", "--value", "-40", "--from", "f", "--to", "c"]).unwrap();
        let Commands::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(args.to_form().get("value"), Some("-40"));
    }
}
