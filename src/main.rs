mod cli;

use anyhow::Context as _;
use clap::Parser;
use cli::{Cli, Commands, ThemeAction, ToForm};
use configuration::{Config, OutputFormat, init_tracing, load_config};
use context::AppContext;
use report::{ReportError, Renderer, to_json};
use serde_json::json;
use std::process::ExitCode;
use validation::{FromForm, ValidationErrors};

/// The main entry point for the Tally calculator catalog.
fn main() -> ExitCode {
    // A missing .env file is fine; it only carries optional overrides.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Held until exit so the file writer flushes.
    let _guard = match init_tracing(&config.logging, cli.verbose) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error initializing logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    tracing::debug!(?config, "Configuration loaded");

    match run(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn report_error(error: &anyhow::Error) {
    match field_errors(error) {
        Some(errors) => {
            eprintln!("The input was rejected:");
            for e in errors.errors() {
                eprintln!("  {}: {}", e.field, e.message);
            }
        }
        None => eprintln!("Error: {error:#}"),
    }
}

/// Field errors anywhere in the cause chain, including ones wrapped by a calculator error.
fn field_errors(error: &anyhow::Error) -> Option<&ValidationErrors> {
    error.chain().find_map(|cause| cause.downcast_ref::<ValidationErrors>())
}

// ==============================================================================
// Command Dispatch
// ==============================================================================

fn run(cli: Cli, config: &Config) -> anyhow::Result<()> {
    let mut ctx = AppContext::from_config(config).context("Failed to load the application context")?;
    if let Some(format) = cli.format {
        ctx.set_output_format(format);
    }
    tracing::debug!(theme = ?ctx.theme(), format = ?ctx.output_format(), "Context ready");

    match cli.command {
        Commands::Depreciation(args) => {
            let mut form = args.to_form();
            if form.get("factor").is_none() {
                form.insert("factor", config.defaults.declining_factor.to_string());
            }
            let params = schedules::DepreciationParams::from_form(&form)?;
            let schedule = schedules::depreciation_schedule(&params);
            emit(&ctx, &schedule, |r| r.depreciation(&schedule))
        }
        Commands::Loan(args) => {
            let params = schedules::LoanParams::from_form(&args.to_form())?;
            let schedule = schedules::amortization_schedule(&params)?;
            emit(&ctx, &schedule, |r| r.loan(&schedule))
        }
        Commands::Payoff(args) => {
            let params = schedules::PayoffParams::from_form(&args.to_form())?;
            let schedule = schedules::payoff_schedule(&params)?;
            emit(&ctx, &schedule, |r| r.payoff(&schedule))
        }
        Commands::Compound(args) => {
            let params = schedules::CompoundParams::from_form(&args.to_form())?;
            let schedule = schedules::growth_schedule(&params)?;
            emit(&ctx, &schedule, |r| r.growth(&schedule))
        }
        Commands::Var(args) => {
            let params = finance::ParametricVarParams::from_form(&args.to_form())?;
            let result = finance::parametric_var(&params)?;
            emit(&ctx, &result, |r| Ok(r.var(&result)))
        }
        Commands::HistoricalVar(args) => {
            let params = finance::HistoricalVarParams::from_form(&args.to_form())?;
            let result = finance::historical_var(&params)?;
            emit(&ctx, &result, |r| Ok(r.var(&result)))
        }
        Commands::OptionPrice(args) => {
            let params = finance::OptionParams::from_form(&args.to_form())?;
            let result = finance::binomial_price(&params)?;
            emit(&ctx, &result, |r| Ok(r.option(&params, &result)))
        }
        Commands::Bmi(args) => {
            let params = health::BmiParams::from_form(&args.to_form())?;
            let result = health::body_mass_index(&params);
            emit(&ctx, &result, |r| Ok(r.bmi(&result)))
        }
        Commands::Bsa(args) => {
            let params = health::BsaParams::from_form(&args.to_form())?;
            let bsa = health::body_surface_area(&params);
            let value = json!({ "formula": params.formula, "bsa_m2": bsa });
            emit(&ctx, &value, |r| Ok(r.bsa(params.formula, bsa)))
        }
        Commands::Tdee(args) => {
            let params = health::TdeeParams::from_form(&args.to_form())?;
            let result = health::daily_energy_expenditure(&params);
            emit(&ctx, &result, |r| Ok(r.energy(&result)))
        }
        Commands::Met(args) => {
            let params = health::ActivityCaloriesParams::from_form(&args.to_form())?;
            let kcal = health::activity_calories(&params);
            let value = json!({ "activity": params.activity, "met": params.activity.met(), "kcal": kcal });
            emit(&ctx, &value, |r| Ok(r.activity_calories(kcal)))
        }
        Commands::Rmssd(args) => {
            let params = health::RmssdParams::from_form(&args.to_form())?;
            let result = health::rmssd(&params)?;
            emit(&ctx, &result, |r| Ok(r.hrv(&result)))
        }
        Commands::Convert(args) => {
            let params = conversions::ConversionParams::from_form(&args.to_form())?;
            let result = conversions::convert(&params)?;
            emit(&ctx, &result, |r| Ok(r.conversion(&result)))
        }
        Commands::DateDiff(args) => {
            let params = conversions::DateDiffParams::from_form(&args.to_form())?;
            let span = conversions::date_difference(&params)?;
            emit(&ctx, &span, |r| Ok(r.date_span(&span)))
        }
        Commands::Theme { action } => {
            let theme = match action {
                ThemeAction::Show => ctx.theme(),
                ThemeAction::Toggle => ctx.toggle_theme()?,
            };
            match ctx.output_format() {
                OutputFormat::Json => println!("{}", to_json(&json!({ "theme": theme }))?),
                OutputFormat::Table => println!("Theme: {theme:?}"),
            }
            Ok(())
        }
    }
}

/// Prints a result in the context's output format.
fn emit<T, F>(ctx: &AppContext, result: &T, table: F) -> anyhow::Result<()>
where
    T: serde::Serialize + ?Sized,
    F: FnOnce(&Renderer<'_>) -> Result<String, ReportError>,
{
    let text = match ctx.output_format() {
        OutputFormat::Json => to_json(result)?,
        OutputFormat::Table => table(&Renderer::new(ctx.display(), ctx.theme()))?,
    };
    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use validation::FieldErrorKind;

    fn rejected_rate() -> ValidationErrors {
        ValidationErrors::single("annual_rate", FieldErrorKind::OutOfRange, "must be between 0 and 1")
    }

    #[test]
    fn field_errors_are_found_directly() {
        let error = anyhow::Error::from(rejected_rate());
        let errors = field_errors(&error).unwrap();
        assert_eq!(errors.for_field("annual_rate").count(), 1);
    }

    #[test]
    fn field_errors_are_found_inside_calculator_errors() {
        let error = anyhow::Error::from(schedules::ScheduleError::from(rejected_rate()));
        assert_eq!(field_errors(&error).unwrap().len(), 1);

        let error = anyhow::Error::from(finance::FinanceError::from(rejected_rate())).context("pricing failed");
        assert_eq!(field_errors(&error).unwrap().errors()[0].field, "annual_rate");
    }

    #[test]
    fn other_errors_have_no_field_errors() {
        let error = anyhow::Error::from(schedules::ScheduleError::PayoffTooLong { months: 1200 });
        assert!(field_errors(&error).is_none());
    }
}
