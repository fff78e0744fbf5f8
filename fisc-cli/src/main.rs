use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{debug, info};

use fisc_cli::app::{App, CurveRequest};
use fisc_cli::settings::Settings;
use fisc_cli::state::SimulationSlot;
use fisc_cli::utils::parse_decimal;
use fisc_cli::{logging, report};
use fisc_core::{BorrowingInputs, ContributionRegime, PayrollInputs, PayrollOptions, TaxInputs};
use fisc_data::{BracketLoader, ScenarioLoader};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// French household finance simulator: income tax, payroll and borrowing
/// capacity under 2025 parameters.
///
/// Amounts accept a French decimal comma (`1 234,56`) or a decimal point,
/// but not both in one value.
#[derive(Debug, Parser)]
#[command(name = "fisc", version, about)]
struct Cli {
    /// TOML settings file.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// CSV bracket table replacing the built-in 2025 income tax schedule.
    #[arg(long, global = true)]
    brackets: Option<PathBuf>,

    /// Log level or filter directive (overrides RUST_LOG and settings).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute income tax for one household and store it in a slot.
    Income(IncomeArgs),
    /// Compute a monthly payslip from a gross salary.
    Payroll(PayrollArgs),
    /// Estimate the maximum loan under the 35% debt-to-income ceiling.
    Borrow(BorrowArgs),
    /// Show marginal and nominal rates, optionally as a curve.
    Rates(RatesArgs),
    /// Load scenarios from CSV and compare Simulation 1 with Simulation 2.
    Compare(CompareArgs),
}

#[derive(Debug, Args)]
struct IncomeArgs {
    /// Annual salaried income. Amounts take a decimal comma or point
    /// (1 234,56 or 1234.56), never both.
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    salary: Decimal,

    /// Annual auto-entrepreneur revenue.
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    auto_entrepreneur: Decimal,

    /// Household parts (1, 1.5, 2, ...).
    #[arg(long, value_parser = parse_decimal, default_value = "1")]
    parts: Decimal,

    /// Apply the flat 10% reduction on salaried income.
    #[arg(long)]
    standard_deduction: bool,

    /// Family aid and donations deducted from taxable income.
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    family_aid: Decimal,

    /// Childcare costs (half is credited against the tax).
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    childcare: Decimal,

    /// Married or civil-partnered household.
    #[arg(long)]
    couple: bool,

    /// Slot the result is stored under.
    #[arg(long, value_enum, default_value_t = SimulationSlot::Current)]
    slot: SimulationSlot,
}

#[derive(Debug, Args)]
struct PayrollArgs {
    /// Monthly gross salary.
    #[arg(long, value_parser = parse_decimal)]
    gross: Decimal,

    /// Non-executive employee (no APEC, no executive provident scheme).
    #[arg(long)]
    non_cadre: bool,

    /// Alsace-Moselle local regime.
    #[arg(long)]
    alsace_moselle: bool,

    /// Gross above 2.5 × SMIC (full employer health rate).
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    above_2_5_smic: bool,

    /// Gross above 3.5 × SMIC (full family-allowance rate).
    #[arg(long)]
    above_3_5_smic: bool,

    /// Derive both SMIC flags from the gross salary.
    #[arg(long)]
    infer_thresholds: bool,

    /// Employer headcount of 50 or more.
    #[arg(long)]
    headcount_50_plus: bool,

    /// Use the unemployment rate in force before May 2025.
    #[arg(long)]
    before_may_2025: bool,

    /// Chain the annual net taxable salary into the income tax engine.
    #[arg(long, value_parser = parse_decimal)]
    parts: Option<Decimal>,
}

#[derive(Debug, Args)]
struct BorrowArgs {
    /// Net monthly income.
    #[arg(long, value_parser = parse_decimal)]
    net_monthly: Decimal,

    /// Existing monthly loan payments.
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    existing_payment: Decimal,

    /// Gross monthly rental income.
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    rental_income: Decimal,

    /// Share of rental income counted, in percent.
    #[arg(long, value_parser = parse_decimal, default_value = "70")]
    inclusion_rate: Decimal,

    /// Nominal annual interest rate, in percent.
    #[arg(long, value_parser = parse_decimal, default_value = "4")]
    annual_rate: Decimal,

    /// Loan term in years.
    #[arg(long, default_value_t = 20)]
    term_years: u32,
}

#[derive(Debug, Args)]
struct RatesArgs {
    /// Annual taxable income.
    #[arg(long, value_parser = parse_decimal)]
    income: Decimal,

    /// Household parts.
    #[arg(long, value_parser = parse_decimal, default_value = "1")]
    parts: Decimal,

    /// Upper end of the rate curve; no curve when omitted. At most 1000
    /// points are sampled.
    #[arg(long, value_parser = parse_decimal)]
    curve_max: Option<Decimal>,

    /// Income step between curve samples.
    #[arg(long, value_parser = parse_decimal, default_value = "5000")]
    curve_step: Decimal,
}

#[derive(Debug, Args)]
struct CompareArgs {
    /// Scenario CSV (slot,salary,auto_entrepreneur_revenue,parts,...).
    #[arg(long)]
    file: PathBuf,
}

// ─── command handlers ────────────────────────────────────────────────────────

fn run_income(
    app: &mut App,
    args: IncomeArgs,
    out: &mut impl Write,
) -> Result<()> {
    let inputs = TaxInputs {
        salary: args.salary,
        auto_entrepreneur_revenue: args.auto_entrepreneur,
        parts: args.parts,
        standard_deduction: args.standard_deduction,
        family_aid: args.family_aid,
        childcare_cost: args.childcare,
        is_couple: args.couple,
    };
    let result = app.income(&inputs, args.slot)?;
    report::render_income(out, args.slot, result)?;
    Ok(())
}

fn run_payroll(
    app: &mut App,
    args: PayrollArgs,
    out: &mut impl Write,
) -> Result<()> {
    let mut options = PayrollOptions {
        is_executive: !args.non_cadre,
        alsace_moselle: args.alsace_moselle,
        above_2_5_smic: args.above_2_5_smic,
        above_3_5_smic: args.above_3_5_smic,
        headcount_50_plus: args.headcount_50_plus,
        regime: if args.before_may_2025 {
            ContributionRegime::BeforeMay2025
        } else {
            ContributionRegime::FromMay2025
        },
    };
    if args.infer_thresholds {
        options = options.infer_wage_multiples(args.gross, app.params().payroll.smic_monthly);
        debug!(
            above_2_5_smic = options.above_2_5_smic,
            above_3_5_smic = options.above_3_5_smic,
            "Inferred wage multiples"
        );
    }

    let result = app.payroll(&PayrollInputs::new(args.gross, options))?;
    report::render_payroll(out, result)?;

    if let Some(parts) = args.parts {
        if let Some(chained) = app.income_from_payroll(parts) {
            writeln!(out)?;
            report::render_income(out, SimulationSlot::Current, chained?)?;
        }
    }
    Ok(())
}

fn run_borrow(
    app: &mut App,
    args: BorrowArgs,
    out: &mut impl Write,
) -> Result<()> {
    let inputs = BorrowingInputs::from_net_monthly(
        args.net_monthly,
        args.existing_payment,
        args.annual_rate,
        args.term_years,
    )
    .with_rental_income(args.rental_income, args.inclusion_rate);
    let result = app.borrow(&inputs)?;
    report::render_borrowing(out, &inputs, result)?;
    Ok(())
}

fn run_rates(
    app: &App,
    args: RatesArgs,
    out: &mut impl Write,
) -> Result<()> {
    let curve = args.curve_max.map(|max_income| CurveRequest {
        max_income,
        step: args.curve_step,
    });
    let (summary, points) = app.rates(args.income, args.parts, curve)?;
    report::render_rates(out, args.income, args.parts, &summary, &points)?;
    Ok(())
}

fn run_compare(
    app: &mut App,
    args: CompareArgs,
    out: &mut impl Write,
) -> Result<()> {
    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;
    let scenarios = ScenarioLoader::parse(file)
        .with_context(|| format!("Failed to load scenarios: {}", args.file.display()))?;
    let loaded = app.load_scenarios(&scenarios)?;
    info!(scenarios = loaded, "Scenarios computed");

    match app.state.compare() {
        Some(comparison) => report::render_comparison(out, &comparison)?,
        None => writeln!(out, "{}", report::COMPARISON_INCOMPLETE)?,
    }
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };

    let level = cli.log_level.as_deref().or(settings.log_level.as_deref());
    logging::init_logging(level, settings.log_file.as_deref())?;

    let brackets = match &cli.brackets {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open: {}", path.display()))?;
            let table = BracketLoader::load_table(file)
                .with_context(|| format!("Invalid bracket table: {}", path.display()))?;
            Some(table)
        }
        None => None,
    };

    let mut app = App::new(settings, brackets);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Income(args) => run_income(&mut app, args, &mut out),
        Command::Payroll(args) => run_payroll(&mut app, args, &mut out),
        Command::Borrow(args) => run_borrow(&mut app, args, &mut out),
        Command::Rates(args) => run_rates(&app, args, &mut out),
        Command::Compare(args) => run_compare(&mut app, args, &mut out),
    }
}
