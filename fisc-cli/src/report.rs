//! Plain-text rendering of engine results.

use std::io::{self, Write};

use fisc_core::BorrowingInputs;
use fisc_core::calculations::{
    BorrowingResult, BracketSlice, Contribution, PayrollResult, RatePoint, TaxRateSummary,
    TaxResult,
};
use rust_decimal::Decimal;

use crate::state::{SimulationComparison, SimulationSlot};
use crate::utils::{format_delta, format_euro, format_percent};

pub const COMPARISON_INCOMPLETE: &str = "Complete both simulations before comparing.";

const RULE: &str = "----------------------------------------------------------------";

fn heading(
    out: &mut impl Write,
    title: &str,
) -> io::Result<()> {
    writeln!(out, "{title}")?;
    writeln!(out, "{}", &RULE[..title.len().clamp(8, RULE.len())])
}

fn bracket_line(slice: &BracketSlice) -> String {
    format!(
        "Bracket {} to {} at {}: {}",
        format_euro(slice.lower_bound),
        format_euro(slice.applied_upper),
        format_percent(slice.rate),
        format_euro(slice.amount)
    )
}

pub fn render_income(
    out: &mut impl Write,
    slot: SimulationSlot,
    result: &TaxResult,
) -> io::Result<()> {
    heading(out, &format!("{} saved", slot.label()))?;
    writeln!(out, "{:<44} {:>16}", "Final annual tax", format_euro(result.final_tax))?;
    writeln!(out, "{:<44} {:>16}", "Monthly net income", format_euro(result.net_monthly))?;
    writeln!(out)?;

    heading(out, "Calculation details")?;
    for line in &result.details {
        writeln!(out, "{:<44} {:>16}", line.label, format_euro(line.amount))?;
    }
    writeln!(out)?;

    heading(out, "Tax brackets")?;
    for slice in &result.brackets {
        writeln!(out, "{}", bracket_line(slice))?;
    }
    writeln!(out)?;

    writeln!(out, "{:<44} {:>16}", "Marginal rate", format_percent(result.marginal_rate()))?;
    writeln!(out, "{:<44} {:>16}", "Effective rate", format_percent(result.effective_rate()))
}

fn contribution_table(
    out: &mut impl Write,
    lines: &[(&'static str, Contribution)],
) -> io::Result<()> {
    writeln!(out, "{:<34} {:>14} {:>9} {:>12}", "Contribution", "Base", "Rate", "Amount")?;
    for (label, c) in lines.iter().filter(|(_, c)| !c.amount.is_zero()) {
        writeln!(
            out,
            "{:<34} {:>14} {:>9} {:>12}",
            label,
            format_euro(c.base),
            format!("{:.3} %", (c.rate * Decimal::ONE_HUNDRED).round_dp(3)),
            format_euro(c.amount)
        )?;
    }
    Ok(())
}

pub fn render_payroll(
    out: &mut impl Write,
    result: &PayrollResult,
) -> io::Result<()> {
    heading(out, "Monthly payslip")?;
    writeln!(out, "{:<34} {:>14}", "Gross salary", format_euro(result.gross))?;
    writeln!(out, "{:<34} {:>14}", "Band T1", format_euro(result.base_t1))?;
    writeln!(out, "{:<34} {:>14}", "Band T2", format_euro(result.base_t2))?;
    writeln!(out)?;

    heading(out, "Employee contributions")?;
    contribution_table(out, &result.employee.lines())?;
    writeln!(
        out,
        "{:<34} {:>14}",
        "Total (excluding CSG/CRDS)",
        format_euro(result.total_employee_excl_csg)
    )?;
    writeln!(out, "{:<34} {:>14}", "Total CSG/CRDS", format_euro(result.total_csg_crds))?;
    writeln!(out)?;

    heading(out, "Employer contributions")?;
    contribution_table(out, &result.employer.lines())?;
    writeln!(out, "{:<34} {:>14}", "Total employer charges", format_euro(result.total_employer_charges))?;
    writeln!(out)?;

    heading(out, "Summary")?;
    writeln!(out, "{:<34} {:>14}", "Net taxable salary", format_euro(result.net_taxable))?;
    writeln!(out, "{:<34} {:>14}", "Net salary paid", format_euro(result.net_paid))?;
    writeln!(out, "{:<34} {:>14}", "Total employer cost", format_euro(result.total_employer_cost))?;
    writeln!(out, "{:<34} {:>14}", "Annual net taxable", format_euro(result.annual_net_taxable()))
}

pub fn render_borrowing(
    out: &mut impl Write,
    inputs: &BorrowingInputs,
    result: &BorrowingResult,
) -> io::Result<()> {
    heading(out, "Borrowing capacity")?;
    writeln!(out, "{:<34} {:>16}", "Income considered", format_euro(result.total_income))?;
    writeln!(out, "{:<34} {:>16}", "Existing payments", format_euro(inputs.existing_monthly_payment))?;
    writeln!(out, "{:<34} {:>16}", "Monthly capacity", format_euro(result.monthly_capacity))?;
    writeln!(
        out,
        "{:<34} {:>16}",
        format!("Maximum loan ({} years at {}%)", inputs.term_years, inputs.annual_rate.normalize()),
        format_euro(result.max_principal)
    )
}

pub fn render_rates(
    out: &mut impl Write,
    taxable_income: Decimal,
    parts: Decimal,
    summary: &TaxRateSummary,
    curve: &[RatePoint],
) -> io::Result<()> {
    heading(out, "Tax rates")?;
    writeln!(out, "{:<34} {:>16}", "Taxable income", format_euro(taxable_income))?;
    writeln!(out, "{:<34} {:>16}", "Parts", parts.normalize())?;
    writeln!(out, "{:<34} {:>16}", "Quotient", format_euro(summary.quotient))?;
    writeln!(out, "{:<34} {:>16}", "Gross tax", format_euro(summary.gross_tax))?;
    writeln!(out, "{:<34} {:>16}", "Marginal rate", format_percent(summary.marginal_rate))?;
    writeln!(out, "{:<34} {:>16}", "Nominal rate", format_percent(summary.nominal_rate))?;

    if curve.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    heading(out, "Rate curve")?;
    writeln!(out, "{:>16} {:>10} {:>10} {:>10}", "Income", "Marginal", "Nominal", "Effective")?;
    for point in curve {
        writeln!(
            out,
            "{:>16} {:>10} {:>10} {:>10}",
            format_euro(point.income),
            format_percent(point.marginal_rate),
            format_percent(point.nominal_rate),
            format_percent(point.effective_rate)
        )?;
    }
    Ok(())
}

pub fn render_comparison(
    out: &mut impl Write,
    comparison: &SimulationComparison,
) -> io::Result<()> {
    heading(out, "Simulation comparison")?;
    writeln!(
        out,
        "{:<44} {:>16} {:>16} {:>16}",
        "", "Simulation 1", "Simulation 2", "Difference"
    )?;
    writeln!(
        out,
        "{:<44} {:>16} {:>16} {:>16}",
        "Final tax",
        format_euro(comparison.first.final_tax),
        format_euro(comparison.second.final_tax),
        format_delta(comparison.final_tax_delta())
    )?;
    writeln!(
        out,
        "{:<44} {:>16} {:>16} {:>16}",
        "Monthly net income",
        format_euro(comparison.first.net_monthly),
        format_euro(comparison.second.net_monthly),
        format_delta(comparison.net_monthly_delta())
    )?;
    writeln!(
        out,
        "{:<44} {:>16} {:>16}",
        "Parts",
        format!("{:.2}", comparison.first.parts),
        format!("{:.2}", comparison.second.parts)
    )?;
    writeln!(out)?;

    heading(out, "Assumptions")?;
    for detail in &comparison.details {
        writeln!(
            out,
            "{:<44} {:>16} {:>16} {:>16}",
            detail.label,
            format_euro(detail.first),
            format_euro(detail.second),
            format_delta(detail.delta())
        )?;
    }
    Ok(())
}
