//! Budget plan display formatting
//!
//! Plans are always shown with their progress, so these take the computed
//! report rather than bare plans.

use tabled::Tabled;

use crate::models::PlanKind;
use crate::reports::{PlanProgress, PlanProgressReport};

use super::format::{format_bar, format_date, format_percentage, render_table, truncate};

#[derive(Tabled)]
struct PlanRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Window")]
    window: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "")]
    bar: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// Format every plan with a progress bar
pub fn format_plan_progress(report: &PlanProgressReport, symbol: &str, date_format: &str) -> String {
    if report.plans.is_empty() {
        return "No plans found.\n".to_string();
    }

    let rows = report.plans.iter().map(|p| PlanRow {
        id: p.plan.id.to_string(),
        name: truncate(&p.plan.name, 24),
        kind: match (&p.plan.kind, &p.plan.category) {
            (PlanKind::Spending, Some(category)) => format!("spending: {}", category),
            (kind, _) => kind.to_string(),
        },
        window: format!(
            "{} .. {}",
            format_date(p.plan.start, date_format),
            format_date(p.plan.end, date_format)
        ),
        target: p.plan.target.format_with_symbol(symbol),
        progress: format!(
            "{} ({})",
            p.progress.format_with_symbol(symbol),
            format_percentage(p.percent)
        ),
        bar: format_bar(p.percent, 100.0, 10),
        status: p.status.to_string(),
    });

    let mut output = format!(
        "Plans as of {}\n{}\n",
        format_date(report.as_of, date_format),
        render_table(rows)
    );
    let problems = report.problems().count();
    if problems > 0 {
        output.push_str(&format!("{} plan(s) need attention\n", problems));
    }
    output
}

/// Format one plan with its progress
pub fn format_plan_details(progress: &PlanProgress, symbol: &str, date_format: &str) -> String {
    let plan = &progress.plan;
    let mut output = String::new();

    output.push_str(&format!("Plan:      {} ({})\n", plan.name, plan.id));
    output.push_str(&format!("Kind:      {}\n", plan.kind));
    if let Some(category) = &plan.category {
        output.push_str(&format!("Category:  {}\n", category));
    }
    output.push_str(&format!(
        "Window:    {} .. {}\n",
        format_date(plan.start, date_format),
        format_date(plan.end, date_format)
    ));
    output.push_str(&format!("Target:    {}\n", plan.target.format_with_symbol(symbol)));

    let progress_label = match plan.kind {
        PlanKind::Spending => "Spent:    ",
        PlanKind::Savings => "Saved:    ",
    };
    output.push_str(&format!(
        "{} {} {}\n",
        progress_label,
        progress.progress.format_with_symbol(symbol),
        format_bar(progress.percent, 100.0, 20)
    ));
    output.push_str(&format!(
        "Remaining: {}\n",
        progress.remaining.format_with_symbol(symbol)
    ));
    output.push_str(&format!("Status:    {}\n", progress.status));
    if let Some(monthly) = progress.monthly_needed {
        output.push_str(&format!(
            "Needed:    {} per month\n",
            monthly.format_with_symbol(symbol)
        ));
    }
    if let Some(comment) = &plan.comment {
        output.push_str(&format!("Comment:   {}\n", comment));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetPlan, Expense, Money};
    use chrono::NaiveDate;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    #[test]
    fn test_progress_table_flags_problems() {
        let mut plan = BudgetPlan::new("Groceries", PlanKind::Spending, Money::from_cents(5000), d(3, 1), d(3, 31));
        plan.category = Some("Food".into());
        let expenses = vec![Expense::new("Food", Money::from_cents(6000), d(3, 5))];

        let report = PlanProgressReport {
            as_of: d(3, 10),
            plans: vec![PlanProgress::compute(&plan, &expenses, d(3, 10))],
        };

        let output = format_plan_progress(&report, "$", "%Y-%m-%d");
        assert!(output.contains("spending: Food"));
        assert!(output.contains("$60.00 (120%)"));
        assert!(output.contains("Exceeded"));
        assert!(output.contains("1 plan(s) need attention"));
    }

    #[test]
    fn test_savings_details() {
        let mut goal = BudgetPlan::new("Bike", PlanKind::Savings, Money::from_cents(60000), d(1, 1), d(6, 30));
        goal.saved = Money::from_cents(30000);

        let output = format_plan_details(&PlanProgress::compute(&goal, &[], d(4, 10)), "$", "%Y-%m-%d");
        assert!(output.contains("Saved:     $300.00"));
        assert!(output.contains("Needed:    $100.00 per month"));
    }
}
