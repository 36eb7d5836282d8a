use anyhow::Result;

use forage_core::models::{AnalyticsReport, validate_window_days};
use forage_core::service::AnalyticsService;

use super::helpers::no_neg_zero;

pub(crate) fn cmd_summary(
    service: &AnalyticsService,
    owner: &str,
    days: u32,
    json: bool,
) -> Result<()> {
    let days = validate_window_days(days)?;
    let report = service.analytics_summary(owner, days)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print!("{}", render_report(owner, &report));
    Ok(())
}

fn render_report(owner: &str, report: &AnalyticsReport) -> String {
    let s = &report.summary;
    let days = s.window_days;
    let mut out = format!("=== {owner}: last {days} days ===\n\n");

    if s.record_count == 0 {
        out.push_str("  No products scanned in this window\n");
    } else {
        let count = s.record_count;
        let total = no_neg_zero(s.total_calories);
        let daily = total / f64::from(days);
        let (p, c, f) = (s.avg_protein, s.avg_carbs, s.avg_fat);
        out.push_str(&format!("  Products scanned: {count}\n"));
        out.push_str(&format!("  Calories: {total:.0} kcal ({daily:.0} kcal/day)\n"));
        out.push_str(&format!("  Average per product: P:{p:.1}g C:{c:.1}g F:{f:.1}g\n"));
    }

    match report.profile.as_ref().and_then(|p| p.bmr) {
        Some(bmr) => out.push_str(&format!("  Energy requirement: {bmr} kcal/day\n")),
        None => out.push_str("  Energy requirement: unknown (incomplete profile)\n"),
    }

    out.push_str("\n  INSIGHTS\n");
    for insight in &report.insights {
        out.push_str(&format!("    - {insight}\n"));
    }
    out
}
