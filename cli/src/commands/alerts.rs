use anyhow::Result;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use forage_core::models::{AlertLevel, ExpiryAlert, LowStockAlert};
use forage_core::service::AnalyticsService;

use super::helpers::truncate;

pub(crate) fn cmd_alerts(service: &AnalyticsService, owner: &str, json: bool) -> Result<()> {
    let alerts = service.inventory_alerts(owner)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&alerts)?);
        return Ok(());
    }

    if alerts.expiring_items.is_empty() && alerts.low_stock_items.is_empty() {
        eprintln!("No inventory alerts for {owner}");
        process::exit(2);
    }

    if !alerts.expiring_items.is_empty() {
        println!("EXPIRING SOON");
        println!("{}", expiry_table(&alerts.expiring_items));
    }
    if !alerts.low_stock_items.is_empty() {
        if !alerts.expiring_items.is_empty() {
            println!();
        }
        println!("LOW STOCK");
        println!("{}", low_stock_table(&alerts.low_stock_items));
    }

    Ok(())
}

fn expiry_table(alerts: &[ExpiryAlert]) -> String {
    #[derive(Tabled)]
    struct ExpiryRow {
        #[tabled(rename = "Item")]
        name: String,
        #[tabled(rename = "Expires")]
        expiry: String,
        #[tabled(rename = "Days")]
        days: i64,
        #[tabled(rename = "Level")]
        level: &'static str,
    }

    let rows: Vec<ExpiryRow> = alerts
        .iter()
        .map(|a| ExpiryRow {
            name: truncate(&a.item.name, 30),
            expiry: a.item.expiry.format("%Y-%m-%d %H:%M").to_string(),
            days: a.days_until_expiry,
            level: match a.level {
                AlertLevel::Urgent => "URGENT",
                AlertLevel::Warning => "warning",
            },
        })
        .collect();

    Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..3)).with(Alignment::right()))
        .to_string()
}

fn low_stock_table(alerts: &[LowStockAlert]) -> String {
    #[derive(Tabled)]
    struct LowStockRow {
        #[tabled(rename = "Item")]
        name: String,
        #[tabled(rename = "Quantity")]
        quantity: String,
        #[tabled(rename = "Threshold")]
        threshold: String,
    }

    let rows: Vec<LowStockRow> = alerts
        .iter()
        .map(|a| {
            let unit = &a.item.unit;
            let qty = a.current_quantity;
            let threshold = a.threshold;
            LowStockRow {
                name: truncate(&a.item.name, 30),
                quantity: format!("{qty} {unit}").trim_end().to_string(),
                threshold: format!("{threshold}"),
            }
        })
        .collect();

    Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use forage_core::models::InventoryRecord;

    fn item(name: &str, unit: &str) -> InventoryRecord {
        InventoryRecord {
            id: "i1".to_string(),
            owner_id: "u1".to_string(),
            name: name.to_string(),
            quantity: 1.0,
            unit: unit.to_string(),
            expiry: Utc.with_ymd_and_hms(2024, 6, 16, 9, 30, 0).unwrap(),
            category: String::new(),
            added_from_receipt: false,
            low_stock_threshold: None,
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_expiry_table_rows() {
        let table = expiry_table(&[ExpiryAlert {
            item: item("Salmon Fillet", "pcs"),
            days_until_expiry: 1,
            level: AlertLevel::Urgent,
        }]);
        assert!(table.contains("Salmon Fillet"));
        assert!(table.contains("2024-06-16 09:30"));
        assert!(table.contains("URGENT"));
    }

    #[test]
    fn test_low_stock_table_rows() {
        let table = low_stock_table(&[LowStockAlert {
            item: item("Eggs", ""),
            current_quantity: 1.0,
            threshold: 2.0,
        }]);
        assert!(table.contains("Eggs"));
        assert!(table.contains("Threshold"));
    }
}
