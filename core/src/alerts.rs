//! Client-side stock alert derivation.
//!
//! The backend has its own alerts endpoint; this is the same classification
//! computed from a list of lots already on screen, so the stock screen can
//! badge lots without a second round-trip.

use chrono::NaiveDate;

use crate::types::{AlertKind, AlertSeverity, StockAlert, StockStatus, VeterinaryStock};

/// Lots expiring within this many days raise an `ExpiringSoon` alert.
pub const EXPIRY_WARNING_DAYS: i64 = 30;

/// Inside this window an expiring lot is `High` instead of `Medium`.
pub const EXPIRY_URGENT_DAYS: i64 = 7;

/// Every alert raised by `stocks` on `today`, most severe first.
///
/// A lot can raise both an expiry alert and a low-stock alert.
pub fn derive_alerts(stocks: &[VeterinaryStock], today: NaiveDate) -> Vec<StockAlert> {
    let mut alerts = Vec::new();
    for stock in stocks {
        let name = stock.display_name().to_string();
        let days_left = (stock.expiration_date - today).num_days();

        if days_left < 0 {
            alerts.push(StockAlert {
                stock_id: stock.id,
                medicine_name: name.clone(),
                kind: AlertKind::Expired,
                severity: AlertSeverity::Critical,
                message: format!("{name} (lote {}) venceu em {}", stock.batch_number, stock.expiration_date),
            });
        } else if days_left <= EXPIRY_WARNING_DAYS {
            let severity = if days_left <= EXPIRY_URGENT_DAYS {
                AlertSeverity::High
            } else {
                AlertSeverity::Medium
            };
            alerts.push(StockAlert {
                stock_id: stock.id,
                medicine_name: name.clone(),
                kind: AlertKind::ExpiringSoon,
                severity,
                message: format!("{name} (lote {}) vence em {days_left} dias", stock.batch_number),
            });
        }

        if stock.current_quantity <= stock.minimum_quantity {
            let severity = if stock.current_quantity <= 0.0 {
                AlertSeverity::High
            } else {
                AlertSeverity::Medium
            };
            alerts.push(StockAlert {
                stock_id: stock.id,
                medicine_name: name.clone(),
                kind: AlertKind::LowStock,
                severity,
                message: format!(
                    "{name}: {} {} em estoque (mínimo {})",
                    stock.current_quantity, stock.unit, stock.minimum_quantity
                ),
            });
        }
    }
    alerts.sort_by(|a, b| b.severity.cmp(&a.severity));
    alerts
}

/// Single status chip for a lot. Expiry outranks quantity.
pub fn stock_status(stock: &VeterinaryStock, today: NaiveDate) -> StockStatus {
    let days_left = (stock.expiration_date - today).num_days();
    if days_left < 0 {
        StockStatus::Expired
    } else if days_left <= EXPIRY_WARNING_DAYS {
        StockStatus::Expiring
    } else if stock.current_quantity <= 0.0 {
        StockStatus::OutOfStock
    } else if stock.current_quantity <= stock.minimum_quantity {
        StockStatus::Low
    } else {
        StockStatus::Normal
    }
}

/// Value on hand across `stocks`: sum of quantity times unit cost.
pub fn stock_value(stocks: &[VeterinaryStock]) -> f64 {
    stocks.iter().map(VeterinaryStock::total_value).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn lot(current: f64, minimum: f64, expires: NaiveDate) -> VeterinaryStock {
        VeterinaryStock {
            id: Uuid::new_v4(),
            haras_id: Uuid::nil(),
            medicine_id: Uuid::nil(),
            medicine: None,
            batch_number: "L-1".to_string(),
            current_quantity: current,
            minimum_quantity: minimum,
            maximum_quantity: None,
            unit: "ml".to_string(),
            unit_cost: 2.0,
            expiration_date: expires,
            storage_location: None,
        }
    }

    #[test]
    fn healthy_lot_raises_nothing() {
        let today = date(2024, 5, 1);
        let stocks = [lot(50.0, 10.0, date(2025, 1, 1))];
        assert!(derive_alerts(&stocks, today).is_empty());
        assert_eq!(stock_status(&stocks[0], today), StockStatus::Normal);
    }

    #[test]
    fn expired_lot_is_critical() {
        let today = date(2024, 5, 1);
        let stocks = [lot(50.0, 10.0, date(2024, 4, 30))];
        let alerts = derive_alerts(&stocks, today);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::Expired);
        assert_eq!(alerts[0].severity, AlertSeverity::Critical);
        assert_eq!(stock_status(&stocks[0], today), StockStatus::Expired);
    }

    #[test]
    fn expiring_lot_severity_depends_on_window() {
        let today = date(2024, 5, 1);
        let soon = derive_alerts(&[lot(50.0, 10.0, date(2024, 5, 6))], today);
        assert_eq!(soon[0].kind, AlertKind::ExpiringSoon);
        assert_eq!(soon[0].severity, AlertSeverity::High);

        let later = derive_alerts(&[lot(50.0, 10.0, date(2024, 5, 25))], today);
        assert_eq!(later[0].severity, AlertSeverity::Medium);

        // expiring today is not yet expired
        let today_lot = derive_alerts(&[lot(50.0, 10.0, today)], today);
        assert_eq!(today_lot[0].kind, AlertKind::ExpiringSoon);
    }

    #[test]
    fn low_and_empty_stock() {
        let today = date(2024, 5, 1);
        let far = date(2026, 1, 1);
        let low = derive_alerts(&[lot(10.0, 10.0, far)], today);
        assert_eq!(low[0].kind, AlertKind::LowStock);
        assert_eq!(low[0].severity, AlertSeverity::Medium);

        let empty = lot(0.0, 10.0, far);
        let alerts = derive_alerts(std::slice::from_ref(&empty), today);
        assert_eq!(alerts[0].severity, AlertSeverity::High);
        assert_eq!(stock_status(&empty, today), StockStatus::OutOfStock);
    }

    #[test]
    fn alerts_are_sorted_most_severe_first() {
        let today = date(2024, 5, 1);
        let stocks = [
            lot(5.0, 10.0, date(2026, 1, 1)),
            lot(0.0, 10.0, date(2024, 1, 1)),
        ];
        let alerts = derive_alerts(&stocks, today);
        assert_eq!(alerts.len(), 3);
        assert_eq!(alerts[0].severity, AlertSeverity::Critical);
        assert!(alerts.windows(2).all(|w| w[0].severity >= w[1].severity));
    }

    #[test]
    fn value_sums_quantity_times_cost() {
        let far = date(2026, 1, 1);
        let stocks = [lot(10.0, 1.0, far), lot(2.5, 1.0, far)];
        assert_eq!(stock_value(&stocks), 25.0);
        assert_eq!(stock_value(&[]), 0.0);
    }
}
