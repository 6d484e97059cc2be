//! Dashboard summary models.
//!
//! These mirror the `GET /dashboard/summary` payload. Keys are camelCase
//! on the wire.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of points in each monthly series (one per calendar month).
pub const MONTHS_PER_SERIES: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct DashboardSummary {
    pub total_outstanding_debt: f64,
    pub total_overdue_debt: f64,
    pub debtor_count: i64,
    pub active_debt_count: i64,
    #[serde(default)]
    pub recent_payments: Vec<RecentPayment>,
    pub status_breakdown: StatusBreakdown,
    pub monthly_data: MonthlyData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct RecentPayment {
    pub id: i64,
    pub debtor: String,
    pub amount: f64,
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub date: NaiveDate,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum PaymentStatus {
    Completed,
    Pending,
}

impl PaymentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Completed => "Completed",
            PaymentStatus::Pending => "Pending",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct StatusBreakdown {
    pub paid: f64,
    pub overdue: f64,
    pub pending: f64,
    pub partial: f64,
}

impl StatusBreakdown {
    pub fn total(&self) -> f64 {
        self.paid + self.overdue + self.pending + self.partial
    }
}

/// Twelve-month payment and debt series. Any other length fails to decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct MonthlyData {
    pub payments: [f64; MONTHS_PER_SERIES],
    pub debts: [f64; MONTHS_PER_SERIES],
}

impl MonthlyData {
    pub fn total_payments(&self) -> f64 {
        self.payments.iter().sum()
    }

    pub fn total_debts(&self) -> f64 {
        self.debts.iter().sum()
    }
}

impl DashboardSummary {
    /// Share of the status breakdown already paid, 0.0 when empty.
    pub fn recovery_rate(&self) -> f64 {
        let total = self.status_breakdown.total();
        if total <= 0.0 {
            0.0
        } else {
            self.status_breakdown.paid / total
        }
    }

    /// Overdue debt as a share of outstanding debt, 0.0 when nothing is outstanding.
    pub fn overdue_share(&self) -> f64 {
        if self.total_outstanding_debt <= 0.0 {
            0.0
        } else {
            self.total_overdue_debt / self.total_outstanding_debt
        }
    }

    /// Mock dataset shown while the API is unreachable during development.
    pub fn placeholder() -> Self {
        let payment =
            |id: i64, debtor: &str, amount: f64, (y, m, d): (i32, u32, u32)| RecentPayment {
                id,
                debtor: debtor.to_string(),
                amount,
                date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
                status: PaymentStatus::Completed,
            };

        Self {
            total_outstanding_debt: 245_680.0,
            total_overdue_debt: 87_320.5,
            debtor_count: 148,
            active_debt_count: 215,
            recent_payments: vec![
                payment(1, "John Smith", 1250.0, (2025, 3, 25)),
                payment(2, "Sarah Johnson", 3400.0, (2025, 3, 24)),
                payment(3, "Michael Brown", 780.5, (2025, 3, 23)),
                payment(4, "Emily Davis", 2100.0, (2025, 3, 22)),
            ],
            status_breakdown: StatusBreakdown {
                paid: 35.0,
                overdue: 28.0,
                pending: 42.0,
                partial: 15.0,
            },
            monthly_data: MonthlyData {
                payments: [
                    12500.0, 18300.0, 14200.0, 16800.0, 19500.0, 22100.0, 25800.0, 23400.0,
                    21000.0, 19800.0, 24600.0, 27300.0,
                ],
                debts: [
                    18200.0, 21500.0, 19800.0, 22300.0, 24100.0, 23800.0, 26500.0, 28900.0,
                    25600.0, 24300.0, 28900.0, 32500.0,
                ],
            },
        }
    }
}
