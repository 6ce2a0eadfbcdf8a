use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

use super::Transaction;

/// Date window for narrowing the transaction list, evaluated against "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// `now - 7 days ..= now`
    Last7Days,
    /// Same calendar year and month as now.
    ThisMonth,
    /// Inclusive calendar dates.
    Range { from: NaiveDate, to: NaiveDate },
}

impl Period {
    /// Accepts `7d`, `week`, `month`, or `YYYY-MM-DD..YYYY-MM-DD`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "7d" | "week" | "last-7-days" => return Some(Self::Last7Days),
            "month" | "this-month" => return Some(Self::ThisMonth),
            _ => {}
        }
        let (from, to) = s.split_once("..")?;
        let from = NaiveDate::parse_from_str(from.trim(), "%Y-%m-%d").ok()?;
        let to = NaiveDate::parse_from_str(to.trim(), "%Y-%m-%d").ok()?;
        if from > to {
            return None;
        }
        Some(Self::Range { from, to })
    }

    pub fn contains(&self, ts: NaiveDateTime, now: NaiveDateTime) -> bool {
        match self {
            Self::Last7Days => ts >= now - Duration::days(7) && ts <= now,
            Self::ThisMonth => ts.year() == now.year() && ts.month() == now.month(),
            Self::Range { from, to } => {
                let date = ts.date();
                date >= *from && date <= *to
            }
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Last7Days => write!(f, "last 7 days"),
            Self::ThisMonth => write!(f, "this month"),
            Self::Range { from, to } => write!(f, "{from}..{to}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Exact, case-sensitive match.
    pub category: Option<String>,
    pub period: Option<Period>,
}

impl TransactionFilter {
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_period(mut self, period: Period) -> Self {
        self.period = Some(period);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.period.is_none()
    }

    pub fn matches(&self, txn: &Transaction, now: NaiveDateTime) -> bool {
        if let Some(cat) = &self.category {
            if txn.category != *cat {
                return false;
            }
        }
        match &self.period {
            Some(period) => period.contains(txn.timestamp, now),
            None => true,
        }
    }
}

impl std::fmt::Display for TransactionFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if let Some(cat) = &self.category {
            parts.push(format!("category: {cat}"));
        }
        if let Some(period) = &self.period {
            parts.push(format!("period: {period}"));
        }
        write!(f, "{}", parts.join(", "))
    }
}
