use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sea_orm::Order;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ORDER_BY: &str = "updatedAt";
pub const DEFAULT_LIMIT: i64 = 100;
pub const DEFAULT_PAGE: i64 = 0;

/// Listing parameters as they arrive from a request. Everything stays a
/// string until the repository interprets it.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceQuery {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order_by: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub filters: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

/// Caller-side listing options, never taken from user input.
#[derive(Debug, Clone, Default)]
pub struct ResourceOptions {
    pub search_fields: Vec<String>,
}

impl ResourceOptions {
    pub fn with_search_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            search_fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sort {
    Asc,
    Desc,
}

impl Sort {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "desc" | "descending" | "-1" => Sort::Desc,
            _ => Sort::Asc,
        }
    }
}

impl From<Sort> for Order {
    fn from(sort: Sort) -> Self {
        match sort {
            Sort::Asc => Order::Asc,
            Sort::Desc => Order::Desc,
        }
    }
}

/// Resolved skip/limit pair. `limit == None` means "no limit".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub skip: u64,
    pub limit: Option<u64>,
}

impl Pagination {
    /// Non-numeric input falls back to the default, a negative page skips
    /// nothing, a zero limit returns everything and a negative limit counts
    /// by its magnitude.
    pub fn resolve(page: Option<&str>, limit: Option<&str>, default_limit: i64) -> Self {
        let page = page.and_then(parse_int).unwrap_or(DEFAULT_PAGE);
        let limit = limit
            .and_then(parse_int)
            .unwrap_or(default_limit)
            .unsigned_abs();

        let skip = if page <= 0 {
            0
        } else {
            (page as u64).saturating_mul(limit)
        };

        Self {
            skip,
            limit: (limit > 0).then_some(limit),
        }
    }
}

impl ResourceQuery {
    pub fn order_by(&self) -> &str {
        non_empty(self.order_by.as_deref()).unwrap_or(DEFAULT_ORDER_BY)
    }

    pub fn sort(&self) -> Sort {
        non_empty(self.sort.as_deref())
            .map(Sort::parse)
            .unwrap_or(Sort::Desc)
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::resolve(self.page.as_deref(), self.limit.as_deref(), DEFAULT_LIMIT)
    }

    pub fn search(&self) -> Option<&str> {
        non_empty(self.search.as_deref())
    }

    pub fn filters(&self) -> Option<&str> {
        non_empty(self.filters.as_deref())
    }

    /// Both bounds or nothing.
    pub fn date_range(&self) -> Option<(&str, &str)> {
        match (
            non_empty(self.date_from.as_deref()),
            non_empty(self.date_to.as_deref()),
        ) {
            (Some(from), Some(to)) => Some((from, to)),
            _ => None,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Reads a leading decimal integer, truncating at the first non-digit:
/// `" 12abc"` is 12, `"1.9"` is 1, `"-3"` is -3 and `"abc"` is `None`.
/// Values past the `i64` range saturate.
pub fn parse_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: &str = &digits[..digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len())];
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });
    Some(if negative { -magnitude } else { magnitude })
}

/// Accepts RFC 3339 timestamps or naive `YYYY-MM-DD[THH:MM:SS[.f]]` values,
/// which are taken as UTC as they stand.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
        return Some(value.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(value) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(value.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}
