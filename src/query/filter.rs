use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::QueryError;
use crate::models::{Category, CategoryStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    pub fn matches(self, status: CategoryStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => status == CategoryStatus::Active,
            StatusFilter::Inactive => status == CategoryStatus::Inactive,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Ok(StatusFilter::All),
            "active" | "1" => Ok(StatusFilter::Active),
            "inactive" | "0" => Ok(StatusFilter::Inactive),
            other => Err(QueryError::InvalidStatus(other.to_string())),
        }
    }
}

/// Filters applied on top of the search term. Date bounds are inclusive and
/// compare against the calendar date of `createdAt`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListFilters {
    pub status: StatusFilter,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl ListFilters {
    pub fn new(status: StatusFilter, date_from: Option<NaiveDate>, date_to: Option<NaiveDate>) -> Result<Self, QueryError> {
        if let (Some(from), Some(to)) = (date_from, date_to) {
            if from > to {
                return Err(QueryError::InvalidDateRange {
                    from: from.to_string(),
                    to: to.to_string(),
                });
            }
        }
        Ok(Self {
            status,
            date_from,
            date_to,
        })
    }

    /// `true` when any constraint is set.
    pub fn is_active(&self) -> bool {
        self.status != StatusFilter::All || self.date_from.is_some() || self.date_to.is_some()
    }

    pub fn matches(&self, category: &Category) -> bool {
        if !self.status.matches(category.status) {
            return false;
        }
        if self.date_from.is_none() && self.date_to.is_none() {
            return true;
        }
        // A record without a readable date cannot satisfy a date bound.
        let Some(created) = category.created_date() else {
            return false;
        };
        self.date_from.map_or(true, |from| created >= from) && self.date_to.map_or(true, |to| created <= to)
    }
}

/// Parse an optional `YYYY-MM-DD` bound; blank means "no bound".
pub fn parse_date_bound(raw: Option<&str>) -> Result<Option<NaiveDate>, QueryError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| QueryError::InvalidDate(value.to_string())),
    }
}

/// Case-insensitive substring match on name or description. A blank term
/// matches everything.
pub fn matches_search(category: &Category, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    category.name.to_lowercase().contains(&needle) || category.description.to_lowercase().contains(&needle)
}

pub fn apply<'a>(records: &'a [Category], search: &str, filters: &ListFilters) -> Vec<&'a Category> {
    records
        .iter()
        .filter(|c| matches_search(c, search) && filters.matches(c))
        .collect()
}
