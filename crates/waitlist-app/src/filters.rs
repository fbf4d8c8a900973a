// Copyright 2026 Waitlist Dashboard Contributors
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;
use time::Date;

use crate::model::{
    OnboardingStatus, ServiceOffering, ServiceProvider, VendorType, format_signup_date,
};

/// Raw sidebar form state. Every field is optional; empty string / empty
/// set / unset date means "no constraint on that field".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub postcode: String,
    pub status: BTreeSet<OnboardingStatus>,
    pub vendor_type: BTreeSet<VendorType>,
    pub service_offering: BTreeSet<ServiceOffering>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.postcode.trim().is_empty()
            && self.status.is_empty()
            && self.vendor_type.is_empty()
            && self.service_offering.is_empty()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }

    /// Inverted ranges are rejected at submit time instead of silently
    /// producing a filter nothing can match.
    pub fn date_range_is_ordered(&self) -> bool {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => start <= end,
            _ => true,
        }
    }

    /// Normalizes the criteria into the column-filter set the table
    /// consumes: one entry per populated field, empty fields dropped.
    pub fn to_column_filters(&self) -> Vec<ColumnFilter> {
        let mut filters = Vec::new();

        let postcode = self.postcode.trim();
        if !postcode.is_empty() {
            filters.push(ColumnFilter {
                column: FilterColumn::Postcode,
                value: FilterValue::Text(postcode.to_owned()),
            });
        }
        if !self.status.is_empty() {
            filters.push(ColumnFilter {
                column: FilterColumn::Status,
                value: FilterValue::StatusSet(self.status.clone()),
            });
        }
        if !self.vendor_type.is_empty() {
            filters.push(ColumnFilter {
                column: FilterColumn::VendorType,
                value: FilterValue::VendorTypeSet(self.vendor_type.clone()),
            });
        }
        if !self.service_offering.is_empty() {
            filters.push(ColumnFilter {
                column: FilterColumn::ServiceOffering,
                value: FilterValue::OfferingSet(self.service_offering.clone()),
            });
        }
        if self.start_date.is_some() || self.end_date.is_some() {
            filters.push(ColumnFilter {
                column: FilterColumn::SignupDate,
                value: FilterValue::DateRange {
                    start: self.start_date,
                    end: self.end_date,
                },
            });
        }

        filters
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterColumn {
    Postcode,
    Status,
    VendorType,
    ServiceOffering,
    SignupDate,
}

impl FilterColumn {
    pub const fn id(self) -> &'static str {
        match self {
            Self::Postcode => "postcode",
            Self::Status => "status",
            Self::VendorType => "vendorType",
            Self::ServiceOffering => "serviceOffering",
            Self::SignupDate => "signupDate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    StatusSet(BTreeSet<OnboardingStatus>),
    VendorTypeSet(BTreeSet<VendorType>),
    OfferingSet(BTreeSet<ServiceOffering>),
    DateRange {
        start: Option<Date>,
        end: Option<Date>,
    },
}

impl FilterValue {
    /// Canonical textual form, used for the status line and filter summary.
    pub fn display(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::StatusSet(values) => join_labels(values.iter().map(|value| value.as_str())),
            Self::VendorTypeSet(values) => join_labels(values.iter().map(|value| value.as_str())),
            Self::OfferingSet(values) => join_labels(values.iter().map(|value| value.as_str())),
            Self::DateRange { start, end } => {
                let start = start.map(format_signup_date).unwrap_or_else(|| "..".to_owned());
                let end = end.map(format_signup_date).unwrap_or_else(|| "..".to_owned());
                format!("{start} - {end}")
            }
        }
    }
}

fn join_labels<'a>(labels: impl Iterator<Item = &'a str>) -> String {
    labels.collect::<Vec<_>>().join(", ")
}

/// A predicate keyed by a single column id, applied on top of the global
/// free-text search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFilter {
    pub column: FilterColumn,
    pub value: FilterValue,
}

impl ColumnFilter {
    pub fn matches(&self, provider: &ServiceProvider) -> bool {
        match &self.value {
            FilterValue::Text(needle) => contains_ignore_case(&provider.postcode, needle),
            FilterValue::StatusSet(values) => values.contains(&provider.status),
            FilterValue::VendorTypeSet(values) => values.contains(&provider.vendor_type),
            FilterValue::OfferingSet(values) => values.contains(&provider.service_offering),
            FilterValue::DateRange { start, end } => {
                let after_start = start.is_none_or(|start| provider.signup_date >= start);
                let before_end = end.is_none_or(|end| provider.signup_date <= end);
                after_start && before_end
            }
        }
    }
}

/// Global search across the searchable columns: email, phone, postcode,
/// vendor type, service offering, signup date, and status text.
pub fn matches_global_query(provider: &ServiceProvider, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }

    [
        provider.email.as_str(),
        provider.phone.as_str(),
        provider.postcode.as_str(),
        provider.vendor_type.as_str(),
        provider.service_offering.as_str(),
        provider.status.as_str(),
    ]
    .into_iter()
    .any(|field| contains_ignore_case(field, query))
        || contains_ignore_case(&provider.signup_date_display(), query)
}

pub fn row_passes(provider: &ServiceProvider, filters: &[ColumnFilter], query: &str) -> bool {
    filters.iter().all(|filter| filter.matches(provider)) && matches_global_query(provider, query)
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}
