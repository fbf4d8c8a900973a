// Copyright 2026 Waitlist Dashboard Contributors
// Licensed under the Apache License, Version 2.0

//! Built-in demo data for running without a seed file.

use time::{Date, Month};

use crate::ids::ProviderId;
use crate::model::{OnboardingStatus, ServiceOffering, ServiceProvider, VendorType};

const NAMES: [&str; 23] = [
    "ada.lovelace",
    "grace.hopper",
    "alan.turing",
    "edsger.dijkstra",
    "barbara.liskov",
    "donald.knuth",
    "john.mccarthy",
    "frances.allen",
    "tony.hoare",
    "niklaus.wirth",
    "margaret.hamilton",
    "dennis.ritchie",
    "ken.thompson",
    "radia.perlman",
    "leslie.lamport",
    "jean.bartik",
    "claude.shannon",
    "katherine.johnson",
    "linus.benedict",
    "anita.borg",
    "tim.berners",
    "hedy.lamarr",
    "vint.cerf",
];

const DOMAINS: [&str; 4] = ["example.com", "mail.example.org", "post.example.net", "inbox.example.io"];

const POSTCODES: [&str; 8] = [
    "SW1A 1AA", "E1 6AN", "N1 9GU", "M1 1AE", "B33 8TH", "CR2 6XH", "DN55 1PT", "EC1A 1BB",
];

const MONTHS: [Month; 6] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
];

/// Fixed demo record set. Deterministic so the table, paging, and filter
/// behavior look the same on every run.
pub fn demo_providers() -> Vec<ServiceProvider> {
    NAMES
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let vendor_type = VendorType::ALL[index % VendorType::ALL.len()];
            let service_offering = ServiceOffering::ALL[index % ServiceOffering::ALL.len()];
            let status = OnboardingStatus::ALL[index % OnboardingStatus::ALL.len()];
            let month = MONTHS[index % MONTHS.len()];
            let day = (index as u8 % 27) + 1;
            ServiceProvider {
                id: ProviderId::new(index as i64 + 1),
                email: format!("{name}@{}", DOMAINS[index % DOMAINS.len()]),
                phone: format!("020 7946 {:04}", 100 + index * 7),
                postcode: POSTCODES[index % POSTCODES.len()].to_owned(),
                vendor_type,
                service_offering,
                signup_date: Date::from_calendar_date(2025, month, day)
                    .unwrap_or_else(|_| Date::from_calendar_date(2025, month, 1).expect("day 1 exists")),
                status,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::demo_providers;
    use crate::store::WaitlistStore;

    #[test]
    fn demo_data_is_deterministic_and_unique() {
        let first = demo_providers();
        let second = demo_providers();
        assert_eq!(first, second);
        assert!(WaitlistStore::new(first).is_ok());
    }

    #[test]
    fn demo_data_spans_multiple_pages() {
        assert!(demo_providers().len() > 20);
    }
}
