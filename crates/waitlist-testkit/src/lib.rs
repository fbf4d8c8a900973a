// Copyright 2026 Waitlist Dashboard Contributors
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::path::PathBuf;
use time::{Date, Month};
use waitlist_app::{OnboardingStatus, ProviderId, ServiceOffering, ServiceProvider, VendorType};

const FIRST_NAMES: [&str; 16] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Elliot", "Robin", "Cameron", "Hayden", "Rowan",
];
const LAST_NAMES: [&str; 18] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Campbell", "Turner", "Flores", "Bennett", "Price", "Morris", "Foster", "Brooks",
];
const EMAIL_DOMAINS: [&str; 5] = [
    "example.com",
    "mail.example.org",
    "post.example.net",
    "inbox.example.io",
    "provider.example.co",
];

const OUTWARD_AREAS: [&str; 12] = [
    "SW1A", "E1", "N1", "M1", "B33", "CR2", "DN55", "EC1A", "W1J", "G2", "LS1", "BS8",
];
const INWARD_LETTERS: [&str; 8] = ["AA", "AN", "GU", "AE", "TH", "XH", "PT", "BB"];

const REFERENCE_YEAR: i32 = 2025;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Deterministic generator of waitlist records for tests.
#[derive(Debug, Clone)]
pub struct ProviderFaker {
    rng: DeterministicRng,
    next_id: i64,
}

impl ProviderFaker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: DeterministicRng::new(if seed == 0 { 1 } else { seed }),
            next_id: 1,
        }
    }

    pub fn provider(&mut self) -> ServiceProvider {
        let id = self.next_id;
        self.next_id += 1;

        let first = self.pick(&FIRST_NAMES).to_ascii_lowercase();
        let last = self.pick(&LAST_NAMES).to_ascii_lowercase();
        let domain = self.pick(&EMAIL_DOMAINS);
        ServiceProvider {
            id: ProviderId::new(id),
            email: format!("{first}.{last}@{domain}"),
            phone: format!(
                "0{:03} {:03} {:04}",
                200 + self.rng.int_n(800),
                100 + self.rng.int_n(900),
                self.rng.int_n(10_000),
            ),
            postcode: format!(
                "{} {}{}",
                self.pick(&OUTWARD_AREAS),
                1 + self.rng.int_n(9),
                self.pick(&INWARD_LETTERS),
            ),
            vendor_type: VendorType::ALL[self.rng.int_n(VendorType::ALL.len())],
            service_offering: ServiceOffering::ALL[self.rng.int_n(ServiceOffering::ALL.len())],
            signup_date: self.date_in_year(REFERENCE_YEAR),
            status: OnboardingStatus::ALL[self.rng.int_n(OnboardingStatus::ALL.len())],
        }
    }

    pub fn providers(&mut self, count: usize) -> Vec<ServiceProvider> {
        (0..count).map(|_| self.provider()).collect()
    }

    pub fn date_in_year(&mut self, year: i32) -> Date {
        let start = Date::from_calendar_date(year, Month::January, 1)
            .expect("January 1 exists")
            .to_julian_day();
        let end = Date::from_calendar_date(year, Month::December, 31)
            .expect("December 31 exists")
            .to_julian_day();
        let span = (end - start) as usize + 1;
        Date::from_julian_day(start + self.rng.int_n(span) as i32).expect("day within year")
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }
}

/// Writes the records as a JSON seed file in a fresh temp dir. The dir guard
/// must outlive the path.
pub fn temp_seed_file(providers: &[ServiceProvider]) -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("providers.json");
    let json = serde_json::to_string_pretty(providers).context("serialize seed records")?;
    std::fs::write(&path, json).with_context(|| format!("write seed file {}", path.display()))?;
    Ok((dir, path))
}
