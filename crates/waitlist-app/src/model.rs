// Copyright 2026 Waitlist Dashboard Contributors
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::Date;
use time::macros::format_description;

use crate::ids::ProviderId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VendorType {
    Independent,
    Company,
}

impl VendorType {
    pub const ALL: [Self; 2] = [Self::Independent, Self::Company];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Independent => "Independent",
            Self::Company => "Company",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Independent" => Some(Self::Independent),
            "Company" => Some(Self::Company),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ServiceOffering {
    Housekeeping,
    #[serde(rename = "Window Cleaning")]
    WindowCleaning,
    #[serde(rename = "Car Valet")]
    CarValet,
}

impl ServiceOffering {
    pub const ALL: [Self; 3] = [Self::Housekeeping, Self::WindowCleaning, Self::CarValet];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Housekeeping => "Housekeeping",
            Self::WindowCleaning => "Window Cleaning",
            Self::CarValet => "Car Valet",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Housekeeping" => Some(Self::Housekeeping),
            "Window Cleaning" => Some(Self::WindowCleaning),
            "Car Valet" => Some(Self::CarValet),
            _ => None,
        }
    }
}

/// Onboarding status as it appears in the table. `Unset` displays as the
/// literal "-" the operations team uses for not-yet-reviewed records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OnboardingStatus {
    Onboarded,
    Rejected,
    #[serde(rename = "-")]
    Unset,
}

impl OnboardingStatus {
    pub const ALL: [Self; 3] = [Self::Onboarded, Self::Rejected, Self::Unset];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Onboarded => "Onboarded",
            Self::Rejected => "Rejected",
            Self::Unset => "-",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Onboarded" => Some(Self::Onboarded),
            "Rejected" => Some(Self::Rejected),
            "-" => Some(Self::Unset),
            _ => None,
        }
    }
}

/// One waitlist record. `id` is the immutable identity key; edits replace the
/// record wholesale by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProvider {
    pub id: ProviderId,
    pub email: String,
    pub phone: String,
    pub postcode: String,
    pub vendor_type: VendorType,
    pub service_offering: ServiceOffering,
    pub signup_date: Date,
    pub status: OnboardingStatus,
}

impl ServiceProvider {
    /// Signup date as shown in the table and the filter sidebar.
    pub fn signup_date_display(&self) -> String {
        format_signup_date(self.signup_date)
    }
}

pub fn format_signup_date(date: Date) -> String {
    date.format(&format_description!("[month]/[day]/[year]"))
        .expect("date format is valid")
}

#[cfg(test)]
mod tests {
    use super::{OnboardingStatus, ServiceOffering, ServiceProvider, VendorType};
    use crate::ids::ProviderId;
    use time::{Date, Month};

    fn sample() -> ServiceProvider {
        ServiceProvider {
            id: ProviderId::new(1),
            email: "a@x.com".to_owned(),
            phone: "555-0100".to_owned(),
            postcode: "SW1A 1AA".to_owned(),
            vendor_type: VendorType::Company,
            service_offering: ServiceOffering::WindowCleaning,
            signup_date: Date::from_calendar_date(2025, Month::June, 3).expect("valid date"),
            status: OnboardingStatus::Unset,
        }
    }

    #[test]
    fn enum_labels_round_trip() {
        for status in OnboardingStatus::ALL {
            assert_eq!(OnboardingStatus::parse(status.as_str()), Some(status));
        }
        for vendor_type in VendorType::ALL {
            assert_eq!(VendorType::parse(vendor_type.as_str()), Some(vendor_type));
        }
        for offering in ServiceOffering::ALL {
            assert_eq!(ServiceOffering::parse(offering.as_str()), Some(offering));
        }
    }

    #[test]
    fn unset_status_displays_as_dash() {
        assert_eq!(OnboardingStatus::Unset.as_str(), "-");
    }

    #[test]
    fn signup_date_displays_as_month_day_year() {
        assert_eq!(sample().signup_date_display(), "06/03/2025");
    }

    #[test]
    fn provider_serde_uses_original_field_names() {
        let json = serde_json::to_value(sample()).expect("serialize provider");
        assert_eq!(json["vendorType"], "Company");
        assert_eq!(json["serviceOffering"], "Window Cleaning");
        assert_eq!(json["status"], "-");
        assert!(json.get("signupDate").is_some());
    }
}
