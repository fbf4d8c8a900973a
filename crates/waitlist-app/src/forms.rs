// Copyright 2026 Waitlist Dashboard Contributors
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;

use crate::model::{OnboardingStatus, ServiceOffering, ServiceProvider, VendorType};

/// Editable fields of the provider form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FormField {
    Email,
    Phone,
    Postcode,
    VendorType,
    ServiceOffering,
    Status,
}

impl FormField {
    pub const ALL: [Self; 6] = [
        Self::Email,
        Self::Phone,
        Self::Postcode,
        Self::VendorType,
        Self::ServiceOffering,
        Self::Status,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Phone => "Phone Number",
            Self::Postcode => "Postcode",
            Self::VendorType => "Vendor Type",
            Self::ServiceOffering => "Service Offering",
            Self::Status => "Status",
        }
    }
}

/// Validation failures keyed by field. A failed validation is user feedback,
/// not a fault, so it travels as data rather than an error chain.
pub type FormErrors = BTreeMap<FormField, String>;

/// Buffered edit-form state. Text fields hold the raw keystrokes; the
/// enum fields cycle through their variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFormInput {
    pub email: String,
    pub phone: String,
    pub postcode: String,
    pub vendor_type: VendorType,
    pub service_offering: ServiceOffering,
    pub status: OnboardingStatus,
}

impl ProviderFormInput {
    /// Pre-populates the form from the record being edited.
    pub fn from_provider(provider: &ServiceProvider) -> Self {
        Self {
            email: provider.email.clone(),
            phone: provider.phone.clone(),
            postcode: provider.postcode.clone(),
            vendor_type: provider.vendor_type,
            service_offering: provider.service_offering,
            status: provider.status,
        }
    }

    /// Checks every field and reports all failures at once, keyed by field.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        if !email_is_valid(self.email.trim()) {
            errors.insert(FormField::Email, "Invalid email address".to_owned());
        }
        if self.phone.trim().is_empty() {
            errors.insert(FormField::Phone, "Phone number is required".to_owned());
        }
        if self.postcode.trim().is_empty() {
            errors.insert(FormField::Postcode, "Postcode is required".to_owned());
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Merges the form over the original record. Identity and signup date are
    /// not editable and carry over from `original`.
    pub fn apply_to(&self, original: &ServiceProvider) -> ServiceProvider {
        ServiceProvider {
            id: original.id,
            email: self.email.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
            postcode: self.postcode.trim().to_owned(),
            vendor_type: self.vendor_type,
            service_offering: self.service_offering,
            signup_date: original.signup_date,
            status: self.status,
        }
    }
}

/// Syntactic email check: one `@`, non-empty local part, and a domain
/// containing a dot that is neither leading nor trailing.
pub fn email_is_valid(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || value.contains(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
