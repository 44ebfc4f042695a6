//! The typed claim record produced by validation.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::{BillingClass, BillingCodeType};
use crate::raw::{RawRecord, RawValue};

/// Date format used when a claim is rendered back to raw form.
pub const CLAIM_DATE_FORMAT: &str = "%Y-%m-%d";

/// Every field a claim carries, in declaration order.
///
/// The serde names are the wire names used as CSV headers and JSON keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClaimField {
    Tin,
    ProviderName,
    Npi,
    ProcedureCode,
    BillingCodeType,
    NegotiatedRate,
    BilledCharge,
    EffectiveDate,
    ExpirationDate,
    ServiceCode,
    Description,
    BillingClass,
    PlanName,
}

impl ClaimField {
    pub const ALL: [ClaimField; 13] = [
        Self::Tin,
        Self::ProviderName,
        Self::Npi,
        Self::ProcedureCode,
        Self::BillingCodeType,
        Self::NegotiatedRate,
        Self::BilledCharge,
        Self::EffectiveDate,
        Self::ExpirationDate,
        Self::ServiceCode,
        Self::Description,
        Self::BillingClass,
        Self::PlanName,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ClaimField::Tin => "tin",
            ClaimField::ProviderName => "providerName",
            ClaimField::Npi => "npi",
            ClaimField::ProcedureCode => "procedureCode",
            ClaimField::BillingCodeType => "billingCodeType",
            ClaimField::NegotiatedRate => "negotiatedRate",
            ClaimField::BilledCharge => "billedCharge",
            ClaimField::EffectiveDate => "effectiveDate",
            ClaimField::ExpirationDate => "expirationDate",
            ClaimField::ServiceCode => "serviceCode",
            ClaimField::Description => "description",
            ClaimField::BillingClass => "billingClass",
            ClaimField::PlanName => "planName",
        }
    }

    /// Amount fields can drive aggregation.
    pub fn is_amount(&self) -> bool {
        matches!(self, ClaimField::NegotiatedRate | ClaimField::BilledCharge)
    }
}

impl fmt::Display for ClaimField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ClaimField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.name() == trimmed)
            .ok_or_else(|| format!("Unknown claim field: {s}"))
    }
}

/// A claim whose every field passed its type, format and range check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedClaim {
    pub tin: String,
    pub provider_name: String,
    pub npi: String,
    pub procedure_code: String,
    pub billing_code_type: BillingCodeType,
    #[serde(with = "rust_decimal::serde::float")]
    pub negotiated_rate: Decimal,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub billed_charge: Option<Decimal>,
    pub effective_date: NaiveDate,
    pub expiration_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub billing_class: BillingClass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,
}

impl ValidatedClaim {
    /// String form of one field, used for grouping keys.
    ///
    /// Absent optional fields render as the empty string.
    pub fn field_value(&self, field: ClaimField) -> Cow<'_, str> {
        match field {
            ClaimField::Tin => Cow::Borrowed(&self.tin),
            ClaimField::ProviderName => Cow::Borrowed(&self.provider_name),
            ClaimField::Npi => Cow::Borrowed(&self.npi),
            ClaimField::ProcedureCode => Cow::Borrowed(&self.procedure_code),
            ClaimField::BillingCodeType => Cow::Borrowed(self.billing_code_type.as_str()),
            ClaimField::NegotiatedRate => Cow::Owned(self.negotiated_rate.to_string()),
            ClaimField::BilledCharge => self
                .billed_charge
                .map_or(Cow::Borrowed(""), |value| Cow::Owned(value.to_string())),
            ClaimField::EffectiveDate => {
                Cow::Owned(self.effective_date.format(CLAIM_DATE_FORMAT).to_string())
            }
            ClaimField::ExpirationDate => {
                Cow::Owned(self.expiration_date.format(CLAIM_DATE_FORMAT).to_string())
            }
            ClaimField::ServiceCode => Cow::Borrowed(self.service_code.as_deref().unwrap_or("")),
            ClaimField::Description => Cow::Borrowed(self.description.as_deref().unwrap_or("")),
            ClaimField::BillingClass => Cow::Borrowed(self.billing_class.as_str()),
            ClaimField::PlanName => Cow::Borrowed(self.plan_name.as_deref().unwrap_or("")),
        }
    }

    /// Numeric value of an amount field, `None` for non-amount fields and
    /// for an absent billed charge.
    pub fn amount(&self, field: ClaimField) -> Option<Decimal> {
        match field {
            ClaimField::NegotiatedRate => Some(self.negotiated_rate),
            ClaimField::BilledCharge => self.billed_charge,
            _ => None,
        }
    }

    /// Render the claim back to an untyped record so it can be patched and
    /// re-validated. Absent optional fields are left out.
    pub fn to_raw(&self) -> RawRecord {
        let mut record = RawRecord::new();
        for field in ClaimField::ALL {
            let value = self.field_value(field);
            let is_absent = match field {
                ClaimField::BilledCharge => self.billed_charge.is_none(),
                ClaimField::ServiceCode => self.service_code.is_none(),
                ClaimField::Description => self.description.is_none(),
                ClaimField::PlanName => self.plan_name.is_none(),
                _ => false,
            };
            if !is_absent {
                record.insert(field.name(), RawValue::Text(value.into_owned()));
            }
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    fn claim() -> ValidatedClaim {
        ValidatedClaim {
            tin: "12-3456789".to_string(),
            provider_name: "Acme Clinic".to_string(),
            npi: "1234567890".to_string(),
            procedure_code: "99213".to_string(),
            billing_code_type: BillingCodeType::Cpt,
            negotiated_rate: dec!(100.50),
            billed_charge: None,
            effective_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            expiration_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            service_code: Some("11".to_string()),
            description: None,
            billing_class: BillingClass::Professional,
            plan_name: None,
        }
    }

    #[test]
    fn field_names_round_trip() {
        for field in ClaimField::ALL {
            assert_eq!(field.name().parse::<ClaimField>().unwrap(), field);
        }
    }

    #[test]
    fn to_raw_skips_absent_optionals() {
        let raw = claim().to_raw();
        assert!(raw.contains("serviceCode"));
        assert!(!raw.contains("description"));
        assert!(!raw.contains("billedCharge"));
        assert_eq!(
            raw.get("effectiveDate").and_then(RawValue::as_text).as_deref(),
            Some("2024-01-01")
        );
        assert_eq!(
            raw.get("negotiatedRate").and_then(RawValue::as_text).as_deref(),
            Some("100.50")
        );
    }

    #[test]
    fn field_value_for_absent_optional_is_empty() {
        let claim = claim();
        assert_eq!(claim.field_value(ClaimField::Description), "");
        assert_eq!(claim.field_value(ClaimField::BillingCodeType), "CPT");
    }
}
