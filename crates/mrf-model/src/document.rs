//! Output document shape for the out-of-network allowed-amounts MRF.
//!
//! Nesting, outermost first: document → code-level item → allowed amount
//! (one per tax id) → payment → provider. Unknown keys are rejected when a
//! document is parsed back, so the types double as the schema.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::{BillingClass, BillingCodeType, MarketType, PlanIdType, TinType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MrfDocument {
    pub reporting_entity_name: String,
    pub reporting_entity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id_type: Option<PlanIdType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_market_type: Option<MarketType>,
    pub out_of_network: Vec<OutOfNetworkItem>,
    /// Serialized as `YYYY-MM-DD`.
    pub last_updated_on: NaiveDate,
    pub version: String,
}

impl MrfDocument {
    /// Number of provider entries across all items.
    pub fn provider_count(&self) -> usize {
        self.out_of_network
            .iter()
            .flat_map(|item| &item.allowed_amounts)
            .flat_map(|allowed| &allowed.payments)
            .map(|payment| payment.providers.len())
            .sum()
    }
}

/// Code-level entry, one per aggregated bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutOfNetworkItem {
    pub name: String,
    pub billing_code_type: BillingCodeType,
    pub billing_code: String,
    pub billing_code_type_version: String,
    pub description: String,
    pub allowed_amounts: Vec<AllowedAmount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AllowedAmount {
    pub tin: TaxIdentifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_code: Option<Vec<String>>,
    pub billing_class: BillingClass,
    pub payments: Vec<OutOfNetworkPayment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaxIdentifier {
    #[serde(rename = "type")]
    pub tin_type: TinType,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutOfNetworkPayment {
    #[serde(with = "rust_decimal::serde::float")]
    pub allowed_amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_code_modifier: Option<Vec<String>>,
    pub providers: Vec<PaymentProvider>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaymentProvider {
    #[serde(with = "rust_decimal::serde::float")]
    pub billed_charge: Decimal,
    pub npi: Vec<String>,
}
