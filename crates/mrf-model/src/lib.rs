//! Shared data model for the out-of-network MRF builder.

pub mod aggregate;
pub mod claim;
pub mod config;
pub mod document;
pub mod enums;
pub mod error;
pub mod raw;
pub mod validation;

pub use aggregate::{AggregatedEntry, GROUP_KEY_SEPARATOR, GroupKey, ProviderIdentity};
pub use claim::{CLAIM_DATE_FORMAT, ClaimField, ValidatedClaim};
pub use config::{PlanInfo, ReportingConfig, ReportingEntity};
pub use document::{
    AllowedAmount, MrfDocument, OutOfNetworkItem, OutOfNetworkPayment, PaymentProvider,
    TaxIdentifier,
};
pub use enums::{BillingClass, BillingCodeType, MarketType, PlanIdType, TinType};
pub use error::{MrfError, Result};
pub use raw::{RawRecord, RawValue};
pub use validation::{BatchValidationResult, FieldError, ValidationErrorMap};
