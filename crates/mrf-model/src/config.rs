//! Reporting configuration supplied by the caller.
//!
//! Stored as TOML. Every field has a default so an empty file is a valid
//! configuration; the defaults match the reporting entity the tool was first
//! built for.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::claim::ClaimField;
use crate::enums::{MarketType, PlanIdType};
use crate::error::{MrfError, Result};

pub const DEFAULT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportingConfig {
    /// Fields whose values form the group key, in key order.
    pub grouping_fields: Vec<ClaimField>,
    /// Amount field averaged per bucket.
    pub rate_field: ClaimField,
    /// Static version string stamped on every document.
    pub version: String,
    /// Overrides `billing_code_type_version`; defaults to the as-of year.
    pub billing_code_type_version: Option<String>,
    pub reporting_entity: ReportingEntity,
    pub plan: PlanInfo,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            grouping_fields: vec![
                ClaimField::ProcedureCode,
                ClaimField::BillingCodeType,
                ClaimField::ServiceCode,
            ],
            rate_field: ClaimField::NegotiatedRate,
            version: DEFAULT_VERSION.to_string(),
            billing_code_type_version: None,
            reporting_entity: ReportingEntity::default(),
            plan: PlanInfo::default(),
        }
    }
}

impl ReportingConfig {
    /// Parse and validate a TOML configuration.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ReportingConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| MrfError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.grouping_fields.is_empty() {
            return Err(MrfError::Config(
                "grouping_fields must name at least one field".to_string(),
            ));
        }
        let mut seen = BTreeSet::new();
        for field in &self.grouping_fields {
            if !seen.insert(*field) {
                return Err(MrfError::Config(format!(
                    "grouping field {field} is listed more than once"
                )));
            }
        }
        if !self.rate_field.is_amount() {
            return Err(MrfError::Config(format!(
                "rate_field must be an amount field, got {}",
                self.rate_field
            )));
        }
        if self.version.trim().is_empty() {
            return Err(MrfError::Config("version must not be empty".to_string()));
        }
        if self.reporting_entity.name.trim().is_empty() {
            return Err(MrfError::Config(
                "reporting_entity.name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportingEntity {
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: String,
}

impl Default for ReportingEntity {
    fn default() -> Self {
        Self {
            name: "Clearest Health".to_string(),
            entity_type: "health insurance issuer".to_string(),
        }
    }
}

/// Plan identity. A missing `name` falls back to the first claim's plan name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanInfo {
    pub name: Option<String>,
    pub id_type: Option<PlanIdType>,
    pub id: Option<String>,
    pub market_type: Option<MarketType>,
}

impl Default for PlanInfo {
    fn default() -> Self {
        Self {
            name: None,
            id_type: Some(PlanIdType::Ein),
            id: Some("12-3456789".to_string()),
            market_type: Some(MarketType::Group),
        }
    }
}
