//! Closed code sets used by claims and the output schema.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coding system a procedure code is defined under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BillingCodeType {
    #[serde(rename = "CPT")]
    Cpt,
    #[serde(rename = "HCPCS")]
    Hcpcs,
    #[serde(rename = "DRG")]
    Drg,
}

impl BillingCodeType {
    pub const ALL: [BillingCodeType; 3] = [Self::Cpt, Self::Hcpcs, Self::Drg];

    pub fn as_str(&self) -> &'static str {
        match self {
            BillingCodeType::Cpt => "CPT",
            BillingCodeType::Hcpcs => "HCPCS",
            BillingCodeType::Drg => "DRG",
        }
    }
}

impl fmt::Display for BillingCodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillingCodeType {
    type Err = String;

    /// Exact, case-sensitive match against the closed set.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|code_type| code_type.as_str() == s)
            .ok_or_else(|| format!("Unknown billing code type: {s}"))
    }
}

/// Claim classification; becomes `billing_class` in the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingClass {
    #[default]
    Professional,
    Institutional,
}

impl BillingClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingClass::Professional => "professional",
            BillingClass::Institutional => "institutional",
        }
    }
}

impl fmt::Display for BillingClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillingClass {
    type Err = String;

    /// Case-insensitive; source systems send both `Professional` and `professional`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "professional" => Ok(BillingClass::Professional),
            "institutional" => Ok(BillingClass::Institutional),
            _ => Err(format!("Unknown billing class: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TinType {
    Ein,
    Npi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanIdType {
    #[serde(rename = "EIN")]
    Ein,
    #[serde(rename = "HIOS")]
    Hios,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketType {
    Group,
    Individual,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn billing_code_type_is_case_sensitive() {
        assert_eq!("CPT".parse::<BillingCodeType>().unwrap(), BillingCodeType::Cpt);
        assert_eq!("HCPCS".parse::<BillingCodeType>().unwrap(), BillingCodeType::Hcpcs);
        assert!("cpt".parse::<BillingCodeType>().is_err());
        assert!("ICD".parse::<BillingCodeType>().is_err());
    }

    #[test]
    fn billing_class_ignores_case() {
        assert_eq!(
            "Institutional".parse::<BillingClass>().unwrap(),
            BillingClass::Institutional
        );
        assert_eq!(
            "PROFESSIONAL".parse::<BillingClass>().unwrap(),
            BillingClass::Professional
        );
        assert!("dental".parse::<BillingClass>().is_err());
    }

    #[test]
    fn plan_id_type_wire_names() {
        assert_eq!(serde_json::to_string(&PlanIdType::Hios).unwrap(), "\"HIOS\"");
        assert_eq!(serde_json::to_string(&MarketType::Group).unwrap(), "\"group\"");
    }
}
