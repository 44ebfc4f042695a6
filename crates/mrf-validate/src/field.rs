//! Single-record validation.
//!
//! Every field in the schema is checked independently and all failures are
//! collected, so a caller can show the full list for a row at once.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use mrf_model::{
    BillingClass, BillingCodeType, ClaimField, FieldError, RawRecord, RawValue, ValidatedClaim,
};

use crate::dates::parse_claim_date;
use crate::schema::{FieldKind, FieldSchema, FieldSpec};

const REQUIRED: &str = "Required";
const INVALID_DATE: &str = "Invalid date format";
const BILLING_CODE_TYPE_MESSAGE: &str = "Billing code type must be CPT, HCPCS, or DRG";
const BILLING_CLASS_MESSAGE: &str = "Billing class must be professional or institutional";

/// A coerced field value, before it is placed on the claim.
#[derive(Debug, Clone, PartialEq)]
enum FieldValue {
    Text(String),
    CodeType(BillingCodeType),
    Class(BillingClass),
    Amount(Decimal),
    Date(NaiveDate),
}

/// Validate one raw record against `schema`.
///
/// Returns the typed claim, or every field failure in schema order.
pub fn validate_record(
    record: &RawRecord,
    schema: &FieldSchema,
) -> Result<ValidatedClaim, Vec<FieldError>> {
    let mut draft = ClaimDraft::default();
    let mut errors = Vec::new();
    for spec in schema.fields() {
        match check_field(record, spec) {
            Ok(Some(value)) => draft.set(spec.field, value),
            Ok(None) => {}
            Err(reason) => errors.push(FieldError::new(spec.name(), reason)),
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }
    draft.finish()
}

/// Render field errors the way they are stored in the error map.
pub fn format_errors(errors: &[FieldError]) -> Vec<String> {
    errors.iter().map(ToString::to_string).collect()
}

fn check_field(record: &RawRecord, spec: &FieldSpec) -> Result<Option<FieldValue>, String> {
    let Some(raw) = record.get(spec.name()) else {
        return if spec.required {
            Err(REQUIRED.to_string())
        } else {
            Ok(None)
        };
    };
    if !spec.required && raw.is_blank() {
        return Ok(None);
    }

    match &spec.kind {
        FieldKind::Text { empty_message } => {
            let text = scalar_text(raw)?;
            match text {
                Some(value) if !value.trim().is_empty() => Ok(Some(FieldValue::Text(value))),
                _ => Err(empty_message.clone()),
            }
        }
        FieldKind::Digits { len, message } => {
            let text = scalar_text(raw)?.unwrap_or_default();
            if text.len() == *len && text.bytes().all(|b| b.is_ascii_digit()) {
                Ok(Some(FieldValue::Text(text)))
            } else {
                Err(message.clone())
            }
        }
        FieldKind::BillingCodeType => raw
            .as_text()
            .and_then(|value| BillingCodeType::from_str(&value).ok())
            .map(|code_type| Some(FieldValue::CodeType(code_type)))
            .ok_or_else(|| BILLING_CODE_TYPE_MESSAGE.to_string()),
        FieldKind::BillingClass => raw
            .as_text()
            .and_then(|value| BillingClass::from_str(&value).ok())
            .map(|class| Some(FieldValue::Class(class)))
            .ok_or_else(|| BILLING_CLASS_MESSAGE.to_string()),
        FieldKind::Amount { label } => {
            let amount = parse_amount(raw).ok_or_else(|| format!("{label} must be a number"))?;
            if amount.is_sign_negative() && !amount.is_zero() {
                return Err(format!("{label} must be a positive number"));
            }
            Ok(Some(FieldValue::Amount(amount)))
        }
        FieldKind::Date => raw
            .as_text()
            .and_then(|value| parse_claim_date(&value))
            .map(|date| Some(FieldValue::Date(date)))
            .ok_or_else(|| INVALID_DATE.to_string()),
    }
}

/// Text content of a scalar. Booleans are not text.
fn scalar_text(raw: &RawValue) -> Result<Option<String>, String> {
    match raw {
        RawValue::Bool(_) | RawValue::Nested(_) => {
            Err(format!("Expected string, received {}", raw.type_name()))
        }
        other => Ok(other.as_text().map(|value| value.into_owned())),
    }
}

/// Coerce a raw value to a decimal amount.
pub fn parse_amount(raw: &RawValue) -> Option<Decimal> {
    let text = match raw {
        RawValue::Text(value) => value.trim().to_string(),
        RawValue::Number(value) => value.to_string(),
        RawValue::Missing | RawValue::Bool(_) | RawValue::Nested(_) => return None,
    };
    // `Decimal` accepts `_` digit separators; claim amounts do not.
    if text.is_empty() || text.contains('_') {
        return None;
    }
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Accumulates coerced values until every field has been checked.
#[derive(Debug, Default)]
struct ClaimDraft {
    tin: Option<String>,
    provider_name: Option<String>,
    npi: Option<String>,
    procedure_code: Option<String>,
    billing_code_type: Option<BillingCodeType>,
    negotiated_rate: Option<Decimal>,
    billed_charge: Option<Decimal>,
    effective_date: Option<NaiveDate>,
    expiration_date: Option<NaiveDate>,
    service_code: Option<String>,
    description: Option<String>,
    billing_class: Option<BillingClass>,
    plan_name: Option<String>,
}

impl ClaimDraft {
    fn set(&mut self, field: ClaimField, value: FieldValue) {
        match (field, value) {
            (ClaimField::Tin, FieldValue::Text(v)) => self.tin = Some(v),
            (ClaimField::ProviderName, FieldValue::Text(v)) => self.provider_name = Some(v),
            (ClaimField::Npi, FieldValue::Text(v)) => self.npi = Some(v),
            (ClaimField::ProcedureCode, FieldValue::Text(v)) => self.procedure_code = Some(v),
            (ClaimField::BillingCodeType, FieldValue::CodeType(v)) => {
                self.billing_code_type = Some(v);
            }
            (ClaimField::NegotiatedRate, FieldValue::Amount(v)) => self.negotiated_rate = Some(v),
            (ClaimField::BilledCharge, FieldValue::Amount(v)) => self.billed_charge = Some(v),
            (ClaimField::EffectiveDate, FieldValue::Date(v)) => self.effective_date = Some(v),
            (ClaimField::ExpirationDate, FieldValue::Date(v)) => self.expiration_date = Some(v),
            (ClaimField::ServiceCode, FieldValue::Text(v)) => self.service_code = Some(v),
            (ClaimField::Description, FieldValue::Text(v)) => self.description = Some(v),
            (ClaimField::BillingClass, FieldValue::Class(v)) => self.billing_class = Some(v),
            (ClaimField::PlanName, FieldValue::Text(v)) => self.plan_name = Some(v),
            (field, _) => {
                tracing::warn!(%field, "schema kind does not match claim field; ignored");
            }
        }
    }

    /// A schema that omits a field the claim cannot do without reports it
    /// as `Required` here.
    fn finish(self) -> Result<ValidatedClaim, Vec<FieldError>> {
        let mut missing = Vec::new();
        let mut need = |field: ClaimField, present: bool| {
            if !present {
                missing.push(FieldError::new(field.name(), REQUIRED));
            }
        };
        need(ClaimField::Tin, self.tin.is_some());
        need(ClaimField::ProviderName, self.provider_name.is_some());
        need(ClaimField::Npi, self.npi.is_some());
        need(ClaimField::ProcedureCode, self.procedure_code.is_some());
        need(ClaimField::BillingCodeType, self.billing_code_type.is_some());
        need(ClaimField::NegotiatedRate, self.negotiated_rate.is_some());
        need(ClaimField::EffectiveDate, self.effective_date.is_some());
        need(ClaimField::ExpirationDate, self.expiration_date.is_some());

        match (
            self.tin,
            self.provider_name,
            self.npi,
            self.procedure_code,
            self.billing_code_type,
            self.negotiated_rate,
            self.effective_date,
            self.expiration_date,
        ) {
            (
                Some(tin),
                Some(provider_name),
                Some(npi),
                Some(procedure_code),
                Some(billing_code_type),
                Some(negotiated_rate),
                Some(effective_date),
                Some(expiration_date),
            ) => Ok(ValidatedClaim {
                tin,
                provider_name,
                npi,
                procedure_code,
                billing_code_type,
                negotiated_rate,
                billed_charge: self.billed_charge,
                effective_date,
                expiration_date,
                service_code: self.service_code,
                description: self.description,
                billing_class: self.billing_class.unwrap_or_default(),
                plan_name: self.plan_name,
            }),
            _ => Err(missing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    fn valid_record() -> RawRecord {
        RawRecord::new()
            .with("tin", "12-3456789")
            .with("providerName", "Acme Clinic")
            .with("npi", "1234567890")
            .with("procedureCode", "99213")
            .with("billingCodeType", "CPT")
            .with("negotiatedRate", "105.50")
            .with("effectiveDate", "2024-01-01")
            .with("expirationDate", "2024-12-31")
            .with("serviceCode", "11")
    }

    #[test]
    fn valid_record_is_coerced() {
        let claim = validate_record(&valid_record(), &FieldSchema::claims()).unwrap();
        assert_eq!(claim.negotiated_rate, dec!(105.50));
        assert_eq!(claim.billing_code_type, BillingCodeType::Cpt);
        assert_eq!(claim.billing_class, BillingClass::Professional);
        assert_eq!(claim.service_code.as_deref(), Some("11"));
        assert_eq!(claim.description, None);
    }

    #[test]
    fn collects_all_errors_in_declaration_order() {
        let record = valid_record()
            .with("npi", "12345")
            .with("billingCodeType", "ICD")
            .with("negotiatedRate", "-4")
            .with("expirationDate", "someday");
        let errors = validate_record(&record, &FieldSchema::claims()).unwrap_err();
        let messages = format_errors(&errors);
        assert_eq!(
            messages,
            vec![
                "npi: NPI must be a 10-digit number",
                "billingCodeType: Billing code type must be CPT, HCPCS, or DRG",
                "negotiatedRate: Negotiated rate must be a positive number",
                "expirationDate: Invalid date format",
            ]
        );
    }

    #[test]
    fn absent_and_blank_required_fields_differ() {
        let mut record = valid_record().with("tin", RawValue::Missing);
        record.remove("providerName");
        let messages = format_errors(&validate_record(&record, &FieldSchema::claims()).unwrap_err());
        assert_eq!(
            messages,
            vec!["tin: TIN is required", "providerName: Required"]
        );
    }

    #[test]
    fn non_numeric_amount() {
        let record = valid_record().with("negotiatedRate", "abc");
        let messages = format_errors(&validate_record(&record, &FieldSchema::claims()).unwrap_err());
        assert_eq!(messages, vec!["negotiatedRate: Negotiated rate must be a number"]);
    }

    #[test]
    fn optional_fields_may_be_blank() {
        let record = valid_record()
            .with("description", RawValue::Missing)
            .with("billedCharge", "")
            .with("billingClass", "Institutional");
        let claim = validate_record(&record, &FieldSchema::claims()).unwrap();
        assert_eq!(claim.billed_charge, None);
        assert_eq!(claim.billing_class, BillingClass::Institutional);
    }

    #[test]
    fn optional_fields_are_still_checked_when_present() {
        let record = valid_record()
            .with("billedCharge", "-1")
            .with("billingClass", "dental");
        let messages = format_errors(&validate_record(&record, &FieldSchema::claims()).unwrap_err());
        assert_eq!(
            messages,
            vec![
                "billedCharge: Billed charge must be a positive number",
                "billingClass: Billing class must be professional or institutional",
            ]
        );
    }

    #[test]
    fn amounts_accept_json_numbers_and_zero() {
        let number: RawValue = serde_json_number("0");
        assert_eq!(parse_amount(&number), Some(Decimal::ZERO));
        assert_eq!(parse_amount(&RawValue::text("1e2")), Some(dec!(100)));
        assert_eq!(parse_amount(&RawValue::text("-0")).map(|d| d.is_zero()), Some(true));
        assert_eq!(parse_amount(&RawValue::Bool(true)), None);
    }

    #[test]
    fn digit_separators_are_not_numbers() {
        assert_eq!(parse_amount(&RawValue::text("1_000")), None);
        assert_eq!(parse_amount(&RawValue::text("1_000.50")), None);
        let record = valid_record().with("negotiatedRate", "1_000");
        let messages = format_errors(&validate_record(&record, &FieldSchema::claims()).unwrap_err());
        assert_eq!(messages, vec!["negotiatedRate: Negotiated rate must be a number"]);
    }

    #[test]
    fn nested_values_are_rejected_per_field() {
        let record = valid_record()
            .with("serviceCode", RawValue::Nested(serde_json::json!(["11"])))
            .with("providerName", RawValue::Nested(serde_json::json!({"first": "A"})));
        let messages = format_errors(&validate_record(&record, &FieldSchema::claims()).unwrap_err());
        assert_eq!(
            messages,
            vec![
                "providerName: Expected string, received object",
                "serviceCode: Expected string, received array",
            ]
        );
    }

    #[test]
    fn schema_without_core_field_reports_it() {
        let schema = FieldSchema::new(
            FieldSchema::claims()
                .fields()
                .iter()
                .filter(|spec| spec.field != ClaimField::Tin)
                .cloned()
                .collect(),
        );
        let messages = format_errors(&validate_record(&valid_record(), &schema).unwrap_err());
        assert_eq!(messages, vec!["tin: Required"]);
    }

    fn serde_json_number(text: &str) -> RawValue {
        RawValue::Number(text.parse().unwrap())
    }
}
