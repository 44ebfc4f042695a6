//! Field schema: which keys a raw record must carry and how each is checked.

use mrf_model::ClaimField;

/// How a single field is checked and coerced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text; `empty_message` is reported when the value is blank.
    Text { empty_message: String },
    /// Exactly `len` ASCII digits.
    Digits { len: usize, message: String },
    /// Closed set: CPT, HCPCS, DRG (case-sensitive).
    BillingCodeType,
    /// Closed set: professional, institutional (case-insensitive).
    BillingClass,
    /// Non-negative number, from text or a JSON number.
    Amount { label: String },
    /// Calendar date.
    Date,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: ClaimField,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub fn required(field: ClaimField, kind: FieldKind) -> Self {
        Self {
            field,
            kind,
            required: true,
        }
    }

    pub fn optional(field: ClaimField, kind: FieldKind) -> Self {
        Self {
            field,
            kind,
            required: false,
        }
    }

    pub fn name(&self) -> &'static str {
        self.field.name()
    }
}

fn text(empty_message: &str) -> FieldKind {
    FieldKind::Text {
        empty_message: empty_message.to_string(),
    }
}

fn amount(label: &str) -> FieldKind {
    FieldKind::Amount {
        label: label.to_string(),
    }
}

/// Ordered field checks. Errors are reported in this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    fields: Vec<FieldSpec>,
}

impl FieldSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// The claim upload schema.
    pub fn claims() -> Self {
        Self::new(vec![
            FieldSpec::required(ClaimField::Tin, text("TIN is required")),
            FieldSpec::required(ClaimField::ProviderName, text("Provider name is required")),
            FieldSpec::required(
                ClaimField::Npi,
                FieldKind::Digits {
                    len: 10,
                    message: "NPI must be a 10-digit number".to_string(),
                },
            ),
            FieldSpec::required(ClaimField::ProcedureCode, text("Procedure code is required")),
            FieldSpec::required(ClaimField::BillingCodeType, FieldKind::BillingCodeType),
            FieldSpec::required(ClaimField::NegotiatedRate, amount("Negotiated rate")),
            FieldSpec::optional(ClaimField::BilledCharge, amount("Billed charge")),
            FieldSpec::required(ClaimField::EffectiveDate, FieldKind::Date),
            FieldSpec::required(ClaimField::ExpirationDate, FieldKind::Date),
            FieldSpec::optional(ClaimField::ServiceCode, text("Service code is required")),
            FieldSpec::optional(ClaimField::Description, text("Description is required")),
            FieldSpec::optional(ClaimField::BillingClass, FieldKind::BillingClass),
            FieldSpec::optional(ClaimField::PlanName, text("Plan name is required")),
        ])
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn get(&self, field: ClaimField) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.field == field)
    }
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self::claims()
    }
}
