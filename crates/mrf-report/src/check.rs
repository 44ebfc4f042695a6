//! Structural checks the type system cannot express.

use mrf_model::{MrfDocument, MrfError, Result};

/// Verify a parsed document against the output schema's value rules.
pub fn check_document(document: &MrfDocument) -> Result<()> {
    if document.reporting_entity_name.trim().is_empty() {
        return Err(schema_error("reporting_entity_name is empty"));
    }
    if document.version.trim().is_empty() {
        return Err(schema_error("version is empty"));
    }
    if document.out_of_network.is_empty() {
        return Err(schema_error("out_of_network has no items"));
    }
    for (item_idx, item) in document.out_of_network.iter().enumerate() {
        let at = format!("out_of_network[{item_idx}]");
        if item.billing_code.trim().is_empty() {
            return Err(schema_error(format!("{at}.billing_code is empty")));
        }
        if item.allowed_amounts.is_empty() {
            return Err(schema_error(format!("{at}.allowed_amounts is empty")));
        }
        for (allowed_idx, allowed) in item.allowed_amounts.iter().enumerate() {
            let at = format!("{at}.allowed_amounts[{allowed_idx}]");
            if allowed.tin.value.trim().is_empty() {
                return Err(schema_error(format!("{at}.tin.value is empty")));
            }
            if allowed.payments.is_empty() {
                return Err(schema_error(format!("{at}.payments is empty")));
            }
            for (payment_idx, payment) in allowed.payments.iter().enumerate() {
                let at = format!("{at}.payments[{payment_idx}]");
                if payment.allowed_amount.is_sign_negative() && !payment.allowed_amount.is_zero()
                {
                    return Err(schema_error(format!("{at}.allowed_amount is negative")));
                }
                if payment.providers.is_empty() {
                    return Err(schema_error(format!("{at}.providers is empty")));
                }
                for (provider_idx, provider) in payment.providers.iter().enumerate() {
                    let at = format!("{at}.providers[{provider_idx}]");
                    if provider.npi.is_empty() {
                        return Err(schema_error(format!("{at}.npi is empty")));
                    }
                    if provider.billed_charge.is_sign_negative()
                        && !provider.billed_charge.is_zero()
                    {
                        return Err(schema_error(format!("{at}.billed_charge is negative")));
                    }
                }
            }
        }
    }
    Ok(())
}

fn schema_error(message: impl Into<String>) -> MrfError {
    MrfError::Schema(message.into())
}
