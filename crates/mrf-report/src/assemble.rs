//! Project aggregated entries into the nested MRF document.

use chrono::{Datelike, NaiveDate, Utc};
use indexmap::IndexMap;
use tracing::info;

use mrf_model::{
    AggregatedEntry, AllowedAmount, MrfDocument, MrfError, OutOfNetworkItem,
    OutOfNetworkPayment, PaymentProvider, ProviderIdentity, ReportingConfig, Result,
    TaxIdentifier, TinType,
};

/// Assemble a document stamped with today's (UTC) date.
pub fn assemble(entries: &[AggregatedEntry], config: &ReportingConfig) -> Result<MrfDocument> {
    assemble_on(entries, config, Utc::now().date_naive())
}

/// Assemble a document with an explicit as-of date.
///
/// Entries are kept in order, one code-level item each. Within an item the
/// providers are split by TIN into allowed-amount entries, so every
/// (procedure, provider) pair of the input appears exactly once.
pub fn assemble_on(
    entries: &[AggregatedEntry],
    config: &ReportingConfig,
    as_of: NaiveDate,
) -> Result<MrfDocument> {
    let Some(first) = entries.first() else {
        return Err(MrfError::EmptyInput);
    };

    let code_type_version = config
        .billing_code_type_version
        .clone()
        .unwrap_or_else(|| as_of.year().to_string());
    let out_of_network: Vec<OutOfNetworkItem> = entries
        .iter()
        .map(|entry| project_entry(entry, &code_type_version))
        .collect();

    let document = MrfDocument {
        reporting_entity_name: config.reporting_entity.name.clone(),
        reporting_entity_type: config.reporting_entity.entity_type.clone(),
        plan_name: config.plan.name.clone().or_else(|| first.plan_name.clone()),
        plan_id_type: config.plan.id_type,
        plan_id: config.plan.id.clone(),
        plan_market_type: config.plan.market_type,
        out_of_network,
        last_updated_on: as_of,
        version: config.version.clone(),
    };
    info!(
        items = document.out_of_network.len(),
        providers = document.provider_count(),
        as_of = %as_of,
        "assembled MRF document"
    );
    Ok(document)
}

fn project_entry(entry: &AggregatedEntry, code_type_version: &str) -> OutOfNetworkItem {
    let description = entry.description.clone().unwrap_or_default();
    let name = if description.trim().is_empty() {
        format!("Medical service: {}", entry.billing_code)
    } else {
        description.clone()
    };

    let mut by_tin: IndexMap<&str, Vec<&ProviderIdentity>> = IndexMap::new();
    for provider in &entry.providers {
        by_tin.entry(provider.tin.as_str()).or_default().push(provider);
    }

    let allowed_amounts = by_tin
        .into_iter()
        .map(|(tin, providers)| AllowedAmount {
            tin: TaxIdentifier {
                tin_type: TinType::Ein,
                value: tin.to_string(),
            },
            service_code: entry.service_code.clone().map(|code| vec![code]),
            billing_class: entry.billing_class,
            payments: vec![OutOfNetworkPayment {
                allowed_amount: entry.rate,
                billing_code_modifier: None,
                providers: providers
                    .into_iter()
                    .map(|provider| PaymentProvider {
                        billed_charge: provider.billed_charge,
                        npi: vec![provider.npi.clone()],
                    })
                    .collect(),
            }],
        })
        .collect();

    OutOfNetworkItem {
        name,
        billing_code_type: entry.billing_code_type,
        billing_code: entry.billing_code.clone(),
        billing_code_type_version: code_type_version.to_string(),
        description,
        allowed_amounts,
    }
}
