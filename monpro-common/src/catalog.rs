//! Static automation catalog
//!
//! The predefined, named automation offerings serialized into battlecard
//! prompts. For scaler/founder paths the generator may only recommend
//! entries from this list; anything else must be labeled a non-catalog
//! hypothesis.

use serde::Serialize;

/// A predefined automation offering
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogAutomation {
    /// Stable catalog id; the generator must never invent these
    pub id: String,
    pub name: String,
    pub description: String,
    /// Typical tooling involved
    pub tooling: String,
    /// Low | Medium | High
    pub effort: String,
}

fn entry(id: &str, name: &str, description: &str, tooling: &str, effort: &str) -> CatalogAutomation {
    CatalogAutomation {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        tooling: tooling.to_string(),
        effort: effort.to_string(),
    }
}

/// The full automation catalog
pub fn automation_catalog() -> Vec<CatalogAutomation> {
    vec![
        entry(
            "cart-recovery",
            "Abandoned Cart Recovery Flow",
            "Multi-touch recovery sequence over email and WhatsApp triggered by checkout abandonment.",
            "Shopify/WooCommerce webhooks, Make, WhatsApp Business API",
            "Low",
        ),
        entry(
            "support-triage",
            "Customer Support Triage",
            "Classifies inbound support messages, answers repeat questions, escalates the rest with full context.",
            "Helpdesk API, Make, LLM classification",
            "Medium",
        ),
        entry(
            "inventory-sync",
            "Cross-channel Inventory Sync",
            "Keeps stock levels consistent across storefront and marketplaces, with low-stock alerts.",
            "Platform APIs, Make, Sheets/ERP connector",
            "Medium",
        ),
        entry(
            "post-purchase-flows",
            "Post-purchase Revenue Flows",
            "Review requests, replenishment reminders and cross-sell sequences keyed to order history.",
            "Store webhooks, email/WhatsApp automation",
            "Low",
        ),
        entry(
            "order-status-updates",
            "Automated Order Status Updates",
            "Proactive shipping and delay notifications, cutting where-is-my-order tickets.",
            "Carrier APIs, store webhooks, messaging API",
            "Low",
        ),
        entry(
            "lead-intake",
            "Lead Intake & Qualification",
            "Captures inbound leads from forms and DMs, scores them, routes qualified ones to a calendar.",
            "Forms, CRM API, Make, scheduling tool",
            "Medium",
        ),
        entry(
            "invoice-chase",
            "Invoice Generation & Chasing",
            "Generates invoices from closed deals and chases overdue payments on a schedule.",
            "Accounting API, Make, email automation",
            "Low",
        ),
        entry(
            "client-onboarding",
            "Client Onboarding Sequence",
            "Kicks off contracts, intake forms, workspace setup and welcome comms from one trigger.",
            "CRM, e-sign API, project tool API",
            "Medium",
        ),
        entry(
            "reporting-digest",
            "Weekly Operations Digest",
            "Pulls KPIs from the stack into one scheduled summary for owners and team leads.",
            "Platform APIs, Sheets, Slack/email delivery",
            "Low",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique() {
        let catalog = automation_catalog();
        let mut ids: Vec<_> = catalog.iter().map(|a| a.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn catalog_serializes_for_prompt_embedding() {
        let json = serde_json::to_string_pretty(&automation_catalog()).unwrap();
        assert!(json.contains("\"id\": \"cart-recovery\""));
        assert!(json.contains("\"effort\""));
    }
}
