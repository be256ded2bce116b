//! Battlecard generation
//!
//! Turns an accepted submission into the internal sales battlecard via
//! one LLM exchange, with a deterministic fallback when the LLM is
//! unconfigured, unreachable, or returns output that cannot be parsed.
//! `generate` is total: it never fails, it only degrades.

use chrono::{DateTime, Utc};
use monpro_common::catalog::automation_catalog;
use monpro_common::diagnostic::DiagnosticSubmission;
use monpro_common::Result;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::models::{Battlecard, EstimatedRoi};
use crate::services::openai_client::OpenAiClient;

/// Fixed system instruction for the triage model
///
/// Output is internal-only, addressed to the operator, and must be a
/// single JSON object with no prose or fences.
const SYSTEM_PROMPT: &str = "\
You are the private automation-consulting triage assistant inside MonPro-AI.
You speak TO the operator (the consultant), never to the lead.
Your output is INTERNAL ONLY, used for the operator's decision-making.

Hard rules:
- Output ONLY valid JSON. No markdown. No code fences.
- Never address the client directly. Address the operator in second person (\"you\").
- Prefer the provided automation catalog for e-commerce paths (scaler/founder).
- If you suggest anything not in the catalog, label it as \"nonCatalogHypotheses\" and include assumptions + confidence.
- For explorer path: avoid firm pricing/ROI; focus on what info you'd need and what a minimal next step would be.
- Never claim you performed web research. Do not cite sources.
";

/// Battlecard generator; holds the optional LLM client
///
/// Without a client (no credential configured) every submission takes
/// the fallback path.
pub struct BattlecardGenerator {
    llm: Option<OpenAiClient>,
}

impl BattlecardGenerator {
    pub fn new(llm: Option<OpenAiClient>) -> Self {
        Self { llm }
    }

    /// Generate a battlecard for an accepted submission
    ///
    /// Never fails: any error in the LLM call, extraction, or mapping is
    /// logged and replaced by the fallback battlecard.
    pub async fn generate(&self, submission: &DiagnosticSubmission) -> Battlecard {
        let now = Utc::now();
        let lead_id = Battlecard::new_lead_id(now);

        let Some(llm) = &self.llm else {
            warn!(lead_id = %lead_id, "LLM credential not configured; using fallback battlecard");
            return fallback_battlecard(submission, lead_id, now);
        };

        match self.generate_with_llm(llm, submission, &lead_id, now).await {
            Ok(card) => {
                info!(
                    lead_id = %lead_id,
                    revenue_leaks = card.revenue_leaks.len(),
                    manual_friction = card.manual_friction.len(),
                    automations = card.recommended_automations.len(),
                    "Battlecard generated with LLM analysis"
                );
                card
            }
            Err(e) => {
                error!(lead_id = %lead_id, error = %e, "Battlecard generation failed; using fallback");
                fallback_battlecard(submission, lead_id, now)
            }
        }
    }

    async fn generate_with_llm(
        &self,
        llm: &OpenAiClient,
        submission: &DiagnosticSubmission,
        lead_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Battlecard> {
        let prompt = build_diagnostic_prompt(submission);
        let content = llm.chat(SYSTEM_PROMPT, &prompt).await?;

        let json_text = extract_json(&content).ok_or_else(|| {
            monpro_common::Error::Internal("LLM did not return a valid JSON object".to_string())
        })?;

        let analysis: TriageAnalysis = serde_json::from_str(json_text).map_err(|e| {
            monpro_common::Error::Internal(format!("LLM output failed schema parse: {}", e))
        })?;

        Ok(map_analysis(analysis, submission, lead_id.to_string(), now))
    }
}

/// Build the per-submission user prompt: lead identity, raw answers,
/// the automation catalog, path rules, and the exact output schema
fn build_diagnostic_prompt(submission: &DiagnosticSubmission) -> String {
    let currency_symbol = submission.region.currency_symbol();
    let currency_code = submission.region.currency_code();

    let answers_json = serde_json::to_string_pretty(&submission.answers)
        .unwrap_or_else(|_| "{}".to_string());
    let catalog_json = serde_json::to_string_pretty(&automation_catalog())
        .unwrap_or_else(|_| "[]".to_string());

    let delivery_line = submission
        .delivery_method
        .map(|m| {
            let label = match m {
                monpro_common::diagnostic::DeliveryMethod::Email => "email",
                monpro_common::diagnostic::DeliveryMethod::Whatsapp => "whatsapp",
            };
            format!("\n- Preferred Delivery: {}", label)
        })
        .unwrap_or_default();
    let phone_line = submission
        .phone
        .as_deref()
        .map(|p| format!("\n- WhatsApp: {}", p))
        .unwrap_or_default();

    format!(
        r#"Turn the lead's diagnostic into an INTERNAL battlecard that helps you (the operator) decide:
- Is this lead worth time?
- What automations are most plausible?
- What pricing range is plausible (rough)?
- What follow-up info is needed?
This is NOT client-facing.

LEAD:
- Region: {region}
- Path: {path}
- Name: {first} {last}
- Brand: {brand}
- Email: {email}{delivery_line}{phone_line}

RAW ANSWERS:
{answers_json}

CATALOG (authoritative for scaler/founder):
{catalog_json}

PATH RULES:
- If path is "scaler" or "founder":
  - Choose "catalogAutomations" ONLY from the catalog. Do not invent catalog entries.
  - If something is useful but missing, put it under "nonCatalogHypotheses" with low confidence + assumptions.
- If path is "operator":
  - Use catalog only if relevant; otherwise propose ops automations as hypotheses.
- If path is "explorer":
  - No hard pricing/ROI. Keep it educational + qualification-focused.
  - Priority score should usually be low unless answers show urgency.

OUTPUT: STRICT JSON ONLY. Match this schema EXACTLY:

{{
  "mode": "internal_triage",
  "narrative": {{
    "oneLine": "Say what's going on in plain English to the operator",
    "whyThisMatters": "1-2 lines explaining why this lead is/ isn't valuable",
    "likelyWin": "What can realistically be sold (implementation only; no DIY)",
    "riskFlags": ["..."],
    "missingClarity": ["..."]
  }},
  "leadProfile": {{
    "pathRationale": "Why they match this path based on answers",
    "urgencyLevel": "low|medium|high",
    "budgetSignal": "low|medium|high|unknown",
    "complexity": "low|medium|high"
  }},
  "diagnosticInsights": {{
    "revenueLeaks": ["3-5 plausible leaks tied to answers"],
    "manualFriction": ["3-5 plausible frictions tied to answers"],
    "constraints": ["team/tools/compliance constraints inferred"]
  }},
  "recommendations": {{
    "catalogAutomations": [
      {{
        "catalogId": "MUST match catalog id if available",
        "name": "catalog automation name",
        "whyItFits": "Explain to the operator, tied to their answers",
        "tooling": "tools implied by catalog + their stack",
        "effort": "Low|Medium|High",
        "implementationRange": "{sym}X–{sym}Y (rough estimate)",
        "impactLevel": "Low|Medium|High"
      }}
    ],
    "nonCatalogHypotheses": [
      {{
        "name": "idea NOT in catalog",
        "whyItFits": "Explain to the operator",
        "assumptions": ["..."],
        "confidence": 0.35
      }}
    ],
    "phasingSuggestion": {{
      "phase1": ["2-3 items by name (quick wins)"],
      "phase2": ["2-3 items by name"],
      "phase3": ["optional"]
    }}
  }},
  "numbers": {{
    "currency": "{code}",
    "pricingConfidence": "low|medium|high",
    "estimatedImplementationCostRange": "{sym}X–{sym}Y",
    "estimatedMonthlyUpsideRange": "{sym}X–{sym}Y",
    "notesToOperator": "Explain uncertainty + what would tighten estimates. Never fake precision."
  }},
  "nextSteps": {{
    "firstFollowUpQuestions": ["max 5 questions to ask next"],
    "recommendedOffer": "Implementation-only (no DIY). Suggest: Phase 1 pilot → full rollout",
    "priorityScore": 1,
    "suggestedReplyToLead": "1-2 lines that can be sent to the lead (neutral, non-salesy)"
  }}
}}

IMPORTANT:
- Never address the client directly except inside "suggestedReplyToLead".
- Never invent catalog ids.
- If no suitable catalog items exist, keep catalogAutomations empty and use nonCatalogHypotheses.
- Output JSON only."#,
        region = submission.region.as_str(),
        path = submission.path.as_str(),
        first = submission.first_name,
        last = submission.last_name,
        brand = submission.brand_name,
        email = submission.email,
        delivery_line = delivery_line,
        phone_line = phone_line,
        answers_json = answers_json,
        catalog_json = catalog_json,
        sym = currency_symbol,
        code = currency_code,
    )
}

// Parsed model output. Every field is defaulted: a missing section maps
// to empty/default values, while a type mismatch fails the parse and
// routes to the fallback.

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TriageAnalysis {
    diagnostic_insights: TriageInsights,
    recommendations: TriageRecommendations,
    numbers: TriageNumbers,
    next_steps: TriageNextSteps,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TriageInsights {
    revenue_leaks: Vec<String>,
    manual_friction: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TriageRecommendations {
    catalog_automations: Vec<CatalogRecommendation>,
    non_catalog_hypotheses: Vec<Hypothesis>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CatalogRecommendation {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Hypothesis {
    name: String,
    confidence: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TriageNumbers {
    currency: String,
    estimated_implementation_cost_range: String,
    estimated_monthly_upside_range: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TriageNextSteps {
    priority_score: Option<i64>,
}

/// Extract the first top-level JSON object from raw model text
///
/// Tolerant of accidental wrapping prose or code fences: takes the slice
/// from the first `{` to the last `}`. Returns `None` when no such pair
/// exists; the caller treats that as a generator failure.
pub fn extract_json(text: &str) -> Option<&str> {
    let first = text.find('{')?;
    let last = text.rfind('}')?;
    if last <= first {
        return None;
    }
    Some(&text[first..=last])
}

/// Parse a currency-formatted "X–Y" range into the floor of its mean
///
/// Collects runs of digits (thousands separators stripped) and takes the
/// first two as low/high bounds. Best-effort: malformed ranges yield 0.
pub fn parse_range_mean(text: &str) -> i64 {
    let mut bounds: Vec<i64> = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        if c.is_ascii_digit() || c == ',' {
            current.push(c);
        } else if !current.is_empty() {
            push_bound(&mut bounds, &current);
            current.clear();
        }
    }
    if !current.is_empty() {
        push_bound(&mut bounds, &current);
    }

    if bounds.len() >= 2 {
        (bounds[0] + bounds[1]) / 2
    } else {
        0
    }
}

fn push_bound(bounds: &mut Vec<i64>, token: &str) {
    let digits: String = token.chars().filter(|c| c.is_ascii_digit()).collect();
    if let Ok(value) = digits.parse::<i64>() {
        bounds.push(value);
    }
}

/// Map a parsed analysis into the battlecard shape
fn map_analysis(
    analysis: TriageAnalysis,
    submission: &DiagnosticSubmission,
    lead_id: String,
    now: DateTime<Utc>,
) -> Battlecard {
    let mut revenue_leaks = analysis.diagnostic_insights.revenue_leaks;
    if revenue_leaks.is_empty() {
        revenue_leaks = pending_review_lines();
    }
    let mut manual_friction = analysis.diagnostic_insights.manual_friction;
    if manual_friction.is_empty() {
        manual_friction = pending_review_lines();
    }

    // Catalog names first, then hypotheses annotated with confidence
    let recommended_automations: Vec<String> = analysis
        .recommendations
        .catalog_automations
        .into_iter()
        .map(|auto| {
            if auto.name.is_empty() {
                "Unnamed automation".to_string()
            } else {
                auto.name
            }
        })
        .chain(analysis.recommendations.non_catalog_hypotheses.into_iter().map(|hypo| {
            let name = if hypo.name.is_empty() {
                "Hypothesis".to_string()
            } else {
                hypo.name
            };
            format!("{} (confidence: {})", name, hypo.confidence)
        }))
        .collect();

    let currency = if analysis.numbers.currency.is_empty() {
        submission.region.currency_code().to_string()
    } else {
        analysis.numbers.currency
    };

    let estimated_roi = EstimatedRoi {
        currency,
        monthly_impact: parse_range_mean(&analysis.numbers.estimated_monthly_upside_range),
        implementation_cost: parse_range_mean(&analysis.numbers.estimated_implementation_cost_range),
    };

    let priority_score = analysis
        .next_steps
        .priority_score
        .unwrap_or(50)
        .clamp(0, 100) as u8;

    Battlecard {
        lead_id,
        region: submission.region,
        path: submission.path,
        answers: submission.answers.clone(),
        first_name: submission.first_name.clone(),
        last_name: submission.last_name.clone(),
        brand_name: submission.brand_name.clone(),
        email: submission.email.clone(),
        delivery_method: submission.delivery_method,
        phone: submission.phone.clone(),
        revenue_leaks,
        manual_friction,
        recommended_automations,
        estimated_roi,
        priority_score,
        generated_at: now,
        raw_data: submission.clone(),
    }
}

fn pending_review_lines() -> Vec<String> {
    vec![
        "[Analysis pending] Manual review required".to_string(),
        "Automated analysis unavailable - consultant will analyze manually".to_string(),
        "Check raw answers for context".to_string(),
    ]
}

/// The deterministic battlecard used when LLM analysis is unavailable
fn fallback_battlecard(
    submission: &DiagnosticSubmission,
    lead_id: String,
    now: DateTime<Utc>,
) -> Battlecard {
    Battlecard {
        lead_id,
        region: submission.region,
        path: submission.path,
        answers: submission.answers.clone(),
        first_name: submission.first_name.clone(),
        last_name: submission.last_name.clone(),
        brand_name: submission.brand_name.clone(),
        email: submission.email.clone(),
        delivery_method: submission.delivery_method,
        phone: submission.phone.clone(),
        revenue_leaks: pending_review_lines(),
        manual_friction: pending_review_lines(),
        recommended_automations: vec![
            "[Awaiting manual review] Automated analysis unavailable".to_string(),
            "Consultant will review submission and provide recommendations".to_string(),
        ],
        estimated_roi: EstimatedRoi::zero_for_region(submission.region),
        priority_score: 50,
        generated_at: now,
        raw_data: submission.clone(),
    }
}
