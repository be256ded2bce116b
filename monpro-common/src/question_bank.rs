//! Static question bank for the diagnostic wizard
//!
//! Questions are immutable static data, indexed by path. Region never
//! changes question structure, only relabels currency tokens in titles
//! and option labels (and swaps the budget ranges for the
//! `investment_range` question).

use crate::diagnostic::{Region, UserPath};
use serde::Serialize;

/// One selectable option of a question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct McqOption {
    pub label: String,
    pub value: String,
}

fn opt(label: &str, value: &str) -> McqOption {
    McqOption {
        label: label.to_string(),
        value: value.to_string(),
    }
}

/// One wizard step's prompt
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Unique within a path
    pub id: String,
    pub title: String,
    pub options: Vec<McqOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helper_text: Option<String>,
    pub multi_select: bool,
    /// Option values mutually exclusive with all others
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclusive_options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_selections: Option<usize>,
}

impl Question {
    fn single(id: &str, title: &str, options: Vec<McqOption>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            options,
            helper_text: None,
            multi_select: false,
            exclusive_options: Vec::new(),
            max_selections: None,
        }
    }

    fn multi(id: &str, title: &str, options: Vec<McqOption>) -> Self {
        Self {
            multi_select: true,
            ..Self::single(id, title, options)
        }
    }

    fn helper(mut self, text: &str) -> Self {
        self.helper_text = Some(text.to_string());
        self
    }

    fn exclusive(mut self, values: &[&str]) -> Self {
        self.exclusive_options = values.iter().map(|v| v.to_string()).collect();
        self
    }

    fn max(mut self, n: usize) -> Self {
        self.max_selections = Some(n);
        self
    }
}

/// Path information for the selection screen
#[derive(Debug, Clone, Serialize)]
pub struct PathInfo {
    pub id: UserPath,
    pub title: String,
    pub subtitle: String,
    pub description: String,
}

/// Path metadata shown on the selection screen
pub fn path_info(path: UserPath) -> PathInfo {
    let (title, subtitle, description) = match path {
        UserPath::Scaler => (
            "The Scaler",
            "Active E-commerce",
            "You have existing order volume with operational friction points.",
        ),
        UserPath::Founder => (
            "The Founder",
            "Launching / Aspirant",
            "Pre-launch or early-stage with product defined, systems not yet built.",
        ),
        UserPath::Operator => (
            "The Operator",
            "Service / Agency / B2B",
            "Operations-heavy business with process friction.",
        ),
        UserPath::Explorer => (
            "The Explorer",
            "Curious / Researching",
            "Exploring automation trends and future possibilities.",
        ),
    };
    PathInfo {
        id: path,
        title: title.to_string(),
        subtitle: subtitle.to_string(),
        description: description.to_string(),
    }
}

fn scaler_questions() -> Vec<Question> {
    vec![
        Question::multi(
            "platform_stack",
            "Which platform(s) do you currently use?",
            vec![
                opt("Shopify", "shopify"),
                opt("WooCommerce", "woocommerce"),
                opt("Custom website", "custom"),
                opt("Marketplaces only (Amazon, Etsy, etc.)", "marketplaces"),
                opt("Not live yet", "not_live"),
            ],
        )
        .helper("Select all that apply.")
        .exclusive(&["not_live"]),
        Question::single(
            "order_volume",
            "What is your current monthly order volume?",
            vec![
                opt("<100", "under_100"),
                opt("100–500", "100_500"),
                opt("500–2000", "500_2000"),
                opt("2000+", "over_2000"),
            ],
        ),
        Question::multi(
            "key_channels",
            "Where do most of your orders or leads come from?",
            vec![
                opt("Paid ads (Google, Meta)", "paid_ads"),
                opt("Organic / SEO", "organic"),
                opt("Marketplaces", "marketplaces"),
                opt("Social DMs / WhatsApp", "social_dms"),
                opt("Referrals / word of mouth", "referrals"),
            ],
        )
        .helper("Select your top 2–3 channels.")
        .max(3),
        Question::single(
            "team_capacity",
            "How many people actively touch operations weekly?",
            vec![
                opt("Solo (just me)", "solo"),
                opt("2–3 people", "small"),
                opt("4–10 people", "medium"),
                opt("10+ people", "large"),
            ],
        ),
        Question::single(
            "manual_hours",
            "How many hours per week are spent on manual data entry or order updates?",
            vec![
                opt("<5 hours", "under_5"),
                opt("5–15 hours", "5_15"),
                opt("15–40 hours", "15_40"),
                opt("40+ hours", "over_40"),
            ],
        ),
        Question::multi(
            "automation_priority",
            "Which areas need automation most urgently?",
            vec![
                opt("Customer support", "support"),
                opt("Inventory sync", "inventory"),
                opt("Post-purchase revenue", "revenue"),
                opt("Marketing execution", "marketing"),
                opt("None currently", "none"),
            ],
        )
        .helper("Select all that apply—most businesses have 2-3 critical pain points.")
        .exclusive(&["none"]),
        Question::single(
            "cart_abandonment",
            "What is your current abandoned cart rate?",
            vec![
                opt("I don't know", "unknown"),
                opt("~50%", "rate_50"),
                opt("~70%", "rate_70"),
                opt("Critical", "critical"),
            ],
        ),
        Question::single(
            "chaos_scale",
            "On a scale of 1–10, how much is manual chaos limiting strategic focus?",
            vec![
                opt("1–3 (Manageable)", "low"),
                opt("4–6 (Noticeable)", "medium"),
                opt("7–8 (Significant)", "high"),
                opt("9–10 (Critical)", "critical"),
            ],
        ),
        Question::single(
            "engagement_preference",
            "How would you prefer to proceed if the roadmap resonates?",
            vec![
                opt("Implement everything for me", "done_for_you"),
                opt("Review the roadmap first, then decide", "review_first"),
                opt("Not sure yet - want to see the roadmap", "unsure"),
            ],
        ),
        Question::single(
            "investment_range",
            "If automation clearly saves time or revenue, which investment range feels reasonable?",
            vec![
                opt("Under €1k", "under_1k"),
                opt("€1k–€3k", "1k_3k"),
                opt("€3k–€10k", "3k_10k"),
                opt("Depends on ROI", "roi_based"),
            ],
        ),
    ]
}

fn founder_questions() -> Vec<Question> {
    vec![
        Question::single(
            "platform_stack",
            "Which platform are you planning to use?",
            vec![
                opt("Shopify", "shopify"),
                opt("WooCommerce", "woocommerce"),
                opt("Custom website", "custom"),
                opt("Marketplaces only", "marketplaces"),
                opt("Not decided yet", "undecided"),
            ],
        ),
        Question::single(
            "product_stage",
            "Where is your product or idea currently?",
            vec![
                opt("Concept only", "concept"),
                opt("Prototype ready", "prototype"),
                opt("Manufacturing", "manufacturing"),
                opt("Ready to sell", "ready"),
            ],
        ),
        Question::multi(
            "launch_worry",
            "What concerns you most about launching?",
            vec![
                opt("Technical complexity", "technical"),
                opt("Marketing cost", "marketing"),
                opt("Logistics & fulfillment", "logistics"),
                opt("Not knowing where to start", "unknown"),
                opt("Cash flow management", "cashflow"),
            ],
        )
        .helper("Select all that apply."),
        Question::single(
            "order_handling",
            "How do you plan to handle orders?",
            vec![
                opt("Solo", "solo"),
                opt("Small team", "team"),
                opt("Third-party logistics", "third_party"),
            ],
        ),
        Question::single(
            "setup_preference",
            "What setup do you want from Day 1?",
            vec![
                opt("Minimalist launch", "minimalist"),
                opt("Future-proof systems", "future_proof"),
                opt("Full automation", "full_automation"),
            ],
        ),
        Question::single(
            "engagement_preference",
            "How would you prefer to proceed if the roadmap resonates?",
            vec![
                opt("Implement everything for me", "done_for_you"),
                opt("Review the roadmap first, then decide", "review_first"),
                opt("Not sure yet - want to see the roadmap", "unsure"),
            ],
        ),
        Question::single(
            "investment_range",
            "If systems clearly support growth, which investment range feels realistic?",
            vec![
                opt("Under €1k", "under_1k"),
                opt("€1k–€3k", "1k_3k"),
                opt("€3k–€10k", "3k_10k"),
                opt("Depends on ROI", "roi_based"),
            ],
        ),
    ]
}

fn operator_questions() -> Vec<Question> {
    vec![
        Question::single(
            "business_type",
            "What best describes your business?",
            vec![
                opt("Service agency", "agency"),
                opt("Professional services", "professional"),
                opt("B2B wholesale", "b2b"),
                opt("SaaS", "saas"),
            ],
        ),
        Question::multi(
            "communication_breakdown",
            "Where does communication typically break down?",
            vec![
                opt("Lead intake & qualification", "lead_intake"),
                opt("Client onboarding", "onboarding"),
                opt("Project status updates", "reporting"),
                opt("Billing & invoicing", "billing"),
                opt("Internal team handoffs", "handoffs"),
            ],
        )
        .helper("Select all that apply—most ops teams face multiple friction points."),
        Question::multi(
            "tracking_method",
            "How are tasks and data currently tracked?",
            vec![
                opt("Sticky notes & chat messages", "manual"),
                opt("Basic spreadsheets", "spreadsheets"),
                opt("Multiple disconnected tools", "disconnected"),
                opt("Custom ERP or CRM", "erp"),
            ],
        )
        .helper("Select all that apply."),
        Question::single(
            "founder_dependency",
            "On a scale of 1–10, how stuck is the business if the founder takes a 2-week vacation?",
            vec![
                opt("1–3 (Fine)", "low"),
                opt("4–6 (Some issues)", "medium"),
                opt("7–8 (Major issues)", "high"),
                opt("9–10 (Critical)", "critical"),
            ],
        ),
    ]
}

fn explorer_questions() -> Vec<Question> {
    vec![
        Question::single(
            "motivation",
            "What brings you to MonPro-AI today?",
            vec![
                opt("Researching AI trends", "research"),
                opt("Planning a future project", "planning"),
                opt("Career inspiration", "career"),
            ],
        ),
        Question::single(
            "interest_area",
            "Which area of AI interests you most?",
            vec![
                opt("Workflow automation", "workflow"),
                opt("Generative content", "generative"),
                opt("Data analysis", "data"),
            ],
        ),
        Question::single(
            "timeline",
            "When do you realistically see yourself investing in automation?",
            vec![
                opt("Just browsing", "browsing"),
                opt("3–6 months", "3_6_months"),
                opt("Later this year", "this_year"),
            ],
        ),
    ]
}

/// Base question set for a path, with default `€` currency tokens
pub fn questions_for_path(path: UserPath) -> Vec<Question> {
    match path {
        UserPath::Scaler => scaler_questions(),
        UserPath::Founder => founder_questions(),
        UserPath::Operator => operator_questions(),
        UserPath::Explorer => explorer_questions(),
    }
}

/// Region-specific budget options for the `investment_range` question
fn budget_ranges(region: Region) -> Vec<McqOption> {
    match region {
        Region::India => vec![
            opt("Under ₹50k", "under_1k"),
            opt("₹50k–₹150k", "1k_3k"),
            opt("₹150k–₹500k", "3k_10k"),
            opt("Depends on ROI / open to discussion", "roi_based"),
        ],
        Region::Europe => vec![
            opt("Under €3k", "under_1k"),
            opt("€3k–€10k", "1k_3k"),
            opt("€10k–€25k", "3k_10k"),
            opt("Depends on ROI / open to discussion", "roi_based"),
        ],
        Region::Uk => vec![
            opt("Under £3k", "under_1k"),
            opt("£3k–£10k", "1k_3k"),
            opt("£10k–£25k", "3k_10k"),
            opt("Depends on ROI / open to discussion", "roi_based"),
        ],
    }
}

/// Question set for a path with region-aware currency relabeling
///
/// Replaces `€` tokens in titles and option labels with the region's
/// symbol; the `investment_range` question gets region-specific budget
/// ranges instead of a plain symbol swap.
pub fn questions_for_region(path: UserPath, region: Region) -> Vec<Question> {
    let currency = region.currency_symbol();

    questions_for_path(path)
        .into_iter()
        .map(|mut q| {
            q.title = q.title.replace('€', currency);
            if q.id == "investment_range" {
                q.options = budget_ranges(region);
            } else {
                for option in &mut q.options {
                    option.label = option.label.replace('€', currency);
                }
            }
            q
        })
        .collect()
}

/// Total question count for a path
pub fn question_count(path: UserPath) -> usize {
    questions_for_path(path).len()
}
