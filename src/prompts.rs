//! Fixed prompt template for the plan generator.
//!
//! The system instruction names the five sections the extraction rule in
//! [`crate::extract`] looks for; keep the two in step.

use serde::{Deserialize, Serialize};

use crate::models::Section;

/// One chat message in the role/content shape both backends accept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Per-section guidance, in prompt order
fn section_guidance(section: Section) -> &'static str {
    match section {
        Section::BusinessGoals => "Summarize 2-3 key goals based on the input",
        Section::Challenges => "List 2-3 potential challenges",
        Section::TargetAudience => "Describe the audience and their preferences",
        Section::RevenueStreams => "Provide 2-3 revenue generation ideas",
        Section::ProfitRange => "Estimate based on industry averages",
    }
}

/// System instruction describing the five labelled sections
pub fn system_prompt() -> String {
    let mut prompt = String::with_capacity(640);
    prompt.push_str(
        "You are a business analyst AI trained to generate detailed business plans. \
         Your response should always follow this structure:\n",
    );
    for (i, section) in Section::ALL.iter().enumerate() {
        prompt.push_str(&format!(
            "{}. **{}**: ({})\n",
            i + 1,
            section.label(),
            section_guidance(*section)
        ));
    }
    prompt.push_str("Focus on accuracy, feasibility, and industry-specific insights.");
    prompt
}

/// User message carrying the two industry labels verbatim
pub fn user_prompt(main_industry: &str, sub_industry: &str) -> String {
    format!("Main Industry: {main_industry}, Sub Industry: {sub_industry}")
}

/// Full message list for one generation request
pub fn plan_messages(main_industry: &str, sub_industry: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(system_prompt()),
        ChatMessage::user(user_prompt(main_industry, sub_industry)),
    ]
}
