use crm_core::types::CampaignType;

/// Build the directive prompt sent to the text service.
pub fn build_prompt(objective: &str, campaign_type: CampaignType) -> String {
    format!(
        "Generate exactly 3 to 4 personalized campaign messages.

Context:
User Prompt: {objective}
Campaign Type: {campaign_type}

Rules:
- Start each message with a number (1., 2., 3., etc.)
- Do NOT include any explanation, intro, or extra text
- Only return the 3 to 4 messages
- Each message should be short, engaging, and personalized."
    )
}

/// Objective used when copy is requested for a segment rather than typed in.
pub fn segment_objective(segment_name: &str) -> String {
    format!("Generate a message for {segment_name}")
}
