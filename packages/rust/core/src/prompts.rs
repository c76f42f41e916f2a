//! Prompt templates for the three pipeline stages.

/// The rubric the evaluation call checks. Every item must hold for a PASS.
pub const EVALUATION_CRITERIA: [&str; 6] = [
    "Length: At least 300 words",
    "Structure: Has clear introduction, body, and conclusion",
    "Engagement: Uses engaging headlines, examples, or stories",
    "Value: Provides specific, actionable insights (not just generic advice)",
    "Depth: Goes beyond surface-level information",
    "Readability: Uses varied sentence structure and clear language",
];

/// What the single revision pass is asked to fix.
pub const IMPROVEMENT_DIRECTIVES: [&str; 4] = [
    "Making it more engaging and readable",
    "Adding more specific examples or insights",
    "Improving structure and flow",
    "Ensuring it provides clear value to readers",
];

/// Heading that separates the research summary from its source list.
pub const SOURCES_HEADING: &str = "## Sources";

fn numbered(items: &[&str]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {item}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Summarize raw search results into a research brief with sources.
pub fn research_prompt(topic: &str, search_results: &str) -> String {
    format!(
        "Using the following search results, write a research summary for a blog post about {topic}:\n\
         \n\
         {search_results}\n\
         \n\
         Provide:\n\
         1. A concise summary of key findings, recent developments, and actionable insights\n\
         2. List of sources with their titles and URLs for reference\n\
         \n\
         Format your response as:\n\
         [Your summary here]\n\
         \n\
         {SOURCES_HEADING}\n\
         [List the sources with titles and URLs]"
    )
}

/// Write the first draft from the research brief.
pub fn draft_prompt(topic: &str, research: &str) -> String {
    format!(
        "Write an engaging blog post about {topic} using this research:\n\
         \n\
         {research}\n\
         \n\
         Make it informative, well-structured, and engaging for readers."
    )
}

/// Ask for a bare PASS/FAIL verdict on `draft`.
pub fn evaluation_prompt(draft: &str) -> String {
    format!(
        "Evaluate this blog post strictly and respond with only \"PASS\" or \"FAIL\":\n\
         \n\
         {draft}\n\
         \n\
         STRICT CRITERIA (ALL must be met for PASS):\n\
         {criteria}\n\
         \n\
         Count the word length and check each criterion carefully. If ANY criterion fails, respond \"FAIL\".\n\
         If the post is too short, generic, or lacks specific insights, respond \"FAIL\".\n\
         \n\
         Your response:",
        criteria = numbered(&EVALUATION_CRITERIA),
    )
}

/// Ask for one revised version of `draft`.
pub fn improve_prompt(draft: &str) -> String {
    format!(
        "Improve this blog post by:\n\
         {directives}\n\
         \n\
         Original post:\n\
         {draft}\n\
         \n\
         Provide the improved version:",
        directives = numbered(&IMPROVEMENT_DIRECTIVES),
    )
}
