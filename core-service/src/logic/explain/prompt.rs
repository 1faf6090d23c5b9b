//! Explanation prompt

use crate::logic::threat::Verdict;

/// Build the free-text request sent to the text-generation service.
pub fn build_prompt(url: &str, verdict: Verdict, probability: f32) -> String {
    format!(
        "A URL classifier analyzed the URL '{url}'.\n\
         It labelled the URL as '{label}' with a malicious probability of {probability:.2}.\n\
         In plain language, explain why this classification may be correct, \
         and describe the common characteristics of URLs like this one.",
        url = url,
        label = verdict.as_str(),
        probability = probability,
    )
}
