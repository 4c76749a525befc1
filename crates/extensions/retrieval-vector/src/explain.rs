//! Human-readable search explanations.

use kernelplan_protocols::ToolCandidate;

/// Description excerpt length, in characters.
const EXCERPT_CHARS: usize = 150;

/// Explain why each candidate matched `query`.
pub fn explain(query: &str, candidates: &[ToolCandidate]) -> String {
    if candidates.is_empty() {
        return format!("No tools found relevant to the query: '{}'", query);
    }

    let mut lines = vec![format!(
        "Most relevant tools for '{}':",
        query
    )];
    for (i, candidate) in candidates.iter().enumerate() {
        lines.push(format!(
            "{}. {} (score: {:.4}): \"{}\"",
            i + 1,
            candidate.name,
            candidate.relevance_score,
            excerpt(&candidate.description)
        ));
    }
    lines.join("\n")
}

fn excerpt(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
