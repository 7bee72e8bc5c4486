//! Role-conditioned system prompts for the free-text path.

/// Leading phrases stripped from catalog role labels before framing the persona.
const ROLE_LABEL_PREFIXES: &[&str] = &["I'm an ", "I'm a ", "I’m an ", "I’m a "];

/// Reduce a catalog role label ("I'm a Tech Lead") to the persona it names
/// ("Tech Lead"). Any other string is returned trimmed but otherwise untouched.
pub fn persona_label(role: &str) -> &str {
    let role = role.trim();
    ROLE_LABEL_PREFIXES
        .iter()
        .find_map(|prefix| role.strip_prefix(prefix))
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .unwrap_or(role)
}

/// System instruction sent ahead of every free-text question.
///
/// The article is always "a"; no guess is made from the label's spelling.
pub fn expert_system_prompt(role: &str) -> String {
    format!(
        "You are an expert assistant specializing in APIs, from the perspective of a {}. \
         Provide a comprehensive, detailed, actionable response.",
        persona_label(role)
    )
}
