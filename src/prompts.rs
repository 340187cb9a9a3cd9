//! Provider-agnostic payload text built from a name and a profession.

use crate::error::ValidationError;
use crate::professions::scenario_for;

pub const IMAGE_TEMPLATE: &str = include_str!("../data/prompts/image.txt");
pub const NEGATIVE: &str = include_str!("../data/prompts/negative.txt");
pub const TEXT_SYSTEM: &str = include_str!("../data/prompts/text_system.txt");
pub const TEXT_USER: &str = include_str!("../data/prompts/text_user.txt");

pub const SHARE_GREETING: &str = "Mira mi postal épica ✨";

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 60;

/// Replace `{{key}}` placeholders in a template string.
///
/// One left-to-right pass: inserted values are never scanned again, so a
/// value that itself looks like a placeholder is kept verbatim. Unknown
/// placeholders are left as they are.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let template = template.trim();
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            rest = &rest[start..];
            break;
        };

        let key = &after_open[..end];
        match vars.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => result.push_str(value),
            None => result.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after_open[end + 2..];
    }

    result.push_str(rest);
    result
}

pub fn build_image_prompt(name: &str, profession: &str) -> String {
    let config = scenario_for(profession);
    render(
        IMAGE_TEMPLATE,
        &[
            ("name", name),
            ("profession", profession),
            ("scenario", &config.scenario),
        ],
    )
}

pub fn build_negative_prompt() -> String {
    NEGATIVE.trim().to_string()
}

pub fn build_text_prompt(name: &str, profession: &str) -> String {
    render(TEXT_USER, &[("name", name), ("profession", profession)])
}

/// Message handed to the messaging share action.
///
/// Always five blank-line separated sections: blank lines inside the inputs
/// are collapsed so they cannot add sections of their own.
pub fn build_share_message(
    name: &str,
    profession: &str,
    description: &str,
    image_url: &str,
) -> String {
    [
        SHARE_GREETING.to_string(),
        format!("Nombre: {}", collapse_blank_lines(name)),
        format!("Profesión: {}", collapse_blank_lines(profession)),
        collapse_blank_lines(description),
        collapse_blank_lines(image_url),
    ]
    .join("\n\n")
}

fn collapse_blank_lines(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check the request fields, reporting only the first rule that fails.
pub fn validate_request_fields(name: &str, profession: &str) -> Result<(), ValidationError> {
    if name.trim().chars().count() < NAME_MIN_CHARS {
        return Err(ValidationError::new(format!(
            "The name must have at least {} characters",
            NAME_MIN_CHARS
        )));
    }

    if name.chars().count() > NAME_MAX_CHARS {
        return Err(ValidationError::new(format!(
            "The name cannot be longer than {} characters",
            NAME_MAX_CHARS
        )));
    }

    if !name_charset_ok(name) {
        return Err(ValidationError::new(
            "Only letters and spaces are allowed in the name",
        ));
    }

    if profession.trim().is_empty() {
        return Err(ValidationError::new("A profession must be selected"));
    }

    Ok(())
}

/// Letters and spaces, plus combining marks that follow a letter (decomposed
/// accents such as `e\u{301}`).
fn name_charset_ok(name: &str) -> bool {
    let mut after_letter = false;
    for c in name.chars() {
        after_letter = if c.is_alphabetic() || (after_letter && is_combining_mark(c)) {
            true
        } else if c == ' ' {
            false
        } else {
            return false;
        };
    }
    true
}

fn is_combining_mark(c: char) -> bool {
    matches!(
        c,
        '\u{0300}'..='\u{036F}'
            | '\u{1AB0}'..='\u{1AFF}'
            | '\u{1DC0}'..='\u{1DFF}'
            | '\u{20D0}'..='\u{20FF}'
            | '\u{FE20}'..='\u{FE2F}'
    )
}
