// Prompt assembly for the gameweek summary.
//
// The prompt is the task template, a tone annotation line, the detail
// template and finally the match reports as JSON. Nothing is reworded; the
// templates are user-editable and go in verbatim.

use crate::config::Tone;
use crate::model::MatchReport;

/// Label of the tone annotation line. The detail template refers to it.
pub const TONE_LABEL: &str = "Brutality Level";

pub fn tone_line(tone: Tone) -> String {
    format!("{TONE_LABEL}: {tone}")
}

/// Match reports as pretty-printed JSON. Field order follows the structs,
/// so the output is stable for identical input.
pub fn render_reports(reports: &[MatchReport]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(reports)
}

/// Build the full LLM input.
pub fn assemble_prompt(
    task_template: &str,
    detail_template: &str,
    tone: Tone,
    reports: &[MatchReport],
) -> serde_json::Result<String> {
    let rendered = render_reports(reports)?;
    let mut prompt =
        String::with_capacity(task_template.len() + detail_template.len() + rendered.len() + 32);

    prompt.push_str(task_template);
    prompt.push('\n');
    prompt.push_str(&tone_line(tone));
    prompt.push('\n');
    prompt.push_str(detail_template);
    prompt.push('\n');
    prompt.push_str(&rendered);
    prompt.push('\n');

    Ok(prompt)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
