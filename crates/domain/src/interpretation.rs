//! Interpretation — structural extraction of commands from the hybrid text
//! the language model returns.
//!
//! The expected shape is a fenced JSON block followed by a one-sentence
//! summary:
//!
//! ````text
//! ```json
//! {"devices_controlled": ["lock", "blinds"], "action": ["lock", "close"]}
//! ```
//! The house is secured, and visibility to the outside is reduced.
//! ````
//!
//! Anything else degrades to "summary only": malformed output is never an
//! error here.

use serde::{Deserialize, Serialize};

use crate::command::Command;

const FENCE: &str = "```";

/// Commands and summary extracted from one model response.
///
/// Produced once per interpretation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterpretationResult {
    /// Requested commands, in model order.
    pub commands: Vec<Command>,
    /// Human-readable net effect, shown to the user as-is.
    pub summary: String,
    /// The unmodified model response.
    pub raw_text: String,
}

/// JSON object carried in the fenced block.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Directive {
    pub devices_controlled: Vec<String>,
    pub action: Vec<String>,
}

impl Directive {
    /// Pair devices with actions by index, up to the shorter array.
    #[must_use]
    pub fn commands(&self) -> Vec<Command> {
        self.devices_controlled
            .iter()
            .zip(&self.action)
            .map(|(device, action)| Command::new(device, action))
            .collect()
    }

    /// Entries left without a counterpart by [`Directive::commands`].
    #[must_use]
    pub fn unpaired(&self) -> usize {
        self.devices_controlled.len().abs_diff(self.action.len())
    }
}

/// What was found in a model response.
#[derive(Debug)]
pub enum Extraction {
    /// A fenced block holding a well-formed [`Directive`].
    Structured { directive: Directive, summary: String },
    /// A fenced block was found but its content is not a valid directive.
    Malformed(serde_json::Error),
    /// No complete fenced block.
    Unstructured,
}

/// Locate the fenced block in `raw` and decode it.
#[must_use]
pub fn extract(raw: &str) -> Extraction {
    let Some(open) = raw.find(FENCE) else {
        return Extraction::Unstructured;
    };
    let after_open = &raw[open + FENCE.len()..];
    // Optional info string such as `json` directly after the opening fence.
    let info_len = after_open
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(after_open.len());
    let body_and_rest = &after_open[info_len..];
    let Some(close) = body_and_rest.find(FENCE) else {
        return Extraction::Unstructured;
    };
    let body = &body_and_rest[..close];
    let after_close = body_and_rest[close + FENCE.len()..].trim();

    match serde_json::from_str::<Directive>(body) {
        Ok(directive) => {
            let summary = if after_close.is_empty() {
                raw[..open].trim()
            } else {
                after_close
            };
            Extraction::Structured {
                directive,
                summary: summary.to_string(),
            }
        }
        Err(err) => Extraction::Malformed(err),
    }
}

impl InterpretationResult {
    /// Build the result for `raw` from what [`extract`] found in it.
    ///
    /// Without a valid directive block the result has no commands and the
    /// whole trimmed text as summary.
    #[must_use]
    pub fn from_extraction(raw: String, extraction: Extraction) -> Self {
        match extraction {
            Extraction::Structured { directive, summary } => Self {
                commands: directive.commands(),
                summary,
                raw_text: raw,
            },
            Extraction::Malformed(_) | Extraction::Unstructured => Self::summary_only(raw),
        }
    }

    fn summary_only(raw: String) -> Self {
        Self {
            commands: Vec::new(),
            summary: raw.trim().to_string(),
            raw_text: raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> InterpretationResult {
        InterpretationResult::from_extraction(raw.to_string(), extract(raw))
    }

    #[test]
    fn should_extract_single_lock_command_and_summary() {
        let raw = "```json\n{\"devices_controlled\":[\"lock\"],\"action\":[\"lock\"]}\n``` \nThe house is secured.";
        let result = parse(raw);
        assert_eq!(result.commands, vec![Command::new("lock", "lock")]);
        assert_eq!(result.summary, "The house is secured.");
        assert_eq!(result.raw_text, raw);
    }

    #[test]
    fn should_fall_back_to_whole_text_when_no_fence() {
        let result = parse("I can't help with that.");
        assert!(result.commands.is_empty());
        assert_eq!(result.summary, "I can't help with that.");
    }

    #[test]
    fn should_fall_back_to_whole_text_when_json_is_malformed() {
        let raw = "```json\n{\"devices_controlled\": [\"lock\"\n```\nDone.";
        let result = parse(raw);
        assert!(result.commands.is_empty());
        assert_eq!(result.summary, raw);
    }

    #[test]
    fn should_fall_back_when_closing_fence_missing() {
        let raw = "```json\n{\"devices_controlled\":[\"lock\"],\"action\":[\"lock\"]}";
        assert!(matches!(extract(raw), Extraction::Unstructured));
        assert!(parse(raw).commands.is_empty());
    }

    #[test]
    fn should_report_malformed_when_arrays_hold_non_strings() {
        let raw = "```json\n{\"devices_controlled\":[1],\"action\":[\"lock\"]}\n```\nOk.";
        assert!(matches!(extract(raw), Extraction::Malformed(_)));
    }

    #[test]
    fn should_report_malformed_when_a_field_is_missing() {
        let raw = "```json\n{\"devices_controlled\":[\"lock\"]}\n```\nOk.";
        assert!(matches!(extract(raw), Extraction::Malformed(_)));
    }

    #[test]
    fn should_keep_model_order_for_multiple_commands() {
        let raw = "```json\n{\"devices_controlled\": [\"lock\", \"switch\", \"blinds\"], \"action\": [\"unlock\", \"turn off\", \"close\"]}\n```\nSee you later.";
        let result = parse(raw);
        assert_eq!(
            result.commands,
            vec![
                Command::new("lock", "unlock"),
                Command::new("switch", "turn off"),
                Command::new("blinds", "close"),
            ]
        );
        assert_eq!(result.summary, "See you later.");
    }

    #[test]
    fn should_emit_semantically_invalid_pairs_for_validation() {
        let raw = "```json\n{\"devices_controlled\":[\"blinds\",\"toaster\"],\"action\":[\"lock\",\"toast\"]}\n```\nHmm.";
        let result = parse(raw);
        assert_eq!(
            result.commands,
            vec![Command::new("blinds", "lock"), Command::new("toaster", "toast")]
        );
    }

    #[test]
    fn should_pair_up_to_shorter_array() {
        let directive = Directive {
            devices_controlled: vec!["lock".into(), "blinds".into()],
            action: vec!["lock".into()],
        };
        assert_eq!(directive.commands(), vec![Command::new("lock", "lock")]);
        assert_eq!(directive.unpaired(), 1);
    }

    #[test]
    fn should_accept_fence_without_language_tag() {
        let raw = "```\n{\"devices_controlled\":[\"switch\"],\"action\":[\"turn on\"]}\n```\nLights on.";
        let result = parse(raw);
        assert_eq!(result.commands, vec![Command::new("switch", "turn on")]);
        assert_eq!(result.summary, "Lights on.");
    }

    #[test]
    fn should_accept_uppercase_language_tag() {
        let raw = "```JSON\n{\"devices_controlled\":[],\"action\":[]}\n```\nNothing to do.";
        let result = parse(raw);
        assert!(result.commands.is_empty());
        assert_eq!(result.summary, "Nothing to do.");
    }

    #[test]
    fn should_use_preamble_as_summary_when_nothing_follows_block() {
        let raw = "Locking up.\n```json\n{\"devices_controlled\":[\"lock\"],\"action\":[\"lock\"]}\n```\n";
        let result = parse(raw);
        assert_eq!(result.commands.len(), 1);
        assert_eq!(result.summary, "Locking up.");
    }
}
