//! Command interpreter — asks the language model what the user wants done.

use std::fmt::Write as _;

use arthur_domain::capability;
use arthur_domain::command::Utterance;
use arthur_domain::error::InterpretationError;
use arthur_domain::interpretation::{Extraction, InterpretationResult, extract};

use crate::ports::{LanguageModel, ModelRequest};

/// Turns utterances into [`InterpretationResult`]s using a [`LanguageModel`].
pub struct CommandInterpreter<M> {
    model: M,
    system_instruction: String,
}

impl<M: LanguageModel + Send + Sync> CommandInterpreter<M> {
    /// Create an interpreter with the instruction built from the capability table.
    pub fn new(model: M) -> Self {
        Self {
            model,
            system_instruction: system_instruction(),
        }
    }

    /// The instruction sent alongside every utterance.
    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// Interpret `utterance`.
    ///
    /// # Errors
    ///
    /// Returns [`InterpretationError`] only when the model call fails.
    /// Malformed or chat-only output yields a result with no commands.
    #[tracing::instrument(skip_all)]
    pub async fn interpret(
        &self,
        utterance: &Utterance,
    ) -> Result<InterpretationResult, InterpretationError> {
        let raw = self
            .model
            .generate(ModelRequest {
                system_instruction: &self.system_instruction,
                utterance: utterance.as_str(),
            })
            .await?;

        let extraction = extract(&raw);
        match &extraction {
            Extraction::Structured { directive, .. } => {
                let unpaired = directive.unpaired();
                if unpaired > 0 {
                    tracing::warn!(unpaired, "model returned arrays of different lengths");
                }
                tracing::debug!(
                    commands = directive.devices_controlled.len().min(directive.action.len()),
                    "structured response"
                );
            }
            Extraction::Malformed(err) => {
                tracing::debug!(error = %err, "malformed directive block, using text only");
            }
            Extraction::Unstructured => {
                tracing::debug!("no directive block, using text only");
            }
        }
        Ok(InterpretationResult::from_extraction(raw, extraction))
    }
}

fn spoken(name: &str) -> String {
    name.replace('_', " ")
}

/// Build the assistant instruction from the capability table.
#[must_use]
pub fn system_instruction() -> String {
    let devices: Vec<String> = capability::table()
        .iter()
        .map(|row| format!("\"{}\"", row.device))
        .collect();

    let mut allowed = String::new();
    for row in capability::table() {
        let actions: Vec<String> = row
            .actions
            .iter()
            .map(|(action, _)| format!("\"{}\"", spoken(action.as_str())))
            .collect();
        let _ = write!(allowed, "\n- {}: {}", row.device, actions.join(", "));
    }

    format!(
        "You are Arthur, a home assistant agent that interprets user commands.\n\
         Your response must start with a JSON object inside a ```json fenced block, \
         in the format: {{\"devices_controlled\": [...], \"action\": [...]}}. \
         The two arrays are parallel: action i applies to device i.\n\
         Valid devices: {devices}.\n\
         Allowed actions per device:{allowed}\n\
         Use context to determine whether the user is inside or outside. \
         If inside (e.g. \"I'm home\"), output \"lock\" (lock), \"turn on\" (switch), \"open\" (blinds). \
         If outside (e.g. \"I'm leaving\"), output \"unlock\" (lock), \"turn off\" (switch), \"close\" (blinds).\n\
         Only include devices that are relevant to the user's command: \
         if the user says \"lock the door\", only lock the lock.\n\
         After the fenced block, write one concise, definitive sentence summarizing the overall effect, \
         not the individual devices. \
         Example: \"The house is secured, and visibility to the outside is reduced.\"",
        devices = devices.join(", "),
    )
}
