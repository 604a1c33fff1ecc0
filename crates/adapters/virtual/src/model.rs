//! Scripted language model — answers from keywords instead of a remote model.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use arthur_app::ports::{LanguageModel, ModelRequest};
use arthur_domain::command::ActionKind;
use arthur_domain::device::DeviceKind;
use arthur_domain::error::InterpretationError;

const CHAT_REPLY: &str =
    "I'm Arthur. I can lock or unlock the door, switch the lights, and open or close the blinds.";

/// Produces replies in the same hybrid format as a real model.
///
/// Arrival phrases ("I'm home") secure the house, departure phrases
/// ("I'm leaving") do the opposite; otherwise each device mentioned with a
/// recognised verb is actuated. Anything else gets a chat-only reply.
#[derive(Debug, Default)]
pub struct ScriptedLanguageModel {
    offline: AtomicBool,
}

impl ScriptedLanguageModel {
    /// Make every following call fail (or succeed again).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    /// The reply for `utterance`.
    #[must_use]
    pub fn reply(utterance: &str) -> String {
        let text = utterance.to_lowercase();
        let pairs = scenes(&text).unwrap_or_else(|| mentioned(&text));
        if pairs.is_empty() {
            return CHAT_REPLY.to_string();
        }
        let devices: Vec<&str> = pairs.iter().map(|(device, _)| device.as_str()).collect();
        let actions: Vec<String> = pairs
            .iter()
            .map(|(_, action)| action.as_str().replace('_', " "))
            .collect();
        let directive = serde_json::json!({
            "devices_controlled": devices,
            "action": actions,
        });
        format!("```json\n{directive}\n```\n{}", summary(&pairs))
    }
}

fn scenes(text: &str) -> Option<Vec<(DeviceKind, ActionKind)>> {
    const ARRIVING: [&str; 4] = ["i'm home", "i am home", "i'm back", "good night"];
    const LEAVING: [&str; 4] = ["i'm leaving", "i am leaving", "heading out", "goodbye"];

    if ARRIVING.iter().any(|phrase| text.contains(phrase)) {
        return Some(vec![
            (DeviceKind::Lock, ActionKind::Lock),
            (DeviceKind::Switch, ActionKind::TurnOn),
            (DeviceKind::Blinds, ActionKind::Open),
        ]);
    }
    if LEAVING.iter().any(|phrase| text.contains(phrase)) {
        return Some(vec![
            (DeviceKind::Lock, ActionKind::Unlock),
            (DeviceKind::Switch, ActionKind::TurnOff),
            (DeviceKind::Blinds, ActionKind::Close),
        ]);
    }
    None
}

fn mentioned(text: &str) -> Vec<(DeviceKind, ActionKind)> {
    let mut pairs = Vec::new();
    if text.contains("unlock") {
        pairs.push((DeviceKind::Lock, ActionKind::Unlock));
    } else if text.contains("lock") || text.contains("secure") {
        pairs.push((DeviceKind::Lock, ActionKind::Lock));
    }
    if text.contains("light") || text.contains("switch") {
        if text.contains(" off") {
            pairs.push((DeviceKind::Switch, ActionKind::TurnOff));
        } else if text.contains(" on") {
            pairs.push((DeviceKind::Switch, ActionKind::TurnOn));
        }
    }
    if text.contains("blind") {
        if text.contains("close") || text.contains("shut") {
            pairs.push((DeviceKind::Blinds, ActionKind::Close));
        } else if text.contains("open") {
            pairs.push((DeviceKind::Blinds, ActionKind::Open));
        }
    }
    pairs
}

fn summary(pairs: &[(DeviceKind, ActionKind)]) -> String {
    let parts: Vec<&str> = pairs
        .iter()
        .map(|(_, action)| match action {
            ActionKind::Lock => "the house is secured",
            ActionKind::Unlock => "the door is open to you",
            ActionKind::TurnOn => "the lights are on",
            ActionKind::TurnOff => "the lights are off",
            ActionKind::Open => "daylight is let in",
            ActionKind::Close => "visibility to the outside is reduced",
        })
        .collect();
    let sentence = parts.join(", and ");
    let mut chars = sentence.chars();
    match chars.next() {
        Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

impl LanguageModel for ScriptedLanguageModel {
    fn generate(
        &self,
        request: ModelRequest<'_>,
    ) -> impl Future<Output = Result<String, InterpretationError>> + Send {
        let result = if self.offline.load(Ordering::Relaxed) {
            Err(InterpretationError::Status(503))
        } else {
            Ok(Self::reply(request.utterance))
        };
        async { result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arthur_domain::command::Command;
    use arthur_domain::interpretation::{InterpretationResult, extract};

    fn interpret(utterance: &str) -> InterpretationResult {
        let raw = ScriptedLanguageModel::reply(utterance);
        let extraction = extract(&raw);
        InterpretationResult::from_extraction(raw, extraction)
    }

    #[test]
    fn should_secure_house_and_close_blinds() {
        let result = interpret("Secure the house and close the blinds");
        assert_eq!(
            result.commands,
            vec![Command::new("lock", "lock"), Command::new("blinds", "close")]
        );
        assert_eq!(
            result.summary,
            "The house is secured, and visibility to the outside is reduced."
        );
    }

    #[test]
    fn should_run_leaving_scene() {
        let result = interpret("I'm leaving");
        assert_eq!(
            result.commands,
            vec![
                Command::new("lock", "unlock"),
                Command::new("switch", "turn off"),
                Command::new("blinds", "close"),
            ]
        );
    }

    #[test]
    fn should_prefer_unlock_over_lock() {
        let result = interpret("please unlock the door");
        assert_eq!(result.commands, vec![Command::new("lock", "unlock")]);
    }

    #[test]
    fn should_reply_without_block_when_nothing_matches() {
        let result = interpret("what's the weather like?");
        assert!(result.commands.is_empty());
        assert_eq!(result.summary, CHAT_REPLY);
    }

    #[tokio::test]
    async fn should_fail_while_offline() {
        let model = ScriptedLanguageModel::default();
        model.set_offline(true);
        let request = ModelRequest {
            system_instruction: "",
            utterance: "lock the door",
        };

        let result = model.generate(request).await;
        assert!(matches!(result, Err(InterpretationError::Status(503))));

        model.set_offline(false);
        assert!(model.generate(request).await.is_ok());
    }
}
