//! Language-model port — the natural-language understanding service.

use std::future::Future;

use arthur_domain::error::InterpretationError;

/// One request to the model: a fixed system instruction plus the user's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelRequest<'a> {
    pub system_instruction: &'a str,
    pub utterance: &'a str,
}

/// A generative model returning the hybrid "fenced JSON + summary" text.
///
/// Implementations report only transport-level failures (network, auth,
/// timeout). Whatever text comes back, however malformed, is `Ok`.
pub trait LanguageModel {
    /// Generate the response text for `request`.
    fn generate(
        &self,
        request: ModelRequest<'_>,
    ) -> impl Future<Output = Result<String, InterpretationError>> + Send;
}

impl<T: LanguageModel + Send + Sync> LanguageModel for std::sync::Arc<T> {
    fn generate(
        &self,
        request: ModelRequest<'_>,
    ) -> impl Future<Output = Result<String, InterpretationError>> + Send {
        (**self).generate(request)
    }
}
