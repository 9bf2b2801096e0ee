//! Generation collaborator wrapper.
//!
//! Owns the prompt rendering and the retry policy: a failed completion is
//! retried exactly once with identical input; a second failure is returned
//! as `QaError::Generation` for the pipeline to surface as an explicit
//! error answer.

use docqa_core::{QaError, QaResult};
use docqa_llm::{LlmClient, LlmRequest};
use docqa_prompt::PromptLibrary;
use std::collections::HashMap;
use std::sync::Arc;

/// Prompt-rendering, retrying front end to the generation collaborator.
pub struct Generator {
    client: Arc<dyn LlmClient>,
    prompts: PromptLibrary,
    model: String,
    max_tokens: u32,
}

impl Generator {
    /// Create a generator for a model.
    pub fn new(
        client: Arc<dyn LlmClient>,
        prompts: PromptLibrary,
        model: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            client,
            prompts,
            model: model.into(),
            max_tokens,
        }
    }

    /// Render a prompt and run it through the collaborator.
    pub async fn generate(
        &self,
        prompt_id: &str,
        variables: &HashMap<String, String>,
        temperature: f32,
    ) -> QaResult<String> {
        let built = self.prompts.render(prompt_id, variables)?;

        let mut request = LlmRequest::new(built.user, &self.model)
            .with_temperature(temperature)
            .with_max_tokens(self.max_tokens);
        if let Some(system) = built.system {
            request = request.with_system(system);
        }

        match self.client.complete(&request).await {
            Ok(response) => Ok(response.content),
            Err(first) => {
                tracing::warn!(
                    "Generation failed for prompt '{}', retrying once: {}",
                    prompt_id,
                    first
                );

                self.client
                    .complete(&request)
                    .await
                    .map(|response| response.content)
                    .map_err(|second| {
                        QaError::Generation(format!(
                            "Prompt '{}' failed twice: {}",
                            prompt_id, second
                        ))
                    })
            }
        }
    }
}
