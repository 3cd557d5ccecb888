//! Port for the generative-text backend.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Generation failures.
    pub enum GenerationError {
        /// The backend call failed.
        Backend { message: String } => "text generation failed: {message}",
        /// The requested model is not available.
        UnknownModel { model: String } => "unknown model: {model}",
    }
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for one prompt with `model`.
    async fn generate(&self, prompt: &str, model: &str) -> Result<String, GenerationError>;

    /// Generate one output per prompt, in prompt order.
    ///
    /// The default runs prompts sequentially and stops at the first failure.
    async fn batch_generate(
        &self,
        prompts: &[String],
        model: &str,
    ) -> Result<Vec<String>, GenerationError> {
        let mut outputs = Vec::with_capacity(prompts.len());
        for prompt in prompts {
            outputs.push(self.generate(prompt, model).await?);
        }
        Ok(outputs)
    }
}
