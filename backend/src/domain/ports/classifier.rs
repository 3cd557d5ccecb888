//! Port for the image classifier and a decorator that never fails.

use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use super::define_port_error;

define_port_error! {
    /// Classifier backend failures.
    pub enum ClassifierError {
        /// The backend call failed.
        Backend { message: String } => "classifier backend failed: {message}",
        /// The bytes could not be decoded as an image.
        UnreadableImage { message: String } => "image could not be read: {message}",
    }
}

/// One label with its confidence score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub label: String,
    pub score: f32,
}

impl Classification {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

#[async_trait]
pub trait Classifier: Send + Sync {
    /// Labels for `image`, highest score first.
    async fn classify(&self, image: &[u8]) -> Result<Vec<Classification>, ClassifierError>;
}

/// Wraps a classifier so backend failures degrade to a static result.
///
/// Results from the inner classifier are re-sorted by descending score.
pub struct FallbackClassifier<C> {
    inner: C,
    fallback: Vec<Classification>,
}

impl<C: Classifier> FallbackClassifier<C> {
    /// Wrap `inner` with the default fallback (`unknown`, score 0).
    pub fn new(inner: C) -> Self {
        Self::with_fallback(inner, vec![Classification::new("unknown", 0.0)])
    }

    /// Wrap `inner` with a custom fallback result.
    pub fn with_fallback(inner: C, fallback: Vec<Classification>) -> Self {
        Self { inner, fallback }
    }
}

#[async_trait]
impl<C: Classifier> Classifier for FallbackClassifier<C> {
    async fn classify(&self, image: &[u8]) -> Result<Vec<Classification>, ClassifierError> {
        match self.inner.classify(image).await {
            Ok(mut labels) => {
                labels.sort_by(|a, b| b.score.total_cmp(&a.score));
                Ok(labels)
            }
            Err(error) => {
                warn!(%error, "classifier failed; returning fallback labels");
                Ok(self.fallback.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    struct StaticClassifier(Result<Vec<Classification>, ClassifierError>);

    #[async_trait]
    impl Classifier for StaticClassifier {
        async fn classify(&self, _image: &[u8]) -> Result<Vec<Classification>, ClassifierError> {
            self.0.clone()
        }
    }

    #[rstest]
    #[tokio::test]
    async fn backend_failure_degrades_to_fallback() {
        let classifier =
            FallbackClassifier::new(StaticClassifier(Err(ClassifierError::backend("quota"))));
        let labels = classifier.classify(b"png").await.expect("never fails");
        assert_eq!(labels, vec![Classification::new("unknown", 0.0)]);
    }

    #[rstest]
    #[tokio::test]
    async fn custom_fallback_is_returned_verbatim() {
        let fallback = vec![Classification::new("unclassified", 0.0)];
        let classifier = FallbackClassifier::with_fallback(
            StaticClassifier(Err(ClassifierError::unreadable_image("truncated"))),
            fallback.clone(),
        );
        assert_eq!(classifier.classify(b"").await, Ok(fallback));
    }

    #[rstest]
    #[tokio::test]
    async fn successful_results_are_ordered_by_score() {
        let classifier = FallbackClassifier::new(StaticClassifier(Ok(vec![
            Classification::new("cat", 0.2),
            Classification::new("dog", 0.9),
            Classification::new("fox", 0.5),
        ])));
        let labels = classifier.classify(b"jpg").await.expect("labels");
        let names: Vec<_> = labels.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(names, ["dog", "fox", "cat"]);
    }
}
