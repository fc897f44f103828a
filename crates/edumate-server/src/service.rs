//! Study material generation: validate, prompt, call upstream, parse.

use std::sync::Arc;
use std::time::{Duration, Instant};

use edumate_core::{PromptBuilder, StudyMaterial, Topic, parse_study_material};

use crate::error::ApiResult;
use crate::generator::{Generator, UpstreamError};

/// Runs one generation request end to end.
///
/// Holds no per-request state; a single instance is shared by all handlers.
pub struct StudyService {
    generator: Arc<dyn Generator>,
    timeout: Duration,
}

impl StudyService {
    /// Create a service over `generator`, bounding each upstream call by `timeout`.
    pub fn new(generator: Arc<dyn Generator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    /// Generate study material for a raw, unvalidated topic.
    ///
    /// The generator is not called when the topic is invalid.
    pub async fn generate(&self, raw_topic: &str) -> ApiResult<StudyMaterial> {
        let topic = Topic::parse(raw_topic)?;
        let prompt = PromptBuilder::build(&topic);
        tracing::info!(topic = %topic, "Generating study material");

        let started = Instant::now();
        let reply = tokio::time::timeout(self.timeout, self.generator.generate(&prompt))
            .await
            .map_err(|_| UpstreamError::Timeout)??;
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::debug!(latency_ms, reply_len = reply.len(), "Upstream replied");

        let material = parse_study_material(&reply)?;
        tracing::info!(
            notes = material.notes.len(),
            mcqs = material.mcqs.len(),
            flashcards = material.flashcards.len(),
            latency_ms,
            "Study material generated"
        );

        Ok(material)
    }
}

impl std::fmt::Debug for StudyService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudyService")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use async_trait::async_trait;
    use edumate_core::Prompt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingGenerator {
        calls: AtomicUsize,
        reply: Result<String, UpstreamError>,
    }

    #[async_trait]
    impl Generator for CountingGenerator {
        async fn generate(&self, _prompt: &Prompt) -> Result<String, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    struct StalledGenerator;

    #[async_trait]
    impl Generator for StalledGenerator {
        async fn generate(&self, _prompt: &Prompt) -> Result<String, UpstreamError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(String::new())
        }
    }

    fn service_with(reply: Result<String, UpstreamError>) -> (StudyService, Arc<CountingGenerator>) {
        let generator = Arc::new(CountingGenerator {
            calls: AtomicUsize::new(0),
            reply,
        });
        let service = StudyService::new(generator.clone(), Duration::from_secs(5));
        (service, generator)
    }

    #[tokio::test]
    async fn test_invalid_topic_skips_generator() {
        let (service, generator) = service_with(Ok(String::new()));
        for topic in ["", "   ", "\n\t"] {
            let err = service.generate(topic).await.unwrap_err();
            assert!(matches!(err, ApiError::InvalidInput(_)));
        }
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_upstream_error_is_mapped() {
        let (service, generator) = service_with(Err(UpstreamError::RateLimited));
        let err = service.generate("Photosynthesis").await.unwrap_err();
        assert!(matches!(err, ApiError::UpstreamRateLimited));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_malformed() {
        let (service, _) = service_with(Ok("Sorry, I can't do that.".into()));
        let err = service.generate("Photosynthesis").await.unwrap_err();
        assert!(matches!(err, ApiError::MalformedUpstreamResponse(_)));
    }

    #[tokio::test]
    async fn test_stalled_generator_times_out() {
        let service = StudyService::new(Arc::new(StalledGenerator), Duration::from_millis(50));
        let started = Instant::now();
        let err = service.generate("Photosynthesis").await.unwrap_err();
        assert!(matches!(err, ApiError::UpstreamUnavailable(_)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
