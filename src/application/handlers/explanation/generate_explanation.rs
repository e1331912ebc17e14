//! GenerateExplanation command handler.
//!
//! The guarded generation pipeline: resolve the topic rule, compose the
//! prompt, run the model chain, parse, validate, and substitute fallback
//! content whenever any step fails. The handler never returns an error;
//! every outcome is a complete, display-ready explanation.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::adapters::ai::{ModelError, ModelGateway, ModelInvocationSpec};
use crate::domain::curriculum::{StageContext, TeachingMethod, TopicRule, TopicRuleRegistry};
use crate::domain::explanation::{
    ContentValidator, ContentViolation, ExplanationResult, FallbackProvider, ParseError,
    PromptComposer, PromptShape, PromptSpec, ResponseParser,
};
use crate::domain::learner::LearnerProfile;
use crate::ports::{RateLimitKey, RateLimiter};

/// Command to generate one explanation or question.
#[derive(Debug, Clone)]
pub struct GenerateExplanationCommand {
    pub profile: LearnerProfile,
    pub topic: String,
    pub context: StageContext,
    /// Rate-limit identity; `None` skips the quota check.
    pub client_id: Option<String>,
}

impl GenerateExplanationCommand {
    pub fn new(profile: LearnerProfile, topic: impl Into<String>, context: StageContext) -> Self {
        Self {
            profile,
            topic: topic.into(),
            context,
            client_id: None,
        }
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }
}

/// Why curated content replaced model output.
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    /// The client is over its daily quota; the model was not called.
    RateLimited,
    Model(ModelError),
    Parse(ParseError),
    Validation(ContentViolation),
}

/// Which path produced the result. Kept out of the wire format.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentSource {
    Generated,
    Fallback(FallbackReason),
}

impl ContentSource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, ContentSource::Fallback(_))
    }
}

/// Result of the pipeline, already formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedExplanation {
    pub result: ExplanationResult,
    pub method: TeachingMethod,
    /// True when a registry keyword matched the topic.
    pub topic_match: bool,
    pub source: ContentSource,
}

/// Sampling and chain settings for generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    /// Model identifiers, most capable first.
    pub models: Vec<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub prompt_shape: PromptShape,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            models: vec![
                "claude-3-5-sonnet-20241022".to_string(),
                "claude-3-5-haiku-20241022".to_string(),
            ],
            max_tokens: 350,
            temperature: 0.7,
            prompt_shape: PromptShape::SystemUser,
        }
    }
}

/// Handler for GenerateExplanation commands.
pub struct GenerateExplanationHandler {
    gateway: Arc<ModelGateway>,
    rate_limiter: Option<Arc<dyn RateLimiter>>,
    registry: Arc<TopicRuleRegistry>,
    settings: GenerationSettings,
    composer: PromptComposer,
    parser: ResponseParser,
    validator: ContentValidator,
    fallback: FallbackProvider,
}

impl GenerateExplanationHandler {
    pub fn new(gateway: Arc<ModelGateway>, settings: GenerationSettings) -> Self {
        let composer = PromptComposer::new().with_shape(settings.prompt_shape);
        Self {
            gateway,
            rate_limiter: None,
            registry: Arc::new(TopicRuleRegistry::builtin().clone()),
            settings,
            composer,
            parser: ResponseParser::new(),
            validator: ContentValidator::new(),
            fallback: FallbackProvider::new(),
        }
    }

    pub fn with_rate_limiter(mut self, limiter: Arc<dyn RateLimiter>) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    pub fn with_registry(mut self, registry: TopicRuleRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    /// Runs the pipeline. Infallible: failures become fallback content.
    pub async fn handle(&self, cmd: GenerateExplanationCommand) -> GeneratedExplanation {
        let GenerateExplanationCommand {
            profile,
            topic,
            context,
            client_id,
        } = cmd;
        let stage = context.stage;

        let resolution = self.registry.resolve(&topic);
        let rule = resolution.rule;
        let prompt = self
            .composer
            .compose(&profile, &topic, rule, stage, context.attempt_number);
        let method = prompt.method;

        debug!(
            stage = stage.number(),
            stage_title = stage.title(),
            attempt = context.attempt_number,
            method = method.as_str(),
            rule = %rule.keyword,
            topic_match = resolution.matched,
            prompt_chars = prompt.user.chars().count(),
            "composed prompt"
        );

        let generated = self
            .generate(&profile, rule, context, client_id, &prompt)
            .await;
        let (result, source) = match generated {
            Ok(result) => (result, ContentSource::Generated),
            Err(reason) => {
                warn!(
                    reason = ?reason,
                    rule = %rule.keyword,
                    stage = stage.number(),
                    "serving fallback content"
                );
                let result = self.fallback.get(rule, &topic, stage, &profile);
                (result, ContentSource::Fallback(reason))
            }
        };

        info!(
            stage = stage.number(),
            method = method.as_str(),
            topic_match = resolution.matched,
            fallback = source.is_fallback(),
            "explanation ready"
        );

        GeneratedExplanation {
            result: result.into_display(),
            method,
            topic_match: resolution.matched,
            source,
        }
    }

    async fn generate(
        &self,
        profile: &LearnerProfile,
        rule: &TopicRule,
        context: StageContext,
        client_id: Option<String>,
        prompt: &PromptSpec,
    ) -> Result<ExplanationResult, FallbackReason> {
        if let Some(client_id) = client_id {
            self.check_quota(client_id).await?;
        }

        let spec = ModelInvocationSpec::new(
            self.settings.models.clone(),
            self.settings.max_tokens,
            self.settings.temperature,
            prompt,
        );

        let raw = self.gateway.invoke(&spec).await.map_err(FallbackReason::Model)?;
        debug!(raw_bytes = raw.len(), "model output received");

        let result = self
            .parser
            .parse(&raw, context.stage)
            .map_err(FallbackReason::Parse)?;

        self.validator
            .check(&result, rule, profile)
            .map_err(FallbackReason::Validation)?;

        Ok(result)
    }

    async fn check_quota(&self, client_id: String) -> Result<(), FallbackReason> {
        let Some(limiter) = &self.rate_limiter else {
            return Ok(());
        };

        match limiter.check(RateLimitKey::today(client_id)).await {
            Ok(result) if result.is_allowed() => {
                debug!(remaining = result.status().remaining(), "within daily quota");
                Ok(())
            }
            Ok(result) => {
                let status = result.status();
                warn!(limit = status.limit, used = status.used, "daily quota exceeded");
                Err(FallbackReason::RateLimited)
            }
            Err(e) => {
                // Fail open for availability
                warn!(error = %e, "rate limiter unavailable");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{GatewayConfig, MockAIProvider, MockError};
    use crate::adapters::rate_limiter::InMemoryRateLimiter;
    use crate::domain::curriculum::Stage;
    use crate::domain::explanation::text_direction::{LRI, PDI};
    use crate::domain::learner::{Gender, GradeBand};

    fn profile() -> LearnerProfile {
        LearnerProfile::new("נועה", Gender::Girl, GradeBand::FirstSecond, "כלבים")
    }

    fn handler(provider: &MockAIProvider) -> GenerateExplanationHandler {
        let gateway = ModelGateway::new(Arc::new(provider.clone()), GatewayConfig::default());
        GenerateExplanationHandler::new(Arc::new(gateway), GenerationSettings::default())
    }

    fn command(topic: &str, stage: Stage) -> GenerateExplanationCommand {
        GenerateExplanationCommand::new(profile(), topic, StageContext::new(stage, 1))
    }

    #[tokio::test]
    async fn valid_model_output_is_served() {
        let provider = MockAIProvider::new().with_response(
            r#"{"content":"הכלבים אספו $3+4$ עצמות","visual":"🍎🍎🍎","nextButtonText":"קדימה"}"#,
        );
        let out = handler(&provider).handle(command("חיבור", Stage::Hook)).await;

        assert_eq!(out.source, ContentSource::Generated);
        assert!(out.topic_match);
        assert_eq!(out.method, TeachingMethod::StoryBased);
        assert!(out.result.content.contains(&format!("{LRI}3{PDI}")));
        assert_eq!(out.result.next_button_text(), Some("קדימה"));
    }

    #[tokio::test]
    async fn forbidden_word_triggers_fallback() {
        let provider = MockAIProvider::new().with_response(
            r#"{"content":"כלבים עושים כפל $2$","visual":"🍎","nextButtonText":"קדימה"}"#,
        );
        let out = handler(&provider).handle(command("חיבור", Stage::Hook)).await;

        assert_eq!(
            out.source,
            ContentSource::Fallback(FallbackReason::Validation(ContentViolation::ForbiddenWord(
                "כפל".into()
            )))
        );
        assert!(!out.result.content.contains("כפל"));
    }

    #[tokio::test]
    async fn unparsable_output_triggers_fallback_with_question_shape() {
        let provider = MockAIProvider::new().with_response("sorry, no JSON today");
        let out = handler(&provider).handle(command("כפל", Stage::Challenge)).await;

        assert_eq!(
            out.source,
            ContentSource::Fallback(FallbackReason::Parse(ParseError::NoJsonFound))
        );
        assert!(out.result.is_question());
        assert!(out.result.hint().is_some());
        assert!(out.result.correct_answer().is_some());
    }

    #[tokio::test]
    async fn unavailable_models_trigger_fallback() {
        let provider = MockAIProvider::new()
            .with_error(MockError::Unavailable { message: "down".into() })
            .with_error(MockError::Unavailable { message: "down".into() });
        let out = handler(&provider).handle(command("שברים", Stage::Concept)).await;

        assert!(matches!(
            out.source,
            ContentSource::Fallback(FallbackReason::Model(
                ModelError::AllModelsUnavailable { attempted: 2, .. }
            ))
        ));
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn over_quota_skips_the_model() {
        let provider = MockAIProvider::new().with_response("{}");
        let limiter = InMemoryRateLimiter::new(0).with_cleanup_probability(0.0);
        let handler = handler(&provider).with_rate_limiter(Arc::new(limiter));

        let out = handler
            .handle(command("חיסור", Stage::Hook).with_client_id("10.0.0.1"))
            .await;

        assert_eq!(out.source, ContentSource::Fallback(FallbackReason::RateLimited));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn validation_uses_the_configured_registry_rule() {
        let provider = MockAIProvider::new().with_response(
            r#"{"content":"הכלבים אספו $50$ עצמות","visual":"🦴","nextButtonText":"קדימה"}"#,
        );
        let registry = TopicRuleRegistry::new(vec![TopicRule::new("חיבור", 10)]);
        let handler = handler(&provider).with_registry(registry);

        let out = handler.handle(command("חיבור", Stage::Hook)).await;

        assert!(out.topic_match);
        assert_eq!(
            out.source,
            ContentSource::Fallback(FallbackReason::Validation(
                ContentViolation::NumberTooLarge { found: "50".into(), max: 10 }
            ))
        );
    }

    #[tokio::test]
    async fn unknown_topic_uses_default_rule() {
        let provider = MockAIProvider::new().with_error(MockError::NotConfigured);
        let out = handler(&provider).handle(command("גאומטריה", Stage::Hook)).await;

        assert!(!out.topic_match);
        assert!(matches!(
            out.source,
            ContentSource::Fallback(FallbackReason::Model(ModelError::NotConfigured(_)))
        ));
        assert!(!out.result.content.is_empty());
    }

    #[tokio::test]
    async fn method_follows_attempt_number() {
        let provider = MockAIProvider::new().with_error(MockError::NotConfigured);
        let cmd = GenerateExplanationCommand::new(profile(), "חיבור", StageContext::new(Stage::Hook, 4));
        let out = handler(&provider).handle(cmd).await;
        assert_eq!(out.method, TeachingMethod::GameChallenge);
    }
}
