use crate::{
    config::PipelineConfig,
    constants::ENV_API_KEY,
    document::StaticDocument,
    errors::{ConfigError, PipelineError},
    prompts::{
        core::{DOCUMENT_VARIABLE, OBJECTIVE_VARIABLE, PROMPT_BUILDER_TEMPLATE},
        PromptTemplate,
    },
    providers::ai::{openai::OpenAiProvider, AiProvider},
    telemetry::{RunRecord, TraceRecorder},
};
use std::fmt;
use tracing::{debug, info};

/// Turns an objective into a prompt template by asking a chat model.
///
/// The static document is bound into the template once, at construction. Each
/// call to `generate` binds the objective, sends one request, and flushes one
/// trace record.
#[derive(Clone)]
pub struct PromptPipeline {
    pub(crate) provider: Box<dyn AiProvider>,
    pub(crate) document: StaticDocument,
    pub(crate) template: PromptTemplate,
    pub(crate) tracer: TraceRecorder,
}

impl fmt::Debug for PromptPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptPipeline")
            .field("provider", &self.provider)
            .field("document", &self.document.path())
            .field("tracer", &self.tracer)
            .finish_non_exhaustive()
    }
}

impl PromptPipeline {
    pub fn builder() -> PromptPipelineBuilder {
        PromptPipelineBuilder::new()
    }

    /// Builds a pipeline against the OpenAI API, reading the static document
    /// from `config.document_path`.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, PipelineError> {
        Self::builder().config(config).build()
    }

    pub fn document(&self) -> &StaticDocument {
        &self.document
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Substitutes `objective` into the template. The objective is inserted
    /// verbatim.
    ///
    /// Fails with `ConfigError::Template` if the template still has a variable
    /// other than `{objective}` unbound.
    pub fn render(&self, objective: &str) -> Result<String, PipelineError> {
        Ok(self.template.render(&[(OBJECTIVE_VARIABLE, objective)])?)
    }

    /// Renders the prompt for `objective`, sends it, and returns the model's
    /// reply unmodified.
    ///
    /// Pending trace records are flushed before returning, whether or not the
    /// call succeeded.
    pub async fn generate(&self, objective: &str) -> Result<String, PipelineError> {
        let prompt = self.render(objective)?;
        info!(
            "[generate] objective of {} chars, prompt of {} chars",
            objective.chars().count(),
            prompt.len()
        );
        debug!(prompt = %prompt, "--> Rendered prompt");

        let run = RunRecord::start(self.provider.model(), &prompt);
        let result = self.provider.generate(&prompt).await;
        self.tracer.record(run.finish(&result));
        self.tracer.flush().await;

        result
    }
}

/// A builder for creating `PromptPipeline` instances.
///
/// Every failure surfaces from `build`, so a constructed pipeline never needs
/// to touch the filesystem or re-check credentials.
#[derive(Default)]
pub struct PromptPipelineBuilder {
    config: Option<PipelineConfig>,
    provider: Option<Box<dyn AiProvider>>,
    document: Option<StaticDocument>,
    template: Option<String>,
    tracer: Option<TraceRecorder>,
}

impl PromptPipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supplies credentials, model, document path, and telemetry settings.
    pub fn config(mut self, config: &PipelineConfig) -> Self {
        self.config = Some(config.clone());
        self
    }

    /// Uses `provider` instead of building an `OpenAiProvider` from the config.
    pub fn ai_provider(mut self, provider: Box<dyn AiProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Uses an already-loaded document instead of reading the configured path.
    pub fn document(mut self, document: StaticDocument) -> Self {
        self.document = Some(document);
        self
    }

    /// Replaces the default template. It must contain exactly the `{text}` and
    /// `{objective}` variables.
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn tracer(mut self, tracer: TraceRecorder) -> Self {
        self.tracer = Some(tracer);
        self
    }

    /// Builds the `PromptPipeline`.
    ///
    /// The document is read before the provider is created, so a missing file
    /// is reported as `Io` even when credentials are also missing.
    pub fn build(self) -> Result<PromptPipeline, PipelineError> {
        let document = match (self.document, &self.config) {
            (Some(document), _) => document,
            (None, Some(config)) => StaticDocument::load(&config.document_path)?,
            (None, None) => {
                return Err(ConfigError::InvalidValue {
                    name: "document",
                    reason: "either a document or a config with a document path is required"
                        .to_string(),
                }
                .into())
            }
        };

        let template = bind_document(
            self.template.as_deref().unwrap_or(PROMPT_BUILDER_TEMPLATE),
            &document,
        )?;

        let provider: Box<dyn AiProvider> = match (self.provider, &self.config) {
            (Some(provider), _) => provider,
            (None, Some(config)) => Box::new(OpenAiProvider::from_config(config)?),
            (None, None) => return Err(ConfigError::MissingVar(ENV_API_KEY).into()),
        };

        let tracer = match (self.tracer, &self.config) {
            (Some(tracer), _) => tracer,
            (None, Some(config)) => TraceRecorder::from_config(config.telemetry.as_ref())?,
            (None, None) => TraceRecorder::disabled(),
        };

        info!("Prompt pipeline ready (model: {})", provider.model());
        Ok(PromptPipeline {
            provider,
            document,
            template,
            tracer,
        })
    }
}

/// Parses `source`, checks its variables, and binds the document into it.
fn bind_document(source: &str, document: &StaticDocument) -> Result<PromptTemplate, PipelineError> {
    let template = PromptTemplate::parse(source)?;
    let mut variables = template.variables();
    variables.sort_unstable();
    let mut expected = vec![DOCUMENT_VARIABLE, OBJECTIVE_VARIABLE];
    expected.sort_unstable();
    if variables != expected {
        return Err(ConfigError::InvalidValue {
            name: "template",
            reason: format!(
                "expected variables {{{DOCUMENT_VARIABLE}}} and {{{OBJECTIVE_VARIABLE}}}, found {variables:?}"
            ),
        }
        .into());
    }
    Ok(template.partial(DOCUMENT_VARIABLE, document.text())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TemplateError;

    #[derive(Clone, Debug)]
    struct UnreachableProvider;

    #[async_trait::async_trait]
    impl AiProvider for UnreachableProvider {
        async fn generate(&self, _prompt: &str) -> Result<String, PipelineError> {
            panic!("an unrenderable prompt must not be sent");
        }

        fn model(&self) -> &str {
            "unreachable"
        }
    }

    fn pipeline_with_unbound_document() -> PromptPipeline {
        PromptPipeline {
            provider: Box::new(UnreachableProvider),
            document: StaticDocument::from_text("doc"),
            template: PromptTemplate::parse("{text} / {objective}").unwrap(),
            tracer: TraceRecorder::disabled(),
        }
    }

    #[test]
    fn render_reports_unbound_variable() {
        let pipeline = pipeline_with_unbound_document();
        match pipeline.render("o") {
            Err(PipelineError::Config(ConfigError::Template(TemplateError::MissingVariable(
                name,
            )))) => assert_eq!(name, DOCUMENT_VARIABLE),
            other => panic!("Expected MissingVariable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn generate_does_not_send_unrenderable_prompt() {
        let pipeline = pipeline_with_unbound_document();
        let result = pipeline.generate("o").await;
        assert!(matches!(
            result,
            Err(PipelineError::Config(ConfigError::Template(_)))
        ));
        assert_eq!(pipeline.tracer.pending(), 0);
    }
}
