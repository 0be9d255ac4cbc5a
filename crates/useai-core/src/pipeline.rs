//! Generation pipeline
//!
//! [`Generator`] claims marked functions, serves them from the cache or the
//! generation service, and splices the result. [`Transform`] is the deferred
//! scheduling mode: claims are queued during the visiting pass and run
//! concurrently at a single join point.
//!
//! ```text
//! claim ──► cache.get ──hit──────────────► prepare ──► apply
//!              │                              ▲
//!              └─miss─► client.generate ──────┘ (set after prepare succeeds)
//! ```

use crate::config::{FingerprintMode, PluginConfig, Scheduling};
use crate::error::{ConfigError, GenerateError, TransformError};
use crate::prompt::build_prompt;
use crate::splice::{apply, prepare};
use futures::future::join_all;
use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use useai_cache::GenerationCache;
use useai_client::{strip_fences, GenerationClient, OpenRouterClient};
use useai_directive::{detect, FunctionCandidate, Metadata, Statement};
use useai_syntax::{BodyParser, Dialect, SourceFile, SyntaxError, TreeSitterBodyParser};

/// Everything needed to generate one claimed function
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Display name for logs and errors
    pub function_name: String,
    /// Cache fingerprint text
    pub fingerprint: String,
    /// Inline hints merged over plugin defaults
    pub metadata: Metadata,
    /// Prompt sent to the service on a cache miss
    pub prompt: String,
}

/// Result of transforming one source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    /// Rendered source
    pub code: String,
    /// Rewritten functions, in source order
    pub rewritten: Vec<String>,
}

/// Marked function found by [`scan`]
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    /// Display name
    pub name: String,
    /// 1-based line of the construct
    pub line: usize,
    /// Signature text
    pub signature: String,
    /// Inline hints only, before defaults are applied
    pub metadata: Metadata,
}

/// Shared generation context: config, cache, client and body parser
///
/// Cloning is cheap; clones share the cache and client.
#[derive(Clone)]
pub struct Generator {
    config: Arc<PluginConfig>,
    cache: Arc<GenerationCache>,
    client: Arc<dyn GenerationClient>,
    parser: Arc<dyn BodyParser>,
    custom_parser: bool,
}

impl Generator {
    /// Create generator with the tree-sitter body parser
    #[must_use]
    pub fn new(
        config: PluginConfig,
        cache: Arc<GenerationCache>,
        client: Arc<dyn GenerationClient>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            cache,
            client,
            parser: Arc::new(TreeSitterBodyParser::default()),
            custom_parser: false,
        }
    }

    /// Create generator talking to the configured service
    ///
    /// Opens the cache at the configured path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Client`] if the HTTP client cannot be built.
    pub fn from_config(config: PluginConfig) -> Result<Self, ConfigError> {
        let client = OpenRouterClient::new(config.client_settings())?;
        let cache = Arc::new(GenerationCache::open(&config.cache_path));
        Ok(Self::new(config, cache, Arc::new(client)))
    }

    /// Use a custom body parser for every dialect
    #[must_use]
    pub fn with_parser(mut self, parser: Arc<dyn BodyParser>) -> Self {
        self.parser = parser;
        self.custom_parser = true;
        self
    }

    /// Generator whose body parser matches `dialect`
    #[must_use]
    pub fn for_dialect(&self, dialect: Dialect) -> Self {
        let mut generator = self.clone();
        if !self.custom_parser {
            generator.parser = Arc::new(TreeSitterBodyParser::new(dialect));
        }
        generator
    }

    /// Resolved configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Shared cache
    #[inline]
    #[must_use]
    pub fn cache(&self) -> &Arc<GenerationCache> {
        &self.cache
    }

    /// Claim a candidate: `Some(request)` when it carries the marker
    ///
    /// Pure: no I/O, no mutation.
    pub fn claim<C>(&self, node: &C) -> Option<GenerationRequest>
    where
        C: FunctionCandidate + ?Sized,
    {
        let inline = detect::extract(node)?;
        let metadata = inline.merged_over(&self.config.model, self.config.temperature);
        let fingerprint = match self.config.fingerprint {
            FingerprintMode::Signature => node.signature_text(),
            FingerprintMode::Source => node.source_text(),
        };
        let prompt = build_prompt(node.signature_text(), &metadata);

        Some(GenerationRequest {
            function_name: node.display_name().to_string(),
            fingerprint: fingerprint.to_string(),
            metadata,
            prompt,
        })
    }

    /// Produce statements for a request
    ///
    /// A cache hit never reaches the client. On a miss the service is called
    /// and the cleaned text is cached once it parses as a body.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] if the service fails or its output does not
    /// parse.
    #[instrument(skip_all, fields(function = %request.function_name))]
    pub async fn generate(&self, request: &GenerationRequest) -> Result<Vec<Statement>, GenerateError> {
        if let Some(code) = self.cache.get(&request.fingerprint, &request.metadata) {
            match prepare(self.parser.as_ref(), &code) {
                Ok(statements) => {
                    debug!("cache hit");
                    return Ok(statements);
                }
                Err(e) => warn!(error = %e, "cached code no longer parses, regenerating"),
            }
        } else {
            debug!("cache miss");
        }

        info!("generating {}", request.function_name);
        let code = strip_fences(&self.client.generate(&request.prompt, &request.metadata).await?);
        let statements = prepare(self.parser.as_ref(), &code)?;
        self.cache.set(&request.fingerprint, &request.metadata, &code);
        Ok(statements)
    }

    /// Blocking scheduling of one node: claim, generate, splice
    ///
    /// Returns whether the node was rewritten.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Function`] naming the node on failure; the
    /// node is left untouched.
    pub async fn process<C>(&self, node: &mut C) -> Result<bool, TransformError>
    where
        C: FunctionCandidate + ?Sized,
    {
        let Some(request) = self.claim(node) else {
            return Ok(false);
        };
        match self.generate(&request).await {
            Ok(statements) => {
                apply(node, statements);
                Ok(true)
            }
            Err(e) => {
                error!(function = %request.function_name, error = %e, "generation failed");
                Err(TransformError::function(request.function_name, e))
            }
        }
    }

    /// Transform a source file using the configured scheduling mode
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Syntax`] for unparseable source and
    /// [`TransformError::Function`] for the first claimed function that could
    /// not be generated.
    #[instrument(skip_all, fields(dialect = %dialect, scheduling = ?self.config.scheduling))]
    pub async fn transform_source(
        &self,
        source: &str,
        dialect: Dialect,
    ) -> Result<TransformOutput, TransformError> {
        let generator = self.for_dialect(dialect);
        let mut file = SourceFile::parse(source, dialect)?;

        let rewritten = match self.config.scheduling {
            Scheduling::Deferred => {
                let mut transform = Transform::new(&generator);
                let mut claimed = Vec::new();
                for (index, node) in file.functions().iter().enumerate() {
                    if !inside_any(&claimed, &node.range()) && transform.visit(index, node) {
                        claimed.extend(node.body_range());
                    }
                }
                transform.finalize(file.functions_mut()).await?
            }
            Scheduling::Blocking => {
                let mut rewritten = Vec::new();
                let mut claimed = Vec::new();
                for node in file.functions_mut() {
                    if inside_any(&claimed, &node.range()) {
                        continue;
                    }
                    if generator.process(node).await? {
                        rewritten.push(node.display_name().to_string());
                        claimed.extend(node.body_range());
                    }
                }
                rewritten
            }
        };

        info!(count = rewritten.len(), "transform complete");
        Ok(TransformOutput {
            code: file.render(),
            rewritten,
        })
    }

    /// [`transform_source`](Self::transform_source) for callers without a runtime
    ///
    /// Must not be called from inside an async runtime.
    ///
    /// # Errors
    ///
    /// As `transform_source`, plus [`TransformError::Runtime`].
    pub fn transform_source_blocking(
        &self,
        source: &str,
        dialect: Dialect,
    ) -> Result<TransformOutput, TransformError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(TransformError::Runtime)?;
        runtime.block_on(self.transform_source(source, dialect))
    }
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("config", &self.config)
            .field("cache", &self.cache.path())
            .field("custom_parser", &self.custom_parser)
            .finish_non_exhaustive()
    }
}

/// Deferred scheduling for one traversal
///
/// [`visit`](Transform::visit) only claims; no generation starts until
/// [`finalize`](Transform::finalize), which runs every queued request
/// concurrently and splices each result into its own node.
pub struct Transform<'g> {
    generator: &'g Generator,
    pending: Vec<(usize, GenerationRequest)>,
}

impl<'g> Transform<'g> {
    /// Start a traversal
    #[must_use]
    pub fn new(generator: &'g Generator) -> Self {
        Self {
            generator,
            pending: Vec::new(),
        }
    }

    /// Offer the node at `index`; returns whether it was queued
    pub fn visit<C>(&mut self, index: usize, node: &C) -> bool
    where
        C: FunctionCandidate + ?Sized,
    {
        match self.generator.claim(node) {
            Some(request) => {
                debug!(function = %request.function_name, index, "queued");
                self.pending.push((index, request));
                true
            }
            None => false,
        }
    }

    /// Number of queued requests
    #[inline]
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Join point: generate every queued request and splice the results
    ///
    /// Successful results are spliced even when others fail; the first
    /// failure in visiting order is returned. Returns the rewritten names.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Function`] for the first failed request.
    pub async fn finalize<C>(self, nodes: &mut [C]) -> Result<Vec<String>, TransformError>
    where
        C: FunctionCandidate,
    {
        let generator = self.generator;
        let results = join_all(self.pending.into_iter().map(|(index, request)| async move {
            let result = generator.generate(&request).await;
            (index, request.function_name, result)
        }))
        .await;

        let mut rewritten = Vec::new();
        let mut first_error = None;
        for (index, name, result) in results {
            match (result, nodes.get_mut(index)) {
                (Ok(statements), Some(node)) => {
                    apply(node, statements);
                    rewritten.push(name);
                }
                (Ok(_), None) => warn!(function = %name, index, "node index out of range"),
                (Err(e), _) => {
                    error!(function = %name, error = %e, "generation failed");
                    first_error.get_or_insert(TransformError::function(name, e));
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(rewritten),
        }
    }
}

/// Whether `range` lies inside a body that is already being replaced
fn inside_any(bodies: &[Range<usize>], range: &Range<usize>) -> bool {
    bodies
        .iter()
        .any(|body| body.start <= range.start && range.end <= body.end)
}

/// List marked functions without generating anything
///
/// # Errors
///
/// Returns [`SyntaxError`] for unparseable source.
pub fn scan(source: &str, dialect: Dialect) -> Result<Vec<Target>, SyntaxError> {
    let file = SourceFile::parse(source, dialect)?;
    Ok(file
        .functions()
        .iter()
        .filter_map(|node| {
            let metadata = detect::extract(node)?;
            let offset = node.range().start;
            let line = source.get(..offset).map_or(1, |s| s.matches('\n').count() + 1);
            Some(Target {
                name: node.display_name().to_string(),
                line,
                signature: node.signature_text().to_string(),
                metadata,
            })
        })
        .collect())
}
