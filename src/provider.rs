//! Template lookup from name to cached, compiled artifact.
//!
//! Lookup order for one request:
//! 1. Expand the name into locale candidates, most specific first
//! 2. Probe each candidate under the search context until one resolves
//! 3. Load the resolved resource through the cache (read, decode, compile)
//! 4. If nothing resolved, record the absence under the requested name

use crate::cache::{Absence, ArtifactCache, CacheStats, CachedValue, Identity, TEMPLATE_KIND};
use crate::config::schema::ProviderConfig;
use crate::encoding::{Encoding, EncodingDecoder};
use crate::error::{Result, TemplateError};
use crate::locale::{Locale, TemplateName};
use crate::resource::{
    HttpFetcher, ResourceHandle, ResourceLocator, ResourceReader, SearchContext, SearchLocator,
    SourceReader,
};
use crate::template::{CompiledTemplate, TemplateCompiler, TextCompiler};
use std::sync::Arc;

/// Resolves template requests to shared compiled artifacts.
///
/// The provider owns its cache; construct one per process (or per test) and
/// share it by reference or `Arc`.
pub struct TemplateProvider {
    cache: ArtifactCache,
    locator: Arc<dyn ResourceLocator>,
    reader: Arc<dyn ResourceReader>,
    compiler: Arc<dyn TemplateCompiler>,
    decoder: EncodingDecoder,
    context: Option<SearchContext>,
    check_modified: bool,
}

impl TemplateProvider {
    /// Create a provider with the default collaborators and no default
    /// search context.
    pub fn new() -> Self {
        let fetcher = Arc::new(HttpFetcher::new());
        Self {
            cache: ArtifactCache::new(),
            locator: Arc::new(SearchLocator::new(Arc::clone(&fetcher))),
            reader: Arc::new(SourceReader::new(fetcher)),
            compiler: Arc::new(TextCompiler),
            decoder: EncodingDecoder::default(),
            context: None,
            check_modified: false,
        }
    }

    /// Create a provider from validated settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigValidation` if the template path or default encoding
    /// is unusable.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;

        let fetcher = Arc::new(HttpFetcher::with_timeout(config.http_timeout()));
        let cache = match config.wait_timeout() {
            Some(timeout) => ArtifactCache::with_wait_timeout(timeout),
            None => ArtifactCache::new(),
        };

        Ok(Self {
            cache,
            locator: Arc::new(SearchLocator::new(Arc::clone(&fetcher))),
            reader: Arc::new(SourceReader::new(fetcher)),
            compiler: Arc::new(TextCompiler),
            decoder: config.decoder()?,
            context: Some(config.search_context()?),
            check_modified: config.cache.check_modified,
        })
    }

    /// Set the context used by [`get_default`](Self::get_default).
    pub fn with_context(mut self, context: SearchContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_locator(mut self, locator: impl ResourceLocator + 'static) -> Self {
        self.locator = Arc::new(locator);
        self
    }

    pub fn with_reader(mut self, reader: impl ResourceReader + 'static) -> Self {
        self.reader = Arc::new(reader);
        self
    }

    pub fn with_compiler(mut self, compiler: impl TemplateCompiler + 'static) -> Self {
        self.compiler = Arc::new(compiler);
        self
    }

    pub fn with_cache(mut self, cache: ArtifactCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_decoder(mut self, decoder: EncodingDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    /// Reload cached file templates whose modification time has changed.
    pub fn with_check_modified(mut self, check_modified: bool) -> Self {
        self.check_modified = check_modified;
        self
    }

    /// Resolve `name` for `locale` under `context` and return its compiled form.
    ///
    /// `encoding` is a label such as `UTF-8` or `ISO-8859-1`; an empty label
    /// selects the configured default.
    ///
    /// # Errors
    ///
    /// - `MalformedName` if the name's placeholder usage is invalid
    /// - `UnknownEncoding` if the label names no supported encoding
    /// - `NotFound` if no candidate resolves (the absence is cached)
    /// - `Decode`, `Compile`, `Io`, `Fetch` for content failures (not cached)
    pub fn get(
        &self,
        name: &str,
        locale: &Locale,
        encoding: &str,
        context: &SearchContext,
    ) -> Result<Arc<CompiledTemplate>> {
        let parsed = TemplateName::parse(name)?;
        let encoding = self.decoder.resolve(encoding)?;
        self.lookup(&parsed, locale, encoding, context)
    }

    /// Like [`get`](Self::get), using the context from construction.
    ///
    /// # Errors
    ///
    /// Returns `ConfigValidation` if the provider has no search context.
    pub fn get_default(
        &self,
        name: &str,
        locale: &Locale,
        encoding: &str,
    ) -> Result<Arc<CompiledTemplate>> {
        let context = self.default_context()?;
        self.get(name, locale, encoding, context)
    }

    /// Resolve `name` for the locale written inside its own placeholder.
    ///
    /// `short{_en_GB}` probes `short_en_GB`, `short_en`, then `short`. Names
    /// without a placeholder resolve as-is.
    pub fn get_localized(
        &self,
        name: &str,
        encoding: &str,
        context: &SearchContext,
    ) -> Result<Arc<CompiledTemplate>> {
        let parsed = TemplateName::parse(name)?;
        let locale = parsed.embedded_locale()?.unwrap_or_default();
        let encoding = self.decoder.resolve(encoding)?;
        self.lookup(&parsed, &locale, encoding, context)
    }

    fn lookup(
        &self,
        name: &TemplateName,
        locale: &Locale,
        encoding: Encoding,
        context: &SearchContext,
    ) -> Result<Arc<CompiledTemplate>> {
        let candidates = name.candidates(locale);
        let missing = absence_identity(name, locale, encoding, context);

        // A recorded absence is served without probing again.
        if self.cache.peek(&missing).is_none() {
            if let Some(handle) = self.probe(&candidates, context)? {
                return self.load(&handle, encoding);
            }
        }

        let value = self.cache.get_or_load(&missing, || {
            tracing::debug!(
                "No candidate of {} resolved in {}; recording absence",
                name.as_str(),
                context
            );
            Ok(CachedValue::Missing(Arc::new(Absence::new(
                name.as_str(),
                candidates.clone(),
                encoding.label(),
            ))))
        })?;
        value.into_result()
    }

    /// Return the first candidate that resolves, in order.
    fn probe(
        &self,
        candidates: &[String],
        context: &SearchContext,
    ) -> Result<Option<ResourceHandle>> {
        for candidate in candidates {
            if let Some(handle) = self.locator.locate(candidate, context)? {
                return Ok(Some(handle));
            }
        }
        Ok(None)
    }

    fn load(&self, handle: &ResourceHandle, encoding: Encoding) -> Result<Arc<CompiledTemplate>> {
        let identity = Identity::resolved(TEMPLATE_KIND, encoding.label(), handle.location());

        if self.check_modified {
            self.drop_if_stale(&identity, handle);
        }

        let value = self.cache.get_or_load(&identity, || {
            let modified = handle.modified();
            let bytes = self.reader.read(handle)?;
            let text = encoding.decode(&bytes)?;
            let template = self.compiler.compile(&identity, text)?;
            tracing::info!("Compiled {} from {}", template, handle.candidate());
            Ok(CachedValue::Artifact(Arc::new(
                template.with_modified(modified),
            )))
        })?;
        value.into_result()
    }

    fn drop_if_stale(&self, identity: &Identity, handle: &ResourceHandle) {
        let Some(CachedValue::Artifact(cached)) = self.cache.peek(identity) else {
            return;
        };
        let current = handle.modified();
        if current.is_some() && current != cached.modified() {
            tracing::info!("{} changed since it was compiled; reloading", handle);
            self.cache.invalidate(identity);
        }
    }

    /// Forget a recorded absence so the next lookup in `context` probes
    /// again.
    ///
    /// Returns whether an absence was recorded for this request.
    pub fn forget_missing(
        &self,
        name: &str,
        locale: &Locale,
        encoding: &str,
        context: &SearchContext,
    ) -> Result<bool> {
        let parsed = TemplateName::parse(name)?;
        let encoding = self.decoder.resolve(encoding)?;
        Ok(self
            .cache
            .invalidate(&absence_identity(&parsed, locale, encoding, context)))
    }

    /// Drop the cached artifact or absence for `identity`.
    pub fn invalidate(&self, identity: &Identity) -> bool {
        self.cache.invalidate(identity)
    }

    /// Drop every cached artifact and absence.
    pub fn flush(&self) -> usize {
        self.cache.flush()
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn cache(&self) -> &ArtifactCache {
        &self.cache
    }

    /// The context from construction, if any.
    pub fn context(&self) -> Option<&SearchContext> {
        self.context.as_ref()
    }

    pub fn decoder(&self) -> &EncodingDecoder {
        &self.decoder
    }

    fn default_context(&self) -> Result<&SearchContext> {
        self.context
            .as_ref()
            .ok_or_else(|| TemplateError::ConfigValidation {
                message: "No template path configured".to_string(),
            })
    }
}

/// Key for a recorded absence. Unlocalized names ignore the locale.
fn absence_identity(
    name: &TemplateName,
    locale: &Locale,
    encoding: Encoding,
    context: &SearchContext,
) -> Identity {
    let root = Locale::root();
    let locale = if name.is_localized() { locale } else { &root };
    Identity::requested(TEMPLATE_KIND, encoding.label(), name.as_str(), locale, context)
}

impl Default for TemplateProvider {
    fn default() -> Self {
        Self::new()
    }
}
