//! Loading templates: source access, caching, partial resolution.

use std::sync::Arc;

use crate::{config::ViewConfig,
            source::{TemplateSource, DiskSource},
            cache::TemplateCache,
            pointers::{PartialPointers, Pointer},
            element::Template,
            error::ViewWarning,
            parser::{PartialLoader, parse},
            path::logical_path,
            view::View,
            warn};


/// Cache keys and warnings use this form of a path.
fn canonical_file(file: &str) -> String {
    format!("/{}", logical_path(file))
}

pub struct ViewEngine {
    config: ViewConfig,
    source: Box<dyn TemplateSource>,
    cache: Arc<TemplateCache>,
    pointers: PartialPointers,
}

impl ViewEngine {
    pub fn new(
        config: ViewConfig,
        source: Box<dyn TemplateSource>,
        cache: Arc<TemplateCache>
    ) -> Self {
        ViewEngine {
            config,
            source,
            cache,
            pointers: PartialPointers::default(),
        }
    }

    /// Templates from disk below `config.root`, the global cache.
    pub fn from_config(config: ViewConfig) -> Self {
        let source = DiskSource::new(config.root.clone());
        Self::new(config, Box::new(source), TemplateCache::global())
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<TemplateCache> {
        &self.cache
    }

    pub fn pointers(&self) -> &PartialPointers {
        &self.pointers
    }

    /// Replace the pointer table. Cached templates keep the partials
    /// they were parsed with.
    pub fn set_pointers(&self, pointers: Vec<Pointer>) {
        self.pointers.set(pointers)
    }

    pub fn add_pointer(&self, pointer: Pointer) {
        self.pointers.push(pointer)
    }

    /// The parsed `section` of `file` (whole file if `section` is
    /// empty), from the cache unless in development mode.
    pub fn template(&self, file: &str, section: &str) -> Arc<Template> {
        self.template_at_depth(&canonical_file(file), &section.to_lowercase(), 0)
    }

    fn template_at_depth(&self, file: &str, section: &str, depth: usize) -> Arc<Template> {
        if self.config.is_development() {
            return Arc::new(self.parse_at_depth(file, section, depth))
        }
        if let Some(template) = self.cache.get(file, section) {
            return template
        }
        let template = Arc::new(self.parse_at_depth(file, section, depth));
        // A parse cut off at the nesting limit depends on the depth it
        // was made at
        if template.warnings.iter().any(
            |w| matches!(w, ViewWarning::PartialTooDeep { .. }))
        {
            return template
        }
        self.cache.insert(file, section, template)
    }

    /// Parse without looking at or filling the cache (partials still
    /// go through it).
    pub fn parse_uncached(&self, file: &str, section: &str) -> Template {
        self.parse_at_depth(&canonical_file(file), &section.to_lowercase(), 0)
    }

    fn parse_at_depth(&self, file: &str, section: &str, depth: usize) -> Template {
        let text = if self.source.file_exists(file) {
            match self.source.read_file(file) {
                Ok(text) => text,
                Err(e) => {
                    let warning = ViewWarning::ReadFailed {
                        path: file.into(),
                        message: format!("{e:#}")
                    };
                    return self.report(Template {
                        warnings: vec![warning],
                        ..Template::default()
                    }, depth)
                }
            }
        } else {
            let warning = ViewWarning::MissingFile { path: file.into() };
            return self.report(Template {
                warnings: vec![warning],
                ..Template::default()
            }, depth)
        };
        self.report(parse(&text, file, section, self, depth), depth)
    }

    /// Print the warnings of top level templates (they include those
    /// of their partials).
    fn report(&self, template: Template, depth: usize) -> Template {
        if self.config.warnings && depth == 0 {
            for w in &template.warnings {
                warn!("{w}");
            }
        }
        template
    }

    /// A fresh view on the given template.
    pub fn load(&self, file: &str, section: &str) -> View {
        View::new(self.template(file, section), self.config.date_format.clone())
    }

    /// A view on inline template text; includes in it are resolved
    /// through this engine. Not cached.
    pub fn from_html(&self, html: &str) -> View {
        let template = self.report(parse(html, "", "", self, 0), 0);
        View::new(Arc::new(template), self.config.date_format.clone())
    }
}

impl PartialLoader for ViewEngine {
    fn resolve(&self, raw: &str) -> String {
        canonical_file(&self.pointers.resolve(&logical_path(raw)))
    }

    fn load_partial(&self, path: &str, depth: usize) -> Option<Arc<Template>> {
        if !self.source.file_exists(path) {
            return None
        }
        Some(self.template_at_depth(path, "", depth))
    }
}
