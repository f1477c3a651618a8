//! Mustache-style HTML views: `{{name}}` variables, `{{name}}...{{/name}}`
//! blocks shown by setting `name` to "True", and partials included as
//! `{{id "/path/to/partial.html" key:"value"}}` whose variables become
//! `{{id-name}}`. Parsed templates are cached and shared between
//! threads; each `View` carries its own data.

pub mod warn;
pub mod boxed_error;
pub mod error;
pub mod util;
pub mod path;
pub mod miniarcswap;
pub mod in_threadpool;
pub mod source;
pub mod pointers;
pub mod element;
pub mod scanner;
pub mod props;
pub mod data;
pub mod render;
pub mod parser;
pub mod cache;
pub mod config;
pub mod bind;
pub mod engine;
pub mod view;

pub use crate::{engine::ViewEngine,
                view::{View, ViewChild},
                element::Template,
                data::ViewData,
                cache::TemplateCache,
                config::{ViewConfig, Environment},
                source::{TemplateSource, DiskSource, MemorySource},
                pointers::Pointer,
                bind::{Bindable, Binder},
                error::{ViewError, ViewErrorKind, ViewWarning}};
