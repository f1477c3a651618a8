//! Errors at the edges of the engine, and the warnings that parsing
//! records instead of failing.

use crate::def_boxed_thiserror;


def_boxed_thiserror!(ViewError, pub enum ViewErrorKind {
    #[error("unknown environment {0:?}, expecting one of \"development\", \
             \"staging\", \"production\"")]
    UnknownEnvironment(String),
    #[error("invalid boolean {value:?} in env var {name:?}")]
    InvalidBool { name: String, value: String },
    #[error("expecting {what} in the form `name=value`, got {got:?}")]
    NotAnAssignment { what: &'static str, got: String },
    #[error("data must be a JSON object, got: {0}")]
    DataNotAnObject(String),
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
});


/// Something went wrong while loading or parsing a template. None of
/// these abort a parse: the offending piece degrades to empty output.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewWarning {
    #[error("template file {path:?} does not exist")]
    MissingFile { path: String },
    #[error("could not read template file {path:?}: {message}")]
    ReadFailed { path: String, message: String },
    #[error("section {section:?} not found in {file:?}, using the whole template")]
    MissingSection { file: String, section: String },
    #[error("partial {name:?} has an empty path")]
    EmptyPartialPath { name: String },
    #[error("partial {name:?}: {path:?} does not exist")]
    MissingPartial { name: String, path: String },
    #[error("partial {name:?}: {path:?} nested deeper than {limit} levels")]
    PartialTooDeep { name: String, path: String, limit: usize },
    #[error("malformed properties in tag {tag:?}")]
    MalformedProperties { tag: String },
}
