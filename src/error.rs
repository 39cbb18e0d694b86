use thiserror::Error;

use crate::dom::dom_model::NodeId;

#[derive(Error, Debug)]
pub enum FillError {
    /// A node id that does not belong to the document
    #[error("Node {0:?} is not part of this document")]
    UnknownNode(NodeId),

    /// Mutation attempted on an element that is not a form control
    #[error("<{tag}> is not a form control ({operation})")]
    NotAControl { tag: String, operation: &'static str },

    /// Option index outside the select's option list
    #[error("Option index {index} out of range ({count} options)")]
    OptionOutOfRange { index: usize, count: usize },

    /// A profile rule's key pattern failed to compile
    #[error("Invalid key pattern '{pattern}': {source}")]
    InvalidPattern { pattern: String, source: regex::Error },

    /// A selector assembled at runtime did not parse
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    /// Speech recognition is not available in this host
    #[error("SpeechRecognition not supported in this browser.")]
    SpeechUnsupported,

    /// Recognition refused on browser-internal pages
    #[error("Restricted page; use a normal https:// page.")]
    RestrictedPage,

    /// Text inference backend failed (network, HTTP status, empty reply)
    #[error("Inference failed ({backend}): {message}")]
    Inference { backend: &'static str, message: String },

    /// Inference backend is missing required credentials
    #[error("No API key found in ${0}")]
    MissingApiKey(String),

    #[error("JSON error ({context}): {source}")]
    Json { context: String, source: serde_json::Error },

    #[error("YAML error ({context}): {source}")]
    Yaml { context: String, source: serde_yaml::Error },

    #[error("IO error ({context}): {source}")]
    Io { context: String, source: std::io::Error },
}

pub type Result<T> = std::result::Result<T, FillError>;
