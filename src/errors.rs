use thiserror::Error;

/// Everything that can go wrong while converting one statement file
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Input markup is not well-formed (unbalanced tags, invalid syntax)
    #[error("Markup parse failed: {0}")]
    Markup(#[from] quick_xml::Error),

    /// An element the fixed OFX schema requires is missing
    #[error("Unable to find a child of {parent} named {tag}")]
    ChildNotFound { parent: String, tag: String },

    /// No root element remained after stripping the leading header block
    #[error("Document contains no root element")]
    EmptyDocument,

    /// Failed to read an input file or write an output file
    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),

    /// Config file exists but is not valid TOML for our schema
    #[error("Invalid config file: {0}")]
    Config(#[from] toml::de::Error),
}

impl ConvertError {
    pub(crate) fn child_not_found(parent: &str, tag: &str) -> Self {
        ConvertError::ChildNotFound {
            parent: parent.to_string(),
            tag: tag.to_string(),
        }
    }
}

/// Alias used throughout the crate
pub type ConvertResult<T> = Result<T, ConvertError>;
