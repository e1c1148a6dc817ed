use thiserror::Error;

/// The error type for this application.
#[derive(Debug, Error)]
pub enum AppError {
    /// An I/O error occurred while spawning or talking to a child process.
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),

    /// Command output could not be decoded.
    #[error("UTF-8 Conversion Error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// A command ran but returned a non-zero status.
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        stdout: String,
        stderr: String,
    },

    /// The response to `command` is not well-formed XML.
    #[error("XML Parsing Error in '{command}' response ({preview}): {source}")]
    XmlParse {
        command: String,
        preview: String,
        #[source]
        source: roxmltree::Error,
    },

    /// A line inside a status section did not have the expected layout.
    #[error("Status line [{line}] did not match [{pattern}]")]
    StatusLine { line: String, pattern: String },

    /// The status output contains a section heading we do not know.
    #[error("Unrecognized status section: {0}")]
    UnknownStatusSection(String),

    /// `git cat-file -p` output could not be interpreted.
    #[error("Cat-file Error: {0}")]
    CatFile(String),

    /// A request was built with an invalid combination of options.
    #[error("Error: {0}")]
    Validation(String),

    /// The user cancelled the operation from a UI prompt.
    #[error("Operation cancelled")]
    OperationCancelled,
}

pub type AppResult<T> = Result<T, AppError>;
