use std::io;
use thiserror::Error;

/// Reasons a launch attempt can fail
///
/// Every variant describes the *launch*, never the outcome of the launched
/// program: once a child is running its exit status is not observed.
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Invalid launch request: {0}")]
    InvalidRequest(String),

    #[error("Too many arguments: {count} supplied, at most {max} allowed")]
    ArgumentCountExceeded { count: usize, max: usize },

    #[error("Failed to duplicate the calling process: {source}")]
    DuplicationFailed {
        #[source]
        source: io::Error,
    },

    #[error("Failed to replace process image with {program}: {source}")]
    ImageReplacementFailed {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create process {program}: {source}")]
    ProcessCreationFailed {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl LaunchError {
    /// Check if the caller broke the launch contract (no OS call was made)
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            LaunchError::InvalidRequest(_) | LaunchError::ArgumentCountExceeded { .. }
        )
    }

    /// Raw OS error code behind this failure, if the OS produced one
    pub fn os_error(&self) -> Option<i32> {
        match self {
            LaunchError::DuplicationFailed { source }
            | LaunchError::ImageReplacementFailed { source, .. }
            | LaunchError::ProcessCreationFailed { source, .. }
            | LaunchError::Io(source) => source.raw_os_error(),
            LaunchError::InvalidRequest(_) | LaunchError::ArgumentCountExceeded { .. } => None,
        }
    }

    /// Check if the executable could not be found
    pub fn is_not_found(&self) -> bool {
        match self {
            LaunchError::ImageReplacementFailed { source, .. }
            | LaunchError::ProcessCreationFailed { source, .. } => {
                source.kind() == io::ErrorKind::NotFound
            }
            _ => false,
        }
    }
}
