use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoggingError {
    /// Structural problem found while building the provider graph.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Failure reported by a leaf provider's transport.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Failures collected while fanning an entry out to several providers.
    #[error("Logging failed: {}", join_messages(.0))]
    Aggregate(Vec<LoggingError>),

    #[error("Failed to bind to address {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

impl LoggingError {
    /// Whether a fallback provider may intercept this error.
    ///
    /// Only runtime delivery failures are routed; misconfiguration and misuse
    /// always reach the caller.
    pub fn is_routable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Aggregate(_))
    }

    /// Short type name used when the error is attached to a log entry.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "ConfigurationError",
            Self::InvalidState(_) => "InvalidStateError",
            Self::InvalidArgument(_) => "InvalidArgumentError",
            Self::Transport(_) => "TransportError",
            Self::Aggregate(_) => "AggregateError",
            Self::Bind { .. } | Self::Server(_) => "IoError",
        }
    }

    /// The errors wrapped by an aggregate, empty for every other variant.
    pub fn inner_errors(&self) -> &[LoggingError] {
        match self {
            Self::Aggregate(errors) => errors,
            _ => &[],
        }
    }
}

fn join_messages(errors: &[LoggingError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
