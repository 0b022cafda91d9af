use thiserror::Error;

/// Errors raised while building resolvers and label filters from configuration.
///
/// Mapping and filtering themselves never fail; every problem is surfaced
/// here, when the configuration is turned into runtime components.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A resource filter carries a regular expression that does not compile.
    #[error("invalid resource filter pattern {pattern:?} (prefix {prefix:?}): {source}")]
    InvalidFilterPattern {
        /// Prefix of the offending filter.
        prefix: String,
        /// The pattern that failed to compile.
        pattern: String,
        /// Underlying compilation error.
        #[source]
        source: regex::Error,
    },

    /// The monitored resource mapping convention is unusable.
    #[error("invalid mapping convention: {0}")]
    InvalidConvention(String),

    /// The configuration document could not be parsed.
    #[error("configuration error: {0}")]
    Config(#[from] serde_yaml::Error),
}

/// Result type returned by the fallible constructors of this crate.
pub type Result<T> = std::result::Result<T, Error>;
