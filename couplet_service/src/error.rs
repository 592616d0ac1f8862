// Error type for the service layer: loading inputs and binding the server.
//
// Generation itself never fails; everything here happens before the first
// request or at the process boundary.

use couplet_engine::ConfigError;
use couplet_phonetics::DictionaryError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid corpus {path}: {reason}")]
    Corpus { path: String, reason: String },

    #[error(transparent)]
    Dictionary(#[from] DictionaryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to bind {addr}: {reason}")]
    Bind { addr: String, reason: String },
}
