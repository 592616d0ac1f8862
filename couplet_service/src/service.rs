// Request handling for the couplet endpoint, independent of the transport.
//
// `CoupletService` owns both corpora and the engine configuration and
// borrows the dictionary, any `PhoneticDictionary` (`CmuDictionary` by
// default). Each call to `handle_generate` parses a JSON body, clamps the
// requested count, runs the generator, and renders a JSON reply.
//
// Phonetic caching is the caller's choice: by default every request builds
// a fresh `PhoneticIndex` and drops it afterwards; with `share_cache` the
// service keeps one index alive across requests. A panic inside generation
// is caught and reported as a generic failure; the shared index is rebuilt
// afterwards since it may be half-updated.
//
// Reply shapes:
//   200 {"success": true, "couplets": [{"line1": ..., "line2": ...}, ...]}
//   400 {"success": false, "error": "Malformed request body"}
//   500 {"success": false, "error": "Failed to generate couplets"}

use std::panic::{self, AssertUnwindSafe};

use couplet_engine::{Couplet, CoupletGenerator};
use couplet_phonetics::{CmuDictionary, PhoneticDictionary, PhoneticIndex};
use couplet_prng::RandomSource;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::ServiceConfig;

pub const GENERIC_FAILURE: &str = "Failed to generate couplets";
pub const MALFORMED_REQUEST: &str = "Malformed request body";

/// Body of a generation request. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CoupletRequest {
    #[serde(default)]
    pub num_couplets: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoupletRecord {
    pub line1: String,
    pub line2: String,
}

impl From<Couplet> for CoupletRecord {
    fn from(couplet: Couplet) -> Self {
        Self {
            line1: couplet.line_a,
            line2: couplet.line_b,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoupletResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub couplets: Option<Vec<CoupletRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CoupletResponse {
    pub fn success(couplets: Vec<Couplet>) -> Self {
        Self {
            success: true,
            couplets: Some(couplets.into_iter().map(CoupletRecord::from).collect()),
            error: None,
        }
    }

    pub fn failure(message: &str) -> Self {
        Self {
            success: false,
            couplets: None,
            error: Some(message.to_string()),
        }
    }
}

/// A transport-neutral reply: status code, content type, body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Reply {
    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        let body = serde_json::to_string(value).unwrap_or_else(|e| {
            error!(error = %e, "failed to serialize reply");
            format!(r#"{{"success":false,"error":"{GENERIC_FAILURE}"}}"#)
        });
        Self {
            status,
            content_type: "application/json",
            body,
        }
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: body.into(),
        }
    }
}

pub struct CoupletService<'d, D: ?Sized = CmuDictionary> {
    dictionary: &'d D,
    corpus_a: Vec<String>,
    corpus_b: Vec<String>,
    config: ServiceConfig,
    generator: CoupletGenerator,
    shared_index: Option<PhoneticIndex<'d, D>>,
}

impl<'d, D: PhoneticDictionary + ?Sized> CoupletService<'d, D> {
    pub fn new(
        dictionary: &'d D,
        corpus_a: Vec<String>,
        corpus_b: Vec<String>,
        config: ServiceConfig,
        share_cache: bool,
    ) -> Self {
        let generator = CoupletGenerator::new(config.engine.clone());
        let shared_index = share_cache.then(|| PhoneticIndex::new(dictionary));
        Self {
            dictionary,
            corpus_a,
            corpus_b,
            config,
            generator,
            shared_index,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn shares_cache(&self) -> bool {
        self.shared_index.is_some()
    }

    /// Run one generation with an already-clamped count.
    pub fn generate<R: RandomSource>(&mut self, count: usize, rng: &mut R) -> Vec<Couplet> {
        match self.shared_index.as_mut() {
            Some(index) => {
                self.generator
                    .generate(index, &self.corpus_a, &self.corpus_b, count, rng)
            }
            None => {
                let mut index = PhoneticIndex::new(self.dictionary);
                self.generator
                    .generate(&mut index, &self.corpus_a, &self.corpus_b, count, rng)
            }
        }
    }

    /// Handle one request body. Never panics; every failure becomes a reply.
    pub fn handle_generate<R: RandomSource>(&mut self, body: &str, rng: &mut R) -> Reply {
        let request = if body.trim().is_empty() {
            CoupletRequest::default()
        } else {
            match serde_json::from_str::<CoupletRequest>(body) {
                Ok(request) => request,
                Err(e) => {
                    warn!(error = %e, "rejected malformed request");
                    return Reply::json(400, &CoupletResponse::failure(MALFORMED_REQUEST));
                }
            }
        };
        let count = self.config.clamp_count(request.num_couplets);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.generate(count, rng)));
        match outcome {
            Ok(couplets) => {
                info!(
                    requested = ?request.num_couplets,
                    clamped = count,
                    returned = couplets.len(),
                    "generated couplets"
                );
                Reply::json(200, &CoupletResponse::success(couplets))
            }
            Err(_) => {
                error!(clamped = count, "couplet generation panicked");
                if self.shared_index.is_some() {
                    self.shared_index = Some(PhoneticIndex::new(self.dictionary));
                }
                Reply::json(500, &CoupletResponse::failure(GENERIC_FAILURE))
            }
        }
    }
}
