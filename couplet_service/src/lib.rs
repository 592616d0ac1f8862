// Service layer for the couplet engine: everything between files on disk,
// the command line, or an HTTP request and `couplet_engine`.
//
// - `config.rs`: `ServiceConfig`, port and batch-size clamping plus the
//   nested `EngineConfig`, loaded from JSON
// - `corpus.rs`: `load_corpus`, plain-text and JSON corpus files, and a
//   dictionary coverage check
// - `service.rs`: `CoupletService`, request parsing, clamping, generation,
//   and JSON replies with generic failures
// - `http.rs`: `tiny_http` routing and the serial serve loop
// - `error.rs`: `ServiceError`
//
// The `couplets` binary (`main.rs`) wires these together behind `generate`
// and `serve` subcommands.

pub mod config;
pub mod corpus;
pub mod error;
pub mod http;
pub mod service;

pub use config::ServiceConfig;
pub use corpus::{check_coverage, dictionary_coverage, load_corpus};
pub use error::ServiceError;
pub use service::{CoupletRecord, CoupletRequest, CoupletResponse, CoupletService, Reply};
