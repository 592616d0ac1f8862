// Minimal HTTP front end over `tiny_http`.
//
// Routes:
//   GET  /          usage text
//   POST /generate  JSON body {"num_couplets": n}, JSON reply
//   anything else   404 (405 for a known path with the wrong method)
//
// Requests are handled one at a time on the calling thread, so the service
// and its optional shared index need no locking. `route` is pure with
// respect to the network and is what the tests drive.

use std::io::Cursor;

use couplet_phonetics::PhoneticDictionary;
use couplet_prng::RandomSource;
use tiny_http::{Header, Method, Response, Server};
use tracing::{info, warn};

use crate::error::ServiceError;
use crate::service::{CoupletService, Reply};

pub const USAGE: &str = "\
couplet service

POST /generate with a JSON body such as {\"num_couplets\": 5}.
The count is clamped to the configured range; omit it for the default.
";

/// Dispatch one request to a reply.
pub fn route<D, R>(
    service: &mut CoupletService<'_, D>,
    method: &Method,
    url: &str,
    body: &str,
    rng: &mut R,
) -> Reply
where
    D: PhoneticDictionary + ?Sized,
    R: RandomSource,
{
    let path = url.split('?').next().unwrap_or(url);
    match (method, path) {
        (Method::Get, "/") => Reply::text(200, USAGE),
        (Method::Post, "/generate") => service.handle_generate(body, rng),
        (_, "/" | "/generate") => Reply::text(405, "method not allowed\n"),
        _ => Reply::text(404, "not found\n"),
    }
}

fn into_response(reply: Reply) -> Response<Cursor<Vec<u8>>> {
    let mut response = Response::from_data(reply.body.into_bytes()).with_status_code(reply.status);
    match Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes()) {
        Ok(header) => response = response.with_header(header),
        Err(()) => warn!(content_type = reply.content_type, "invalid content type header"),
    }
    response
}

/// Bind `0.0.0.0:port` and serve requests until the process exits.
pub fn serve<D, R>(
    service: &mut CoupletService<'_, D>,
    port: u16,
    rng: &mut R,
) -> Result<(), ServiceError>
where
    D: PhoneticDictionary + ?Sized,
    R: RandomSource,
{
    let addr = format!("0.0.0.0:{port}");
    let server = Server::http(&addr).map_err(|e| ServiceError::Bind {
        addr: addr.clone(),
        reason: e.to_string(),
    })?;
    info!(%addr, shared_cache = service.shares_cache(), "listening");

    for mut request in server.incoming_requests() {
        let mut body = String::new();
        let reply = match request.as_reader().read_to_string(&mut body) {
            Ok(_) => route(service, request.method(), request.url(), &body, rng),
            Err(e) => {
                warn!(error = %e, "failed to read request body");
                Reply::text(400, "unreadable request body\n")
            }
        };
        info!(
            method = %request.method(),
            url = request.url(),
            status = reply.status,
            "handled request"
        );
        if let Err(e) = request.respond(into_response(reply)) {
            warn!(error = %e, "failed to send response");
        }
    }
    Ok(())
}
