//! Single HTTP GET with a gate on the response head.
//!
//! Uses the curl crate (libcurl). The caller's gate sees the final response
//! head before any body byte is kept; if it breaks, the transfer is stopped
//! so rejected responses are never downloaded. Accepted bodies are buffered
//! in memory. Runs in the current thread; call from `spawn_blocking` if used
//! from async code.

mod head;

pub use head::ResponseHead;

use std::cell::RefCell;
use std::ops::ControlFlow;
use std::time::Duration;

/// Upper bound on the body buffer reserved up front from `Content-Length`.
const MAX_PREALLOC: u64 = 64 * 1024 * 1024;

/// Transfer limits applied to every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpOptions {
    /// Whole-request deadline (connect, headers and body).
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(15 * 60),
            connect_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[source] curl::Error),
    #[error("curl setup failed: {0}")]
    Setup(#[from] curl::Error),
    #[error("request failed: {0}")]
    Transfer(#[source] curl::Error),
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Transfer(e) if e.is_operation_timedout())
    }
}

/// Result of a gated GET.
#[derive(Debug)]
pub enum Fetched<B, C> {
    /// The gate broke on the head; the body was not read.
    Stopped { head: ResponseHead, verdict: B },
    /// The gate continued; `body` holds the full response body (possibly empty).
    Complete {
        head: ResponseHead,
        verdict: C,
        body: Vec<u8>,
    },
}

struct Exchange<B, C, G> {
    head: ResponseHead,
    gate: G,
    verdict: Option<ControlFlow<B, C>>,
    body: Vec<u8>,
}

impl<B, C, G> Exchange<B, C, G>
where
    G: FnMut(&ResponseHead) -> ControlFlow<B, C>,
{
    /// Consults the gate on first use; returns whether the body should be kept.
    fn decide(&mut self) -> bool {
        if self.verdict.is_none() {
            let verdict = (self.gate)(&self.head);
            if let (ControlFlow::Continue(_), Some(len)) = (&verdict, self.head.content_length()) {
                self.body.reserve(len.min(MAX_PREALLOC) as usize);
            }
            self.verdict = Some(verdict);
        }
        matches!(self.verdict, Some(ControlFlow::Continue(_)))
    }

    fn stopped(&self) -> bool {
        matches!(self.verdict, Some(ControlFlow::Break(_)))
    }
}

/// Performs a GET on `url`, following redirects, and consults `gate` with the
/// final response head before keeping any of the body. The gate is called once.
pub fn fetch<B, C, G>(url: &str, opts: &HttpOptions, gate: G) -> Result<Fetched<B, C>, FetchError>
where
    G: FnMut(&ResponseHead) -> ControlFlow<B, C>,
{
    let exchange = RefCell::new(Exchange {
        head: ResponseHead::default(),
        gate,
        verdict: None,
        body: Vec::new(),
    });

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(FetchError::InvalidUrl)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.request_timeout)?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            exchange.borrow_mut().head.push_line(data);
            true
        })?;
        transfer.write_function(|data| {
            let mut ex = exchange.borrow_mut();
            if !ex.decide() {
                return Ok(0); // abort transfer
            }
            ex.body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()
    };

    let mut ex = exchange.into_inner();
    match performed {
        Ok(()) => {}
        // A zero-length write is our own stop signal, not a network failure.
        Err(e) if e.is_write_error() && ex.stopped() => {}
        Err(e) => return Err(FetchError::Transfer(e)),
    }

    let verdict = match ex.verdict.take() {
        Some(verdict) => verdict,
        None => {
            // No body bytes arrived; the code libcurl settled on is authoritative.
            if let Ok(code) = easy.response_code() {
                ex.head.status = code;
            }
            (ex.gate)(&ex.head)
        }
    };

    Ok(match verdict {
        ControlFlow::Break(verdict) => Fetched::Stopped {
            head: ex.head,
            verdict,
        },
        ControlFlow::Continue(verdict) => Fetched::Complete {
            head: ex.head,
            verdict,
            body: ex.body,
        },
    })
}
