//! Request/response boundary around the library.
//!
//! Requests and responses use the JSON shapes the front end exchanges with
//! its worker: `{"operation": "browse", "source": "bookId", "bookId": ...}`
//! in, `{"operation": "browse", "book": {...}, "dataTruncated": true}` out.
//! A failed operation answers with `error` and nothing else.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use thiserror::Error;
use tracing::{debug, error};

use crate::book::{Book, BookMetadata, BookResult, Library};
use crate::encoders::algorithms::errors::BookError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Browse,
    Search,
    Random,
    GetBookMetadata,
}

/// Where a browsed book comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "camelCase")]
pub enum BrowseSource {
    #[serde(rename_all = "camelCase")]
    BookId { book_id: String },
    #[serde(rename_all = "camelCase")]
    BookImage { book_image_data: Vec<u8> },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageOptions {
    pub number_of_pages: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum Request {
    Browse(BrowseSource),
    #[serde(rename_all = "camelCase")]
    Search {
        search_text: String,
        #[serde(default)]
        search_options: PageOptions,
    },
    #[serde(rename_all = "camelCase")]
    Random {
        #[serde(default)]
        random_options: PageOptions,
    },
    GetBookMetadata { book: Book },
}

impl Request {
    pub fn operation(&self) -> Operation {
        match self {
            Request::Browse(_) => Operation::Browse,
            Request::Search { .. } => Operation::Search,
            Request::Random { .. } => Operation::Random,
            Request::GetBookMetadata { .. } => Operation::GetBookMetadata,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub operation: Operation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book: Option<Book>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_id: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub data_truncated: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub invalid_data: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_metadata: Option<BookMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    fn empty(operation: Operation) -> Self {
        Response {
            operation,
            book: None,
            book_id: None,
            data_truncated: false,
            invalid_data: false,
            book_metadata: None,
            error: None,
        }
    }

    fn from_result(operation: Operation, result: BookResult) -> Self {
        Response {
            book: result.book,
            book_id: result.book_id,
            data_truncated: result.data_truncated,
            invalid_data: result.invalid_data,
            ..Self::empty(operation)
        }
    }

    fn failed(operation: Operation, message: String) -> Self {
        Response {
            error: Some(message),
            ..Self::empty(operation)
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Runs requests one at a time against a shared library.
pub struct Worker<R = StdRng> {
    library: Arc<Library>,
    rng: R,
}

impl Worker<StdRng> {
    /// A worker with an OS-seeded generator.
    pub fn new(library: Arc<Library>) -> Self {
        Self::with_rng(library, StdRng::from_os_rng())
    }

    /// A worker whose random books repeat for the same seed.
    pub fn with_seed(library: Arc<Library>, seed: u64) -> Self {
        Self::with_rng(library, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Worker<R> {
    pub fn with_rng(library: Arc<Library>, rng: R) -> Self {
        Worker { library, rng }
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Performs one request. Never panics: failures, including panics inside
    /// big-integer arithmetic, become an `error` response.
    pub fn handle(&mut self, request: Request) -> Response {
        let operation = request.operation();
        debug!(?operation, "handling request");

        match panic::catch_unwind(AssertUnwindSafe(|| self.dispatch(request))) {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                error!(?operation, error = %e, "operation failed");
                Response::failed(operation, e.to_string())
            }
            Err(payload) => {
                let e = BookError::Computation(panic_message(payload.as_ref()));
                error!(?operation, error = %e, "operation aborted");
                Response::failed(operation, e.to_string())
            }
        }
    }

    fn dispatch(&mut self, request: Request) -> Result<Response, BookError> {
        let library = &self.library;
        match request {
            Request::Browse(BrowseSource::BookId { book_id }) => Ok(Response::from_result(
                Operation::Browse,
                library.browse_book_id(&book_id)?,
            )),
            Request::Browse(BrowseSource::BookImage { book_image_data }) => Ok(
                Response::from_result(Operation::Browse, library.browse_book_image(&book_image_data)?),
            ),
            Request::Search {
                search_text,
                search_options,
            } => Ok(Response::from_result(
                Operation::Search,
                library.search(&search_text, search_options.number_of_pages, &mut self.rng)?,
            )),
            Request::Random { random_options } => Ok(Response::from_result(
                Operation::Random,
                library.random(random_options.number_of_pages, &mut self.rng)?,
            )),
            Request::GetBookMetadata { book } => Ok(Response {
                book_metadata: Some(library.metadata(&book)?),
                ..Response::empty(Operation::GetBookMetadata)
            }),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "arithmetic failure".to_string()
    }
}

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("worker thread is no longer running")]
    Disconnected,
    #[error("cannot start worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

type Job = (Request, mpsc::Sender<Response>);

/// A worker on its own thread, so long conversions never block the caller's
/// thread. Requests queue and run in order.
pub struct WorkerHandle {
    sender: Option<mpsc::Sender<Job>>,
    thread: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    /// Starts `worker` on a new thread. With `preload`, the maximum book
    /// index is computed before the first request is taken.
    pub fn spawn_with<R>(worker: Worker<R>, preload: bool) -> Result<Self, WorkerError>
    where
        R: Rng + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel::<Job>();
        let thread = thread::Builder::new()
            .name("babel-worker".to_string())
            .spawn(move || {
                let mut worker = worker;
                if preload {
                    worker.library().max_index();
                }
                for (request, reply) in receiver {
                    let response = worker.handle(request);
                    // caller may have stopped waiting
                    let _ = reply.send(response);
                }
                debug!("worker thread stopping");
            })?;

        Ok(WorkerHandle {
            sender: Some(sender),
            thread: Some(thread),
        })
    }

    /// Sends a request and blocks until its response arrives.
    pub fn call(&self, request: Request) -> Result<Response, WorkerError> {
        let (reply, response) = mpsc::channel();
        self.sender
            .as_ref()
            .ok_or(WorkerError::Disconnected)?
            .send((request, reply))
            .map_err(|_| WorkerError::Disconnected)?;
        response.recv().map_err(|_| WorkerError::Disconnected)
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        // closing the channel ends the worker loop
        self.sender.take();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
