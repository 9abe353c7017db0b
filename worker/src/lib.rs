//! PetriWorld Worker
//!
//! Message-driven execution host: runs the simulation engine on a dedicated
//! thread behind a request/response channel protocol, keeping the caller's
//! thread free while large populations are stepped.

pub mod handler;
pub mod protocol;
pub mod worker;

pub use handler::{PerformanceHistory, WorkerState, PERFORMANCE_HISTORY_CAPACITY};
pub use protocol::{Envelope, PerformanceRecord, Response, ResponseBody, WorkerError};
pub use worker::{spawn, WorkerHandle};
