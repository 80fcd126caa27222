//! Runs pilot callbacks on a dedicated worker thread with a wall-clock budget.
//!
//! Each pilot lives on its own thread for the whole round, so its internal
//! state survives from tick to tick. The engine sends it one request at a
//! time and polls for the reply until the deadline passes. A pilot that
//! misses the deadline loses that call. Nothing new is queued while it is
//! still busy: the next call first spends its own budget waiting for the
//! late reply, drops it, and only then sends its request.
use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use instant::Instant;
use spacejam_api::{Location, PilotAction, PilotResult, ScanRequest, SpaceshipPilot, Vec2};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    Timeout { name: String, timeout: Duration },
    Pilot { name: String, msg: String },
    Panicked { name: String, msg: String },
    Disconnected { name: String },
    Spawn { name: String, msg: String },
}

impl Error {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Timeout { name, timeout } => {
                write!(f, "pilot {name} timed out after {timeout:?}")
            }
            Error::Pilot { name, msg } => write!(f, "pilot {name} failed: {msg}"),
            Error::Panicked { name, msg } => write!(f, "pilot {name} panicked at '{msg}'"),
            Error::Disconnected { name } => write!(f, "pilot {name} is no longer running"),
            Error::Spawn { name, msg } => write!(f, "failed to start pilot {name}: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

type Job = Box<dyn FnOnce(&mut dyn SpaceshipPilot) -> Box<dyn Any + Send> + Send>;

struct Request {
    seq: u64,
    job: Job,
}

struct Reply {
    seq: u64,
    // Err holds a panic message.
    outcome: Result<Box<dyn Any + Send>, String>,
}

pub struct PilotInvoker {
    name: String,
    requests: Sender<Request>,
    replies: Receiver<Reply>,
    next_seq: u64,
    // Sequence number of a call that timed out and has not replied yet.
    in_flight: Option<u64>,
    timeout: Duration,
    poll_interval: Duration,
}

impl PilotInvoker {
    pub fn spawn(
        name: &str,
        pilot: Box<dyn SpaceshipPilot>,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<PilotInvoker, Error> {
        let (request_send, request_recv) = channel::unbounded();
        let (reply_send, reply_recv) = channel::unbounded();
        std::thread::Builder::new()
            .name(format!("pilot-{name}"))
            .spawn(move || run_worker(pilot, request_recv, reply_send))
            .map_err(|e| Error::Spawn {
                name: name.to_string(),
                msg: e.to_string(),
            })?;
        Ok(PilotInvoker {
            name: name.to_string(),
            requests: request_send,
            replies: reply_recv,
            next_seq: 0,
            in_flight: None,
            timeout,
            poll_interval,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs `f` against the pilot and waits at most `timeout` for its result.
    pub fn invoke<R, F>(&mut self, f: F) -> Result<R, Error>
    where
        R: Send + 'static,
        F: FnOnce(&mut dyn SpaceshipPilot) -> PilotResult<R> + Send + 'static,
    {
        let deadline = Instant::now() + self.timeout;
        if let Some(pending) = self.in_flight {
            self.wait_for(pending, deadline)?;
            log::debug!("Dropping late reply {} from pilot {}", pending, self.name);
            self.in_flight = None;
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        let job: Job = Box::new(move |pilot: &mut dyn SpaceshipPilot| {
            let result: Result<R, String> = f(pilot).map_err(|e| e.to_string());
            let reply: Box<dyn Any + Send> = Box::new(result);
            reply
        });
        if self.requests.send(Request { seq, job }).is_err() {
            return Err(self.disconnected());
        }
        self.in_flight = Some(seq);

        let reply = self.wait_for(seq, deadline)?;
        self.in_flight = None;
        self.unpack(reply.outcome)
    }

    /// Returns true while a timed out call is still running on the worker.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    fn wait_for(&self, seq: u64, deadline: Instant) -> Result<Reply, Error> {
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Err(Error::Timeout {
                    name: self.name.clone(),
                    timeout: self.timeout,
                });
            }
            let wait = self.poll_interval.min(deadline - now);
            match self.replies.recv_timeout(wait) {
                Ok(reply) if reply.seq != seq => {
                    log::debug!("Dropping stale reply {} from pilot {}", reply.seq, self.name);
                }
                Ok(reply) => return Ok(reply),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return Err(self.disconnected()),
            }
        }
    }

    pub fn prepare_scan(
        &mut self,
        tick: u32,
        location: Location,
        health: f64,
        energy: f64,
    ) -> Result<Option<ScanRequest>, Error> {
        self.invoke(move |pilot| pilot.prepare_scan(tick, &location, health, energy))
    }

    pub fn update(
        &mut self,
        tick: u32,
        location: Location,
        health: f64,
        energy: f64,
        located: Vec<Vec2>,
    ) -> Result<PilotAction, Error> {
        self.invoke(move |pilot| pilot.update(tick, &location, health, energy, &located))
    }

    fn unpack<R: 'static>(&self, outcome: Result<Box<dyn Any + Send>, String>) -> Result<R, Error> {
        match outcome {
            Ok(value) => match value.downcast::<Result<R, String>>() {
                Ok(result) => (*result).map_err(|msg| Error::Pilot {
                    name: self.name.clone(),
                    msg,
                }),
                Err(_) => Err(Error::Pilot {
                    name: self.name.clone(),
                    msg: "reply had an unexpected type".to_string(),
                }),
            },
            Err(msg) => Err(Error::Panicked {
                name: self.name.clone(),
                msg,
            }),
        }
    }

    fn disconnected(&self) -> Error {
        Error::Disconnected {
            name: self.name.clone(),
        }
    }
}

impl fmt::Debug for PilotInvoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PilotInvoker")
            .field("name", &self.name)
            .field("timeout", &self.timeout)
            .finish()
    }
}

// Every request gets exactly one reply; the invoker relies on it to clear
// its in-flight call. Dropping the invoker closes the request channel and the
// worker exits once its current call returns.
fn run_worker(mut pilot: Box<dyn SpaceshipPilot>, requests: Receiver<Request>, replies: Sender<Reply>) {
    for request in requests.iter() {
        let job = request.job;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| job(pilot.as_mut())))
            .map_err(|payload| panic_message(payload.as_ref()));
        if replies
            .send(Reply {
                seq: request.seq,
                outcome,
            })
            .is_err()
        {
            break;
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
