//! Crash-loop supervisor.
//!
//! Runs the watch cycle, and whenever it fails (or the stream simply ends)
//! waits a fixed delay and starts over from a fresh connection. There is no
//! exponential backoff and, unless configured, no limit on restarts.

use std::time::Duration;

use tracing::{error, info, warn};

use crate::error::{error_chain, BotError, ErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Not connected to the source
    Idle,
    /// Consuming posts from an open source
    Streaming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    Restart,
    Abort,
}

/// Every failure kind is treated as transient today.
pub fn recovery_for(kind: ErrorKind) -> Recovery {
    match kind {
        ErrorKind::Source => Recovery::Restart,
        ErrorKind::Storage => Recovery::Restart,
        ErrorKind::Render => Recovery::Restart,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub delay: Duration,
    pub max_restarts: Option<u32>,
}

/// Why the supervisor returned
#[derive(Debug)]
pub struct Stopped {
    pub restarts: u32,
    pub last_error: Option<BotError>,
}

pub struct Supervisor<S = fn(Duration)> {
    policy: RetryPolicy,
    sleep: S,
    state: LoopState,
}

impl Supervisor {
    pub fn new(policy: RetryPolicy) -> Self {
        Supervisor::with_sleep(policy, std::thread::sleep as fn(Duration))
    }
}

impl<S: FnMut(Duration)> Supervisor<S> {
    pub fn with_sleep(policy: RetryPolicy, sleep: S) -> Self {
        Supervisor {
            policy,
            sleep,
            state: LoopState::Idle,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Run `job` until the restart budget (if any) is spent or an error
    /// classifies as fatal. The job flips the state to `Streaming` once its
    /// source is connected.
    pub fn run<J>(&mut self, mut job: J) -> Stopped
    where
        J: FnMut(&mut LoopState) -> Result<(), BotError>,
    {
        let mut restarts = 0u32;

        loop {
            self.state = LoopState::Idle;
            let outcome = job(&mut self.state);
            let was_streaming = self.state == LoopState::Streaming;
            self.state = LoopState::Idle;

            let last_error = match outcome {
                Ok(()) => {
                    warn!(was_streaming, "source stream ended");
                    None
                }
                Err(e) => {
                    error!(
                        kind = ?e.kind(),
                        was_streaming,
                        "cycle failed: {}",
                        error_chain(&e)
                    );

                    if recovery_for(e.kind()) == Recovery::Abort {
                        return Stopped {
                            restarts,
                            last_error: Some(e),
                        };
                    }
                    Some(e)
                }
            };

            if self.policy.max_restarts.is_some_and(|max| restarts >= max) {
                return Stopped {
                    restarts,
                    last_error,
                };
            }

            restarts += 1;
            info!(
                restart = restarts,
                "running again in {}",
                humantime::format_duration(self.policy.delay)
            );
            (self.sleep)(self.policy.delay);
        }
    }
}
