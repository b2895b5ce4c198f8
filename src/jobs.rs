//! Bookkeeping for background commands.
//!
//! Only used when reaping is enabled in [`ShellConfig`](crate::ShellConfig);
//! otherwise background children are left for the OS to collect.

use crate::external::is_gone;
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::Pid;
use tracing::{info, warn};

/// Background children that have not been collected yet.
#[derive(Debug, Default)]
pub struct JobRegistry {
    pids: Vec<Pid>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, pid: Pid) {
        self.pids.push(pid);
    }

    pub fn len(&self) -> usize {
        self.pids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pids.is_empty()
    }

    /// Collect every tracked child that has finished, without blocking.
    pub fn reap(&mut self) -> Vec<(Pid, WaitStatus)> {
        let mut finished = Vec::new();
        self.pids.retain(|&pid| match waitpid(pid, Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::StillAlive) => true,
            Ok(status) => {
                info!(%pid, ?status, "background job finished");
                finished.push((pid, status));
                false
            }
            Err(errno) if is_gone(errno) => false,
            Err(errno) => {
                warn!(%pid, %errno, "polling background job failed");
                true
            }
        });
        finished
    }
}
