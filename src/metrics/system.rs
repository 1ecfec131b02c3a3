//! Derived system metrics.
//!
//! The sampler computes CPU percentage from successive (process CPU
//! time, wall clock) sample pairs, reads process/system memory through
//! sysinfo, and tracks uptime from its construction. All reads happen on
//! demand when a collection pass invokes the gauge callbacks; the
//! sampler owns no timer.

use std::sync::Mutex;
use std::time::Instant;

use sysinfo::{Pid, ProcessExt, System, SystemExt};

/// Previous-sample pair for CPU percentage computation.
///
/// This is the only mutable state shared across sampling ticks. It is
/// read and updated under one lock within a single observation, so
/// consecutive collections measure disjoint intervals.
#[derive(Debug, Clone, Copy)]
struct CpuSampleState {
    prev_cpu_micros: u64,
    prev_instant: Instant,
}

/// Host/process sampler backing the observable gauges.
pub struct SystemSampler {
    start: Instant,
    cpu_state: Mutex<CpuSampleState>,
    system: Mutex<System>,
    pid: Option<Pid>,
    total_memory: u64,
}

impl SystemSampler {
    /// Create a sampler anchored at the current instant.
    ///
    /// The first CPU observation measures against process start, so its
    /// value may be skewed low. That is a documented approximation, not
    /// a bug.
    #[must_use]
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_memory();
        let total_memory = system.total_memory();
        let pid = sysinfo::get_current_pid().ok();

        Self {
            start: Instant::now(),
            cpu_state: Mutex::new(CpuSampleState {
                prev_cpu_micros: process_cpu_micros().unwrap_or(0),
                prev_instant: Instant::now(),
            }),
            system: Mutex::new(system),
            pid,
            total_memory,
        }
    }

    /// CPU usage percent over the interval since the previous
    /// observation, clamped to [0, 100].
    ///
    /// Returns `None` when process CPU time is unavailable on this host;
    /// the CPU gauge then reports nothing while the other gauges are
    /// unaffected.
    pub fn cpu_percent(&self) -> Option<f64> {
        let cpu_now = process_cpu_micros()?;
        let now = Instant::now();

        let mut state = self.cpu_state.lock().expect("cpu state lock");
        let cpu_delta = cpu_now.saturating_sub(state.prev_cpu_micros);
        let wall_delta = now.duration_since(state.prev_instant).as_micros() as u64;
        state.prev_cpu_micros = cpu_now;
        state.prev_instant = now;
        drop(state);

        Some(cpu_percent_between(cpu_delta, wall_delta))
    }

    /// Memory observations in bytes: process RSS, process virtual size,
    /// and system used memory, each tagged for the `type` label.
    pub fn memory_observations(&self) -> Vec<(&'static str, f64)> {
        let mut system = self.system.lock().expect("system lock");
        system.refresh_memory();
        let mut observations = Vec::with_capacity(3);

        if let Some(pid) = self.pid {
            if system.refresh_process(pid) {
                if let Some(process) = system.process(pid) {
                    observations.push(("rss", process.memory() as f64));
                    observations.push(("virtual", process.virtual_memory() as f64));
                }
            }
        }
        observations.push(("system_used", system.used_memory() as f64));
        observations
    }

    /// Process RSS as a percent of total physical memory.
    pub fn memory_percent(&self) -> Option<f64> {
        if self.total_memory == 0 {
            return None;
        }
        let mut system = self.system.lock().expect("system lock");
        let pid = self.pid?;
        if !system.refresh_process(pid) {
            return None;
        }
        let rss = system.process(pid)?.memory() as f64;
        Some(rss / self.total_memory as f64 * 100.0)
    }

    /// Seconds since the sampler was constructed.
    #[must_use]
    pub fn uptime_seconds(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

impl Default for SystemSampler {
    fn default() -> Self {
        Self::new()
    }
}

/// CPU percentage for one sample interval, clamped to [0, 100].
///
/// Zero elapsed wall-clock time is defined to yield 0.0 rather than
/// dividing by zero.
#[must_use]
pub fn cpu_percent_between(cpu_delta_micros: u64, wall_delta_micros: u64) -> f64 {
    if wall_delta_micros == 0 {
        return 0.0;
    }
    let percent = cpu_delta_micros as f64 / wall_delta_micros as f64 * 100.0;
    percent.clamp(0.0, 100.0)
}

/// Accumulated process CPU time (user + system) in microseconds.
#[cfg(unix)]
fn process_cpu_micros() -> Option<u64> {
    let mut usage = std::mem::MaybeUninit::<libc::rusage>::uninit();
    // SAFETY: getrusage fills the struct when it returns 0.
    let ret = unsafe { libc::getrusage(libc::RUSAGE_SELF, usage.as_mut_ptr()) };
    if ret != 0 {
        return None;
    }
    let usage = unsafe { usage.assume_init() };
    let user = usage.ru_utime.tv_sec as u64 * 1_000_000 + usage.ru_utime.tv_usec as u64;
    let system = usage.ru_stime.tv_sec as u64 * 1_000_000 + usage.ru_stime.tv_usec as u64;
    Some(user + system)
}

#[cfg(not(unix))]
fn process_cpu_micros() -> Option<u64> {
    None
}
