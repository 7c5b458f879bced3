//! Resource probe
//!
//! A stateless collaborator reporting instantaneous CPU and memory
//! utilization. The controller may log a snapshot at any point; the
//! numbers are advisory only and are never consumed by control logic.

use chrono::Utc;
use serde::Serialize;
use sysinfo::System;
use tracing::info;

/// Point-in-time resource utilization.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceSnapshot {
    /// Global CPU utilization percentage.
    pub cpu_percent: f32,
    /// Used physical memory as a percentage of total.
    pub memory_percent: f32,
    /// ISO-8601 timestamp of when the snapshot was taken.
    pub checked_at: String,
}

/// Take a resource snapshot.
///
/// CPU utilization needs two samples a short interval apart, so this
/// call blocks for `sysinfo`'s minimum refresh interval.
pub fn snapshot() -> ResourceSnapshot {
    let mut sys = System::new();

    sys.refresh_cpu_usage();
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    sys.refresh_cpu_usage();
    sys.refresh_memory();

    let cpu_percent = sys.global_cpu_info().cpu_usage();
    let memory_percent = if sys.total_memory() > 0 {
        (sys.used_memory() as f32 / sys.total_memory() as f32) * 100.0
    } else {
        0.0
    };

    ResourceSnapshot {
        cpu_percent,
        memory_percent,
        checked_at: Utc::now().to_rfc3339(),
    }
}

/// Log a snapshot as advisory lines.
pub fn log_snapshot() {
    let snap = snapshot();
    info!("CPU usage: {:.1}%", snap.cpu_percent);
    info!("Memory usage: {:.1}%", snap.memory_percent);
}
