use sysinfo::System;

/// One instantaneous reading, both values in percent (0..=100).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceSample {
    pub cpu_percent: f64,
    pub memory_percent: f64,
}

/// Source of host utilisation readings.
pub trait ResourceProbe: Send + 'static {
    /// Start a new measurement window. Called when a sampler starts, so that
    /// delta-based readings do not span the previous operation.
    fn reset(&mut self) {}

    fn sample(&mut self) -> ResourceSample;
}

/// `sysinfo`-backed probe: global CPU usage across cores and used/total memory.
///
/// Keeps one `System` alive between samples since CPU usage is computed from
/// the delta between two refreshes.
pub struct SysinfoProbe {
    sys: System,
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoProbe {
    pub fn new() -> Self {
        let mut sys = System::new();
        // baseline; the first cpu reading after construction is always 0
        sys.refresh_cpu_usage();
        sys.refresh_memory();
        Self { sys }
    }
}

impl ResourceProbe for SysinfoProbe {
    fn reset(&mut self) {
        self.sys.refresh_cpu_usage();
    }

    fn sample(&mut self) -> ResourceSample {
        self.sys.refresh_cpu_usage();
        self.sys.refresh_memory();

        let cpu = f64::from(self.sys.global_cpu_usage()).clamp(0.0, 100.0);
        let total = self.sys.total_memory();
        let memory = if total == 0 {
            0.0
        } else {
            self.sys.used_memory() as f64 / total as f64 * 100.0
        };

        ResourceSample {
            cpu_percent: cpu,
            memory_percent: memory,
        }
    }
}
