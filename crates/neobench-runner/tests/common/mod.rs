//! Helpers shared by the runner integration tests.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::collections::VecDeque;
use std::path::PathBuf;

use neobench_core::Record;
use neobench_runner::dataset;
use neobench_runner::sampler::{ResourceProbe, ResourceSample};

pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/neo_sample.csv")
}

pub fn sample_records() -> Vec<Record> {
    dataset::load_from_path(fixture_path()).expect("fixture loads")
}

/// Probe returning scripted readings, then repeating the last one.
pub struct FakeProbe {
    pub script: VecDeque<ResourceSample>,
    pub last: ResourceSample,
    /// Times a sampler asked for a fresh baseline.
    pub resets: usize,
}

impl FakeProbe {
    pub fn constant(cpu: f64, mem: f64) -> Self {
        Self::scripted(vec![ResourceSample { cpu_percent: cpu, memory_percent: mem }])
    }

    pub fn scripted(samples: Vec<ResourceSample>) -> Self {
        let last = *samples.last().expect("at least one sample");
        Self {
            script: samples.into(),
            last,
            resets: 0,
        }
    }
}

impl ResourceProbe for FakeProbe {
    fn reset(&mut self) {
        self.resets += 1;
    }

    fn sample(&mut self) -> ResourceSample {
        self.script.pop_front().unwrap_or(self.last)
    }
}
