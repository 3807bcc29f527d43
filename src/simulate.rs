//! Deterministic synthetic report producer.
//!
//! Stands in for the benchmark pages: each simulated contestant reports several runs of
//! uibench-style test cases, and all runs of all contestants are interleaved in a seeded
//! random order, the way reports from independent windows arrive.

use crate::channel::ReportEvent;
use crate::launch::CONTESTANTS;
use crate::store::SampleBatch;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Test-case names in the uibench naming scheme.
pub const TEST_CASES: &[&str] = &[
    "table/[100,4]/render",
    "table/[100,4]/removeAll",
    "table/[100,4]/sort/0",
    "table/[100,4]/filter/32",
    "table/[100,4]/activate/32",
    "anim/100/32",
    "tree/[500]/render",
    "tree/[50,10]/render",
    "tree/[50,10]/reverse",
    "tree/[10,10,10,2]/no_change",
];

/// Shape of a simulated session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimConfig {
    pub seed: u64,
    /// Reports each contestant window sends.
    pub runs_per_contestant: usize,
    /// Samples per test case in one report.
    pub samples_per_run: usize,
}

impl SimConfig {
    /// A short session: 2 reports of 3 samples per contestant.
    pub fn quick(seed: u64) -> Self {
        Self {
            seed,
            runs_per_contestant: 2,
            samples_per_run: 3,
        }
    }

    /// A long session: 5 reports of 10 samples per contestant.
    pub fn full(seed: u64) -> Self {
        Self {
            seed,
            runs_per_contestant: 5,
            samples_per_run: 10,
        }
    }
}

struct SimContestant {
    name: String,
    version: String,
    speed: f64,
    /// Test cases this contestant's page does not implement.
    skipped: Vec<usize>,
}

fn contestants(rng: &mut ChaCha8Rng, count: usize) -> Vec<SimContestant> {
    (0..count)
        .map(|i| {
            let catalog = &CONTESTANTS[i % CONTESTANTS.len()];
            let skipped = (0..TEST_CASES.len())
                .filter(|_| rng.gen_range(0..10) == 0)
                .collect();
            SimContestant {
                name: catalog.name.to_string(),
                version: format!("sim.{}", i / CONTESTANTS.len()),
                speed: rng.gen_range(0.6..1.8),
                skipped,
            }
        })
        .collect()
}

/// Generate every report event of a simulated session, in arrival order.
pub fn generate(cfg: &SimConfig, contestant_count: usize) -> Vec<ReportEvent> {
    let mut rng = ChaCha8Rng::seed_from_u64(cfg.seed);
    let contestants = contestants(&mut rng, contestant_count);

    let mut events = Vec::with_capacity(contestant_count * cfg.runs_per_contestant);
    for c in &contestants {
        for _ in 0..cfg.runs_per_contestant {
            let mut batch = SampleBatch::new();
            for (idx, test_case) in TEST_CASES.iter().enumerate() {
                if c.skipped.contains(&idx) {
                    continue;
                }
                let base = 0.002 * (idx + 1) as f64 * c.speed;
                let samples = (0..cfg.samples_per_run)
                    .map(|_| base * rng.gen_range(0.9..1.1))
                    .collect();
                batch.push(*test_case, samples);
            }
            events.push(ReportEvent::new(c.name.clone(), c.version.clone(), batch));
        }
    }

    events.shuffle(&mut rng);
    events
}
