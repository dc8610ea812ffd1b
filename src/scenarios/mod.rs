use std::error::Error;
use std::sync::atomic::Ordering;

use crate::config::SimulationConfig;
use crate::logger::{LogEvent, Logger};
use crate::utils::TOTAL_SCENARIO_RUNS;
use crate::{errln, logln};

/// Function type for scenario entry functions
pub type ScenarioFn = fn(scenario_name: &str, config: &SimulationConfig, logger: &mut Logger) -> Result<(), Box<dyn Error>>;

/// Entry in the scenario catalog
#[derive(Clone)]
pub struct ScenarioEntry {
    pub short_name: &'static str,
    pub run: ScenarioFn,
}

inventory::collect!(ScenarioEntry);

/// All registered scenarios, sorted by name
pub fn get_scenario_catalog() -> Vec<ScenarioEntry> {
    let mut entries: Vec<ScenarioEntry> = inventory::iter::<ScenarioEntry>
        .into_iter()
        .cloned()
        .collect();
    entries.sort_by_key(|entry| entry.short_name);
    entries
}

/// Run one scenario and count it
pub fn run_scenario(entry: &ScenarioEntry, config: &SimulationConfig, logger: &mut Logger) -> Result<(), Box<dyn Error>> {
    TOTAL_SCENARIO_RUNS.fetch_add(1, Ordering::Relaxed);
    (entry.run)(entry.short_name, config, logger)
}

/// Collects the outcome of scenario checks and logs each one as it is made
pub struct Checks {
    failures: Vec<String>,
}

impl Checks {
    pub fn new() -> Self {
        Self { failures: Vec::new() }
    }

    pub fn check(&mut self, passed: bool, msg: String, logger: &mut Logger) {
        if passed {
            logln!(logger, LogEvent::Scenario, "✓ {}", msg);
        } else {
            errln!(logger, LogEvent::Scenario, "✗ {}", msg);
            self.failures.push(msg);
        }
    }

    /// Ok if every check passed, otherwise an error listing the failures
    pub fn finish(self, scenario_name: &str) -> Result<(), Box<dyn Error>> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(format!("Scenario '{}' validation failed:\n{}", scenario_name, self.failures.join("\n")).into())
        }
    }
}

impl Default for Checks {
    fn default() -> Self {
        Self::new()
    }
}

pub mod budget_depletion;
pub mod random_rounds;
pub mod reference_rounds;
pub mod truthful_baseline;
