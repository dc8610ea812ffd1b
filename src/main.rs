mod agent;
mod bidders;
mod config;
mod errors;
mod gsp;
mod history;
mod logger;
mod projection;
mod scenarios;
mod utils;

use std::path::PathBuf;
use std::sync::atomic::Ordering;

use config::SimulationConfig;
use logger::{ConsoleReceiver, FileReceiver, LogEvent, Logger, sanitize_filename};
use scenarios::{get_scenario_catalog, run_scenario};
use utils::{RAND_SEED, TOTAL_SCENARIO_RUNS, VERBOSE_ROUNDS};

/// Parse a numeric positional argument or exit with a message naming it
fn parse_arg<T: std::str::FromStr>(arg: &str, what: &str) -> T {
    match arg.parse::<T>() {
        Ok(n) => n,
        Err(_) => {
            eprintln!("Error: Invalid {} parameter '{}'. Expected a number.", what, arg);
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("Usage: budgetbid <scenario|all> [iterations] [start_iteration] [--rounds N] [--verbose rounds] [--fastbreak]");
    eprintln!("Available scenarios:");
    for s in get_scenario_catalog() {
        eprintln!("  - {}", s.short_name);
    }
}

fn main() {
    let raw_args: Vec<String> = std::env::args().collect();

    // Pull out flags, keep positional arguments in order
    let mut args = Vec::new();
    let mut fastbreak = false;
    let mut config = SimulationConfig::default();
    let mut i = 1;
    while i < raw_args.len() {
        match raw_args[i].as_str() {
            "--verbose" => {
                if raw_args.get(i + 1).map(String::as_str) == Some("rounds") {
                    VERBOSE_ROUNDS.store(true, Ordering::Relaxed);
                    i += 1;
                }
            }
            "--fastbreak" => fastbreak = true,
            "--rounds" => {
                let Some(value) = raw_args.get(i + 1) else {
                    eprintln!("Error: --rounds requires a value");
                    std::process::exit(1);
                };
                config = match SimulationConfig::new(parse_arg(value, "rounds")) {
                    Ok(config) => config,
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        std::process::exit(1);
                    }
                };
                i += 1;
            }
            arg => args.push(arg.to_string()),
        }
        i += 1;
    }

    let Some(scenario_arg) = args.first() else {
        print_usage();
        std::process::exit(1);
    };
    let iterations: u64 = args.get(1).map(|a| parse_arg(a, "iterations")).unwrap_or(1);
    let start_iteration: u64 = args.get(2).map(|a| parse_arg(a, "start iteration")).unwrap_or(0);

    let all_scenarios = get_scenario_catalog();
    let scenarios: Vec<_> = if scenario_arg == "all" {
        all_scenarios
    } else {
        match all_scenarios.iter().find(|s| s.short_name == scenario_arg) {
            Some(scenario) => vec![scenario.clone()],
            None => {
                eprintln!("Error: Scenario '{}' not found.", scenario_arg);
                print_usage();
                std::process::exit(1);
            }
        }
    };

    // Scenario detail goes to the console only for a single named run
    let mut logger = Logger::new();
    if scenario_arg != "all" && iterations == 1 {
        logger.add_receiver(ConsoleReceiver::new(vec![LogEvent::Validation, LogEvent::Scenario]));
    } else {
        logger.add_receiver(ConsoleReceiver::new(vec![LogEvent::Validation]));
    }
    let summary_receiver_id = match FileReceiver::new(&PathBuf::from("log/summary.log"), vec![LogEvent::Validation]) {
        Ok(receiver) => Some(logger.add_receiver(receiver)),
        Err(e) => {
            eprintln!("Warning: cannot write log/summary.log: {}", e);
            None
        }
    };

    TOTAL_SCENARIO_RUNS.store(0, Ordering::Relaxed);
    if iterations > 1 {
        logln!(&mut logger, LogEvent::Validation, "Running '{}' {} times over {} rounds...\n", scenario_arg, iterations, config.total_rounds);
    } else {
        logln!(&mut logger, LogEvent::Validation, "Running '{}' over {} rounds...\n", scenario_arg, config.total_rounds);
    }

    'scenarios: for scenario in &scenarios {
        log!(&mut logger, LogEvent::Validation, "{}: ", scenario.short_name);

        let scenario_dir = PathBuf::from("log").join(sanitize_filename(scenario.short_name));
        let mut scenario_receivers = Vec::new();
        match FileReceiver::new(&scenario_dir.join("scenario.log"), vec![LogEvent::Scenario, LogEvent::Agent]) {
            Ok(receiver) => scenario_receivers.push(logger.add_receiver(receiver)),
            Err(e) => warnln!(&mut logger, LogEvent::Validation, "cannot write scenario log: {}", e),
        }
        if VERBOSE_ROUNDS.load(Ordering::Relaxed) {
            match FileReceiver::new(&scenario_dir.join("rounds.log"), vec![LogEvent::Round]) {
                Ok(receiver) => scenario_receivers.push(logger.add_receiver(receiver)),
                Err(e) => warnln!(&mut logger, LogEvent::Validation, "cannot write rounds log: {}", e),
            }
        }

        for i in start_iteration..(start_iteration + iterations) {
            if iterations > 1 {
                log!(&mut logger, LogEvent::Validation, "[{}/{}] ", i - start_iteration + 1, iterations);
            }

            RAND_SEED.store(i, Ordering::Relaxed);

            match run_scenario(scenario, &config, &mut logger) {
                Ok(()) => {
                    if iterations > 1 {
                        logln!(&mut logger, LogEvent::Validation, "✓");
                    } else {
                        logln!(&mut logger, LogEvent::Validation, "✓ PASSED");
                    }
                }
                Err(e) => {
                    if iterations > 1 {
                        logln!(&mut logger, LogEvent::Validation, "✗");
                    } else {
                        logln!(&mut logger, LogEvent::Validation, "✗ FAILED: {}", e);
                    }

                    if fastbreak {
                        for id in scenario_receivers.drain(..) {
                            logger.remove_receiver(id);
                        }
                        logln!(&mut logger, LogEvent::Validation, "\nStopping due to failure (--fastbreak enabled)");
                        logln!(&mut logger, LogEvent::Validation, "Error at seed {}: {}", i, e);
                        break 'scenarios;
                    }
                }
            }

            let _ = logger.flush();
        }

        for id in scenario_receivers {
            logger.remove_receiver(id);
        }
    }

    logln!(&mut logger, LogEvent::Validation, "\nTotal scenario runs completed: {}", TOTAL_SCENARIO_RUNS.load(Ordering::Relaxed));

    if let Some(id) = summary_receiver_id {
        logger.remove_receiver(id);
    }
}
