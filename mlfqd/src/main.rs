//! # MLFQ Host Daemon
//!
//! Main entry point for the scheduler simulator.

use event_logger::LogLevel;
use mlfqd::{render_json_lines, render_summary, BoostSetting, HostConfig, HostRuntime, OutputMode};
use sim_scheduler::BoostOrder;
use std::env;
use std::path::PathBuf;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    let config = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        print_usage(&args[0]);
        process::exit(1);
    });

    let mut runtime = HostRuntime::new(config).unwrap_or_else(|e| {
        eprintln!("Failed to create runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.run();
    let output = runtime.config().output;
    if output == OutputMode::Log && !runtime.logger().is_empty() {
        println!("{}", runtime.logger().render());
    }

    let report = result.unwrap_or_else(|e| {
        eprintln!("Runtime error: {}", e);
        process::exit(1);
    });

    match output {
        OutputMode::Json => match render_json_lines(&report.trace) {
            Ok(lines) => println!("{}", lines),
            Err(e) => {
                eprintln!("Runtime error: {}", e);
                process::exit(1);
            }
        },
        OutputMode::Log => {
            println!();
            println!("{}", render_summary(&report.summary));
        }
        OutputMode::Quiet => println!("{}", render_summary(&report.summary)),
    }

    if runtime.config().print_digest {
        println!("digest={}", report.digest());
    }
}

fn parse_args(args: &[String]) -> Result<HostConfig, String> {
    let mut config = HostConfig::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --config".to_string());
                }
                config.config_path = Some(PathBuf::from(&args[i]));
            }
            "--horizon" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --horizon".to_string());
                }
                config.horizon = Some(
                    args[i]
                        .parse()
                        .map_err(|_| format!("Invalid horizon value: {}", args[i]))?,
                );
            }
            "--boost-period" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --boost-period".to_string());
                }
                config.boost_period = Some(match args[i].as_str() {
                    "off" => BoostSetting::Off,
                    value => BoostSetting::Every(
                        value
                            .parse()
                            .map_err(|_| format!("Invalid boost-period value: {}", value))?,
                    ),
                });
            }
            "--boost-order" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --boost-order".to_string());
                }
                config.boost_order = Some(match args[i].as_str() {
                    "desc" => BoostOrder::DescendingId,
                    "asc" => BoostOrder::AscendingId,
                    "queue" => BoostOrder::QueueOrder,
                    other => return Err(format!("Invalid boost order: {}", other)),
                });
            }
            "--stop-when-finished" => {
                config.stop_when_finished = true;
            }
            "--verbose" | "-v" => {
                config.log_level = LogLevel::Debug;
            }
            "--quiet" | "-q" => {
                config.output = OutputMode::Quiet;
            }
            "--json" => {
                config.output = OutputMode::Json;
            }
            "--digest" => {
                config.print_digest = true;
            }
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other => {
                return Err(format!("Unknown option: {}", other));
            }
        }
        i += 1;
    }

    Ok(config)
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [OPTIONS]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --config <FILE>        JSON simulation config (default: reference workload)");
    eprintln!("  --horizon <N>              Last tick to simulate");
    eprintln!("  --boost-period <N|off>     Ticks between priority boosts");
    eprintln!("  --boost-order <ORDER>      Level-0 order after a boost: desc (default), asc, queue");
    eprintln!("  --stop-when-finished       Stop once every process has completed");
    eprintln!("  -v, --verbose              Include per-tick queue snapshots");
    eprintln!("  -q, --quiet                Print only the summary");
    eprintln!("  --json                     Print events as JSON lines");
    eprintln!("  --digest                   Print the SHA-256 digest of the event trace");
    eprintln!("  -h, --help                 Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} --verbose --horizon 100", program);
    eprintln!("  {} --config workload.json --boost-period off --digest", program);
}
