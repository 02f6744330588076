use std::{env, process, thread};

use logfunnel::config::Config;
use logfunnel::log::{
    AggregationPipeline, ListenerPolicy, LogLevel, LoggerConfig, LoggerFactory, LoggerRegistry,
};
use logfunnel::{logger_info, logger_warn, queue_info};

const WORKERS: usize = 4;
const RECORDS_PER_WORKER: usize = 5;

fn main() {
    // --- Parse CLI args ----------------------------------------------------
    //
    // Supported:
    //   cargo run --bin logfunnel_demo
    //      -> default [Logging] settings (INFO, ../logs/<today>.log)
    //
    //   cargo run --bin logfunnel_demo -- demo.conf
    //      -> reads the [Logging] section of demo.conf
    let args: Vec<String> = env::args().collect();

    let config = match args.len() {
        1 => Config::empty(),
        2 => match Config::load(&args[1]) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        },
        _ => {
            eprintln!("Usage:");
            eprintln!("  {}              # default logging settings", args[0]);
            eprintln!("  {} [CONFIG]     # e.g. demo.conf", args[0]);
            process::exit(1);
        }
    };

    let policy = match ListenerPolicy::from_config(&config) {
        Ok(policy) => policy,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let registry = LoggerRegistry::new();

    // --- Direct path: console + file ---------------------------------------
    let logger_config = LoggerConfig::from_config(&config);
    let factory = LoggerFactory::new(registry.clone());
    let app = match factory.configure(&logger_config) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("failed to configure logger: {e}");
            process::exit(1);
        }
    };
    logger_info!(app, "writing to {}", logger_config.log_path().display());

    // --- Aggregated path: workers -> queue -> listener ---------------------
    let pipeline = AggregationPipeline::new(registry).with_policy(policy);
    pipeline.configurer("worker");

    let workers: Vec<_> = (0..WORKERS)
        .map(|id| {
            let worker = pipeline.producer_logger("worker", LogLevel::Info);
            let handle = pipeline.handle();
            thread::spawn(move || {
                for n in 0..RECORDS_PER_WORKER {
                    logger_info!(worker, "worker {id} record {n}");
                }
                queue_info!(handle, "worker", "worker {id} done");
            })
        })
        .collect();

    let listener = match pipeline.spawn_listener() {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    for worker in workers {
        if worker.join().is_err() {
            logger_warn!(app, "a worker thread panicked");
        }
    }

    match listener.shutdown() {
        Ok(stats) => logger_info!(
            app,
            "listener handled {} records ({} failed)",
            stats.handled,
            stats.failed
        ),
        Err(e) => logger_warn!(app, "listener stopped abnormally: {e}"),
    }
}
