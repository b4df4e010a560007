//! Lagscope - round-trip audio latency measurement
//!
//! Entry point for the command-line tool. Runs a latency test against a
//! simulated loopback and prints the estimate.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use lagscope::{Algorithm, LatencyTest, PeakPolicy, TestConfig, TestReport};
use tracing::info;

/// Options collected from the command line
#[derive(Debug, Default)]
struct Options {
    config_path: Option<PathBuf>,
    save_config: bool,
    algorithm: Option<Algorithm>,
    chirp_length: Option<usize>,
    sample_rate: Option<u32>,
    delay_samples: Option<usize>,
    noise_amplitude: Option<f32>,
    trigger_latency_s: Option<f64>,
    signed_peak: bool,
    compare: bool,
    curve_path: Option<PathBuf>,
    json: bool,
}

enum Command {
    Run(Options),
    Help,
    Version,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lagscope=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match parse_args(&args)? {
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Version => {
            println!("lagscope {}", lagscope::VERSION);
            Ok(())
        }
        Command::Run(options) => run(options),
    }
}

fn parse_args(args: &[String]) -> Result<Command> {
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .cloned()
                .with_context(|| format!("{name} requires a value"))
        };

        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--version" | "-v" => return Ok(Command::Version),
            "--algorithm" | "-a" => {
                options.algorithm = Some(value("--algorithm")?.parse()?);
            }
            "--length" | "-n" => {
                let v = value("--length")?;
                options.chirp_length =
                    Some(v.parse().with_context(|| format!("Invalid length: {v}"))?);
            }
            "--sample-rate" | "-r" => {
                let v = value("--sample-rate")?;
                options.sample_rate =
                    Some(v.parse().with_context(|| format!("Invalid sample rate: {v}"))?);
            }
            "--delay" | "-d" => {
                let v = value("--delay")?;
                options.delay_samples =
                    Some(v.parse().with_context(|| format!("Invalid delay: {v}"))?);
            }
            "--noise" => {
                let v = value("--noise")?;
                options.noise_amplitude =
                    Some(v.parse().with_context(|| format!("Invalid noise amplitude: {v}"))?);
            }
            "--trigger-latency" | "-t" => {
                let v = value("--trigger-latency")?;
                options.trigger_latency_s =
                    Some(v.parse().with_context(|| format!("Invalid trigger latency: {v}"))?);
            }
            "--config" | "-c" => {
                options.config_path = Some(PathBuf::from(value("--config")?));
            }
            "--curve" => {
                options.curve_path = Some(PathBuf::from(value("--curve")?));
            }
            "--save-config" => options.save_config = true,
            "--signed-peak" => options.signed_peak = true,
            "--compare" => options.compare = true,
            "--json" => options.json = true,
            other => bail!("Unknown argument: {other} (see --help)"),
        }
    }

    Ok(Command::Run(options))
}

fn print_help() {
    println!("Usage: lagscope [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -a, --algorithm NAME          direct or spectral, alias fft (default: spectral)");
    println!("  -n, --length N                Chirp length in samples (default: 32768)");
    println!("  -r, --sample-rate RATE        Sample rate in Hz (default: 44100)");
    println!("  -d, --delay N                 Simulated loopback delay in samples");
    println!("      --noise AMP               Simulated noise floor amplitude (0-0.1)");
    println!("  -t, --trigger-latency SECS    Subtract a measured trigger latency");
    println!("      --signed-peak             Pick the largest signed coefficient");
    println!("      --compare                 Run both algorithms on the same capture");
    println!("      --curve PATH              Write the correlation curve as JSON");
    println!("      --json                    Print the report as JSON");
    println!("  -c, --config PATH             Config file (default: data dir)");
    println!("      --save-config             Save the effective config and exit");
    println!("  -v, --version                 Show version");
    println!("  -h, --help                    Show this help");
    println!();
    println!("Examples:");
    println!("  lagscope -n 1024 -d 500 --compare");
    println!("  lagscope -a direct -r 48000 --curve curve.json");
}

fn run(options: Options) -> Result<()> {
    let config_path = options.config_path.clone().unwrap_or_else(TestConfig::path);
    let mut config = TestConfig::load_from(&config_path);
    apply_overrides(&mut config, &options);

    if options.save_config {
        config.save(&config_path)?;
        println!("Config saved to {}", config_path.display());
        return Ok(());
    }

    let test = LatencyTest::new(config);
    let mut source = test.simulated_source();
    if let Some(trigger) = options.trigger_latency_s {
        source = source.with_trigger_latency(trigger);
    }

    info!(
        algorithm = %test.config().algorithm,
        chirp_length = test.config().chirp_length,
        sample_rate = test.config().sample_rate,
        delay = test.config().effective_delay(),
        "Starting latency test"
    );

    let reports = if options.compare {
        test.run_algorithms(&mut source, &[Algorithm::Spectral, Algorithm::Direct])?
    } else {
        vec![test.run(&mut source)?]
    };

    print_reports(&reports, options.json)?;

    if let Some(path) = &options.curve_path {
        if let Some(report) = reports.first() {
            report.write_curve(path)?;
        }
    }

    Ok(())
}

fn apply_overrides(config: &mut TestConfig, options: &Options) {
    if let Some(algorithm) = options.algorithm {
        config.algorithm = algorithm;
    }
    if let Some(length) = options.chirp_length {
        config.chirp_length = length;
    }
    if let Some(rate) = options.sample_rate {
        config.sample_rate = rate;
    }
    if let Some(delay) = options.delay_samples {
        config.delay_samples = Some(delay);
    }
    if let Some(noise) = options.noise_amplitude {
        config.noise_amplitude = noise;
    }
    if options.signed_peak {
        config.peak_policy = PeakPolicy::Signed;
    }
}

fn print_reports(reports: &[TestReport], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(reports)?);
        return Ok(());
    }
    for report in reports {
        println!("{}", report.summary());
    }
    Ok(())
}
