//! Command-line entry point for the Contagion simulation.
//!
//! Two subcommands are provided:
//!
//! - `run --config <path>` executes one experiment end to end;
//! - `generate --function "ER(20, 0.1)" --output <path>` writes a random
//!   graph file through the generator registry.
//!
//! # Run sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load the run configuration and check that its input files exist
//! 3. Load the epidemic configuration
//! 4. Load the graph
//! 5. Build the compartment, topology, and initial snapshot
//! 6. Write the initial-conditions report
//! 7. Run the simulation
//! 8. Save the result table

mod error;
mod output;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use contagion_core::config::{EpidemicConfig, RunConfig};
use contagion_core::report::{GraphSummary, InitialReport};
use contagion_core::{LoggingCallback, initialize_simulation, run_simulation};
use contagion_graph::{GeneratorRegistry, load_graph, parse_function_string, save_graph};
use contagion_types::RunId;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Discrete-time compartmental simulation on static graphs.
#[derive(Parser, Debug)]
#[command(name = "contagion-engine")]
#[command(about = "Simulate stochastic compartmental dynamics on a graph")]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run an experiment described by a run configuration file.
    Run {
        /// Path to the run configuration YAML.
        #[arg(long, short)]
        config: PathBuf,
    },
    /// Generate a random graph and save it.
    Generate {
        /// Generator call, e.g. `ER(20, 0.1)`.
        #[arg(long, short)]
        function: String,
        /// Output graph file (`.json`, `.yaml`, or `.yml`).
        #[arg(long, short)]
        output: PathBuf,
        /// Seed for the generator's RNG.
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, graph loading, the simulation, or
/// writing results fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    info!("contagion-engine starting");

    match cli.command {
        Command::Run { config } => run_experiment(&config)?,
        Command::Generate {
            function,
            output,
            seed,
        } => generate_graph(&function, &output, seed)?,
    }
    Ok(())
}

fn init_logging(json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run_experiment(config_path: &Path) -> Result<(), AppError> {
    let run_id = RunId::new();

    // 2. Run configuration.
    let run_config = RunConfig::from_file(config_path)?;
    run_config.check_inputs()?;
    info!(
        %run_id,
        epidemics = %run_config.epidemics_path.display(),
        graph = %run_config.graph_path.display(),
        "Run configuration loaded"
    );

    // 3. Epidemic configuration.
    let epidemic = EpidemicConfig::from_file(&run_config.epidemics_path)?;
    let experiment = &epidemic.experiment;
    info!(
        attributes = epidemic.attributes.len(),
        rules = epidemic.dynamics.len(),
        time_steps = experiment.time_steps,
        measurement_mode = experiment.measurement_mode,
        measured_attribute = experiment.measured_attribute,
        seed = experiment.seed,
        "Epidemic configuration loaded"
    );

    // 4. Graph.
    let graph = load_graph(&run_config.graph_path)?;
    info!(
        summary = %graph.summary(),
        mean_degree = graph.mean_degree(),
        "Graph loaded"
    );

    // 5. Compartment, topology, initial snapshot.
    let setup = initialize_simulation(graph.vertex_count(), graph.edges(), &epidemic)?;
    info!(compartment = %setup.compartment, "Compartment built");

    // 6. Report.
    let summary = GraphSummary::from_adjacency(graph.name(), graph.edge_count(), &setup.adjacency);
    let report = InitialReport::new(run_id, summary, &setup.snapshot, &setup.compartment);
    output::write_report(&report, &run_config.report_path)?;

    // 7. Simulation.
    let (mut engine, measurement) = setup.into_engine()?;
    let mut callback = LoggingCallback::new(experiment.time_steps);
    let result = run_simulation(
        &mut engine,
        measurement,
        &experiment.measured_attribute,
        experiment.time_steps,
        &mut callback,
    )?;

    // 8. Results.
    let written = output::save_table(&result.table, &run_config.output_path)?;
    info!(
        %run_id,
        steps = result.total_steps,
        samples = result.samples,
        output = %written.display(),
        "Run complete"
    );
    Ok(())
}

fn generate_graph(function: &str, output_path: &Path, seed: u64) -> Result<(), AppError> {
    let registry = GeneratorRegistry::with_builtins();
    let call = parse_function_string(function)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let graph = registry.generate(&call, &mut rng)?;
    info!(summary = %graph.summary(), seed, "Graph generated");
    save_graph(&graph, output_path)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_run_subcommand() {
        let cli = Cli::try_parse_from(["contagion-engine", "run", "--config", "run.yaml"]).unwrap();
        assert!(!cli.json_logs);
        assert!(matches!(cli.command, Command::Run { config } if config == Path::new("run.yaml")));
    }

    #[test]
    fn parses_generate_with_default_seed() {
        let cli = Cli::try_parse_from([
            "contagion-engine",
            "--json-logs",
            "generate",
            "-f",
            "ER(10, 0.2)",
            "-o",
            "g.json",
        ])
        .unwrap();
        assert!(cli.json_logs);
        assert!(matches!(
            cli.command,
            Command::Generate { ref function, seed: 42, .. } if function == "ER(10, 0.2)"
        ));
    }

    #[test]
    fn end_to_end_run_writes_report_and_results() {
        let dir = std::env::temp_dir().join(format!("contagion-run-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        generate_graph("ER(30, 0.2)", &dir.join("graph.json"), 5).unwrap();
        std::fs::write(
            dir.join("epidemics.yaml"),
            "attributes:\n  compartment: [S, I, R]\n\
             dynamics:\n\
             - {name: infection, attribute: compartment, initial_state: S, triggering_state: I, final_state: I, prob: 0.3, mode: neighbor}\n\
             - {name: recovery, attribute: compartment, initial_state: I, final_state: R, prob: 0.1, mode: rate}\n\
             initial_conditions:\n  compartment: {S: 0.9, I: 0.1}\n\
             experiment: {time_steps: 5}\n",
        )
        .unwrap();
        let run_yaml = format!(
            "epidemics_path: {}\ngraph_path: {}\nreport_path: {}\noutput_path: {}\n",
            dir.join("epidemics.yaml").display(),
            dir.join("graph.json").display(),
            dir.join("report.dat").display(),
            dir.join("out.csv").display(),
        );
        std::fs::write(dir.join("run.yaml"), run_yaml).unwrap();

        run_experiment(&dir.join("run.yaml")).unwrap();

        let report = std::fs::read_to_string(dir.join("report.dat")).unwrap();
        assert!(report.contains("Vertices: 30"));
        assert!(report.contains("- infection:"));
        let csv = std::fs::read_to_string(dir.join("out.csv")).unwrap();
        assert!(csv.starts_with("compartment,value,time\n"));
        assert!(csv.lines().any(|line| line.ends_with(",5")));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_epidemic_file_is_reported() {
        let dir = std::env::temp_dir().join(format!("contagion-missing-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("run.yaml"),
            "epidemics_path: /nonexistent/epi.yaml\ngraph_path: /nonexistent/g.json\n",
        )
        .unwrap();
        let err = run_experiment(&dir.join("run.yaml")).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
