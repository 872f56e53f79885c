use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use nfa_sim_lib::{
    automaton::{
        StateSet, format_state_set,
        nfa::{Nfa, Statistics},
    },
    config::SimulatorConfig,
    logger::init_logging,
    simulation::StepRecord,
};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "NFA Simulator")]
#[command(version = "0.1")]
#[command(about = "Simulate nondeterministic finite automata with epsilon moves", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// TOML file with limits and logger settings.
    #[arg(short, long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a word to the end and print the verdict with its history.
    Run { file: String, input: String },
    /// Print every step of a run, one JSON object per line.
    Step { file: String, input: String },
    /// Print the active states after every prefix of a word.
    Trace { file: String, input: String },
    /// Print structural problems and statistics of an automaton.
    Check { file: String },
    /// Determinize by subset construction.
    Determinize {
        file: String,
        /// Print Graphviz DOT instead of JSON.
        #[arg(long)]
        dot: bool,
    },
    /// Print the automaton the simulator opens with (accepting in q2).
    Example,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunReport {
    accepted: bool,
    final_states: StateSet,
    history: Vec<StepRecord>,
}

#[derive(Debug, Serialize)]
struct CheckReport {
    problems: Vec<String>,
    statistics: Statistics,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = SimulatorConfig::from_optional_file(args.config.as_ref())?;
    if let Some(path) = init_logging(config.get_logger())? {
        eprintln!("Logging to {}", path.display());
    }

    match args.command {
        Command::Run { file, input } => {
            let nfa = load(&config, &file)?;
            config.get_limits().check_input(&input)?;

            let mut simulation = nfa.simulate();
            let result = simulation.run(&input)?;

            for record in simulation.history() {
                eprintln!("{}", record.to_fancy_string());
            }
            print_verdict(result.accepted, &result.final_states);

            let report = RunReport {
                accepted: result.accepted,
                final_states: result.final_states,
                history: simulation.history().to_vec(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Step { file, input } => {
            let nfa = load(&config, &file)?;
            config.get_limits().check_input(&input)?;

            let mut simulation = nfa.simulate();
            loop {
                let outcome = simulation.step(&input)?;
                println!("{}", serde_json::to_string(&outcome)?);
                if let Some(accepted) = outcome.accepted() {
                    print_verdict(accepted, outcome.current_states());
                    break;
                }
            }
        }
        Command::Trace { file, input } => {
            let nfa = load(&config, &file)?;
            config.get_limits().check_input(&input)?;

            let trace = nfa.trace(&input)?;
            print_verdict(trace.accepted, trace.final_states().unwrap_or(&StateSet::new()));
            println!("{}", serde_json::to_string_pretty(&trace)?);
        }
        Command::Check { file } => {
            let nfa = load(&config, &file)?;

            let mut problems = nfa.validate();
            problems.extend(nfa.dangling_references());
            for problem in &problems {
                eprintln!("{} {}", "warning:".yellow().bold(), problem);
            }

            let report = CheckReport {
                problems,
                statistics: nfa.statistics(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Determinize { file, dot } => {
            let nfa = load(&config, &file)?;
            let dfa = nfa.determinize()?;

            if dot {
                print!("{}", dfa.to_graphviz());
            } else {
                println!("{}", serde_json::to_string_pretty(&dfa.to_document())?);
            }
        }
        Command::Example => {
            println!("{}", Nfa::demo().to_json()?);
        }
    }

    Ok(())
}

fn load(config: &SimulatorConfig, file: &str) -> anyhow::Result<Nfa> {
    let json = std::fs::read_to_string(file).with_context(|| format!("failed to read {file}"))?;
    let nfa = config
        .get_limits()
        .load_automaton(&json)
        .with_context(|| format!("failed to load automaton from {file}"))?;
    tracing::info!(
        "Loaded {} with {} states and {} symbols",
        file,
        nfa.state_count(),
        nfa.symbol_count()
    );
    Ok(nfa)
}

fn print_verdict(accepted: bool, states: &StateSet) {
    let states = format_state_set(states);
    if accepted {
        eprintln!("{} in {}", "ACCEPTED".green().bold(), states);
    } else {
        eprintln!("{} in {}", "REJECTED".red().bold(), states);
    }
}
