use clap::Parser;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::Path;
use tm_step::{
    parse_step_budget, Control, ProgramLoader, ProgramManager, StepEvent, StepObserver,
    StepOutcome, StopReason, TuringMachine, DEFAULT_MAX_STEPS,
};

/// A deterministic single-tape Turing machine interpreter.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  tm-cli --tape 10101 --max-steps 100
  tm-cli --name \"Binary Increment\" --tape 111 --debug
  tm-cli --program programs/eraser.json --step")]
struct Cli {
    /// A JSON program file to execute
    #[clap(short, long, conflicts_with = "name")]
    program: Option<String>,

    /// The name of a built-in program (defaults to the first one)
    #[clap(short, long)]
    name: Option<String>,

    /// The initial tape, replacing the program's own
    #[clap(short, long)]
    tape: Option<String>,

    /// The maximum number of steps to execute
    #[clap(short, long, value_parser = parse_budget)]
    max_steps: Option<usize>,

    /// Pause for Enter after every step
    #[clap(short, long)]
    step: bool,

    /// Print each step of the execution
    #[clap(short = 'd', long)]
    debug: bool,

    /// List the built-in programs and exit
    #[clap(short, long)]
    list: bool,
}

fn parse_budget(input: &str) -> Result<usize, String> {
    parse_step_budget(input).map_err(|e| e.to_string())
}

/// Prints step events and, in step mode, waits for Enter before the next step.
struct Console<R> {
    input: R,
    print: bool,
    pause: bool,
}

impl<R: BufRead> StepObserver for Console<R> {
    fn on_step(&mut self, event: &StepEvent) -> Control {
        if self.print || self.pause {
            print_event(event);
        }

        if !self.pause || event.is_halt() {
            return Control::Continue;
        }

        print!("Press Enter to continue...");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => Control::Stop,
            Ok(_) => Control::Continue,
        }
    }
}

fn print_event(event: &StepEvent) {
    println!(
        "Step: {}, State: {}, Symbol: {:?}, Head: {}, Tape: {}",
        event.step,
        event.state,
        event.symbol,
        event.head,
        event.tape.iter().collect::<String>()
    );

    match &event.outcome {
        StepOutcome::Applied(t) => println!(
            "  write {:?}, move {}, next state {}",
            t.write, t.direction, t.next_state
        ),
        StepOutcome::Halted => println!("  no transition found"),
    }
}

/// Asks for a value on the terminal, returning `None` when the answer is empty.
fn prompt(question: &str) -> io::Result<Option<String>> {
    print!("{question}");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let answer = line.trim();

    Ok((!answer.is_empty()).then(|| answer.to_string()))
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if cli.list {
        for i in 0..ProgramManager::get_program_count() {
            let info = ProgramManager::get_program_info(i)?;
            println!(
                "{}: {} (tape {:?}, {} states, {} transitions)",
                info.index, info.name, info.initial_tape, info.state_count, info.transition_count
            );
        }
        return Ok(());
    }

    let mut program = match (&cli.program, &cli.name) {
        (Some(path), _) => ProgramLoader::load_program(Path::new(path))?,
        (None, Some(name)) => ProgramManager::get_program_by_name(name)?,
        (None, None) => ProgramManager::get_program_by_index(0)?,
    };
    log::info!("loaded program '{}'", program.name);

    let interactive = atty::is(atty::Stream::Stdin);

    match cli.tape {
        Some(tape) => program.tape = tape,
        None if interactive => {
            let question = format!("Initial tape (e.g. {}): ", program.tape);
            if let Some(tape) = prompt(&question)? {
                program.tape = tape;
            }
        }
        None => {}
    }

    let max_steps = match cli.max_steps {
        Some(n) => n,
        None if interactive => match prompt(&format!("Maximum steps [{DEFAULT_MAX_STEPS}]: "))? {
            Some(answer) => parse_step_budget(&answer)?,
            None => DEFAULT_MAX_STEPS,
        },
        None => DEFAULT_MAX_STEPS,
    };

    let mut machine = TuringMachine::from_program(&program);
    let mut console = Console {
        input: io::stdin().lock(),
        print: cli.debug,
        pause: cli.step,
    };

    let result = machine.run_with(max_steps, &mut console)?;

    match result.stop {
        StopReason::Halted => println!("\nMachine halted."),
        StopReason::BudgetExhausted => println!("\nStep limit of {} reached.", max_steps),
        StopReason::Cancelled => println!("\nExecution stopped."),
    }
    println!("Final tape: {}", result.tape_string());
    println!("Steps executed: {}", result.steps);

    Ok(())
}
