use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use log::info;

use clr1_core::{Grammar, LrParser, LrTable};

/// Builds the canonical LR(1) table of a grammar and traces the parse of an input.
#[derive(Parser, Debug)]
#[command(name = "clr1", version, about)]
struct Args {
    /// Grammar file, one `LHS -> RHS1 | RHS2` rule per line.
    grammar: PathBuf,

    /// Whitespace separated terminals to parse.
    #[arg(short, long)]
    input: Option<String>,

    /// Print the canonical collection of item sets.
    #[arg(long)]
    states: bool,

    /// Print the FIRST and FOLLOW sets.
    #[arg(long)]
    sets: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let text = std::fs::read_to_string(&args.grammar)
        .with_context(|| format!("cannot read grammar {}", args.grammar.display()))?;

    let grammar = Grammar::parse(&text)?;
    let table = LrTable::build(&grammar)?;
    info!("built table with {} states", table.states().len());

    if args.sets {
        print!("{}", table.first().display(table.rules()));
        print!("{}", table.follow().display(table.rules()));
        println!();
    }

    if args.states {
        for (id, state) in table.states().iter().enumerate() {
            println!("I{}:\n{}\n", id, state.display(table.rules()));
        }
    }

    println!("{}", table);

    if let Some(input) = args.input.as_deref() {
        match LrParser::new(&table).parse(input) {
            Ok(trace) => println!("{}", trace),
            Err(err) => {
                if let Some(trace) = err.partial_trace() {
                    println!("{}", trace);
                }
                return Err(err.into());
            }
        }
    }

    Ok(())
}
