mod cli_io;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use cxxblocks::{AstPrinter, BlockIndex, CxxBlocksError, FunctionBlock, time_block};

#[derive(Parser, Debug)]
#[command(
    name = "cxxblocks",
    version,
    about = "Extract, compare and check C++ function bodies"
)]
struct Cli {
    /// Print timing information to stderr (same as setting CXXBLOCKS_TIMING)
    #[arg(long, global = true)]
    timing: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sum 2*i for every i below BOUND
    Count {
        #[arg(allow_negative_numbers = true, default_value_t = cxxblocks::DEFAULT_BOUND)]
        bound: i32,
    },
    /// Print every function block and its syntax tree
    Blocks {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Score how similar two function blocks are
    Compare {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        #[arg(long)]
        left: String,
        #[arg(long)]
        right: String,
    },
    /// Report loops that can never exit
    Check {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    cxxblocks::timing::init(cli.timing);

    match run(cli.command) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Option<Command>) -> Result<ExitCode, CxxBlocksError> {
    match command {
        None => {
            println!("{}", cxxblocks::count(cxxblocks::DEFAULT_BOUND));
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Count { bound }) => {
            println!("{}", cxxblocks::count(bound));
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Blocks { paths }) => {
            let blocks = load_blocks(paths)?;
            for block in &blocks {
                println!("{}", block.name);
                print!("{}", AstPrinter::new(&block.statements).render());
            }
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Compare { paths, left, right }) => {
            let blocks = load_blocks(paths)?;
            let index = BlockIndex::new(&blocks);
            let score = index.require(&left)?.compare(index.require(&right)?);
            println!("{score:.6}");
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Check { paths }) => {
            let blocks = load_blocks(paths)?;
            let findings: Vec<_> = blocks.iter().flat_map(cxxblocks::unbounded_loops).collect();
            for finding in &findings {
                println!("{finding}");
            }
            if findings.is_empty() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

fn load_blocks(paths: Vec<PathBuf>) -> Result<Vec<FunctionBlock>, CxxBlocksError> {
    let inputs = time_block!("gather_inputs", cli_io::gather_inputs(paths))?;
    cxxblocks::extract_all(inputs)
}
