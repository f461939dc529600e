mod error;
mod node;
mod pager;
mod repl;
mod serialization;
mod storage;
mod table;
mod vm;

use crate::error::DbError;
use crate::serialization::Row;
use crate::storage::{FileStorage, FileStorageFactory};
use crate::vm::Statement;
use repl::{print_prompt, read_input};
use table::Table;
use vm::{do_meta_command, execute_statement, ExecuteError, MetaCommandError, PrepareError};

fn main() {
    env_logger::init();

    let Some(filename) = std::env::args().nth(1) else {
        println!("Must supply a database filename.");
        std::process::exit(1);
    };
    let mut storage_factory = FileStorageFactory;
    let mut table: Table<FileStorage> = match Table::open(&mut storage_factory, &filename) {
        Ok(table) => table,
        Err(error) => fatal(error),
    };
    let logger = ConsoleLogger;

    loop {
        print_prompt();
        let input = read_input();

        if input.starts_with('.') {
            match do_meta_command(&input, table) {
                Ok(t) => {
                    table = t;
                    continue;
                }
                Err((t, MetaCommandError::UnrecognizedCommand)) => {
                    table = t;
                    println!("Unrecognized command '{}'.", input);
                    continue;
                }
            }
        }

        let statement = match Statement::try_from(input.as_str()) {
            Ok(s) => s,
            Err(error) => match error {
                PrepareError::NegativeId => {
                    println!("ID must be positive.");
                    continue;
                }
                PrepareError::StringTooLong => {
                    println!("String is too long.");
                    continue;
                }
                PrepareError::SyntaxError => {
                    println!("Syntax error. Could not parse statement.");
                    continue;
                }
                PrepareError::UnrecognizedStatement => {
                    println!("Unrecognized keyword at start of '{}'.", input);
                    continue;
                }
            },
        };

        match execute_statement(&statement, &mut table, &logger) {
            Ok(()) => {
                println!("Executed.");
            }
            Err(ExecuteError::TableFull) => {
                println!("Error: Table full.");
            }
            Err(ExecuteError::Storage(error)) => fatal(error),
        }
    }
}

pub trait Logger {
    fn print_row(&self, row: &Row);
}

struct ConsoleLogger;
impl Logger for ConsoleLogger {
    fn print_row(&self, row: &Row) {
        println!("{}", row);
    }
}

/// Prints the diagnostic for an unrecoverable storage fault and terminates.
pub(crate) fn fatal(error: DbError) -> ! {
    println!("{}", error);
    std::process::exit(1)
}
