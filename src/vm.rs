use crate::error::DbError;
use crate::node::leaf::{leaf_node_insert, LEAF_NODE_MAX_CELLS};
use crate::repl::{print_constants, print_tree};
use crate::serialization::{
    deserialize_row, Row, COLUMN_EMAIL_SIZE, COLUMN_USERNAME_SIZE,
};
use crate::storage::Storage;
use crate::table::Table;
use crate::Logger;

pub enum Statement {
    Insert(Row),
    Select,
}

pub enum PrepareError {
    NegativeId,
    StringTooLong,
    SyntaxError,
    UnrecognizedStatement,
}

impl TryFrom<&str> for Statement {
    type Error = PrepareError;

    fn try_from(input: &str) -> Result<Self, Self::Error> {
        if input.starts_with("insert") {
            prepare_insert(input)
        } else if input == "select" {
            Ok(Statement::Select)
        } else {
            Err(PrepareError::UnrecognizedStatement)
        }
    }
}

fn prepare_insert(input: &str) -> Result<Statement, PrepareError> {
    let mut tokens = input.split_whitespace();
    let _keyword = tokens.next();
    let (Some(id_string), Some(username), Some(email)) =
        (tokens.next(), tokens.next(), tokens.next())
    else {
        return Err(PrepareError::SyntaxError);
    };

    let id: i64 = id_string.parse().map_err(|_| PrepareError::SyntaxError)?;
    if id < 0 {
        return Err(PrepareError::NegativeId);
    }
    let id = u32::try_from(id).map_err(|_| PrepareError::SyntaxError)?;

    if username.len() > COLUMN_USERNAME_SIZE || email.len() > COLUMN_EMAIL_SIZE {
        return Err(PrepareError::StringTooLong);
    }

    Ok(Statement::Insert(Row::from_fields(id, username, email)))
}

pub enum MetaCommandError {
    UnrecognizedCommand,
}

pub fn do_meta_command<T: Storage>(
    input: &str,
    mut table: Table<T>,
) -> Result<Table<T>, (Table<T>, MetaCommandError)> {
    match input {
        ".exit" => match table.close() {
            Ok(()) => std::process::exit(0),
            Err(error) => crate::fatal(error),
        },
        ".btree" => {
            println!("Tree:");
            if let Err(error) = print_tree(&mut table.pager, table.root_page_num) {
                crate::fatal(error);
            }
            Ok(table)
        }
        ".constants" => {
            println!("Constants:");
            print_constants();
            Ok(table)
        }
        _ => Err((table, MetaCommandError::UnrecognizedCommand)),
    }
}

pub enum ExecuteError {
    TableFull,
    Storage(DbError),
}

impl From<DbError> for ExecuteError {
    fn from(error: DbError) -> Self {
        ExecuteError::Storage(error)
    }
}

fn execute_insert<T: Storage>(row: &Row, table: &mut Table<T>) -> Result<(), ExecuteError> {
    let node = table.pager.page(table.root_page_num as usize)?;
    if node.num_cells() >= LEAF_NODE_MAX_CELLS as u32 {
        return Err(ExecuteError::TableFull);
    }

    let cursor = table.end()?;
    leaf_node_insert(cursor, row.id, row)?;
    Ok(())
}

fn execute_select<T: Storage>(
    table: &mut Table<T>,
    logger: &impl Logger,
) -> Result<(), ExecuteError> {
    let mut cursor = table.start()?;
    while !cursor.end_of_table {
        let mut row = Row::new();
        deserialize_row(cursor.value(), &mut row);
        logger.print_row(&row);
        cursor.advance()?;
    }
    Ok(())
}

pub fn execute_statement<T: Storage>(
    statement: &Statement,
    table: &mut Table<T>,
    logger: &impl Logger,
) -> Result<(), ExecuteError> {
    match statement {
        Statement::Insert(row) => execute_insert(row, table),
        Statement::Select => execute_select(table, logger),
    }
}
