use crate::error::DbError;
use crate::node::common::HEADER_SIZE;
use crate::node::leaf::{
    LEAF_NODE_CELL_SIZE, LEAF_NODE_HEADER_SIZE, LEAF_NODE_MAX_CELLS, LEAF_NODE_SPACE_FOR_CELLS,
};
use crate::pager::Pager;
use crate::serialization::ROW_SIZE;
use crate::storage::Storage;
use std::io::{BufRead, Write};

pub fn print_prompt() {
    print!("db > ");
    std::io::stdout().flush().expect("stdout is writable");
}

/// Reads one line from stdin with the trailing newline stripped. EOF and
/// read failures are fatal, matching the prompt protocol.
pub fn read_input() -> String {
    let mut input = String::new();
    let mut stdin = std::io::stdin().lock();
    match stdin.read_line(&mut input) {
        Ok(0) | Err(_) => {
            println!("Error reading input");
            std::process::exit(1);
        }
        Ok(_) => {}
    }

    if input.ends_with('\n') {
        input.pop();
        if input.ends_with('\r') {
            input.pop();
        }
    }
    input
}

pub fn print_constants() {
    println!("ROW_SIZE: {}", ROW_SIZE);
    println!("COMMON_NODE_HEADER_SIZE: {}", HEADER_SIZE);
    println!("LEAF_NODE_HEADER_SIZE: {}", LEAF_NODE_HEADER_SIZE);
    println!("LEAF_NODE_CELL_SIZE: {}", LEAF_NODE_CELL_SIZE);
    println!("LEAF_NODE_SPACE_FOR_CELLS: {}", LEAF_NODE_SPACE_FOR_CELLS);
    println!("LEAF_NODE_MAX_CELLS: {}", LEAF_NODE_MAX_CELLS);
}

/// Prints the root leaf, one `cell : key` line per occupied slot.
pub fn print_tree<T: Storage>(pager: &mut Pager<T>, page_num: u32) -> Result<(), DbError> {
    let node = pager.page(page_num as usize)?;
    let num_cells = node.num_cells();
    println!("leaf (size {})", num_cells);
    for i in 0..num_cells {
        println!("  - {} : {}", i, node.key(i));
    }
    Ok(())
}
