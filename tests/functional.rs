use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tempfile::TempDir;

struct Database {
    _dir: TempDir,
    filename: PathBuf,
}

impl Database {
    fn new() -> Database {
        let dir = tempfile::tempdir().expect("failed to create scratch directory");
        let filename = dir.path().join(format!("{}.db", uuid::Uuid::new_v4()));
        Database { _dir: dir, filename }
    }

    fn run_script<T: AsRef<str>>(&self, commands: Vec<T>) -> Vec<String> {
        let process = Command::new(env!("CARGO_BIN_EXE_pagedb"))
            .arg(&self.filename)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .unwrap();

        let mut input = String::new();
        for command in commands {
            input.push_str(command.as_ref());
            input.push('\n');
        }

        process.stdin.unwrap().write_all(input.as_bytes()).unwrap();

        let mut string = String::new();
        process.stdout.unwrap().read_to_string(&mut string).unwrap();
        string.lines().map(|l| l.to_string()).collect()
    }
}

#[test]
fn inserts_and_retrieves_a_row() {
    let db = Database::new();
    let output = db.run_script(vec![
        "insert 1 user1 person1@example.com",
        "select",
        ".exit",
    ]);
    assert_eq!(
        output,
        vec![
            "db > Executed.",
            "db > (1, user1, person1@example.com)",
            "Executed.",
            "db > ",
        ]
    );
}

#[test]
fn keeps_rows_after_reopening() {
    let db = Database::new();
    let output = db.run_script(vec!["insert 1 user1 person1@example.com", ".exit"]);
    assert_eq!(output, vec!["db > Executed.", "db > "]);

    let output = db.run_script(vec!["select", ".exit"]);
    assert_eq!(
        output,
        vec![
            "db > (1, user1, person1@example.com)",
            "Executed.",
            "db > ",
        ]
    );
}

#[test]
fn prints_error_when_table_is_full() {
    let db = Database::new();
    let mut input: Vec<_> = (1..=14)
        .map(|i| format!("insert {i} user{i} person{i}@example.com"))
        .collect();
    input.push(String::from("select"));
    input.push(String::from(".exit"));
    let output = db.run_script(input);

    let mut expected: Vec<_> = (1..=13).map(|_| String::from("db > Executed.")).collect();
    expected.push(String::from("db > Error: Table full."));
    expected.push(String::from("db > (1, user1, person1@example.com)"));
    for i in 2..=13 {
        expected.push(format!("({i}, user{i}, person{i}@example.com)"));
    }
    expected.push(String::from("Executed."));
    expected.push(String::from("db > "));
    assert_eq!(output, expected);
}

#[test]
fn rejects_strings_that_are_too_long() {
    let db = Database::new();
    let username = "a".repeat(33);
    let output = db.run_script(vec![
        format!("insert 1 {username} person1@example.com"),
        String::from(".exit"),
    ]);
    assert_eq!(output, vec!["db > String is too long.", "db > "]);
}

#[test]
fn accepts_maximum_length_strings() {
    let db = Database::new();
    let username = "a".repeat(32);
    let email = "e".repeat(255);
    let output = db.run_script(vec![
        format!("insert 1 {username} {email}"),
        String::from("select"),
        String::from(".exit"),
    ]);
    assert_eq!(
        output,
        vec![
            String::from("db > Executed."),
            format!("db > (1, {username}, {email})"),
            String::from("Executed."),
            String::from("db > "),
        ]
    );
}

#[test]
fn rejects_a_negative_id() {
    let db = Database::new();
    let output = db.run_script(vec!["insert -1 foo bar@x", ".exit"]);
    assert_eq!(output, vec!["db > ID must be positive.", "db > "]);
}

#[test]
fn reports_unrecognized_input() {
    let db = Database::new();
    let output = db.run_script(vec!["frobnicate", ".nope", ".exit"]);
    assert_eq!(
        output,
        vec![
            "db > Unrecognized keyword at start of 'frobnicate'.",
            "db > Unrecognized command '.nope'.",
            "db > ",
        ]
    );
}

#[test]
fn prints_constants() {
    let db = Database::new();
    let output = db.run_script(vec![".constants", ".exit"]);
    assert_eq!(
        output,
        vec![
            "db > Constants:",
            "ROW_SIZE: 293",
            "COMMON_NODE_HEADER_SIZE: 6",
            "LEAF_NODE_HEADER_SIZE: 10",
            "LEAF_NODE_CELL_SIZE: 297",
            "LEAF_NODE_SPACE_FOR_CELLS: 4086",
            "LEAF_NODE_MAX_CELLS: 13",
            "db > ",
        ]
    );
}

#[test]
fn prints_structure_of_one_node_btree() {
    let db = Database::new();
    let input = vec![
        "insert 3 user3 person3@example.com",
        "insert 1 user1 person1@example.com",
        "insert 2 user2 person2@example.com",
        ".btree",
        ".exit",
    ];
    let output = db.run_script(input);
    // Rows keep insertion order; the layout does not sort by key yet.
    assert_eq!(
        output,
        vec![
            "db > Executed.",
            "db > Executed.",
            "db > Executed.",
            "db > Tree:",
            "leaf (size 3)",
            "  - 0 : 3",
            "  - 1 : 1",
            "  - 2 : 2",
            "db > ",
        ]
    );
}

#[test]
fn requires_a_database_filename() {
    let output = Command::new(env!("CARGO_BIN_EXE_pagedb"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim_end(),
        "Must supply a database filename."
    );
}

#[test]
fn rejects_a_file_that_is_not_whole_pages() {
    let db = Database::new();
    std::fs::write(&db.filename, b"not a page").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_pagedb"))
        .arg(&db.filename)
        .stdin(Stdio::null())
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim_end(),
        "Db file is not a whole number of pages. Corrupt file."
    );
}

#[test]
fn database_file_is_a_whole_number_of_pages() {
    let db = Database::new();
    db.run_script(vec!["insert 1 user1 person1@example.com", ".exit"]);

    let len = std::fs::metadata(&db.filename).unwrap().len();
    assert_eq!(len, 4096);
}
