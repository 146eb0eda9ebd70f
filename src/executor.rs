use tracing::debug;

use crate::statement::Statement;
use crate::table::Table;

const EXECUTED: &str = "Executed.";

/// Whether the session keeps reading input after a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Stop,
}

/// Output lines produced by one statement, without line terminators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub lines: Vec<String>,
    pub control: Control,
}

impl Outcome {
    fn line(line: impl Into<String>) -> Self {
        Self {
            lines: vec![line.into()],
            control: Control::Continue,
        }
    }

    fn stop() -> Self {
        Self {
            lines: Vec::new(),
            control: Control::Stop,
        }
    }
}

/// Applies `statement` to `table`. Every error is reported as an output line;
/// only [`Statement::MetaExit`] stops the session.
pub fn execute(statement: Statement, table: &mut Table) -> Outcome {
    debug!(?statement, rows = table.len(), "executing");

    match statement {
        Statement::Insert(row) => match table.insert(&row) {
            Ok(()) => Outcome::line(EXECUTED),
            Err(err) => Outcome::line(format!("Error: {err}.")),
        },
        Statement::Select => {
            let mut lines: Vec<String> = table.scan().map(|row| row.to_string()).collect();
            lines.push(EXECUTED.to_string());
            Outcome {
                lines,
                control: Control::Continue,
            }
        }
        Statement::MetaExit => Outcome::stop(),
        Statement::Unrecognized(text) => Outcome::line(format!("Unrecognized command '{text}'.")),
        Statement::MalformedInsert(reason) => Outcome::line(format!("Syntax error: {reason}.")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Row;
    use crate::{EMAIL_SIZE, ROWS_PER_PAGE};

    fn run(table: &mut Table, line: &str) -> Outcome {
        execute(Statement::parse(line), table)
    }

    #[test]
    fn it_inserts_and_selects() {
        let mut table = Table::default();
        assert_eq!(
            run(&mut table, "insert 1 alice alice@google.com"),
            Outcome::line("Executed.")
        );
        assert_eq!(
            run(&mut table, "insert 2 bob bob@yahoo.com"),
            Outcome::line("Executed.")
        );

        let outcome = run(&mut table, "select");
        assert_eq!(
            outcome.lines,
            [
                "(1, alice, alice@google.com)",
                "(2, bob, bob@yahoo.com)",
                "Executed."
            ]
        );
        assert_eq!(outcome.control, Control::Continue);
    }

    #[test]
    fn select_on_an_empty_table_only_reports_success() {
        let mut table = Table::default();
        assert_eq!(run(&mut table, "select"), Outcome::line("Executed."));
    }

    #[test]
    fn exit_stops_without_output() {
        let mut table = Table::default();
        assert_eq!(run(&mut table, ".exit"), Outcome::stop());
    }

    #[test]
    fn it_reports_a_full_table_and_keeps_going() {
        let mut table = Table::new(1);
        for i in 0..ROWS_PER_PAGE {
            assert_eq!(
                run(&mut table, &format!("insert {i} user{i} person{i}@example.com")),
                Outcome::line("Executed.")
            );
        }

        let outcome = run(&mut table, "insert 99 late late@example.com");
        assert_eq!(outcome, Outcome::line("Error: Table full."));
        assert_eq!(table.len(), ROWS_PER_PAGE);
    }

    #[test]
    fn it_reports_field_errors_from_the_table() {
        let mut table = Table::default();
        let mut row = Row::new(1, "alice", "alice@google.com").unwrap();
        row.email = "e".repeat(EMAIL_SIZE + 1);

        assert_eq!(
            execute(Statement::Insert(row), &mut table),
            Outcome::line("Error: email is longer than 255 bytes.")
        );
        assert!(table.is_empty());
    }

    #[test]
    fn it_reports_malformed_inserts() {
        let mut table = Table::default();
        assert_eq!(
            run(&mut table, "insert 1 alice"),
            Outcome::line("Syntax error: could not parse statement.")
        );
        assert_eq!(
            run(&mut table, "insert one alice alice@google.com"),
            Outcome::line("Syntax error: invalid id 'one'.")
        );
        assert_eq!(
            run(&mut table, &format!("insert 1 {} a@b.c", "a".repeat(33))),
            Outcome::line("Syntax error: username is longer than 32 bytes.")
        );
        assert_eq!(
            run(&mut table, "insert 1 a\0 b\0\0"),
            Outcome::line("Syntax error: username contains a NUL byte.")
        );
        assert!(table.is_empty());
    }

    #[test]
    fn it_reports_unrecognized_commands() {
        let mut table = Table::default();
        assert_eq!(
            run(&mut table, "foobar"),
            Outcome::line("Unrecognized command 'foobar'.")
        );
        assert!(table.is_empty());
    }
}
