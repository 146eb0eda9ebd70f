use thiserror::Error;

use crate::row::{Row, RowError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("could not parse statement")]
    Syntax,
    #[error("invalid id '{0}'")]
    InvalidId(String),
    #[error(transparent)]
    Field(#[from] RowError),
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Insert(Row),
    Select,
    // Non-SQL statements like .exit are called "meta-commands".
    MetaExit,
    Unrecognized(String),
    MalformedInsert(ParseError),
}

impl Statement {
    /// Parses a line of whitespace-separated tokens. Never fails: anything
    /// that isn't a known statement comes back as [`Statement::Unrecognized`].
    pub fn parse(line: &str) -> Statement {
        let input = line.trim();
        if input == ".exit" {
            return Statement::MetaExit;
        }

        let mut tokens = input.split_whitespace();
        match tokens.next() {
            Some("select") => Statement::Select,
            Some("insert") => {
                let args: Vec<&str> = tokens.collect();
                match parse_insert(&args) {
                    Ok(row) => Statement::Insert(row),
                    Err(err) => Statement::MalformedInsert(err),
                }
            }
            _ => Statement::Unrecognized(input.to_string()),
        }
    }
}

// Argument count is checked before the id, and the id before field widths, so
// a given line always reports the same error.
fn parse_insert(args: &[&str]) -> Result<Row, ParseError> {
    let [id, username, email] = args else {
        return Err(ParseError::Syntax);
    };
    let id: i32 = id
        .parse()
        .map_err(|_| ParseError::InvalidId(id.to_string()))?;
    Ok(Row::new(id, *username, *email)?)
}
