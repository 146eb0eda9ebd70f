//! Fixed-width row layout and its codec.
//!
//! Every row serializes to exactly [`ROW_SIZE`] bytes:
//!
//! ```text
//! +---------+----------------------+------------------------+
//! | id (4B) | username (32B, NUL-  | email (255B, NUL-      |
//! | i32 LE  | padded)              | padded)                |
//! +---------+----------------------+------------------------+
//! ```
//!
//! Text that does not fit its column is rejected, never truncated. NUL bytes
//! are reserved for padding and rejected in values.

use std::fmt;

use thiserror::Error;

use crate::{
    EMAIL_OFFSET, EMAIL_SIZE, ID_OFFSET, ID_SIZE, ROW_SIZE, USERNAME_OFFSET, USERNAME_SIZE,
};

/// A serialized row, exactly as it sits in a page slot.
pub type RecordBlock = [u8; ROW_SIZE];

/// The fixed-width text columns of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Username,
    Email,
}

impl Field {
    /// Column width in bytes.
    pub const fn max_len(self) -> usize {
        match self {
            Field::Username => USERNAME_SIZE,
            Field::Email => EMAIL_SIZE,
        }
    }

    const fn offset(self) -> usize {
        match self {
            Field::Username => USERNAME_OFFSET,
            Field::Email => EMAIL_OFFSET,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Username => f.write_str("username"),
            Field::Email => f.write_str("email"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("{field} is longer than {max} bytes")]
    FieldTooLong { field: Field, len: usize, max: usize },
    #[error("{field} contains a NUL byte")]
    NulByte { field: Field },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: i32,
    pub username: String,
    pub email: String,
}

impl Row {
    /// Builds a row, rejecting text that would not fit its column.
    pub fn new(
        id: i32,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, RowError> {
        let row = Self {
            id,
            username: username.into(),
            email: email.into(),
        };
        row.validate()?;
        Ok(row)
    }

    pub fn validate(&self) -> Result<(), RowError> {
        check_width(Field::Username, &self.username)?;
        check_width(Field::Email, &self.email)
    }

    /// Serializes the row into a zero-padded block.
    ///
    /// The fields are public, so widths are checked again here; nothing is
    /// written unless the whole row fits.
    pub fn encode(&self) -> Result<RecordBlock, RowError> {
        self.validate()?;

        let mut block = [0u8; ROW_SIZE];
        block[ID_OFFSET..ID_OFFSET + ID_SIZE].copy_from_slice(&self.id.to_le_bytes());
        write_text(&mut block, Field::Username, &self.username);
        write_text(&mut block, Field::Email, &self.email);
        Ok(block)
    }

    /// Inverse of [`Row::encode`]. Trailing NUL bytes are padding.
    pub fn decode(block: &RecordBlock) -> Self {
        let mut id = [0u8; ID_SIZE];
        id.copy_from_slice(&block[ID_OFFSET..ID_OFFSET + ID_SIZE]);

        Self {
            id: i32::from_le_bytes(id),
            username: read_text(block, Field::Username),
            email: read_text(block, Field::Email),
        }
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.id, self.username, self.email)
    }
}

fn check_width(field: Field, value: &str) -> Result<(), RowError> {
    let max = field.max_len();
    if value.len() > max {
        return Err(RowError::FieldTooLong {
            field,
            len: value.len(),
            max,
        });
    }
    // NUL is the padding byte, a value containing one would not decode back
    if value.contains('\0') {
        return Err(RowError::NulByte { field });
    }
    Ok(())
}

fn write_text(block: &mut RecordBlock, field: Field, value: &str) {
    let start = field.offset();
    block[start..start + value.len()].copy_from_slice(value.as_bytes());
}

fn read_text(block: &RecordBlock, field: Field) -> String {
    let region = &block[field.offset()..field.offset() + field.max_len()];
    let end = region.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    String::from_utf8_lossy(&region[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_round_trips_a_row() {
        let row = Row::new(1, "alice", "alice@google.com").unwrap();
        let block = row.encode().unwrap();
        assert_eq!(Row::decode(&block), row);
    }

    #[test]
    fn it_round_trips_negative_ids_and_empty_text() {
        let row = Row::new(-42, "", "").unwrap();
        assert_eq!(Row::decode(&row.encode().unwrap()), row);

        let row = Row::new(i32::MIN, "x", "y").unwrap();
        assert_eq!(Row::decode(&row.encode().unwrap()), row);
    }

    #[test]
    fn it_writes_the_id_little_endian_and_zero_pads_text() {
        let row = Row::new(0x0102_0304, "bob", "bob@yahoo.com").unwrap();
        let block = row.encode().unwrap();

        assert_eq!(&block[ID_OFFSET..ID_SIZE], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&block[USERNAME_OFFSET..USERNAME_OFFSET + 3], b"bob");
        assert!(block[USERNAME_OFFSET + 3..EMAIL_OFFSET].iter().all(|&b| b == 0));
        assert!(block[EMAIL_OFFSET + 13..].iter().all(|&b| b == 0));
    }

    #[test]
    fn it_accepts_text_at_the_maximum_width() {
        let row = Row::new(7, "a".repeat(USERNAME_SIZE), "b".repeat(EMAIL_SIZE)).unwrap();
        let block = row.encode().unwrap();
        assert_eq!(Row::decode(&block), row);
    }

    #[test]
    fn it_rejects_text_one_byte_over_the_width() {
        let err = Row::new(1, "a".repeat(USERNAME_SIZE + 1), "x").unwrap_err();
        assert_eq!(
            err,
            RowError::FieldTooLong {
                field: Field::Username,
                len: USERNAME_SIZE + 1,
                max: USERNAME_SIZE,
            }
        );

        let err = Row::new(1, "x", "a".repeat(EMAIL_SIZE + 1)).unwrap_err();
        assert_eq!(err.to_string(), "email is longer than 255 bytes");
    }

    #[test]
    fn it_measures_width_in_bytes_not_chars() {
        // 'é' is two bytes in UTF-8
        assert!(Row::new(1, "é".repeat(USERNAME_SIZE / 2), "x").is_ok());
        assert!(Row::new(1, "é".repeat(USERNAME_SIZE / 2 + 1), "x").is_err());

        let row = Row::new(1, "héllo", "ünïcode@example.com").unwrap();
        assert_eq!(Row::decode(&row.encode().unwrap()), row);
    }

    #[test]
    fn encode_checks_fields_mutated_after_construction() {
        let mut row = Row::new(1, "alice", "alice@google.com").unwrap();
        row.username = "a".repeat(USERNAME_SIZE + 1);
        assert!(matches!(
            row.encode(),
            Err(RowError::FieldTooLong {
                field: Field::Username,
                ..
            })
        ));
    }

    #[test]
    fn it_rejects_nul_bytes_in_text() {
        assert_eq!(
            Row::new(1, "a\0", "b").unwrap_err(),
            RowError::NulByte {
                field: Field::Username
            }
        );
        let err = Row::new(1, "a", "b\0\0").unwrap_err();
        assert_eq!(err.to_string(), "email contains a NUL byte");

        let mut row = Row::new(1, "alice", "alice@google.com").unwrap();
        row.email = "a\0b".to_string();
        assert_eq!(
            row.encode(),
            Err(RowError::NulByte {
                field: Field::Email
            })
        );
    }

    #[test]
    fn it_displays_as_a_tuple() {
        let row = Row::new(2, "bob", "bob@yahoo.com").unwrap();
        assert_eq!(row.to_string(), "(2, bob, bob@yahoo.com)");
    }
}
