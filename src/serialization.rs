use std::fmt;

pub const COLUMN_USERNAME_SIZE: usize = 32;
pub const COLUMN_EMAIL_SIZE: usize = 255;
pub const USERNAME_SIZE: usize = COLUMN_USERNAME_SIZE + 1;
pub const EMAIL_SIZE: usize = COLUMN_EMAIL_SIZE + 1;
pub const ID_SIZE: usize = std::mem::size_of::<u32>();
pub const ID_OFFSET: usize = 0;
pub const USERNAME_OFFSET: usize = ID_OFFSET + ID_SIZE;
pub const EMAIL_OFFSET: usize = USERNAME_OFFSET + USERNAME_SIZE;
pub const ROW_SIZE: usize = ID_SIZE + USERNAME_SIZE + EMAIL_SIZE;

/// A single fixed-width record. The string columns keep their trailing NUL
/// so the on-disk image is deterministic for a given row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: u32,
    pub username: [u8; USERNAME_SIZE],
    pub email: [u8; EMAIL_SIZE],
}

impl Row {
    pub fn new() -> Row {
        Row {
            id: 0,
            username: [0; USERNAME_SIZE],
            email: [0; EMAIL_SIZE],
        }
    }

    /// Builds a row from parsed fields. Lengths must already be validated
    /// against the column caps.
    pub fn from_fields(id: u32, username: &str, email: &str) -> Row {
        let mut row = Row::new();
        row.id = id;
        row.username[..username.len()].copy_from_slice(username.as_bytes());
        row.email[..email.len()].copy_from_slice(email.as_bytes());
        row
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.id,
            String::from_utf8_lossy(until_nul(&self.username)),
            String::from_utf8_lossy(until_nul(&self.email))
        )
    }
}

pub(crate) fn serialize_row(source: &Row, destination: &mut [u8]) {
    destination[ID_OFFSET..ID_OFFSET + ID_SIZE].copy_from_slice(&source.id.to_le_bytes());
    destination[USERNAME_OFFSET..USERNAME_OFFSET + USERNAME_SIZE]
        .copy_from_slice(&source.username);
    destination[EMAIL_OFFSET..EMAIL_OFFSET + EMAIL_SIZE].copy_from_slice(&source.email);
}

pub(crate) fn deserialize_row(source: &[u8], destination: &mut Row) {
    destination.id = u32::from_le_bytes(
        source[ID_OFFSET..ID_OFFSET + ID_SIZE]
            .try_into()
            .expect("id field is four bytes"),
    );
    destination
        .username
        .copy_from_slice(&source[USERNAME_OFFSET..USERNAME_OFFSET + USERNAME_SIZE]);
    destination
        .email
        .copy_from_slice(&source[EMAIL_OFFSET..EMAIL_OFFSET + EMAIL_SIZE]);
}

fn until_nul(field: &[u8]) -> &[u8] {
    match field.iter().position(|&byte| byte == 0) {
        Some(end) => &field[..end],
        None => field,
    }
}
