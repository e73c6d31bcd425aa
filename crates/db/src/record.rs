//! The mapping contract every entity implements.
//!
//! A [`Record`] is the camelCase domain object the console works with. Its
//! create DTO ([`NewRecord`]) and update DTO ([`RecordPatch`]) own the write
//! direction of the mapping.

use madrasa_core::session::Session;

use crate::mapper::Row;
use crate::schema::Table;

/// A domain object bound at compile time to one store table.
pub trait Record: Sized + Send + Sync + 'static {
    const TABLE: Table;

    /// Create DTO.
    type New: NewRecord;

    /// Update DTO, every field optional.
    type Patch: RecordPatch;

    /// Map a store row (possibly with joined relations) to the domain shape.
    fn from_row(row: &Row) -> Self;

    /// Map back to the persisted columns. Joined display fields are not
    /// written, and unset optional fields are omitted.
    fn to_row(&self) -> Row;

    fn id(&self) -> &str;
}

/// Input for inserting a new record.
pub trait NewRecord: Send + Sync {
    /// Client-side checks run before the store is contacted.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    /// Columns to insert. Attribution columns are stamped from `session`.
    fn to_row(&self, session: &Session) -> Row;
}

/// Input for a partial update.
pub trait RecordPatch: Send + Sync {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    /// Only the columns whose fields are `Some`.
    fn to_row(&self) -> Row;
}
