//! Section pipeline: parent resolution, filtering, ordering, pagination and
//! the assembly of view models.

pub mod assemble;
pub mod collection;
pub mod columns;
pub mod error;
pub mod host;
pub mod i18n;
pub mod ordering;
pub mod pagination;
pub mod query;
pub mod sections;
pub mod validate;
