use sea_orm::sea_query::SimpleExpr;
use sea_orm::{ColumnTrait, EntityTrait, Value};

/// Lifecycle of a persisted record. Records are never physically removed by
/// the repositories; deleting one moves it from `Active` to `Deleted`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityState {
    Active,
    Deleted,
}

impl EntityState {
    pub fn from_flag(is_deleted: bool) -> Self {
        if is_deleted {
            EntityState::Deleted
        } else {
            EntityState::Active
        }
    }

    pub fn is_deleted(self) -> bool {
        self == EntityState::Deleted
    }
}

impl From<EntityState> for Value {
    fn from(state: EntityState) -> Self {
        Value::Bool(Some(state.is_deleted()))
    }
}

/// Columns every soft-deletable collection carries.
///
/// The deleted flag must be a `bool` column and both timestamps
/// `DateTimeUtc` columns; the repository writes them generically.
pub trait SoftDelete: EntityTrait {
    fn deleted_column() -> Self::Column;

    fn created_at_column() -> Self::Column;

    fn updated_at_column() -> Self::Column;

    /// Predicate every read and write starts from.
    fn not_deleted() -> SimpleExpr {
        Self::deleted_column().eq(EntityState::Active)
    }
}
