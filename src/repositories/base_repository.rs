//! Generic data access over any soft-deletable sea-orm entity.
//!
//! Every method takes the connection to run on, so a caller that needs
//! several writes to commit together passes a `DatabaseTransaction` instead
//! of the pooled `DatabaseConnection`.

use std::marker::PhantomData;

use chrono::Utc;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue, Condition, ConnectionTrait, EntityTrait,
    IntoActiveModel, Iterable, Order, PaginatorTrait, PrimaryKeyToColumn, PrimaryKeyTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Value,
};
use serde::Serialize;

use crate::database::{EntityState, SoftDelete};
use crate::errors::RepoError;
use crate::utils::query_builder::{field_expr, FilterMode, ListQuery};
use crate::utils::resource_query::{Pagination, ResourceOptions, ResourceQuery};

type PrimaryKeyOf<E> = <<E as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

/// Which version of a record an update hands back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReturnDocument {
    Before,
    #[default]
    After,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateOptions {
    pub returning: ReturnDocument,
}

impl UpdateOptions {
    pub fn returning_before() -> Self {
        Self {
            returning: ReturnDocument::Before,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResult<T> {
    pub items: Vec<T>,
    pub total_count: u64,
}

impl<T> ListResult<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ListResult<U> {
        ListResult {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
        }
    }
}

/// One step of a [`Repository::bulk_write`].
pub enum BulkOperation<E: EntityTrait> {
    InsertOne(E::ActiveModel),
    UpdateOne { id: PrimaryKeyOf<E>, data: E::ActiveModel },
    UpdateMany { filter: Condition, data: E::ActiveModel },
    DeleteOne { id: PrimaryKeyOf<E> },
    DeleteMany { filter: Condition },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkWriteResult {
    pub inserted_count: u64,
    pub modified_count: u64,
    pub deleted_count: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct Repository<E> {
    filter_mode: FilterMode,
    _entity: PhantomData<E>,
}

impl<E> Default for Repository<E> {
    fn default() -> Self {
        Self::new(FilterMode::default())
    }
}

impl<E> Repository<E> {
    pub fn new(filter_mode: FilterMode) -> Self {
        Self {
            filter_mode,
            _entity: PhantomData,
        }
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.filter_mode
    }
}

impl<E> Repository<E>
where
    E: SoftDelete,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync,
    E::ActiveModel: ActiveModelBehavior + Send + Sync,
{
    /// Starts a listing query scoped to live records.
    pub fn query(&self) -> ListQuery<E> {
        ListQuery::new(self.filter_mode)
    }

    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        data: E::ActiveModel,
    ) -> Result<E::Model, RepoError> {
        let model = stamp_new::<E>(data).insert(conn).await?;
        Ok(model)
    }

    /// Inserts in order and stops at the first failure; records written
    /// before it stay unless `conn` is a transaction that gets rolled back.
    pub async fn insert_many<C: ConnectionTrait>(
        &self,
        conn: &C,
        data: Vec<E::ActiveModel>,
    ) -> Result<Vec<E::Model>, RepoError> {
        let mut created = Vec::with_capacity(data.len());
        for item in data {
            created.push(stamp_new::<E>(item).insert(conn).await?);
        }
        Ok(created)
    }

    pub async fn bulk_write<C: ConnectionTrait>(
        &self,
        conn: &C,
        operations: Vec<BulkOperation<E>>,
    ) -> Result<BulkWriteResult, RepoError> {
        let mut result = BulkWriteResult::default();
        for operation in operations {
            match operation {
                BulkOperation::InsertOne(data) => {
                    self.create(conn, data).await?;
                    result.inserted_count += 1;
                }
                BulkOperation::UpdateOne { id, data } => {
                    if self
                        .update(conn, id, data, UpdateOptions::default())
                        .await?
                        .is_some()
                    {
                        result.modified_count += 1;
                    }
                }
                BulkOperation::UpdateMany { filter, data } => {
                    result.modified_count += self.update_many(conn, filter, data).await?;
                }
                BulkOperation::DeleteOne { id } => {
                    if self.delete(conn, id).await?.is_some() {
                        result.deleted_count += 1;
                    }
                }
                BulkOperation::DeleteMany { filter } => {
                    result.deleted_count += self.delete_many(conn, filter).await?;
                }
            }
        }
        tracing::debug!(?result, "bulk write applied");
        Ok(result)
    }

    pub async fn find_by_id<C, K>(&self, conn: &C, id: K) -> Result<Option<E::Model>, RepoError>
    where
        C: ConnectionTrait,
        K: Into<PrimaryKeyOf<E>>,
    {
        let model = E::find_by_id(id)
            .filter(E::not_deleted())
            .one(conn)
            .await?;
        Ok(model)
    }

    pub async fn find_one<C: ConnectionTrait>(
        &self,
        conn: &C,
        filter: Condition,
    ) -> Result<Option<E::Model>, RepoError> {
        let model = self
            .query()
            .with_condition(filter)
            .into_select()
            .one(conn)
            .await?;
        Ok(model)
    }

    pub async fn find<C: ConnectionTrait>(
        &self,
        conn: &C,
        filter: Condition,
    ) -> Result<Vec<E::Model>, RepoError> {
        let models = self
            .query()
            .with_condition(filter)
            .into_select()
            .all(conn)
            .await?;
        Ok(models)
    }

    pub async fn count<C: ConnectionTrait>(
        &self,
        conn: &C,
        filter: Condition,
    ) -> Result<u64, RepoError> {
        let total = self
            .query()
            .with_condition(filter)
            .into_select()
            .count(conn)
            .await?;
        Ok(total)
    }

    /// Patches the live record with the fields set in `data`. `None` when no
    /// live record has that id.
    pub async fn update<C, K>(
        &self,
        conn: &C,
        id: K,
        data: E::ActiveModel,
        options: UpdateOptions,
    ) -> Result<Option<E::Model>, RepoError>
    where
        C: ConnectionTrait,
        K: Into<PrimaryKeyOf<E>>,
    {
        match self.find_by_id(conn, id).await? {
            Some(current) => self.patch(conn, current, data, options).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn update_one<C: ConnectionTrait>(
        &self,
        conn: &C,
        filter: Condition,
        data: E::ActiveModel,
        options: UpdateOptions,
    ) -> Result<Option<E::Model>, RepoError> {
        match self.find_one(conn, filter).await? {
            Some(current) => self.patch(conn, current, data, options).await.map(Some),
            None => Ok(None),
        }
    }

    /// Returns the number of records changed.
    pub async fn update_many<C: ConnectionTrait>(
        &self,
        conn: &C,
        filter: Condition,
        data: E::ActiveModel,
    ) -> Result<u64, RepoError> {
        let data = strip_protected::<E>(data);
        let mut statement = E::update_many().set(data.clone());
        if !data.get(E::updated_at_column()).is_set() {
            statement = statement.col_expr(E::updated_at_column(), Expr::value(Utc::now()));
        }

        let result = statement
            .filter(E::not_deleted())
            .filter(filter)
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }

    /// Soft delete: moves the record to [`EntityState::Deleted`] and returns
    /// it. `None` when there is no live record with that id.
    pub async fn delete<C, K>(&self, conn: &C, id: K) -> Result<Option<E::Model>, RepoError>
    where
        C: ConnectionTrait,
        K: Into<PrimaryKeyOf<E>>,
    {
        match self.find_by_id(conn, id).await? {
            Some(current) => self.mark_deleted(conn, current).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn delete_one<C: ConnectionTrait>(
        &self,
        conn: &C,
        filter: Condition,
    ) -> Result<Option<E::Model>, RepoError> {
        match self.find_one(conn, filter).await? {
            Some(current) => self.mark_deleted(conn, current).await.map(Some),
            None => Ok(None),
        }
    }

    /// Soft deletes every live match and returns how many were deleted.
    pub async fn delete_many<C: ConnectionTrait>(
        &self,
        conn: &C,
        filter: Condition,
    ) -> Result<u64, RepoError> {
        let result = E::update_many()
            .col_expr(E::deleted_column(), Expr::value(EntityState::Deleted))
            .col_expr(E::updated_at_column(), Expr::value(Utc::now()))
            .filter(E::not_deleted())
            .filter(filter)
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }

    /// Search, filter, date-window, sort and page the live records.
    /// `total_count` covers the whole filtered set regardless of paging.
    pub async fn list<C: ConnectionTrait>(
        &self,
        conn: &C,
        params: &ResourceQuery,
        options: &ResourceOptions,
    ) -> Result<ListResult<E::Model>, RepoError> {
        let mut query = self.query();
        if let Some(search) = params.search() {
            query = query.with_search(search, &options.search_fields);
        }
        if let Some(filters) = params.filters() {
            query = query.with_filters(filters);
        }
        if let Some((from, to)) = params.date_range() {
            query = query.with_date_range(from, to)?;
        }

        let select = query.into_select();
        let total_count = select.clone().count(conn).await?;

        let Pagination { skip, limit } = params.pagination();
        let sorted = select.order_by(
            SimpleExpr::from(field_expr::<E>(params.order_by())),
            params.sort().into(),
        );
        let items = tie_break::<E>(sorted)
            .offset(skip)
            .limit(limit)
            .all(conn)
            .await?;

        tracing::debug!(
            table = E::default().table_name(),
            returned = items.len(),
            total_count,
            "listed records"
        );
        Ok(ListResult { items, total_count })
    }

    /// Pages an already-built query without sorting it. `limit` and `page`
    /// are read like the listing parameters, with a default limit of 10.
    pub async fn with_pagination<C: ConnectionTrait>(
        &self,
        conn: &C,
        query: ListQuery<E>,
        limit: Option<&str>,
        page: Option<&str>,
    ) -> Result<ListResult<E::Model>, RepoError> {
        let select = query.into_select();
        let total_count = select.clone().count(conn).await?;

        let Pagination { skip, limit } = Pagination::resolve(page, limit, 10);
        let items = select.offset(skip).limit(limit).all(conn).await?;
        Ok(ListResult { items, total_count })
    }

    async fn patch<C: ConnectionTrait>(
        &self,
        conn: &C,
        current: E::Model,
        data: E::ActiveModel,
        options: UpdateOptions,
    ) -> Result<E::Model, RepoError> {
        let data = strip_protected::<E>(data);
        let mut active = current.clone().into_active_model();
        for column in E::Column::iter() {
            if let ActiveValue::Set(value) = data.get(column) {
                active.set(column, value);
            }
        }
        if !data.get(E::updated_at_column()).is_set() {
            active.set(E::updated_at_column(), Value::from(Utc::now()));
        }

        let updated = active.update(conn).await?;
        Ok(match options.returning {
            ReturnDocument::After => updated,
            ReturnDocument::Before => current,
        })
    }

    async fn mark_deleted<C: ConnectionTrait>(
        &self,
        conn: &C,
        current: E::Model,
    ) -> Result<E::Model, RepoError> {
        let mut active = current.into_active_model();
        active.set(E::deleted_column(), EntityState::Deleted.into());
        active.set(E::updated_at_column(), Value::from(Utc::now()));

        let deleted = active.update(conn).await?;
        tracing::info!(table = E::default().table_name(), "record soft deleted");
        Ok(deleted)
    }
}

/// Orders rows with equal sort keys by primary key so pages stay stable
/// across separate offset queries.
fn tie_break<E: EntityTrait>(select: Select<E>) -> Select<E> {
    E::PrimaryKey::iter().fold(select, |select, key| {
        select.order_by(key.into_column(), Order::Asc)
    })
}

/// New records always start out active; timestamps the caller left unset
/// are filled in.
fn stamp_new<E: SoftDelete>(mut data: E::ActiveModel) -> E::ActiveModel {
    let now = Utc::now();
    data.set(E::deleted_column(), EntityState::Active.into());
    if !data.get(E::created_at_column()).is_set() {
        data.set(E::created_at_column(), Value::from(now));
    }
    if !data.get(E::updated_at_column()).is_set() {
        data.set(E::updated_at_column(), Value::from(now));
    }
    data
}

/// Updates may not move the primary key or the deleted flag; the latter
/// only changes through the delete methods.
fn strip_protected<E: SoftDelete>(mut data: E::ActiveModel) -> E::ActiveModel {
    data.not_set(E::deleted_column());
    for key in E::PrimaryKey::iter() {
        data.not_set(key.into_column());
    }
    data
}
