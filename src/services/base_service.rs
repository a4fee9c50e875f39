use async_trait::async_trait;
use sea_orm::{ActiveModelBehavior, DatabaseConnection, IntoActiveModel, PrimaryKeyTrait};
use serde::{de::DeserializeOwned, Serialize};
use validator::Validate;

use crate::config::LIST_FILTER_MODE;
use crate::database::SoftDelete;
use crate::errors::AppError;
use crate::repositories::{ListResult, Repository, UpdateOptions};
use crate::utils::resource_query::{ResourceOptions, ResourceQuery};

/// How an entity is exposed as an HTTP resource: its request bodies, its
/// response view and the fields free-text search looks at.
pub trait ResourceMapping: SoftDelete {
    /// Singular display name, used in messages.
    const NAME: &'static str;

    type CreateDto: DeserializeOwned + Validate + Send + 'static;
    type UpdateDto: DeserializeOwned + Validate + Send + 'static;
    type View: Serialize + Send + 'static;

    fn search_fields() -> Vec<String>;

    fn from_create(dto: Self::CreateDto) -> Result<Self::ActiveModel, AppError>;

    fn from_update(dto: Self::UpdateDto) -> Result<Self::ActiveModel, AppError>;

    fn view(model: &Self::Model) -> Self::View;
}

/// What the generic controller needs from a service.
#[async_trait]
pub trait ResourceService: Send + Sync + 'static {
    const NAME: &'static str;

    type Create: DeserializeOwned + Validate + Send + 'static;
    type Update: DeserializeOwned + Validate + Send + 'static;
    type View: Serialize + Send + 'static;

    async fn create(&self, payload: Self::Create) -> Result<Self::View, AppError>;

    async fn list(&self, query: ResourceQuery) -> Result<ListResult<Self::View>, AppError>;

    async fn get(&self, id: String) -> Result<Option<Self::View>, AppError>;

    async fn update(
        &self,
        id: String,
        payload: Self::Update,
    ) -> Result<Option<Self::View>, AppError>;

    async fn delete(&self, id: String) -> Result<Option<Self::View>, AppError>;
}

/// Pass-through service over a [`Repository`], bound to the pooled
/// connection.
pub struct BaseService<E> {
    db: DatabaseConnection,
    repo: Repository<E>,
    options: ResourceOptions,
}

impl<E> BaseService<E>
where
    E: ResourceMapping,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync,
    E::ActiveModel: ActiveModelBehavior + Send + Sync,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<String>,
{
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_repository(db, Repository::new(*LIST_FILTER_MODE))
    }

    pub fn with_repository(db: DatabaseConnection, repo: Repository<E>) -> Self {
        Self {
            db,
            repo,
            options: ResourceOptions::with_search_fields(E::search_fields()),
        }
    }

    pub fn repository(&self) -> &Repository<E> {
        &self.repo
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn create_model(&self, data: E::ActiveModel) -> Result<E::Model, AppError> {
        Ok(self.repo.create(&self.db, data).await?)
    }

    pub async fn list_models(
        &self,
        query: &ResourceQuery,
    ) -> Result<ListResult<E::Model>, AppError> {
        Ok(self.repo.list(&self.db, query, &self.options).await?)
    }

    pub async fn get_model(&self, id: String) -> Result<Option<E::Model>, AppError> {
        Ok(self.repo.find_by_id(&self.db, id).await?)
    }

    pub async fn update_model(
        &self,
        id: String,
        data: E::ActiveModel,
    ) -> Result<Option<E::Model>, AppError> {
        Ok(self
            .repo
            .update(&self.db, id, data, UpdateOptions::default())
            .await?)
    }

    pub async fn delete_model(&self, id: String) -> Result<Option<E::Model>, AppError> {
        Ok(self.repo.delete(&self.db, id).await?)
    }
}

#[async_trait]
impl<E> ResourceService for BaseService<E>
where
    E: ResourceMapping,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync,
    E::ActiveModel: ActiveModelBehavior + Send + Sync,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<String>,
{
    const NAME: &'static str = E::NAME;

    type Create = E::CreateDto;
    type Update = E::UpdateDto;
    type View = E::View;

    async fn create(&self, payload: Self::Create) -> Result<Self::View, AppError> {
        let model = self.create_model(E::from_create(payload)?).await?;
        tracing::info!(resource = E::NAME, "record created");
        Ok(E::view(&model))
    }

    async fn list(&self, query: ResourceQuery) -> Result<ListResult<Self::View>, AppError> {
        let listed = self.list_models(&query).await?;
        Ok(listed.map(|model| E::view(&model)))
    }

    async fn get(&self, id: String) -> Result<Option<Self::View>, AppError> {
        Ok(self.get_model(id).await?.as_ref().map(E::view))
    }

    async fn update(
        &self,
        id: String,
        payload: Self::Update,
    ) -> Result<Option<Self::View>, AppError> {
        let data = E::from_update(payload)?;
        Ok(self.update_model(id, data).await?.as_ref().map(E::view))
    }

    async fn delete(&self, id: String) -> Result<Option<Self::View>, AppError> {
        Ok(self.delete_model(id).await?.as_ref().map(E::view))
    }
}
