use bcrypt::{hash, DEFAULT_COST};
use sea_orm::ActiveValue::{NotSet, Set};

use crate::database::users;
use crate::dtos::user_dto::{CreateUserDto, UpdateUserDto};
use crate::errors::AppError;
use crate::resources::user_resource::UserResource;
use crate::services::base_service::{BaseService, ResourceMapping};

pub type UserService = BaseService<users::Entity>;

impl ResourceMapping for users::Entity {
    const NAME: &'static str = "User";

    type CreateDto = CreateUserDto;
    type UpdateDto = UpdateUserDto;
    type View = UserResource;

    fn search_fields() -> Vec<String> {
        vec!["name".to_string(), "email".to_string()]
    }

    fn from_create(dto: CreateUserDto) -> Result<users::ActiveModel, AppError> {
        Ok(users::ActiveModel {
            name: Set(dto.name),
            email: Set(dto.email),
            password: Set(hash(dto.password, DEFAULT_COST)?),
            created_by: Set(dto.created_by.clone()),
            last_updated_by: Set(dto.created_by),
            ..Default::default()
        })
    }

    fn from_update(dto: UpdateUserDto) -> Result<users::ActiveModel, AppError> {
        let password = match dto.password {
            Some(password) => Set(hash(password, DEFAULT_COST)?),
            None => NotSet,
        };

        Ok(users::ActiveModel {
            name: dto.name.map_or(NotSet, Set),
            email: dto.email.map_or(NotSet, Set),
            password,
            last_updated_by: dto.last_updated_by.map_or(NotSet, |id| Set(Some(id))),
            ..Default::default()
        })
    }

    fn view(model: &users::Model) -> UserResource {
        UserResource::from(model)
    }
}
