pub mod base_repository;

pub use base_repository::{
    BulkOperation, BulkWriteResult, ListResult, Repository, ReturnDocument, UpdateOptions,
};

use crate::database::users;

pub type UserRepository = Repository<users::Entity>;
