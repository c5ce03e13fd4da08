//! SeaORM implementation of UserRepository and AuthenticationRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::{
    AuthenticationRepository, DomainError, NewUser, User, UserCredential, UserRepository,
};
use crate::models::authentication::{self, Entity as AuthenticationEntity};
use crate::models::user::{ActiveModel, Column, Entity as UserEntity, Model};
use crate::utils::ids::prefixed_id;

impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            fullname: model.fullname,
        }
    }
}

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, user: NewUser) -> Result<String, DomainError> {
        let id = prefixed_id("user", 15);

        let new_user = ActiveModel {
            id: Set(id.clone()),
            username: Set(user.username),
            password: Set(user.password_hash),
            fullname: Set(user.fullname),
        };

        new_user.insert(&self.db).await?;
        Ok(id)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, DomainError> {
        let user = UserEntity::find_by_id(id).one(&self.db).await?;
        Ok(user.map(User::from))
    }

    async fn search(&self, username: &str) -> Result<Vec<User>, DomainError> {
        let users = UserEntity::find()
            .filter(Column::Username.contains(username))
            .order_by_asc(Column::Username)
            .all(&self.db)
            .await?;

        Ok(users.into_iter().map(User::from).collect())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, DomainError> {
        let count = UserEntity::find()
            .filter(Column::Username.eq(username))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn find_credential(
        &self,
        username: &str,
    ) -> Result<Option<UserCredential>, DomainError> {
        let user = UserEntity::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await?;

        Ok(user.map(|u| UserCredential {
            id: u.id,
            password_hash: u.password,
        }))
    }
}

pub struct SeaOrmAuthenticationRepository {
    db: DatabaseConnection,
}

impl SeaOrmAuthenticationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuthenticationRepository for SeaOrmAuthenticationRepository {
    async fn add_refresh_token(&self, token: &str) -> Result<(), DomainError> {
        authentication::ActiveModel {
            token: Set(token.to_string()),
        }
        .insert(&self.db)
        .await?;
        Ok(())
    }

    async fn refresh_token_exists(&self, token: &str) -> Result<bool, DomainError> {
        let found = AuthenticationEntity::find_by_id(token).one(&self.db).await?;
        Ok(found.is_some())
    }

    async fn delete_refresh_token(&self, token: &str) -> Result<(), DomainError> {
        AuthenticationEntity::delete_by_id(token)
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
