use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, NewUser, ResultEngine, User, UserUpdate,
    password::{hash_password, verify_password},
    users,
    util::{normalize_email, normalize_optional_text, normalize_user_name, validate_password},
};

use super::{Engine, with_tx};

impl Engine {
    /// Register a new user. The email is the login key and must be unique.
    pub async fn register_user(&self, cmd: NewUser) -> ResultEngine<User> {
        let name = normalize_user_name(&cmd.name)?;
        let email = normalize_email(&cmd.email)?;
        validate_password(&cmd.password)?;
        let password_hash = hash_password(&cmd.password)?;
        let avatar = normalize_optional_text(cmd.avatar.as_deref());

        with_tx!(self, |db_tx| {
            let exists = users::Entity::find()
                .filter(users::Column::Email.eq(email.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(email));
            }

            let now = Utc::now();
            let model = users::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                name: ActiveValue::Set(name),
                email: ActiveValue::Set(email),
                password_hash: ActiveValue::Set(password_hash),
                avatar: ActiveValue::Set(avatar),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(user_id = %model.id, "user registered");
            Ok(User::from(model))
        })
    }

    /// Resolve email and password into a user.
    ///
    /// Unknown emails and wrong passwords fail the same way.
    pub async fn authenticate(&self, email: &str, password: &str) -> ResultEngine<User> {
        let Ok(email) = normalize_email(email) else {
            return Err(EngineError::InvalidCredentials);
        };
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.database)
            .await?
            .ok_or(EngineError::InvalidCredentials)?;
        if !verify_password(password, &model.password_hash)? {
            return Err(EngineError::InvalidCredentials);
        }
        Ok(model.into())
    }

    pub async fn user_info(&self, user_id: Uuid) -> ResultEngine<User> {
        self.require_user(&self.database, user_id)
            .await
            .map(Into::into)
    }

    /// Every registered user except `user_id`, sorted by name.
    pub async fn list_users(&self, user_id: Uuid) -> ResultEngine<Vec<User>> {
        let models = users::Entity::find()
            .filter(users::Column::Id.ne(user_id))
            .order_by_asc(users::Column::Name)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(User::from).collect())
    }

    pub async fn update_user(&self, user_id: Uuid, update: UserUpdate) -> ResultEngine<User> {
        if update.is_empty() {
            return Err(EngineError::InvalidInput(
                "at least one field is required".to_string(),
            ));
        }
        let name = update.name.as_deref().map(normalize_user_name).transpose()?;
        let email = update.email.as_deref().map(normalize_email).transpose()?;
        let password_hash = match update.password.as_deref() {
            Some(password) => {
                validate_password(password)?;
                Some(hash_password(password)?)
            }
            None => None,
        };

        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, user_id).await?;

            if let Some(email) = &email
                && *email != model.email
            {
                let taken = users::Entity::find()
                    .filter(users::Column::Email.eq(email.clone()))
                    .filter(users::Column::Id.ne(user_id))
                    .one(&db_tx)
                    .await?
                    .is_some();
                if taken {
                    return Err(EngineError::ExistingKey(email.clone()));
                }
            }

            let mut active: users::ActiveModel = model.into();
            if let Some(name) = name {
                active.name = ActiveValue::Set(name);
            }
            if let Some(email) = email {
                active.email = ActiveValue::Set(email);
            }
            if let Some(hash) = password_hash {
                active.password_hash = ActiveValue::Set(hash);
            }
            active.updated_at = ActiveValue::Set(Utc::now());
            let model = active.update(&db_tx).await?;
            Ok(User::from(model))
        })
    }

    /// Store the URL of an already uploaded avatar image.
    pub async fn update_avatar(&self, user_id: Uuid, avatar_url: &str) -> ResultEngine<User> {
        let Some(avatar_url) = normalize_optional_text(Some(avatar_url)) else {
            return Err(EngineError::InvalidInput(
                "avatar url must not be empty".to_string(),
            ));
        };

        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, user_id).await?;
            let mut active: users::ActiveModel = model.into();
            active.avatar = ActiveValue::Set(Some(avatar_url));
            active.updated_at = ActiveValue::Set(Utc::now());
            let model = active.update(&db_tx).await?;
            Ok(User::from(model))
        })
    }
}
