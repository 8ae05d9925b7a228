use garde::Validate;
use sqlx::PgPool;
use uuid::Uuid;

use waybill_api::message::MessageCode;
use waybill_data::{Criteria, DataError, PageRequest, Paginated, Repository};
use waybill_http::ApiError;

use crate::model::{CreateUser, UpdateUser, User, UserRepository};

#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: UserRepository::new(pool),
        }
    }

    /// Register a user. Duplicate e-mail is a business-rule failure raised
    /// here, before the write; the unique index on `usr_em` remains the
    /// final arbiter and surfaces as `DUPLICATE_ENTRY` if a concurrent
    /// insert slips past the check.
    pub async fn create(&self, input: CreateUser) -> Result<User, ApiError> {
        input
            .validate()
            .map_err(|report| ApiError::from_validation(&report))?;

        let taken = self
            .repo
            .exists(&Criteria::new().with("email", input.email.clone()))
            .await?;
        if taken {
            return Err(duplicate_email(&input.email));
        }
        Ok(self.repo.save(&input).await?)
    }

    pub async fn list(&self, page: &PageRequest) -> Result<Paginated<User>, ApiError> {
        Ok(self.repo.find_all(page).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<User, ApiError> {
        self.repo.find_by_id(&id).await?.ok_or_else(not_found)
    }

    pub async fn update(&self, id: Uuid, input: UpdateUser) -> Result<User, ApiError> {
        input
            .validate()
            .map_err(|report| ApiError::from_validation(&report))?;

        let result = match &input.email {
            Some(email) => {
                let conflict = Criteria::new().with("email", email.clone());
                match self.repo.update_guarded(&id, &input, &conflict).await {
                    Err(DataError::UniqueViolation { .. }) => {
                        return Err(duplicate_email(email));
                    }
                    other => other,
                }
            }
            None => self.repo.update(&id, &input).await,
        };
        match result {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(not_found()),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        if self.repo.delete(&id).await? {
            Ok(())
        } else {
            Err(not_found())
        }
    }
}

fn not_found() -> ApiError {
    ApiError::from_code(MessageCode::NotFound, &[("resource", "User")])
}

fn duplicate_email(email: &str) -> ApiError {
    ApiError::from_code(MessageCode::DuplicateEmail, &[("email", email)])
}
