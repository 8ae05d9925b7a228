use garde::Validate;
use sqlx::PgPool;
use uuid::Uuid;

use waybill_api::message::MessageCode;
use waybill_data::{Criteria, DataError, PageRequest, Paginated, Repository};
use waybill_http::ApiError;

use crate::model::{Country, CountryRepository, CreateCountry, UpdateCountry};

/// Business rules for the countries resource, on top of the generic
/// repository.
#[derive(Clone)]
pub struct CountryService {
    repo: CountryRepository,
}

impl CountryService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: CountryRepository::new(pool),
        }
    }

    /// Create a country. Country codes are unique; the conflict check and
    /// the insert run atomically, with the database constraint as the
    /// final arbiter.
    pub async fn create(&self, input: CreateCountry) -> Result<Country, ApiError> {
        input
            .validate()
            .map_err(|report| ApiError::from_validation(&report))?;

        let conflict = Criteria::new().with("code", input.code.clone());
        match self.repo.save_guarded(&input, &conflict).await {
            Ok(country) => Ok(country),
            Err(DataError::UniqueViolation { field, .. }) => Err(duplicate(field.as_deref())),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn list(&self, page: &PageRequest) -> Result<Paginated<Country>, ApiError> {
        Ok(self.repo.find_all(page).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Country, ApiError> {
        self.repo
            .find_by_id(&id)
            .await?
            .ok_or_else(not_found)
    }

    pub async fn get_by_code(&self, code: &str) -> Result<Country, ApiError> {
        self.repo
            .find_one(&Criteria::new().with("code", code))
            .await?
            .ok_or_else(not_found)
    }

    pub async fn update(&self, id: Uuid, input: UpdateCountry) -> Result<Country, ApiError> {
        input
            .validate()
            .map_err(|report| ApiError::from_validation(&report))?;

        let result = match &input.code {
            // Changing the code needs the same uniqueness guard as create.
            Some(code) => {
                let conflict = Criteria::new().with("code", code.clone());
                self.repo.update_guarded(&id, &input, &conflict).await
            }
            None => self.repo.update(&id, &input).await,
        };
        match result {
            Ok(Some(country)) => Ok(country),
            Ok(None) => Err(not_found()),
            Err(DataError::UniqueViolation { field, .. }) => Err(duplicate(field.as_deref())),
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
    ApiError::from_code(MessageCode::NotFound, &[("resource", "Country")])
}

fn duplicate(field: Option<&str>) -> ApiError {
    ApiError::from_code(
        MessageCode::DuplicateEntry,
        &[("resource", "Country"), ("field", field.unwrap_or("code"))],
    )
}
