use erased_serde::Serialize as EraSerialize;
use log::{error, info};
use rocket::http::Status as HttpStatus;
use rocket::response::Responder;
use rocket::response::content::RawJson;
use rocket::{Catcher, Request};
use serde::Serialize;
use thiserror::Error;

use crate::{
    pokemon::lookup::LookupError,
    storage::StoreError,
    trainer::TrainerError,
};

#[derive(Serialize)]
pub enum Status {
    Ok,
    Error(String),
}

/// Body sent with every error response
#[derive(Serialize)]
pub struct JsonStatus {
    status: Status,
    data: Vec<String>,
}

impl JsonStatus {
    pub fn error<T: ToString>(message: T) -> Self {
        JsonStatus {
            status: Status::Error(message.to_string()),
            data: vec![],
        }
    }
}

impl From<JsonStatus> for RawJson<String> {
    fn from(status: JsonStatus) -> Self {
        // a status and a list of strings always serialize
        RawJson(serde_json::to_string(&status).unwrap_or_default())
    }
}

/// Everything a request can fail with
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Store(StoreError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn http_status(&self) -> HttpStatus {
        match self {
            ApiError::Validation(_) => HttpStatus::BadRequest,
            ApiError::Conflict(_) => HttpStatus::Conflict,
            ApiError::NotFound(_) => HttpStatus::NotFound,
            ApiError::Store(_) | ApiError::Lookup(_) | ApiError::Internal(_) => {
                HttpStatus::InternalServerError
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(key) => ApiError::NotFound(format!("'{}' not found", key)),
            other => ApiError::Store(other),
        }
    }
}

impl From<TrainerError> for ApiError {
    fn from(error: TrainerError) -> Self {
        match error {
            TrainerError::Store(e) => e.into(),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'o> {
        let status = self.http_status();
        if status.code >= 500 {
            error!("Error while running request: {}", self);
        } else {
            info!("Request rejected ({}): {}", status.code, self);
        }
        (status, RawJson::<String>::from(JsonStatus::error(self))).respond_to(request)
    }
}

/// A successful response: a status code and any serializable body
pub struct JsonReply {
    status: HttpStatus,
    data: Box<dyn EraSerialize + Send>,
}

pub type JsonResult = Result<JsonReply, ApiError>;

impl JsonReply {
    pub fn new(status: HttpStatus, data: impl EraSerialize + Send + 'static) -> Self {
        JsonReply {
            status,
            data: Box::new(data),
        }
    }

    /// 200 with `data` as body
    pub fn data_owned(data: impl EraSerialize + Send + 'static) -> Self {
        JsonReply::new(HttpStatus::Ok, data)
    }

    /// Uses a status code reported by the object store, 500 if it is not a valid one
    pub fn with_code(code: u16, data: impl EraSerialize + Send + 'static) -> Self {
        let status = HttpStatus::from_code(code).unwrap_or(HttpStatus::InternalServerError);
        JsonReply::new(status, data)
    }

    pub fn status(&self) -> HttpStatus {
        self.status
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.data)
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for JsonReply {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'o> {
        let body = self.to_json().map_err(|e| {
            error!("Could not serialize response: {}", e);
            HttpStatus::InternalServerError
        })?;
        (self.status, RawJson(body)).respond_to(request)
    }
}

/// Renders any status rocket produces by itself (bad JSON, unknown route) as a JSON error body
#[catch(default)]
fn default_catcher(status: HttpStatus, request: &Request<'_>) -> (HttpStatus, RawJson<String>) {
    info!("{} {} answered with {}", request.method(), request.uri(), status);
    let reason = status.reason().unwrap_or("Unknown error");
    (status, JsonStatus::error(reason).into())
}

pub fn catchers() -> Vec<Catcher> {
    catchers![default_catcher]
}
