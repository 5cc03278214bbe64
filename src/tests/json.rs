use rocket::http::Status as HttpStatus;

use crate::{
    json::{ApiError, JsonReply, JsonStatus},
    pokemon::lookup::LookupError,
    storage::{DeleteResult, StoreError},
    trainer::TrainerError,
};

#[test]
fn test_error_body() {
    let status = JsonStatus::error("Something went wrong");
    let json = serde_json::to_string(&status).unwrap();
    assert!(json.contains("\"status\":{\"Error\":\"Something went wrong\"}"));
    assert!(json.contains("\"data\":[]"));
}

#[test]
fn test_into_raw_json() {
    use rocket::response::content::RawJson;

    let raw_json: RawJson<String> = JsonStatus::error("raw json test").into();
    assert!(raw_json.0.contains("\"Error\":\"raw json test\""));
}

#[test]
fn test_api_error_status_codes() {
    assert_eq!(
        ApiError::Validation("no name".into()).http_status(),
        HttpStatus::BadRequest
    );
    assert_eq!(
        ApiError::Conflict("exists".into()).http_status(),
        HttpStatus::Conflict
    );
    assert_eq!(
        ApiError::NotFound("gone".into()).http_status(),
        HttpStatus::NotFound
    );
    assert_eq!(
        ApiError::from(LookupError::Unknown("missingno".into())).http_status(),
        HttpStatus::InternalServerError
    );
    assert_eq!(
        ApiError::Internal("bad document".into()).http_status(),
        HttpStatus::InternalServerError
    );
}

#[test]
fn test_store_not_found_becomes_404() {
    let error = ApiError::from(StoreError::NotFound("ash.json".into()));
    assert!(matches!(error, ApiError::NotFound(_)));

    let error = ApiError::from(TrainerError::Store(StoreError::NotFound("ash.json".into())));
    assert_eq!(error.http_status(), HttpStatus::NotFound);
}

#[test]
fn test_other_store_errors_become_500() {
    let error = ApiError::from(StoreError::InvalidText("ash.json".into()));
    assert_eq!(error.http_status(), HttpStatus::InternalServerError);
}

#[test]
fn test_broken_document_becomes_500() {
    let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error = ApiError::from(TrainerError::Json {
        key: "ash.json".into(),
        source,
    });
    assert_eq!(error.http_status(), HttpStatus::InternalServerError);
    assert!(error.to_string().contains("ash.json"));
}

#[test]
fn test_reply_with_store_code() {
    let reply = JsonReply::with_code(204, DeleteResult { status_code: 204 });
    assert_eq!(reply.status(), HttpStatus::NoContent);
    assert_eq!(reply.to_json().unwrap(), "{\"status_code\":204}");

    let reply = JsonReply::with_code(42, DeleteResult { status_code: 42 });
    assert_eq!(reply.status(), HttpStatus::InternalServerError);
}

#[test]
fn test_reply_data_owned() {
    let reply = JsonReply::data_owned(vec!["ash", "misty"]);
    assert_eq!(reply.status(), HttpStatus::Ok);
    assert_eq!(reply.to_json().unwrap(), "[\"ash\",\"misty\"]");
}
