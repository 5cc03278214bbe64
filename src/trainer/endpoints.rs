use log::info;
use rocket::{State, serde::json::Json};
use serde_json::{Map, Value};

use crate::{
    json::{ApiError, JsonReply, JsonResult},
    pokemon::lookup::PokemonLookup,
    trainer::TrainerService,
};

/// The lookup client as managed by rocket
pub type Lookup = Box<dyn PokemonLookup>;

/// Any non-object body is rejected before it gets near the store
fn into_object(body: Value) -> Result<Map<String, Value>, ApiError> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::Validation(
            "Request body must be a JSON object".to_string(),
        )),
    }
}

/// A request body that has to carry a non-empty `name` string
#[derive(Debug)]
pub struct NamedBody {
    name: String,
    document: Map<String, Value>,
}

impl NamedBody {
    /// Checks the body, failing if it is not an object or its `name`
    /// is missing, empty or not a string
    pub fn validate(body: Value) -> Result<Self, ApiError> {
        let document = into_object(body)?;
        match document.get("name") {
            Some(Value::String(name)) if !name.is_empty() => Ok(NamedBody {
                name: name.clone(),
                document,
            }),
            _ => Err(ApiError::Validation(
                "Request body needs a non-empty 'name'".to_string(),
            )),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The body as it was sent
    pub fn into_document(self) -> Map<String, Value> {
        self.document
    }
}

/// Endpoint for getting the names of all trainers
#[get("/trainers")]
pub async fn get_trainers(service: &State<TrainerService>) -> JsonResult {
    info!("Request to /api/trainers");
    let names = service.list_trainer_names().await?;
    Ok(JsonReply::data_owned(names))
}

/// Endpoint for creating a new trainer
#[post("/trainer", data = "<body>")]
pub async fn create_trainer(service: &State<TrainerService>, body: Json<Value>) -> JsonResult {
    info!("Request to /api/trainer");

    let body = NamedBody::validate(body.into_inner())?;
    let name = body.name().to_string();

    if service.trainer_exists(&name).await? {
        return Err(ApiError::Conflict(format!("Trainer '{}' already exists", name)));
    }

    let result = service.upsert_trainer(&name, body.into_document()).await?;
    Ok(JsonReply::with_code(result.status_code, result))
}

/// Endpoint for getting a single trainer
#[get("/trainer/<trainer_name>")]
pub async fn get_trainer(service: &State<TrainerService>, trainer_name: &str) -> JsonResult {
    info!("Request to /api/trainer/{}", trainer_name);
    let trainer = service.get_trainer(trainer_name).await?;
    Ok(JsonReply::data_owned(trainer))
}

/// Endpoint for replacing an existing trainer's document
#[post("/trainer/<trainer_name>", data = "<body>")]
pub async fn update_trainer(
    service: &State<TrainerService>,
    trainer_name: &str,
    body: Json<Value>,
) -> JsonResult {
    info!("Request to /api/trainer/{}", trainer_name);

    if !service.trainer_exists(trainer_name).await? {
        return Err(ApiError::NotFound(format!(
            "Trainer '{}' not found",
            trainer_name
        )));
    }

    let document = into_object(body.into_inner())?;
    let result = service.upsert_trainer(trainer_name, document).await?;
    Ok(JsonReply::with_code(result.status_code, result))
}

/// Endpoint for deleting a trainer
#[delete("/trainer/<trainer_name>")]
pub async fn delete_trainer(service: &State<TrainerService>, trainer_name: &str) -> JsonResult {
    info!("Request to /api/trainer/{}", trainer_name);
    let result = service.delete_trainer(trainer_name).await?;
    Ok(JsonReply::with_code(result.status_code, result))
}

/// Endpoint for adding a Pokemon to a trainer
#[post("/trainer/<trainer_name>/pokemon", data = "<body>")]
pub async fn add_pokemon(
    service: &State<TrainerService>,
    lookup: &State<Lookup>,
    trainer_name: &str,
    body: Json<Value>,
) -> JsonResult {
    info!("Request to /api/trainer/{}/pokemon", trainer_name);

    let body = NamedBody::validate(body.into_inner())?;
    let pokemon_name = body.name();

    let mut trainer = service.get_trainer(trainer_name).await?;
    let definition = lookup.find_pokemon(pokemon_name).await?;
    let id = trainer.catch(definition)?;
    info!("Trainer '{}' caught '{}' as #{}", trainer_name, pokemon_name, id);

    let result = service.save_trainer(trainer_name, trainer).await?;
    Ok(JsonReply::with_code(result.status_code, result))
}

/// Endpoint for removing a Pokemon from a trainer
#[delete("/trainer/<trainer_name>/pokemon/<pokemon_id>")]
pub async fn remove_pokemon(
    service: &State<TrainerService>,
    trainer_name: &str,
    pokemon_id: &str,
) -> JsonResult {
    info!("Request to /api/trainer/{}/pokemon/{}", trainer_name, pokemon_id);

    let mut trainer = service.get_trainer(trainer_name).await?;
    if !trainer.release(pokemon_id)? {
        info!("Trainer '{}' has no Pokemon #{}", trainer_name, pokemon_id);
    }

    let result = service.save_trainer(trainer_name, trainer).await?;
    Ok(JsonReply::with_code(result.status_code, result))
}
