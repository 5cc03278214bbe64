use std::str::FromStr;

mod config;
mod json;
mod pokemon;
mod storage;
mod trainer;

#[cfg(test)]
mod tests;

use crate::{
    config::Config,
    pokemon::lookup::{PokeApiClient, PokemonLookup},
    storage::StoreGateway,
    trainer::{TrainerService, endpoints},
};
use log::{error, info};
use rocket::{Build, Rocket};
use rocket_cors::{AllowedMethods, AllowedOrigins, CorsOptions};

#[macro_use]
extern crate rocket;

fn make_cors(origin: &str) -> CorsOptions {
    let allowed_methods: AllowedMethods = ["Get", "Post", "Delete"]
        .iter()
        .filter_map(|s| FromStr::from_str(s).ok())
        .collect();

    CorsOptions::default()
        .allowed_origins(AllowedOrigins::some_exact(&[origin]))
        .allowed_methods(allowed_methods)
        .allow_credentials(true)
}

/// Assembles the rocket instance around an already built store and lookup client
fn build_rocket(
    cfg: &Config,
    store: StoreGateway,
    lookup: Box<dyn PokemonLookup>,
) -> anyhow::Result<Rocket<Build>> {
    let cors = make_cors(&cfg.server.frontend_origin)
        .to_cors()
        .map_err(|e| anyhow::anyhow!("Error creating CORS fairing: {}", e))?;
    let figment = rocket::Config::figment().merge(("port", cfg.server.port));

    Ok(rocket::custom(figment)
        .attach(cors)
        .manage(TrainerService::new(store))
        .manage(lookup)
        .mount(
            "/api",
            routes![
                endpoints::get_trainers,
                endpoints::create_trainer,
                endpoints::get_trainer,
                endpoints::update_trainer,
                endpoints::delete_trainer,
                endpoints::add_pokemon,
                endpoints::remove_pokemon,
            ],
        )
        .register("/", json::catchers()))
}

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = Config::load(config::CONFIG_PATH)?;
    info!(
        "Starting on port {}, allowing origin {}",
        cfg.server.port, cfg.server.frontend_origin
    );

    let store = StoreGateway::from_config(&cfg.storage)?;
    let lookup: Box<dyn PokemonLookup> = Box::new(PokeApiClient::new(&cfg.pokeapi)?);

    if let Err(e) = build_rocket(&cfg, store, lookup)?.launch().await {
        error!("Server stopped: {}", e);
        return Err(anyhow::anyhow!("{}", e));
    }

    Ok(())
}
