use actix_cors::Cors;
use actix_web::middleware::{Condition, Logger};
use actix_web::{web, App, HttpServer};
use log::info;

use car_price_api::config::AppConfig;
use car_price_api::{handlers, predictor};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();

    // A missing or corrupt artifact must stop the process before it
    // binds a port.
    let model = predictor::load_model(&config.model_path)?;

    let bind_address = config.bind_address();
    info!("server running at http://{bind_address}");
    let cors_permissive = config.cors_permissive;

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(Logger::default())
            .wrap(Condition::new(cors_permissive, cors))
            .app_data(web::Data::from(model.clone()))
            .app_data(handlers::json_config())
            .configure(handlers::routes)
    })
    .bind(&bind_address)?
    .run()
    .await?;

    Ok(())
}
