mod cli;

use actix_web::{web, App, HttpServer};
use rescat::{CatalogConfig, ResourceCatalog};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = match CatalogConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    // Losing the table at startup is the one fatal failure
    let catalog = match ResourceCatalog::open(&config) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!(error = %e, "failed to open resource catalog");
            std::process::exit(1);
        }
    };

    let args: Vec<String> = std::env::args().collect();

    if args.len() == 1 {
        cli::run_repl(&catalog);
    } else if args[1] == "serve" {
        let data = web::Data::new(catalog);
        info!(addr = %config.bind_addr, "serving resource catalog");
        HttpServer::new(move || App::new().app_data(data.clone()).configure(rescat::server::config))
            .bind(&config.bind_addr)?
            .run()
            .await?;
    } else if !cli::run_single_command(&catalog, &args) {
        std::process::exit(1);
    }

    Ok(())
}
