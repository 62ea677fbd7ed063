use std::net::TcpListener;

use actix_web::web::Data;
use env_logger::Env;
use quarry::{
    configuration::get_configuration,
    services::{niche_search_handler, NicheJobSender, OpenaiClient, RunStore, SearchJob, TrendsClient},
    startup::run,
};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().expect("Failed to read configuration.");

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(address)?;

    let openai_client = OpenaiClient::new(configuration.api_keys.openai.clone());
    let trends_client = TrendsClient::new(configuration.trends.clone());
    let run_store = Data::new(RunStore::default());

    let (niche_job_sender, niche_job_receiver) = mpsc::unbounded_channel::<SearchJob>();
    let niche_job_sender = NicheJobSender {
        sender: niche_job_sender,
    };

    // Spawn the background pipeline worker
    let store_clone = run_store.clone();
    let webdriver_settings = configuration.webdriver.clone();
    let marketplace_settings = configuration.marketplace.clone();
    tokio::spawn(async move {
        niche_search_handler(
            niche_job_receiver,
            store_clone,
            webdriver_settings,
            marketplace_settings,
        )
        .await
    });

    run(
        listener,
        run_store,
        openai_client,
        trends_client,
        niche_job_sender,
    )?
    .await
}
