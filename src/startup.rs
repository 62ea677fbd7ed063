use std::net::TcpListener;

use actix_web::{
    dev::Server,
    middleware::Logger,
    web::{self, Data},
    App, HttpServer,
};

use crate::{
    routes::{default_route, niche_route, title_route, trends_route},
    services::{NicheJobSender, OpenaiClient, RunStore, TrendsClient},
};

pub fn run(
    listener: TcpListener,
    run_store: Data<RunStore>,
    openai_client: OpenaiClient,
    trends_client: TrendsClient,
    niche_job_sender: NicheJobSender,
) -> Result<Server, std::io::Error> {
    let openai_client = web::Data::new(openai_client);
    let trends_client = web::Data::new(trends_client);
    let niche_job_sender = web::Data::new(niche_job_sender);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .service(default_route::default)
            .service(
                web::scope("/niche")
                    .service(niche_route::start_search)
                    .service(niche_route::run_status)
                    .service(niche_route::run_csv),
            )
            .service(web::scope("/trends").service(trends_route::trends))
            .service(web::scope("/titles").service(title_route::titles))
            .app_data(run_store.clone())
            .app_data(openai_client.clone())
            .app_data(trends_client.clone())
            .app_data(niche_job_sender.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
