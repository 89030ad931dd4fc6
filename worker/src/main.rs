use anyhow::Result;
use crates::domain::repositories::{
    egress::EgressApi, realtime::RealtimeSessionApi, recordings::RecordingRepository,
    rooms::RoomApi, storage::RecordingStorageClientFactory,
};
use crates::infra::{
    db::{postgres::postgres_connection, repositories::recordings::RecordingPostgres},
    livekit::{egress_client::LiveKitEgressClient, room_client::RoomServiceClient},
    realtime::openai_realtime::OpenAiRealtimeClient,
    storages::b2::B2ClientFactory,
};
use std::{sync::Arc, time::Duration};
use tracing::{error, info};
use worker::{
    agent::entry::InterviewAgent,
    axum_http, config,
    egress_listener::{self, registry::DirectUploadRegistry},
};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(error) = run().await {
        error!("Worker exited with error: {}", error);
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    crates::observability::init_observability("worker")?;

    let dotenvy_env = Arc::new(config::config_loader::load()?);
    info!("ENV has been loaded");

    let postgres_pool = postgres_connection::establish_connection(&dotenvy_env.database.url)?;
    info!("Postgres connection has been established");

    let db_pool_arc = Arc::new(postgres_pool);

    let repository: Arc<dyn RecordingRepository + Send + Sync> =
        Arc::new(RecordingPostgres::new(Arc::clone(&db_pool_arc)));

    let egress_api: Arc<dyn EgressApi + Send + Sync> =
        Arc::new(LiveKitEgressClient::new(dotenvy_env.livekit.clone()));
    let room_api: Arc<dyn RoomApi + Send + Sync> =
        Arc::new(RoomServiceClient::new(dotenvy_env.livekit.clone()));
    let realtime_api: Arc<dyn RealtimeSessionApi + Send + Sync> =
        Arc::new(OpenAiRealtimeClient::new(dotenvy_env.realtime.clone()));

    let registry = DirectUploadRegistry::new();

    // The reconciliation loop only matters for the direct-upload provider;
    // with vendor uploads there is nothing to pick up.
    let direct_upload_enabled = dotenvy_env
        .storage
        .as_ref()
        .is_some_and(|settings| settings.provider.uses_direct_upload());

    let listener_loop = if direct_upload_enabled {
        let storage_factory: Arc<dyn RecordingStorageClientFactory + Send + Sync> =
            Arc::new(B2ClientFactory);
        let poll_interval = Duration::from_secs(dotenvy_env.listener.poll_interval_secs);
        info!("Egress listener enabled for direct-to-bucket uploads");
        tokio::spawn(egress_listener::worker::run(
            Arc::clone(&egress_api),
            Arc::clone(&repository),
            storage_factory,
            registry.clone(),
            poll_interval,
        ))
    } else {
        info!("Egress listener disabled: storage provider uploads directly");
        tokio::spawn(async {
            std::future::pending::<()>().await;
            anyhow::Ok(())
        })
    };

    let agent = InterviewAgent::new(
        room_api,
        egress_api,
        repository,
        realtime_api,
        registry,
        dotenvy_env.storage.clone(),
        dotenvy_env.agent.participant_wait_attempts,
        Duration::from_secs(dotenvy_env.agent.participant_wait_interval_secs),
    );
    let agent_room = dotenvy_env.agent.room_name.clone();
    let agent_task = tokio::spawn(async move {
        if let Err(error) = agent.run(&agent_room).await {
            error!("An error occurred in the agent logic: {:?}", error);
        }
        // The voice session runs on the vendor side; keep the process alive
        // so the listener can settle the recording.
        std::future::pending::<()>().await;
        anyhow::Ok(())
    });

    let server_config = Arc::clone(&dotenvy_env);
    let health_server = tokio::spawn(async move { axum_http::http_serve::start(server_config).await });

    tokio::select! {
        result = listener_loop => result??,
        result = agent_task => result??,
        result = health_server => result??,
    };
    Ok(())
}
