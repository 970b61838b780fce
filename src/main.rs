use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod state;

use state::AppState;
use zitu_backend::config;
use zitu_backend::mapping;
use zitu_backend::storage::{KvStore, MemoryKvStore, SqliteKvStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zitu_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "zitu-backend {} (built {})",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_TIME")
    );

    // Load configuration / 加载配置
    config::init_config().expect("Failed to load configuration");
    let app_config = config::config();
    tracing::info!(
        "Server will listen on {}:{}",
        app_config.server.host,
        app_config.server.port
    );

    // Create data directory if not exists / 创建数据目录
    let data_dir = app_config.get_data_dir();
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
        tracing::info!("Created data directory: {:?}", data_dir);
    }

    // Pick the key-value backend / 选择键值存储后端
    let store: Arc<dyn KvStore> = match app_config.storage.backend.as_str() {
        "memory" => {
            tracing::info!("Using in-memory key-value store");
            Arc::new(MemoryKvStore::new())
        }
        backend => {
            if backend != "sqlite" {
                tracing::warn!("Unknown storage backend {:?}, using sqlite", backend);
            }
            let database_url = std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| app_config.get_database_url());
            Arc::new(SqliteKvStore::connect(&database_url).await?)
        }
    };

    // Seed the character mapping from file, if configured / 按配置导入字符映射
    if let Some(seed_file) = &app_config.mapping.seed_file {
        match mapping::import_mapping_file(store.as_ref(), seed_file).await {
            Ok(count) => {
                tracing::info!("Imported {} character mappings from {}", count, seed_file)
            }
            Err(e) => {
                // The server still starts; lookups degrade to "not collected"
                // 导入失败不阻止启动，查询降级为未采集
                tracing::error!("Failed to import character mapping from {}: {}", seed_file, e)
            }
        }
    }

    let asset_domain = std::env::var("R2_PUBLIC_DOMAIN")
        .unwrap_or_else(|_| app_config.assets.public_domain.clone());
    tracing::info!("Serving character images from https://{}/chars/", asset_domain);

    let state = Arc::new(AppState::new(store, asset_domain));
    let app = api::router(state);

    let bind_addr = app_config.get_bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server running at http://{}", bind_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
