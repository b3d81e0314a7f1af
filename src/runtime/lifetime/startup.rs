use crate::cache::{ObjectCache, create_object_cache};
use crate::config::AppConfig;
use crate::errors::{Result, SchoolError};
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 生产环境禁止使用内置的 JWT 密钥
fn check_jwt_secret(config: &AppConfig) -> Result<()> {
    if !config.uses_default_jwt_secret() {
        return Ok(());
    }
    if config.is_production() {
        error!("JWT_SECRET is not set; refusing to start in production");
        return Err(SchoolError::validation(
            "JWT secret must be configured in production",
        ));
    }
    warn!("Using the built-in development JWT secret; set JWT_SECRET before deploying");
    Ok(())
}

/// 准备服务器启动的上下文：存储（含迁移）与对象缓存
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let config = AppConfig::get();
    check_jwt_secret(config)?;

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    let cache = create_object_cache();
    info!(
        "Moka cache initialized (capacity {}, ttl {}s)",
        config.cache.memory.max_capacity, config.cache.default_ttl
    );

    Ok(StartupContext { storage, cache })
}
