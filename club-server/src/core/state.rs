use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::services;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 克隆开销很小 (连接池和 JWT 服务都是引用计数)。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 不可变配置 |
/// | pool | SQLite 连接池 |
/// | jwt_service | 令牌签发与验证 |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// 打开数据库，执行迁移并创建初始管理员
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::new(&config.database_path).await?;
        let state = Self::with_pool(config.clone(), db.pool);

        if let Some(admin) = &config.bootstrap_admin {
            services::auth::bootstrap_admin(&state.pool, admin).await?;
        }

        Ok(state)
    }

    /// 基于已有连接池构建状态 (测试使用内存数据库)
    pub fn with_pool(config: Config, pool: SqlitePool) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        Self {
            config,
            pool,
            jwt_service,
        }
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }
}
