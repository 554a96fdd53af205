//! Club Server - 社团成员、考勤与表现管理服务
//!
//! # 模块结构
//!
//! ```text
//! club-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、提取器、中间件、访问策略、密码
//! ├── db/            # SQLite 连接池、迁移、仓储
//! ├── stats/         # 考勤与表现统计
//! ├── services/      # 按身份鉴权的业务操作
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志、时间、输入校验
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod stats;
pub mod utils;

// 重新导出公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use shared::error::{AppError, AppResult, ErrorCode};

pub use utils::logger::init_logger;

// 安全日志宏
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
   ________      __
  / ____/ /_  __/ /_
 / /   / / / / / __ \
/ /___/ / /_/ / /_/ /
\____/_/\__,_/_.___/
    "#
    );
}
