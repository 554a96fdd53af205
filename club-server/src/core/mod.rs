//! 核心模块 - 配置、状态和服务器生命周期
//!
//! - [`Config`] - 服务器配置
//! - [`ServerState`] - 传给每个处理器的共享状态
//! - [`Server`] - HTTP 服务器
//! - [`ServerError`] - 启动错误

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::{BootstrapAdmin, Config};
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::ServerState;
