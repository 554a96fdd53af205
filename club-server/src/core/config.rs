use chrono_tz::Tz;

use crate::auth::JwtConfig;
use crate::core::{Result, ServerError};

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | DATABASE_PATH | club.db | SQLite 数据库文件 |
/// | HTTP_PORT | 5000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 (development / staging / production) |
/// | CLUB_TIMEZONE | UTC | 计算日历日使用的 IANA 时区 |
/// | ATTENDANCE_TREND_DAYS | 15 | 仪表盘考勤趋势天数 |
/// | PERFORMANCE_WINDOW_DAYS | 30 | 分类平均分统计天数 |
/// | ACTIVE_MEMBER_STATUSES | Active,Core,Regular | 计为活跃的成员状态 |
/// | BOOTSTRAP_ADMIN_EMAIL | - | 初始管理员账号 (无用户时创建) |
/// | BOOTSTRAP_ADMIN_PASSWORD | - | 初始管理员密码 |
/// | JWT_* | 见 [`JwtConfig`] | 令牌签名 |
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub http_port: u16,
    pub environment: String,
    pub timezone: Tz,
    pub attendance_trend_days: u32,
    pub performance_window_days: u32,
    pub active_member_statuses: Vec<String>,
    pub bootstrap_admin: Option<BootstrapAdmin>,
    pub jwt: JwtConfig,
}

/// 初始管理员账号凭据
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 未设置的变量使用默认值，格式错误的数字同样回退默认值。
    /// 未知时区或不可用的 JWT 密钥返回错误。
    pub fn from_env() -> Result<Self> {
        let timezone_name = std::env::var("CLUB_TIMEZONE").unwrap_or_else(|_| "UTC".into());
        let timezone: Tz = timezone_name.parse().map_err(|_| {
            ServerError::Config(format!("CLUB_TIMEZONE '{timezone_name}' is not a valid IANA zone"))
        })?;

        let bootstrap_admin = match (
            std::env::var("BOOTSTRAP_ADMIN_EMAIL"),
            std::env::var("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                Some(BootstrapAdmin { email, password })
            }
            _ => None,
        };

        Ok(Self {
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "club.db".into()),
            http_port: env_parse("HTTP_PORT", 5000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            timezone,
            attendance_trend_days: env_parse("ATTENDANCE_TREND_DAYS", 15).max(1),
            performance_window_days: env_parse("PERFORMANCE_WINDOW_DAYS", 30).max(1),
            active_member_statuses: parse_status_list(
                &std::env::var("ACTIVE_MEMBER_STATUSES")
                    .unwrap_or_else(|_| "Active,Core,Regular".into()),
            ),
            bootstrap_admin,
            jwt: JwtConfig::from_env().map_err(|e| ServerError::Config(e.to_string()))?,
        })
    }

    /// 测试用配置: 内存默认值和固定 JWT 密钥
    pub fn for_tests() -> Self {
        Self {
            database_path: ":memory:".into(),
            http_port: 0,
            environment: "test".into(),
            timezone: chrono_tz::UTC,
            attendance_trend_days: 15,
            performance_window_days: 30,
            active_member_statuses: parse_status_list("Active,Core,Regular"),
            bootstrap_admin: None,
            jwt: JwtConfig::with_secret("test-secret-test-secret-test-secret-0123"),
        }
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_status_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
