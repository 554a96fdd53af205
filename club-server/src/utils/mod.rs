//! 工具模块: 日志、时间转换和输入校验

pub mod logger;
pub mod time;
pub mod validation;
