//! 配置管理
//!
//! 配置按以下顺序叠加：内置默认值、`config.toml`、`config.{APP_ENV}.toml`、
//! `SCHOOL__*` 环境变量，以及少量常用的独立环境变量（如 `DATABASE_URL`）。

mod r#impl;
mod structs;

pub use r#impl::DEFAULT_JWT_SECRET;
pub use structs::*;
