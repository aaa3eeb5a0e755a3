//! Rollcall - 学生档案服务
//!
//! 基于文档数据库的学生记录 CRUD API：创建、按条件列表、按 ID 查询、
//! 部分更新和删除。

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;
