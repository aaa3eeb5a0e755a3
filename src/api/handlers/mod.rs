//! Handlers 模块
//!
//! HTTP 请求处理程序。

pub mod student_handler;

pub use student_handler::*;
