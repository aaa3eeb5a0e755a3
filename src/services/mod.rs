//! 服务模块

pub mod student;

pub use student::{StudentFilter, StudentService, StudentServiceImpl, create_student_service};
