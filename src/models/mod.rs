//! 数据模型模块
//!
//! 学生记录模式与实体映射。

pub mod mapper;
pub mod student;

pub use mapper::{AddressResponse, StoredStudent, StudentResponse, StudentSummary, to_summary, to_wire_form};
pub use student::{Address, AddressPatch, Field, Student, StudentPatch};
