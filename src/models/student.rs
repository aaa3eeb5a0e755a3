//! 学生记录模式
//!
//! 定义完整的学生记录和部分更新（patch）载荷，并负责入站 JSON 的校验。

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::storage::document::{Document, set_path};

/// 文档字段路径
pub mod fields {
    pub const NAME: &str = "name";
    pub const AGE: &str = "age";
    pub const ADDRESS: &str = "address";
    pub const CITY: &str = "city";
    pub const COUNTRY: &str = "country";
    pub const ADDRESS_CITY: &str = "address.city";
    pub const ADDRESS_COUNTRY: &str = "address.country";
}

/// 可缺省字段：缺省表示“保持不变”，出现即表示“设置为该值”
///
/// 与 `Option` 不同，显式的 `null` 不会被当作缺省，而是按目标类型反序列化，
/// 对字符串、整数等非空类型会直接校验失败。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    Absent,
    Present(T),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Absent
    }
}

impl<T> Field<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Field::Absent => None,
            Field::Present(value) => Some(value),
        }
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Field::Present(value)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        T::deserialize(deserializer).map(Field::Present)
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Field::Absent => serializer.serialize_none(),
            Field::Present(value) => value.serialize(serializer),
        }
    }
}

/// 地址
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// 城市
    pub city: String,
    /// 国家
    pub country: String,
}

/// 学生记录，创建时所有字段必填
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// 姓名
    pub name: String,
    /// 年龄
    pub age: i64,
    /// 地址
    pub address: Address,
}

impl Student {
    /// 校验创建载荷
    pub fn from_json(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| AppError::Validation(format!("invalid student: {}", e)))
    }

    /// 转换为存储文档
    pub fn into_document(self) -> Document {
        let mut address = Document::new();
        address.insert(fields::CITY.into(), Value::String(self.address.city));
        address.insert(fields::COUNTRY.into(), Value::String(self.address.country));

        let mut doc = Document::new();
        doc.insert(fields::NAME.into(), Value::String(self.name));
        doc.insert(fields::AGE.into(), Value::from(self.age));
        doc.insert(fields::ADDRESS.into(), Value::Object(address));
        doc
    }
}

/// 地址部分更新
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressPatch {
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub city: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub country: Field<String>,
}

/// 学生部分更新
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentPatch {
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub name: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub age: Field<i64>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub address: Field<AddressPatch>,
}

impl StudentPatch {
    /// 校验更新载荷
    pub fn from_json(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| AppError::Validation(format!("invalid student patch: {}", e)))
    }

    /// 是否没有任何需要写入的字段
    pub fn is_empty(&self) -> bool {
        self.assignments().is_empty()
    }

    /// 展开为叶子字段赋值，路径为点分形式
    pub fn assignments(&self) -> Vec<(String, Value)> {
        let mut out = Vec::new();
        if let Some(name) = self.name.as_option() {
            out.push((fields::NAME.to_string(), Value::String(name.clone())));
        }
        if let Some(age) = self.age.as_option() {
            out.push((fields::AGE.to_string(), Value::from(*age)));
        }
        if let Some(address) = self.address.as_option() {
            if let Some(city) = address.city.as_option() {
                out.push((fields::ADDRESS_CITY.to_string(), Value::String(city.clone())));
            }
            if let Some(country) = address.country.as_option() {
                out.push((fields::ADDRESS_COUNTRY.to_string(), Value::String(country.clone())));
            }
        }
        out
    }

    /// 在内存中把更新合并进文档，未提交的字段（包括地址的兄弟字段）保持不变
    pub fn apply_to(&self, doc: &mut Document) {
        for (path, value) in self.assignments() {
            set_path(doc, &path, value);
        }
    }
}
