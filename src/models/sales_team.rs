use super::lenient;
use super::DirectusRecord;
use serde::{Deserialize, Serialize};

/// 业务员 (salesman)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Salesman {
    #[serde(default, alias = "salesman_id", deserialize_with = "lenient::key")]
    pub id: Option<String>,
    #[serde(default, alias = "division", deserialize_with = "lenient::key")]
    pub division_id: Option<String>,
}

impl DirectusRecord for Salesman {
    const COLLECTION: &'static str = "salesman";
    const FIELDS: &'static [&'static str] = &["id", "division_id"];
}

/// 事业部 (division)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DivisionRecord {
    #[serde(default, alias = "id", deserialize_with = "lenient::key")]
    pub division_id: Option<String>,
    #[serde(default, alias = "name", deserialize_with = "lenient::text")]
    pub division_name: Option<String>,
}

impl DirectusRecord for DivisionRecord {
    const COLLECTION: &'static str = "division";
    const FIELDS: &'static [&'static str] = &["division_id", "division_name"];
}
