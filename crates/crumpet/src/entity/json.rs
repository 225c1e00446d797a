use super::{Entity, Related};
use crate::stmt::Value;

use serde_json::{Map, Number, Value as Json};

impl Entity {
    /// Attributes followed by loaded relationships, as an ordered JSON
    /// object. A many-to-many pivot row appears under `pivot`.
    pub fn to_map(&self) -> Map<String, Json> {
        let mut map: Map<String, Json> = self
            .attributes
            .iter()
            .map(|(name, value)| (name.clone(), to_json(value)))
            .collect();

        for (name, related) in &self.relations {
            let value = match related {
                Related::One(Some(entity)) => Json::Object(entity.to_map()),
                Related::One(None) => Json::Null,
                Related::Many(entities) => {
                    Json::Array(entities.iter().map(|e| Json::Object(e.to_map())).collect())
                }
            };

            map.insert(name.clone(), value);
        }

        if let Some(pivot) = &self.pivot {
            map.insert("pivot".to_string(), Json::Object(pivot.to_map()));
        }

        map
    }
}

fn to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(v) => Json::Bool(*v),
        Value::I64(v) => Json::Number((*v).into()),
        // Non-finite floats have no JSON form
        Value::F64(v) => Number::from_f64(*v).map_or(Json::Null, Json::Number),
        Value::String(v) => Json::String(v.clone()),
        Value::Bytes(v) => Json::Array(v.iter().map(|b| Json::Number((*b).into())).collect()),
        Value::Timestamp(v) => Json::String(v.format("%Y-%m-%d %H:%M:%S").to_string()),
    }
}
