use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

#[derive(Clone, Debug, Deserialize)]
pub struct RawPlanNode {
    #[serde(deserialize_with = "scalar_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "scalar_id_list")]
    pub children: Vec<String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTopology {
    #[serde(deserialize_with = "scalar_id")]
    pub root_id: String,
    #[serde(default)]
    pub nodes: Vec<RawPlanNode>,
}

// Profiles from older engine versions emit numeric operator ids.
fn scalar_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn scalar_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_to_id(&value).ok_or_else(|| serde::de::Error::custom("node id must be a string or number"))
}

fn scalar_id_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    Ok(values.iter().filter_map(scalar_to_id).collect())
}

pub fn parse_topology(raw: &str) -> Result<RawTopology> {
    let parsed: Value = serde_json::from_str(raw).context("invalid profile JSON")?;
    if !parsed.is_object() {
        return Err(anyhow!("unexpected JSON type for profile topology"));
    }

    RawTopology::deserialize(parsed).context("invalid profile topology")
}
