use serde::Serialize;
use serde_json::Value;

/// Present values are carried through as-is; only absent or `null` keys get defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub api_info: ApiInfo,
    pub openapi_version: Option<Value>,
    pub endpoints: Vec<Endpoint>,
    pub schemas: Value,
    pub security: Value,
    pub servers: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApiInfo {
    pub title: Option<Value>,
    pub version: Option<Value>,
    pub description: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Endpoint {
    pub path: String,
    pub method: String,
    pub summary: Option<Value>,
    #[serde(rename = "operationId")]
    pub operation_id: Option<Value>,
    pub parameters: Value,
    pub responses: Value,
}

impl AnalysisResult {
    /// Sections in print order, each paired with its JSON form.
    pub fn sections(&self) -> Result<Vec<(&'static str, Value)>, serde_json::Error> {
        Ok(vec![
            ("api_info", serde_json::to_value(&self.api_info)?),
            ("openapi_version", serde_json::to_value(&self.openapi_version)?),
            ("endpoints", serde_json::to_value(&self.endpoints)?),
            ("schemas", self.schemas.clone()),
            ("security", self.security.clone()),
            ("servers", self.servers.clone()),
        ])
    }
}
