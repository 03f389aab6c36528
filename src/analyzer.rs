use serde_json::{json, Value};

use crate::models::{AnalysisResult, ApiInfo, Endpoint};

/// Read-only projection of a parsed OpenAPI document into an [`AnalysisResult`].
///
/// Values found in the document are copied unchanged, whatever their JSON type.
/// Absent or `null` keys fall back to `None` or an empty container.
/// Nothing here validates the document.
pub struct SpecAnalyzer<'a> {
    spec: &'a Value,
}

impl<'a> SpecAnalyzer<'a> {
    pub fn new(spec: &'a Value) -> Self {
        Self { spec }
    }

    pub fn analyze(&self) -> AnalysisResult {
        AnalysisResult {
            api_info: self.get_api_info(),
            openapi_version: self.get_openapi_version(),
            endpoints: self.get_endpoints(),
            schemas: self.get_schemas(),
            security: self.get_security(),
            servers: self.get_servers(),
        }
    }

    pub fn get_api_info(&self) -> ApiInfo {
        let info = self.spec.get("info");

        ApiInfo {
            title: info.and_then(|i| present(i, "title")),
            version: info.and_then(|i| present(i, "version")),
            description: info.and_then(|i| present(i, "description")),
        }
    }

    pub fn get_openapi_version(&self) -> Option<Value> {
        present(self.spec, "openapi")
    }

    /// One record per (path, method) pair, in the document's own key order.
    pub fn get_endpoints(&self) -> Vec<Endpoint> {
        let mut endpoints = Vec::new();

        if let Some(paths) = self.spec.get("paths").and_then(|p| p.as_object()) {
            for (path, path_spec) in paths {
                let Some(path_obj) = path_spec.as_object() else {
                    continue;
                };
                for (method, operation) in path_obj {
                    // path-level `parameters`, `summary` etc. are not operations
                    if !operation.is_object() {
                        continue;
                    }
                    endpoints.push(Endpoint {
                        path: path.clone(),
                        method: method.clone(),
                        summary: present(operation, "summary"),
                        operation_id: present(operation, "operationId"),
                        parameters: present(operation, "parameters").unwrap_or_else(|| json!([])),
                        responses: present(operation, "responses").unwrap_or_else(|| json!({})),
                    });
                }
            }
        }

        endpoints
    }

    pub fn get_schemas(&self) -> Value {
        self.spec
            .get("components")
            .and_then(|c| present(c, "schemas"))
            .unwrap_or_else(|| json!({}))
    }

    pub fn get_security(&self) -> Value {
        present(self.spec, "security").unwrap_or_else(|| json!([]))
    }

    pub fn get_servers(&self) -> Value {
        present(self.spec, "servers").unwrap_or_else(|| json!([]))
    }
}

/// The value under `key`, unless it is missing or `null`.
fn present(value: &Value, key: &str) -> Option<Value> {
    value.get(key).filter(|v| !v.is_null()).cloned()
}
