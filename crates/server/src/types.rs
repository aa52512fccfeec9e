use docforge::{TemplateStructure, UserInputs};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize, Default)]
pub struct DebugParams {
    pub debug: Option<bool>,
}

#[derive(Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<Value>,
    pub result: T,
}

/// The request body for `/generate`.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub structure: TemplateStructure,
    #[serde(rename = "userInputs", alias = "user_inputs")]
    pub user_inputs: UserInputs,
}
