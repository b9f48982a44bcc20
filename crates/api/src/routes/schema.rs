//! Schema Routes

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

/// Response for crops endpoint
#[derive(Debug, Serialize)]
pub struct CropsResponse {
    pub crops: Vec<String>,
    pub default: Option<String>,
}

/// Response for schema endpoint
#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    pub columns: Vec<String>,
    pub crops: Vec<String>,
    pub warnings: Vec<String>,
}

/// List the crops the model accepts
pub async fn get_crops(State(state): State<Arc<AppState>>) -> Json<CropsResponse> {
    Json(CropsResponse {
        crops: state.assembler.crops().to_vec(),
        default: state.default_crop().map(str::to_string),
    })
}

/// Describe the model's feature schema and any drift found at load
pub async fn get_schema(State(state): State<Arc<AppState>>) -> Json<SchemaResponse> {
    let schema = state.assembler.schema();
    Json(SchemaResponse {
        columns: schema.columns().to_vec(),
        crops: schema.crops().to_vec(),
        warnings: state.schema_notices(),
    })
}
