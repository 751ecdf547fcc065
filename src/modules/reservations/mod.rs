pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use bookshelf_kernel::{InitCtx, Module};
use serde_json::json;
use tokio::sync::RwLock;

use models::{Reservation, ReservationQuery};

type Reservations = Arc<RwLock<Vec<Reservation>>>;

/// Meeting-room reservation listing backed by process memory
pub struct ReservationsModule {
    reservations: Reservations,
}

impl ReservationsModule {
    pub fn new(reservations: Vec<Reservation>) -> Self {
        Self {
            reservations: Arc::new(RwLock::new(reservations)),
        }
    }
}

#[async_trait]
impl Module for ReservationsModule {
    fn name(&self) -> &'static str {
        "reservations"
    }

    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let count = self.reservations.read().await.len();
        tracing::info!(
            module = self.name(),
            count = count,
            "reservations module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/reservations", get(list_reservations))
            .with_state(self.reservations.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/reservations": {
                    "get": {
                        "summary": "List reservations",
                        "tags": ["Reservations"],
                        "parameters": [{
                            "name": "date",
                            "in": "query",
                            "required": false,
                            "description": "Only reservations on this day (YYYY-MM-DD)",
                            "schema": { "type": "string" }
                        }],
                        "responses": {
                            "200": {
                                "description": "List of reservations",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": {
                                                "$ref": "#/components/schemas/Reservation"
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Reservation": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "name": { "type": "string" },
                            "room_id": { "type": "string" },
                            "date": { "type": "string", "description": "Day of the booking (YYYY-MM-DD)" },
                            "time_start": { "type": "string" },
                            "time_end": { "type": "string" },
                            "purpose": { "type": "string" }
                        },
                        "required": ["id", "name", "room_id", "date", "time_start", "time_end", "purpose"]
                    }
                }
            }
        }))
    }
}

/// List reservations, optionally only those on one date
async fn list_reservations(
    State(reservations): State<Reservations>,
    Query(query): Query<ReservationQuery>,
) -> Json<Vec<Reservation>> {
    let reservations = reservations.read().await;
    let listed = match query.date.as_deref().filter(|date| !date.is_empty()) {
        Some(date) => reservations
            .iter()
            .filter(|reservation| reservation.date == date)
            .cloned()
            .collect(),
        None => reservations.clone(),
    };
    Json(listed)
}

/// Reservations present when the service starts
pub fn seed() -> Vec<Reservation> {
    vec![
        Reservation {
            id: "1".to_string(),
            name: "John Doe".to_string(),
            room_id: "101".to_string(),
            date: "2025-09-10".to_string(),
            time_start: "13:00".to_string(),
            time_end: "15:00".to_string(),
            purpose: "Mathematics tutoring".to_string(),
        },
        Reservation {
            id: "2".to_string(),
            name: "Jane Smith".to_string(),
            room_id: "103".to_string(),
            date: "2025-09-12".to_string(),
            time_start: "10:00".to_string(),
            time_end: "12:00".to_string(),
            purpose: "Group project meeting".to_string(),
        },
    ]
}

/// Create a new instance of the reservations module with the seed data
pub fn create_module() -> Arc<dyn Module> {
    Arc::new(ReservationsModule::new(seed()))
}
