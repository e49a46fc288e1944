//! Register API endpoints

use api_types::{
    consumption::{ConsumptionQuery, MonthConsumption},
    register::{Register, RegisterNew, RegisterQuery},
};
use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
};

use crate::{ServerError, server::ServerState};

fn map_register(register: engine::Register) -> Register {
    Register {
        id: register.id,
        name: register.name,
        amount: register.amount,
        currency: register.currency,
        date: register.date,
        note: register.note,
    }
}

/// Handle requests for storing a new register.
///
/// The body is decoded as JSON whatever the declared content type.
pub async fn add_register(
    State(state): State<ServerState>,
    body: Bytes,
) -> Result<Json<Register>, ServerError> {
    let payload: RegisterNew =
        serde_json::from_slice(&body).map_err(|err| ServerError::Generic(err.to_string()))?;

    let register = state
        .engine
        .create_register(engine::RegisterNew {
            name: payload.name,
            amount: payload.amount,
            currency: payload.currency,
            date: payload.date,
            note: payload.note,
        })
        .await?;
    tracing::info!("created register {} for {}", register.id, register.name);

    Ok(Json(map_register(register)))
}

/// Handle requests for listing registers matching the query filters.
///
/// Repeated parameters keep their first value.
pub async fn get_registers(
    State(state): State<ServerState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Register>>, ServerError> {
    let query = RegisterQuery::from_pairs(&pairs);
    let filter = engine::RegisterFilter::from_query(
        query.name,
        query.currency,
        query.start_date.as_deref(),
        query.end_date.as_deref(),
    );

    let registers = state.engine.find_registers(&filter).await?;

    Ok(Json(registers.into_iter().map(map_register).collect()))
}

/// Handle requests for the rolling 30 day consumption of a name/currency pair.
pub async fn month_consumption(
    State(state): State<ServerState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<MonthConsumption>, ServerError> {
    let query = ConsumptionQuery::from_pairs(&pairs);
    let total_consumption = state
        .engine
        .month_consumption(&query.name, &query.currency)
        .await?;

    Ok(Json(MonthConsumption { total_consumption }))
}
