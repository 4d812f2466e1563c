//! In-memory stand-in for the Haras backend.
//!
//! Horses, stalls and embryos answer with `{status, data, message}`; the
//! veterinary routes answer with `{success, data}`, mirroring the two
//! envelope styles the real backend mixes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;
use tracing::info;
use uuid::Uuid;

pub mod store;

pub use store::{Db, Store, StoreError};

use store::{merge, new_record, ActivationInput, EmbryoRecord, HorseRecord, MedicineRecord, MovementInput, StockRecord};

const PROTECTED_HORSE_KEYS: &[&str] = &["id", "harasId", "stallId"];
const PROTECTED_STOCK_KEYS: &[&str] = &["id", "harasId", "medicineId", "currentQuantity", "medicine"];

pub fn app() -> Router {
    app_with_state(Store::default().into_db())
}

pub fn app_with_state(db: Db) -> Router {
    let api = Router::new()
        .route("/haras", get(list_haras))
        .route("/haras/{id}", get(get_haras))
        .route("/horses", post(create_horse))
        .route("/horses/haras/{haras_id}", get(list_horses))
        .route("/horses/haras/{haras_id}/available", get(list_available_horses))
        .route("/horses/haras/{haras_id}/stats", get(horse_stats))
        .route("/horses/{id}", get(get_horse).put(update_horse).delete(delete_horse))
        .route("/horses/{id}/assign-stall", put(assign_stall))
        .route("/horses/{id}/remove-stall", put(remove_stall))
        .route("/stalls/haras/{haras_id}", get(list_stalls))
        .route("/stalls/haras/{haras_id}/available", get(list_available_stalls))
        .route("/stalls/haras/{haras_id}/stats", get(stall_stats))
        .route("/stalls/{id}", get(get_stall))
        .route("/stalls/{id}/status", put(set_stall_status))
        .route("/embryos", post(create_embryo))
        .route("/embryos/haras/{haras_id}", get(list_embryos))
        .route("/embryos/{id}", get(get_embryo))
        .route("/embryos/{id}/activate", post(activate_embryo))
        .route("/veterinary/medicines", get(list_medicines).post(create_medicine))
        .route(
            "/veterinary/medicines/{id}",
            get(get_medicine).put(update_medicine).delete(delete_medicine),
        )
        .route("/veterinary/haras/{haras_id}/stocks", get(list_stocks))
        .route("/veterinary/haras/{haras_id}/stocks/low", get(list_low_stock))
        .route("/veterinary/haras/{haras_id}/alerts", get(list_alerts))
        .route("/veterinary/haras/{haras_id}/costs", get(cost_summary))
        .route("/veterinary/stocks", post(create_stock))
        .route(
            "/veterinary/stocks/{id}",
            get(get_stock).put(update_stock).delete(delete_stock),
        )
        .route("/veterinary/stocks/{id}/movements", post(record_movement));

    Router::new().nest("/haras-pro", api).with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, Store::default().into_db()).await
}

pub async fn run_with(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(db)).await
}

// -- replies -----------------------------------------------------------------

/// Envelope style of a route group.
#[derive(Clone, Copy, Debug)]
pub enum Envelope {
    Status,
    Success,
}

const FARM: Envelope = Envelope::Status;
const VET: Envelope = Envelope::Success;

impl Envelope {
    fn reply<T: Serialize>(self, status: StatusCode, data: T) -> Response {
        let data = serde_json::to_value(data).unwrap_or(Value::Null);
        let body = match self {
            Envelope::Status => json!({ "status": "success", "data": data, "message": "ok" }),
            Envelope::Success => json!({ "success": true, "data": data }),
        };
        (status, Json(body)).into_response()
    }

    fn ok<T: Serialize>(self, data: T) -> Response {
        self.reply(StatusCode::OK, data)
    }

    fn created<T: Serialize>(self, data: T) -> Response {
        self.reply(StatusCode::CREATED, data)
    }

    fn fail(self, status: StatusCode, message: impl Into<String>) -> Failure {
        Failure {
            envelope: self,
            status,
            message: message.into(),
        }
    }

    fn store_error(self) -> impl FnOnce(StoreError) -> Failure {
        move |err| match err {
            StoreError::NotFound(what) => self.fail(StatusCode::NOT_FOUND, format!("{what} not found")),
            StoreError::Conflict(message) => self.fail(StatusCode::CONFLICT, message),
            StoreError::Invalid(message) => self.fail(StatusCode::UNPROCESSABLE_ENTITY, message),
        }
    }
}

#[derive(Debug)]
pub struct Failure {
    envelope: Envelope,
    status: StatusCode,
    message: String,
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let body = match self.envelope {
            Envelope::Status => json!({ "status": "error", "message": self.message }),
            Envelope::Success => json!({ "success": false, "message": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

type Reply = Result<Response, Failure>;

// -- farms -------------------------------------------------------------------

async fn list_haras(State(db): State<Db>) -> Response {
    let store = db.read().await;
    let mut farms: Vec<_> = store.haras.values().cloned().collect();
    farms.sort_by(|a, b| a.name.cmp(&b.name));
    FARM.ok(farms)
}

async fn get_haras(State(db): State<Db>, Path(id): Path<Uuid>) -> Reply {
    let store = db.read().await;
    let farm = store.haras.get(&id).ok_or(StoreError::NotFound("haras")).map_err(FARM.store_error())?;
    Ok(FARM.ok(farm))
}

// -- horses ------------------------------------------------------------------

async fn list_horses(State(db): State<Db>, Path(haras_id): Path<Uuid>) -> Response {
    FARM.ok(db.read().await.horses_of(haras_id))
}

async fn list_available_horses(State(db): State<Db>, Path(haras_id): Path<Uuid>) -> Response {
    let horses: Vec<_> = db
        .read()
        .await
        .horses_of(haras_id)
        .into_iter()
        .filter(|h| h.status == "active" && h.stall_id.is_none())
        .collect();
    FARM.ok(horses)
}

async fn horse_stats(State(db): State<Db>, Path(haras_id): Path<Uuid>) -> Response {
    FARM.ok(db.read().await.horse_stats(haras_id))
}

async fn get_horse(State(db): State<Db>, Path(id): Path<Uuid>) -> Reply {
    let store = db.read().await;
    let horse = store.horses.get(&id).ok_or(StoreError::NotFound("horse")).map_err(FARM.store_error())?;
    Ok(FARM.ok(horse))
}

async fn create_horse(State(db): State<Db>, Json(mut body): Json<Map<String, Value>>) -> Reply {
    body.remove("stallId");
    let horse: HorseRecord = new_record(body).map_err(FARM.store_error())?;
    let mut store = db.write().await;
    if !store.haras.contains_key(&horse.haras_id) {
        return Err(FARM.fail(StatusCode::UNPROCESSABLE_ENTITY, "unknown haras"));
    }
    store.horses.insert(horse.id, horse.clone());
    info!(id = %horse.id, name = %horse.name, "horse created");
    Ok(FARM.created(horse))
}

async fn update_horse(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(patch): Json<Map<String, Value>>,
) -> Reply {
    let updated = db
        .write()
        .await
        .update_horse(id, patch, PROTECTED_HORSE_KEYS)
        .map_err(FARM.store_error())?;
    info!(%id, status = %updated.status, "horse updated");
    Ok(FARM.ok(updated))
}

async fn delete_horse(State(db): State<Db>, Path(id): Path<Uuid>) -> Reply {
    db.write().await.delete_horse(id).map_err(FARM.store_error())?;
    info!(%id, "horse deleted");
    Ok(FARM.ok(Value::Null))
}

async fn assign_stall(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Reply {
    let stall_id = body
        .get("stallId")
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| FARM.fail(StatusCode::UNPROCESSABLE_ENTITY, "stallId is required"))?;
    let horse = db.write().await.assign_stall(id, stall_id).map_err(FARM.store_error())?;
    info!(horse = %id, stall = %stall_id, "horse assigned to stall");
    Ok(FARM.ok(horse))
}

async fn remove_stall(State(db): State<Db>, Path(id): Path<Uuid>) -> Reply {
    let horse = db.write().await.remove_stall(id).map_err(FARM.store_error())?;
    info!(horse = %id, "horse removed from stall");
    Ok(FARM.ok(horse))
}

// -- stalls ------------------------------------------------------------------

async fn list_stalls(State(db): State<Db>, Path(haras_id): Path<Uuid>) -> Response {
    FARM.ok(db.read().await.stalls_of(haras_id))
}

async fn list_available_stalls(State(db): State<Db>, Path(haras_id): Path<Uuid>) -> Response {
    let stalls: Vec<_> = db
        .read()
        .await
        .stalls_of(haras_id)
        .into_iter()
        .filter(|s| s.status == "available")
        .collect();
    FARM.ok(stalls)
}

async fn stall_stats(State(db): State<Db>, Path(haras_id): Path<Uuid>) -> Response {
    FARM.ok(db.read().await.stall_stats(haras_id))
}

async fn get_stall(State(db): State<Db>, Path(id): Path<Uuid>) -> Reply {
    let store = db.read().await;
    let stall = store.stalls.get(&id).ok_or(StoreError::NotFound("stall")).map_err(FARM.store_error())?;
    Ok(FARM.ok(stall))
}

async fn set_stall_status(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Reply {
    let status = body
        .get("status")
        .and_then(Value::as_str)
        .ok_or_else(|| FARM.fail(StatusCode::UNPROCESSABLE_ENTITY, "status is required"))?;
    let stall = db.write().await.set_stall_status(id, status).map_err(FARM.store_error())?;
    info!(%id, status = %stall.status, "stall status changed");
    Ok(FARM.ok(stall))
}

// -- embryos -----------------------------------------------------------------

async fn list_embryos(State(db): State<Db>, Path(haras_id): Path<Uuid>) -> Response {
    FARM.ok(db.read().await.embryos_of(haras_id))
}

async fn get_embryo(State(db): State<Db>, Path(id): Path<Uuid>) -> Reply {
    let store = db.read().await;
    let embryo = store.embryos.get(&id).ok_or(StoreError::NotFound("embryo")).map_err(FARM.store_error())?;
    Ok(FARM.ok(embryo))
}

async fn create_embryo(State(db): State<Db>, Json(mut body): Json<Map<String, Value>>) -> Reply {
    for key in ["status", "recipient", "activationDate", "daysPregnant", "expectedBirthDate"] {
        body.remove(key);
    }
    let embryo: EmbryoRecord = new_record(body).map_err(FARM.store_error())?;
    let embryo = db.write().await.insert_embryo(embryo).map_err(FARM.store_error())?;
    info!(id = %embryo.id, code = %embryo.code, "embryo registered");
    Ok(FARM.created(embryo))
}

async fn activate_embryo(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Reply {
    let input: ActivationInput = serde_json::from_value(body)
        .map_err(|e| FARM.fail(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    let embryo = db.write().await.activate_embryo(id, input).map_err(FARM.store_error())?;
    info!(%id, "embryo activated");
    Ok(FARM.ok(embryo))
}

// -- veterinary --------------------------------------------------------------

async fn list_medicines(State(db): State<Db>) -> Response {
    let store = db.read().await;
    let mut medicines: Vec<_> = store.medicines.values().cloned().collect();
    medicines.sort_by(|a, b| a.name.cmp(&b.name));
    VET.ok(medicines)
}

async fn get_medicine(State(db): State<Db>, Path(id): Path<Uuid>) -> Reply {
    let store = db.read().await;
    let medicine = store
        .medicines
        .get(&id)
        .ok_or(StoreError::NotFound("medicine"))
        .map_err(VET.store_error())?;
    Ok(VET.ok(medicine))
}

async fn create_medicine(State(db): State<Db>, Json(body): Json<Map<String, Value>>) -> Reply {
    let medicine: MedicineRecord = new_record(body).map_err(VET.store_error())?;
    db.write().await.medicines.insert(medicine.id, medicine.clone());
    info!(id = %medicine.id, name = %medicine.name, "medicine created");
    Ok(VET.created(medicine))
}

async fn update_medicine(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(patch): Json<Map<String, Value>>,
) -> Reply {
    let mut store = db.write().await;
    let current = store
        .medicines
        .get(&id)
        .ok_or(StoreError::NotFound("medicine"))
        .map_err(VET.store_error())?;
    let updated = merge(current, patch, &["id"]).map_err(VET.store_error())?;
    store.medicines.insert(id, updated.clone());
    info!(%id, "medicine updated");
    Ok(VET.ok(updated))
}

async fn delete_medicine(State(db): State<Db>, Path(id): Path<Uuid>) -> Reply {
    db.write().await.delete_medicine(id).map_err(VET.store_error())?;
    info!(%id, "medicine deleted");
    Ok(VET.ok(Value::Null))
}

async fn list_stocks(State(db): State<Db>, Path(haras_id): Path<Uuid>) -> Response {
    VET.ok(db.read().await.stocks_of(haras_id))
}

async fn list_low_stock(State(db): State<Db>, Path(haras_id): Path<Uuid>) -> Response {
    VET.ok(db.read().await.low_stock(haras_id))
}

async fn list_alerts(State(db): State<Db>, Path(haras_id): Path<Uuid>) -> Response {
    VET.ok(db.read().await.alerts(haras_id, Utc::now().date_naive()))
}

async fn cost_summary(State(db): State<Db>, Path(haras_id): Path<Uuid>) -> Response {
    VET.ok(db.read().await.costs(haras_id, Utc::now().date_naive()))
}

async fn get_stock(State(db): State<Db>, Path(id): Path<Uuid>) -> Reply {
    let store = db.read().await;
    let stock = store.stocks.get(&id).ok_or(StoreError::NotFound("stock")).map_err(VET.store_error())?;
    Ok(VET.ok(store.stock_view(stock)))
}

async fn create_stock(State(db): State<Db>, Json(mut body): Json<Map<String, Value>>) -> Reply {
    body.remove("medicine");
    let stock: StockRecord = new_record(body).map_err(VET.store_error())?;
    let stock = db.write().await.insert_stock(stock).map_err(VET.store_error())?;
    info!(id = %stock.id, batch = %stock.batch_number, "stock lot created");
    Ok(VET.created(stock))
}

async fn update_stock(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(patch): Json<Map<String, Value>>,
) -> Reply {
    let mut store = db.write().await;
    let current = store.stocks.get(&id).ok_or(StoreError::NotFound("stock")).map_err(VET.store_error())?;
    let updated = merge(current, patch, PROTECTED_STOCK_KEYS).map_err(VET.store_error())?;
    store.stocks.insert(id, updated.clone());
    info!(%id, "stock lot updated");
    Ok(VET.ok(store.stock_view(&updated)))
}

async fn delete_stock(State(db): State<Db>, Path(id): Path<Uuid>) -> Reply {
    let mut store = db.write().await;
    store.stocks.remove(&id).ok_or(StoreError::NotFound("stock")).map_err(VET.store_error())?;
    store.movements.retain(|m| m.stock_id != id);
    info!(%id, "stock lot deleted");
    Ok(VET.ok(Value::Null))
}

async fn record_movement(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Reply {
    let input: MovementInput = serde_json::from_value(body)
        .map_err(|e| VET.fail(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    let movement = db.write().await.record_movement(id, input).map_err(VET.store_error())?;
    info!(stock = %id, kind = %movement.kind, balance = movement.balance_after, "stock movement recorded");
    Ok(VET.created(movement))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_envelope_wraps_data() {
        let failure = FARM.fail(StatusCode::CONFLICT, "stall 3 is occupied");
        assert_eq!(failure.status, StatusCode::CONFLICT);
        assert_eq!(failure.message, "stall 3 is occupied");
    }

    #[test]
    fn store_errors_map_to_statuses() {
        let map = |err: StoreError| VET.store_error()(err).status;
        assert_eq!(map(StoreError::NotFound("stock")), StatusCode::NOT_FOUND);
        assert_eq!(map(StoreError::Conflict("x".into())), StatusCode::CONFLICT);
        assert_eq!(map(StoreError::Invalid("x".into())), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn stall_occupant_serializes_nested() {
        let mut store = Store::default();
        let farm = store.add_haras("Haras", "Dono", "Bagé", "RS");
        let stall = store.add_stall(farm.id, "7");
        let value = serde_json::to_value(&stall).unwrap();
        assert_eq!(value["number"], "7");
        assert_eq!(value["status"], "available");
        assert_eq!(value["type"], "individual");
        assert!(value["horse"].is_null());
    }
}
