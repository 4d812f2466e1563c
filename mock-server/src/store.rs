//! In-memory backend state.
//!
//! Records keep the fields the server reasons about as typed columns and
//! carry everything else through `extra`, so the mock accepts whatever the
//! client sends and echoes it back unchanged.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

pub const GESTATION_PERIOD_DAYS: u64 = 340;
pub const EXPIRY_WARNING_DAYS: i64 = 30;
pub const EXPIRY_URGENT_DAYS: i64 = 7;

pub type Db = Arc<RwLock<Store>>;

#[derive(Debug, PartialEq)]
pub enum StoreError {
    NotFound(&'static str),
    Conflict(String),
    Invalid(String),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarasRecord {
    pub id: Uuid,
    pub name: String,
    pub owner: String,
    pub location: Value,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorseRecord {
    pub id: Uuid,
    pub haras_id: Uuid,
    pub name: String,
    pub gender: String,
    #[serde(default = "active")]
    pub status: String,
    #[serde(default)]
    pub stall_id: Option<Uuid>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HorseRecord {
    /// Sold and deceased horses keep their record but no longer take a stall.
    pub fn is_on_farm(&self) -> bool {
        matches!(self.status.as_str(), "active" | "inactive")
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occupant {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StallRecord {
    pub id: Uuid,
    pub haras_id: Uuid,
    pub number: String,
    #[serde(default = "available")]
    pub status: String,
    #[serde(default = "one")]
    pub capacity: u32,
    #[serde(default)]
    pub horse: Option<Occupant>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbryoRecord {
    pub id: Uuid,
    pub haras_id: Uuid,
    pub code: String,
    #[serde(default = "frozen")]
    pub status: String,
    #[serde(default)]
    pub recipient: Option<Value>,
    #[serde(default)]
    pub activation_date: Option<NaiveDate>,
    #[serde(default)]
    pub days_pregnant: Option<i64>,
    #[serde(default)]
    pub expected_birth_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationInput {
    pub recipient_id: Uuid,
    pub recipient_name: String,
    #[serde(default)]
    pub recipient_registration: Option<String>,
    pub activation_date: NaiveDate,
    #[serde(default)]
    pub days_pregnant: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineRecord {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub medicine_type: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRecord {
    pub id: Uuid,
    pub haras_id: Uuid,
    pub medicine_id: Uuid,
    pub batch_number: String,
    pub current_quantity: f64,
    pub minimum_quantity: f64,
    pub unit_cost: f64,
    pub expiration_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medicine: Option<MedicineRecord>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementInput {
    pub kind: String,
    pub quantity: f64,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub horse_id: Option<Uuid>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementRecord {
    pub id: Uuid,
    pub stock_id: Uuid,
    pub kind: String,
    pub quantity: f64,
    pub reason: Option<String>,
    pub horse_id: Option<Uuid>,
    pub performed_at: DateTime<Utc>,
    pub balance_after: f64,
    /// Unit cost of the lot when the movement happened.
    #[serde(skip)]
    pub unit_cost: f64,
}

fn active() -> String {
    "active".to_string()
}

fn available() -> String {
    "available".to_string()
}

fn frozen() -> String {
    "frozen".to_string()
}

fn one() -> u32 {
    1
}

/// Turn a client payload into a record, assigning a fresh id.
pub fn new_record<T: DeserializeOwned>(mut body: Map<String, Value>) -> Result<T, StoreError> {
    body.insert("id".to_string(), json!(Uuid::new_v4()));
    serde_json::from_value(Value::Object(body)).map_err(|e| StoreError::Invalid(e.to_string()))
}

/// Apply a partial update. Keys in `protected` cannot be changed this way.
pub fn merge<T: Serialize + DeserializeOwned>(
    record: &T,
    patch: Map<String, Value>,
    protected: &[&str],
) -> Result<T, StoreError> {
    let mut current = match serde_json::to_value(record) {
        Ok(Value::Object(map)) => map,
        _ => return Err(StoreError::Invalid("record is not an object".to_string())),
    };
    for (key, value) in patch {
        if !protected.contains(&key.as_str()) {
            current.insert(key, value);
        }
    }
    serde_json::from_value(Value::Object(current)).map_err(|e| StoreError::Invalid(e.to_string()))
}

#[derive(Default)]
pub struct Store {
    pub haras: HashMap<Uuid, HarasRecord>,
    pub horses: HashMap<Uuid, HorseRecord>,
    pub stalls: HashMap<Uuid, StallRecord>,
    pub embryos: HashMap<Uuid, EmbryoRecord>,
    pub medicines: HashMap<Uuid, MedicineRecord>,
    pub stocks: HashMap<Uuid, StockRecord>,
    pub movements: Vec<MovementRecord>,
}

impl Store {
    pub fn into_db(self) -> Db {
        Arc::new(RwLock::new(self))
    }

    /// A farm with a handful of stalls, for running the binary by hand.
    pub fn demo() -> Self {
        let mut store = Store::default();
        let farm = store.add_haras("Haras Santa Luzia", "João Carvalho", "Bagé", "RS");
        for n in 1..=6 {
            store.add_stall(farm.id, &n.to_string());
        }
        store
    }

    pub fn add_haras(&mut self, name: &str, owner: &str, city: &str, state: &str) -> HarasRecord {
        let record = HarasRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            owner: owner.to_string(),
            location: json!({ "city": city, "state": state }),
        };
        self.haras.insert(record.id, record.clone());
        record
    }

    pub fn add_stall(&mut self, haras_id: Uuid, number: &str) -> StallRecord {
        let record = StallRecord {
            id: Uuid::new_v4(),
            haras_id,
            number: number.to_string(),
            status: available(),
            capacity: 1,
            horse: None,
            extra: Map::from_iter([("type".to_string(), json!("individual"))]),
        };
        self.stalls.insert(record.id, record.clone());
        record
    }

    // -- horses ------------------------------------------------------------

    pub fn horses_of(&self, haras_id: Uuid) -> Vec<HorseRecord> {
        let mut horses: Vec<_> = self
            .horses
            .values()
            .filter(|h| h.haras_id == haras_id)
            .cloned()
            .collect();
        horses.sort_by(|a, b| a.name.cmp(&b.name));
        horses
    }

    pub fn horse_stats(&self, haras_id: Uuid) -> Value {
        let horses = self.horses_of(haras_id);
        let count_status = |s: &str| horses.iter().filter(|h| h.status == s).count();
        let count_gender = |g: &str| horses.iter().filter(|h| h.gender == g).count();
        let with_stall = horses.iter().filter(|h| h.stall_id.is_some()).count();
        json!({
            "total": horses.len(),
            "active": count_status("active"),
            "inactive": count_status("inactive"),
            "sold": count_status("sold"),
            "deceased": count_status("deceased"),
            "byGender": {
                "male": count_gender("male"),
                "female": count_gender("female"),
                "gelding": count_gender("gelding"),
            },
            "withStall": with_stall,
            "withoutStall": horses.len() - with_stall,
        })
    }

    /// Apply a partial update. A horse whose new status takes it off the farm
    /// leaves its stall; a rename is copied onto the stall's occupant.
    pub fn update_horse(
        &mut self,
        id: Uuid,
        patch: Map<String, Value>,
        protected: &[&str],
    ) -> Result<HorseRecord, StoreError> {
        let current = self.horses.get(&id).ok_or(StoreError::NotFound("horse"))?;
        let mut updated = merge(current, patch, protected)?;
        if !updated.is_on_farm() {
            if let Some(stall_id) = updated.stall_id.take() {
                self.vacate(stall_id);
            }
        }
        if let Some(stall) = updated.stall_id.and_then(|s| self.stalls.get_mut(&s)) {
            if let Some(occupant) = stall.horse.as_mut() {
                occupant.name = updated.name.clone();
            }
        }
        self.horses.insert(id, updated.clone());
        Ok(updated)
    }

    pub fn delete_horse(&mut self, id: Uuid) -> Result<(), StoreError> {
        let horse = self.horses.remove(&id).ok_or(StoreError::NotFound("horse"))?;
        if let Some(stall_id) = horse.stall_id {
            self.vacate(stall_id);
        }
        Ok(())
    }

    /// Place a horse, moving it out of its previous stall.
    pub fn assign_stall(&mut self, horse_id: Uuid, stall_id: Uuid) -> Result<HorseRecord, StoreError> {
        let horse = self.horses.get(&horse_id).ok_or(StoreError::NotFound("horse"))?.clone();
        let stall = self.stalls.get(&stall_id).ok_or(StoreError::NotFound("stall"))?;

        if stall.haras_id != horse.haras_id {
            return Err(StoreError::Invalid("stall belongs to another farm".to_string()));
        }
        if horse.stall_id == Some(stall_id) {
            return Ok(horse);
        }
        if !horse.is_on_farm() {
            return Err(StoreError::Conflict(format!("{} is no longer on the farm", horse.name)));
        }
        if stall.capacity == 0 {
            return Err(StoreError::Conflict(format!("stall {} has no capacity", stall.number)));
        }
        if stall.status == "maintenance" {
            return Err(StoreError::Conflict(format!("stall {} is under maintenance", stall.number)));
        }
        if let Some(occupant) = &stall.horse {
            return Err(StoreError::Conflict(format!(
                "stall {} is occupied by {}",
                stall.number, occupant.name
            )));
        }

        if let Some(previous) = horse.stall_id {
            self.vacate(previous);
        }
        let occupant = Occupant {
            id: horse.id,
            name: horse.name.clone(),
            breed: horse.extra.get("breed").and_then(Value::as_str).map(str::to_string),
        };
        if let Some(stall) = self.stalls.get_mut(&stall_id) {
            stall.horse = Some(occupant);
            stall.status = "occupied".to_string();
        }
        let horse = self.horses.get_mut(&horse_id).ok_or(StoreError::NotFound("horse"))?;
        horse.stall_id = Some(stall_id);
        Ok(horse.clone())
    }

    pub fn remove_stall(&mut self, horse_id: Uuid) -> Result<HorseRecord, StoreError> {
        let horse = self.horses.get_mut(&horse_id).ok_or(StoreError::NotFound("horse"))?;
        let previous = horse.stall_id.take();
        let horse = horse.clone();
        if let Some(stall_id) = previous {
            self.vacate(stall_id);
        }
        Ok(horse)
    }

    fn vacate(&mut self, stall_id: Uuid) {
        if let Some(stall) = self.stalls.get_mut(&stall_id) {
            stall.horse = None;
            if stall.status == "occupied" {
                stall.status = available();
            }
        }
    }

    // -- stalls ------------------------------------------------------------

    pub fn stalls_of(&self, haras_id: Uuid) -> Vec<StallRecord> {
        let mut stalls: Vec<_> = self
            .stalls
            .values()
            .filter(|s| s.haras_id == haras_id)
            .cloned()
            .collect();
        stalls.sort_by(|a, b| stall_order(a).cmp(&stall_order(b)));
        stalls
    }

    pub fn stall_stats(&self, haras_id: Uuid) -> Value {
        let stalls = self.stalls_of(haras_id);
        let count = |s: &str| stalls.iter().filter(|st| st.status == s).count();
        let occupied = count("occupied");
        let rate = if stalls.is_empty() {
            0.0
        } else {
            occupied as f64 / stalls.len() as f64 * 100.0
        };
        json!({
            "total": stalls.len(),
            "available": count("available"),
            "occupied": occupied,
            "maintenance": count("maintenance"),
            "reserved": count("reserved"),
            "occupancyRate": rate,
        })
    }

    pub fn set_stall_status(&mut self, id: Uuid, status: &str) -> Result<StallRecord, StoreError> {
        let status = if status == "empty" { "available" } else { status };
        if !["available", "occupied", "maintenance", "reserved"].contains(&status) {
            return Err(StoreError::Invalid(format!("unknown stall status {status}")));
        }
        let stall = self.stalls.get_mut(&id).ok_or(StoreError::NotFound("stall"))?;
        match (&stall.horse, status) {
            (Some(_), s) if s != "occupied" => {
                return Err(StoreError::Conflict("remove the horse before changing status".to_string()))
            }
            (None, "occupied") => {
                return Err(StoreError::Invalid("assign a horse to occupy the stall".to_string()))
            }
            _ => {}
        }
        stall.status = status.to_string();
        Ok(stall.clone())
    }

    // -- embryos -----------------------------------------------------------

    pub fn embryos_of(&self, haras_id: Uuid) -> Vec<EmbryoRecord> {
        let mut embryos: Vec<_> = self
            .embryos
            .values()
            .filter(|e| e.haras_id == haras_id)
            .cloned()
            .collect();
        embryos.sort_by(|a, b| a.code.cmp(&b.code));
        embryos
    }

    pub fn insert_embryo(&mut self, embryo: EmbryoRecord) -> Result<EmbryoRecord, StoreError> {
        let duplicate = self
            .embryos
            .values()
            .any(|e| e.haras_id == embryo.haras_id && e.code == embryo.code);
        if duplicate {
            return Err(StoreError::Conflict(format!("embryo code {} already exists", embryo.code)));
        }
        self.embryos.insert(embryo.id, embryo.clone());
        Ok(embryo)
    }

    pub fn activate_embryo(&mut self, id: Uuid, input: ActivationInput) -> Result<EmbryoRecord, StoreError> {
        let embryo = self.embryos.get_mut(&id).ok_or(StoreError::NotFound("embryo"))?;
        if embryo.status != "frozen" {
            return Err(StoreError::Conflict(format!("embryo is {}, not frozen", embryo.status)));
        }
        let mut recipient = json!({ "id": input.recipient_id, "name": input.recipient_name });
        if let Some(registration) = input.recipient_registration {
            recipient["registration"] = json!(registration);
        }
        embryo.status = "activated".to_string();
        embryo.recipient = Some(recipient);
        embryo.activation_date = Some(input.activation_date);
        embryo.days_pregnant = input.days_pregnant;
        embryo.expected_birth_date = input
            .activation_date
            .checked_add_days(Days::new(GESTATION_PERIOD_DAYS));
        if let Some(notes) = input.notes {
            embryo.extra.insert("notes".to_string(), json!(notes));
        }
        Ok(embryo.clone())
    }

    // -- veterinary --------------------------------------------------------

    pub fn stock_view(&self, stock: &StockRecord) -> StockRecord {
        let mut view = stock.clone();
        view.medicine = self.medicines.get(&stock.medicine_id).cloned();
        view
    }

    pub fn stocks_of(&self, haras_id: Uuid) -> Vec<StockRecord> {
        let mut stocks: Vec<_> = self
            .stocks
            .values()
            .filter(|s| s.haras_id == haras_id)
            .map(|s| self.stock_view(s))
            .collect();
        stocks.sort_by(|a, b| a.expiration_date.cmp(&b.expiration_date));
        stocks
    }

    pub fn delete_medicine(&mut self, id: Uuid) -> Result<(), StoreError> {
        if !self.medicines.contains_key(&id) {
            return Err(StoreError::NotFound("medicine"));
        }
        if self.stocks.values().any(|s| s.medicine_id == id) {
            return Err(StoreError::Conflict("medicine still has stock lots".to_string()));
        }
        self.medicines.remove(&id);
        Ok(())
    }

    pub fn insert_stock(&mut self, stock: StockRecord) -> Result<StockRecord, StoreError> {
        if !self.medicines.contains_key(&stock.medicine_id) {
            return Err(StoreError::Invalid("unknown medicine".to_string()));
        }
        self.stocks.insert(stock.id, stock.clone());
        Ok(self.stock_view(&stock))
    }

    pub fn record_movement(&mut self, stock_id: Uuid, input: MovementInput) -> Result<MovementRecord, StoreError> {
        let stock = self.stocks.get_mut(&stock_id).ok_or(StoreError::NotFound("stock"))?;
        if input.quantity < 0.0 {
            return Err(StoreError::Invalid("quantity must not be negative".to_string()));
        }
        let balance = match input.kind.as_str() {
            "entry" => stock.current_quantity + input.quantity,
            "exit" | "loss" => {
                if input.quantity > stock.current_quantity {
                    return Err(StoreError::Conflict("insufficient stock".to_string()));
                }
                stock.current_quantity - input.quantity
            }
            "adjustment" => input.quantity,
            other => return Err(StoreError::Invalid(format!("unknown movement kind {other}"))),
        };
        stock.current_quantity = balance;
        let record = MovementRecord {
            id: Uuid::new_v4(),
            stock_id,
            kind: input.kind,
            quantity: input.quantity,
            reason: input.reason,
            horse_id: input.horse_id,
            performed_at: Utc::now(),
            balance_after: balance,
            unit_cost: stock.unit_cost,
        };
        self.movements.push(record.clone());
        Ok(record)
    }

    pub fn low_stock(&self, haras_id: Uuid) -> Vec<StockRecord> {
        self.stocks_of(haras_id)
            .into_iter()
            .filter(|s| s.current_quantity <= s.minimum_quantity)
            .collect()
    }

    pub fn alerts(&self, haras_id: Uuid, today: NaiveDate) -> Vec<Value> {
        let mut alerts = Vec::new();
        for stock in self.stocks_of(haras_id) {
            let name = stock
                .medicine
                .as_ref()
                .map(|m| m.name.clone())
                .unwrap_or_else(|| stock.batch_number.clone());
            let days_left = (stock.expiration_date - today).num_days();
            let expiry = if days_left < 0 {
                Some(("expired", "critical", format!("{name} expired on {}", stock.expiration_date)))
            } else if days_left <= EXPIRY_WARNING_DAYS {
                let severity = if days_left <= EXPIRY_URGENT_DAYS { "high" } else { "medium" };
                Some(("expiringSoon", severity, format!("{name} expires in {days_left} days")))
            } else {
                None
            };
            if let Some((kind, severity, message)) = expiry {
                alerts.push(alert(&stock, &name, kind, severity, message));
            }
            if stock.current_quantity <= stock.minimum_quantity {
                let severity = if stock.current_quantity <= 0.0 { "high" } else { "medium" };
                let message = format!("{name}: {} left, minimum {}", stock.current_quantity, stock.minimum_quantity);
                alerts.push(alert(&stock, &name, "lowStock", severity, message));
            }
        }
        alerts
    }

    pub fn costs(&self, haras_id: Uuid, today: NaiveDate) -> Value {
        let stocks = self.stocks_of(haras_id);
        let mut by_type: Map<String, Value> = Map::new();
        let mut total = 0.0;
        for stock in &stocks {
            let value = stock.current_quantity * stock.unit_cost;
            total += value;
            if let Some(medicine) = &stock.medicine {
                let entry = by_type.entry(medicine.medicine_type.clone()).or_insert(json!(0.0));
                *entry = json!(entry.as_f64().unwrap_or(0.0) + value);
            }
        }

        let mut purchases = 0.0;
        let mut consumption = 0.0;
        let lot_ids: Vec<Uuid> = stocks.iter().map(|s| s.id).collect();
        for movement in self.movements.iter().filter(|m| lot_ids.contains(&m.stock_id)) {
            let date = movement.performed_at.date_naive();
            if date.year() != today.year() || date.month() != today.month() {
                continue;
            }
            let value = movement.quantity * movement.unit_cost;
            match movement.kind.as_str() {
                "entry" => purchases += value,
                "exit" | "loss" => consumption += value,
                _ => {}
            }
        }

        json!({
            "totalValue": total,
            "lotCount": stocks.len(),
            "byMedicineType": by_type,
            "purchasesThisMonth": purchases,
            "consumptionThisMonth": consumption,
        })
    }
}

/// Numeric stall numbers first, in numeric order, then the rest by text.
fn stall_order(stall: &StallRecord) -> (u64, &str) {
    let number = stall.number.trim().parse::<u64>().unwrap_or(u64::MAX);
    (number, &stall.number)
}

fn alert(stock: &StockRecord, name: &str, kind: &str, severity: &str, message: String) -> Value {
    json!({
        "stockId": stock.id,
        "medicineName": name,
        "kind": kind,
        "severity": severity,
        "message": message,
    })
}
