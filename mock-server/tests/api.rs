use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, app_with_state, Store};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

struct Farm {
    app: Router,
    haras_id: Uuid,
    stalls: Vec<Uuid>,
}

fn farm() -> Farm {
    let mut store = Store::default();
    let haras = store.add_haras("Haras Santa Luzia", "João", "Bagé", "RS");
    let stalls = (1..=3).map(|n| store.add_stall(haras.id, &n.to_string()).id).collect();
    Farm {
        app: app_with_state(store.into_db()),
        haras_id: haras.id,
        stalls,
    }
}

async fn create_horse(farm: &Farm, name: &str) -> Value {
    let body = json!({
        "harasId": farm.haras_id,
        "name": name,
        "breed": "Crioulo",
        "gender": "female",
        "birthDate": "2018-10-02",
        "color": "Tordilho",
    });
    let resp = farm
        .app
        .clone()
        .oneshot(json_request("POST", "/haras-pro/horses", &body.to_string()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await["data"].clone()
}

// --- farms ---

#[tokio::test]
async fn list_haras_empty() {
    let resp = app().oneshot(get("/haras-pro/haras")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn get_haras_not_found_uses_error_envelope() {
    let resp = app()
        .oneshot(get(&format!("/haras-pro/haras/{}", Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "haras not found");
}

#[tokio::test]
async fn bad_uuid_returns_400() {
    let resp = app().oneshot(get("/haras-pro/horses/not-a-uuid")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(!body_bytes(resp).await.is_empty());
}

// --- horses ---

#[tokio::test]
async fn create_horse_keeps_extra_fields() {
    let farm = farm();
    let horse = create_horse(&farm, "Estrela").await;
    assert_eq!(horse["name"], "Estrela");
    assert_eq!(horse["color"], "Tordilho");
    assert_eq!(horse["status"], "active");
    assert!(horse["stallId"].is_null());
}

#[tokio::test]
async fn create_horse_for_unknown_farm_is_422() {
    let body = json!({"harasId": Uuid::new_v4(), "name": "X", "gender": "male"});
    let resp = app()
        .oneshot(json_request("POST", "/haras-pro/horses", &body.to_string()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn update_horse_cannot_move_it_between_stalls() {
    let farm = farm();
    let horse = create_horse(&farm, "Estrela").await;
    let id = horse["id"].as_str().unwrap();
    let patch = json!({"name": "Estrela do Sul", "stallId": farm.stalls[0]});
    let resp = farm
        .app
        .clone()
        .oneshot(json_request("PUT", &format!("/haras-pro/horses/{id}"), &patch.to_string()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = body_json(resp).await["data"].clone();
    assert_eq!(updated["name"], "Estrela do Sul");
    assert!(updated["stallId"].is_null());
}

#[tokio::test]
async fn horse_stats_counts_by_gender_and_stall() {
    let farm = farm();
    create_horse(&farm, "A").await;
    let b = create_horse(&farm, "B").await;
    let uri = format!("/haras-pro/horses/{}/assign-stall", b["id"].as_str().unwrap());
    let body = json!({"stallId": farm.stalls[0]}).to_string();
    farm.app.clone().oneshot(json_request("PUT", &uri, &body)).await.unwrap();

    let resp = farm
        .app
        .clone()
        .oneshot(get(&format!("/haras-pro/horses/haras/{}/stats", farm.haras_id)))
        .await
        .unwrap();
    let stats = body_json(resp).await["data"].clone();
    assert_eq!(stats["total"], 2);
    assert_eq!(stats["byGender"]["female"], 2);
    assert_eq!(stats["withStall"], 1);
    assert_eq!(stats["withoutStall"], 1);
}

// --- stall assignment ---

#[tokio::test]
async fn assignment_lifecycle() {
    let farm = farm();
    let a = create_horse(&farm, "Alazã").await;
    let b = create_horse(&farm, "Baio").await;
    let stall = farm.stalls[0];
    let assign = |horse: &Value| {
        let uri = format!("/haras-pro/horses/{}/assign-stall", horse["id"].as_str().unwrap());
        json_request("PUT", &uri, &json!({ "stallId": stall }).to_string())
    };

    let resp = farm.app.clone().oneshot(assign(&a)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["data"]["stallId"], json!(stall));

    let resp = farm
        .app
        .clone()
        .oneshot(get(&format!("/haras-pro/stalls/{stall}")))
        .await
        .unwrap();
    let data = body_json(resp).await["data"].clone();
    assert_eq!(data["status"], "occupied");
    assert_eq!(data["horse"]["name"], "Alazã");

    // second horse cannot take the occupied stall
    let resp = farm.app.clone().oneshot(assign(&b)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(resp).await["status"], "error");

    let uri = format!("/haras-pro/horses/{}/remove-stall", a["id"].as_str().unwrap());
    let resp = farm.app.clone().oneshot(json_request("PUT", &uri, "{}")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = farm.app.clone().oneshot(assign(&b)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn available_lists_exclude_housed_horses_and_full_stalls() {
    let farm = farm();
    let a = create_horse(&farm, "A").await;
    create_horse(&farm, "B").await;
    let uri = format!("/haras-pro/horses/{}/assign-stall", a["id"].as_str().unwrap());
    let body = json!({"stallId": farm.stalls[1]}).to_string();
    farm.app.clone().oneshot(json_request("PUT", &uri, &body)).await.unwrap();

    let resp = farm
        .app
        .clone()
        .oneshot(get(&format!("/haras-pro/horses/haras/{}/available", farm.haras_id)))
        .await
        .unwrap();
    let horses = body_json(resp).await["data"].clone();
    assert_eq!(horses.as_array().unwrap().len(), 1);
    assert_eq!(horses[0]["name"], "B");

    let resp = farm
        .app
        .clone()
        .oneshot(get(&format!("/haras-pro/stalls/haras/{}/available", farm.haras_id)))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["data"].as_array().unwrap().len(), 2);

    let resp = farm
        .app
        .clone()
        .oneshot(get(&format!("/haras-pro/stalls/haras/{}/stats", farm.haras_id)))
        .await
        .unwrap();
    let stats = body_json(resp).await["data"].clone();
    assert_eq!(stats["occupied"], 1);
    assert_eq!(stats["total"], 3);
}

#[tokio::test]
async fn maintenance_stall_rejects_assignment() {
    let farm = farm();
    let stall = farm.stalls[2];
    let resp = farm
        .app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/haras-pro/stalls/{stall}/status"),
            r#"{"status":"maintenance"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let horse = create_horse(&farm, "Estrela").await;
    let uri = format!("/haras-pro/horses/{}/assign-stall", horse["id"].as_str().unwrap());
    let resp = farm
        .app
        .clone()
        .oneshot(json_request("PUT", &uri, &json!({ "stallId": stall }).to_string()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn sold_horse_cannot_be_assigned() {
    let farm = farm();
    let horse = create_horse(&farm, "Vendido").await;
    let id = horse["id"].as_str().unwrap().to_string();

    let resp = farm
        .app
        .clone()
        .oneshot(json_request("PUT", &format!("/haras-pro/horses/{id}"), r#"{"status":"sold"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = farm
        .app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/haras-pro/horses/{id}/assign-stall"),
            &json!({ "stallId": farm.stalls[0] }).to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Vendido is no longer on the farm");
}

#[tokio::test]
async fn selling_a_housed_horse_frees_the_stall() {
    let farm = farm();
    let stall = farm.stalls[0];
    let horse = create_horse(&farm, "Estrela").await;
    let id = horse["id"].as_str().unwrap().to_string();

    let resp = farm
        .app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/haras-pro/horses/{id}/assign-stall"),
            &json!({ "stallId": stall }).to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = farm
        .app
        .clone()
        .oneshot(json_request("PUT", &format!("/haras-pro/horses/{id}"), r#"{"status":"deceased"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["status"], "deceased");
    assert!(body["data"]["stallId"].is_null());

    let resp = farm.app.clone().oneshot(get(&format!("/haras-pro/stalls/{stall}"))).await.unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["data"]["status"], "available");
    assert!(body["data"]["horse"].is_null());
}

#[tokio::test]
async fn stalls_are_listed_by_number() {
    let mut store = Store::default();
    let haras = store.add_haras("Haras", "Dono", "Bagé", "RS");
    for number in ["10", "2", "1"] {
        store.add_stall(haras.id, number);
    }
    let resp = app_with_state(store.into_db())
        .oneshot(get(&format!("/haras-pro/stalls/haras/{}", haras.id)))
        .await
        .unwrap();
    let body = body_json(resp).await;
    let numbers: Vec<_> = body["data"].as_array().unwrap().iter().map(|s| s["number"].clone()).collect();
    assert_eq!(numbers, vec![json!("1"), json!("2"), json!("10")]);
}

// --- embryos ---

fn embryo_body(haras_id: Uuid, code: &str) -> String {
    json!({
        "harasId": haras_id,
        "code": code,
        "father": {"name": "Garanhão Rei"},
        "mother": {"name": "Doadora Flor"},
        "creationDate": "2024-01-01",
        "veterinarian": "Dra. Ana",
        "clinic": "Clínica Sul",
        "technique": "TE",
    })
    .to_string()
}

#[tokio::test]
async fn embryo_activation_sets_expected_birth() {
    let farm = farm();
    let resp = farm
        .app
        .clone()
        .oneshot(json_request("POST", "/haras-pro/embryos", &embryo_body(farm.haras_id, "EMB-001")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let embryo = body_json(resp).await["data"].clone();
    assert_eq!(embryo["status"], "frozen");
    let id = embryo["id"].as_str().unwrap().to_string();

    let activation = json!({
        "recipientId": Uuid::new_v4(),
        "recipientName": "Receptora Mel",
        "activationDate": "2024-01-01",
    });
    let uri = format!("/haras-pro/embryos/{id}/activate");
    let resp = farm
        .app
        .clone()
        .oneshot(json_request("POST", &uri, &activation.to_string()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let embryo = body_json(resp).await["data"].clone();
    assert_eq!(embryo["status"], "activated");
    assert_eq!(embryo["expectedBirthDate"], "2024-12-06");
    assert_eq!(embryo["recipient"]["name"], "Receptora Mel");

    // only frozen embryos can be activated
    let resp = farm
        .app
        .clone()
        .oneshot(json_request("POST", &uri, &activation.to_string()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn duplicate_embryo_code_is_a_conflict() {
    let farm = farm();
    let body = embryo_body(farm.haras_id, "EMB-002");
    farm.app.clone().oneshot(json_request("POST", "/haras-pro/embryos", &body)).await.unwrap();
    let resp = farm
        .app
        .clone()
        .oneshot(json_request("POST", "/haras-pro/embryos", &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

// --- veterinary ---

async fn create_lot(farm: &Farm, quantity: f64, minimum: f64, expires: &str) -> (Value, Value) {
    let medicine = json!({
        "name": "Ivermectina",
        "activeIngredient": "ivermectina",
        "type": "vermifuge",
        "dosageForm": "paste",
        "requiresPrescription": false,
    });
    let resp = farm
        .app
        .clone()
        .oneshot(json_request("POST", "/haras-pro/veterinary/medicines", &medicine.to_string()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let medicine = body_json(resp).await["data"].clone();

    let stock = json!({
        "harasId": farm.haras_id,
        "medicineId": medicine["id"],
        "batchNumber": "L-2024-01",
        "currentQuantity": quantity,
        "minimumQuantity": minimum,
        "unit": "seringa",
        "unitCost": 25.0,
        "expirationDate": expires,
    });
    let resp = farm
        .app
        .clone()
        .oneshot(json_request("POST", "/haras-pro/veterinary/stocks", &stock.to_string()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    (medicine, body_json(resp).await["data"].clone())
}

#[tokio::test]
async fn stock_is_returned_with_medicine_and_success_envelope() {
    let farm = farm();
    let (_, stock) = create_lot(&farm, 10.0, 2.0, "2099-01-01").await;
    assert_eq!(stock["medicine"]["name"], "Ivermectina");

    let resp = farm
        .app
        .clone()
        .oneshot(get(&format!("/haras-pro/veterinary/haras/{}/stocks", farm.haras_id)))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"][0]["batchNumber"], "L-2024-01");
}

#[tokio::test]
async fn movements_update_balance() {
    let farm = farm();
    let (_, stock) = create_lot(&farm, 10.0, 2.0, "2099-01-01").await;
    let uri = format!("/haras-pro/veterinary/stocks/{}/movements", stock["id"].as_str().unwrap());

    let resp = farm
        .app
        .clone()
        .oneshot(json_request("POST", &uri, r#"{"kind":"exit","quantity":9}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(body_json(resp).await["data"]["balanceAfter"], 1.0);

    let resp = farm
        .app
        .clone()
        .oneshot(json_request("POST", &uri, r#"{"kind":"loss","quantity":5}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(resp).await["success"], false);

    let resp = farm
        .app
        .clone()
        .oneshot(get(&format!("/haras-pro/veterinary/haras/{}/stocks/low", farm.haras_id)))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn expired_lot_raises_critical_alert() {
    let farm = farm();
    create_lot(&farm, 10.0, 2.0, "2020-01-01").await;
    let resp = farm
        .app
        .clone()
        .oneshot(get(&format!("/haras-pro/veterinary/haras/{}/alerts", farm.haras_id)))
        .await
        .unwrap();
    let alerts = body_json(resp).await["data"].clone();
    assert_eq!(alerts.as_array().unwrap().len(), 1);
    assert_eq!(alerts[0]["kind"], "expired");
    assert_eq!(alerts[0]["severity"], "critical");
}

#[tokio::test]
async fn costs_group_by_medicine_type() {
    let farm = farm();
    create_lot(&farm, 4.0, 1.0, "2099-01-01").await;
    let resp = farm
        .app
        .clone()
        .oneshot(get(&format!("/haras-pro/veterinary/haras/{}/costs", farm.haras_id)))
        .await
        .unwrap();
    let costs = body_json(resp).await["data"].clone();
    assert_eq!(costs["totalValue"], 100.0);
    assert_eq!(costs["lotCount"], 1);
    assert_eq!(costs["byMedicineType"]["vermifuge"], 100.0);
}

#[tokio::test]
async fn medicine_with_stock_cannot_be_deleted() {
    let farm = farm();
    let (medicine, stock) = create_lot(&farm, 1.0, 1.0, "2099-01-01").await;
    let uri = format!("/haras-pro/veterinary/medicines/{}", medicine["id"].as_str().unwrap());
    let resp = farm
        .app
        .clone()
        .oneshot(Request::builder().method("DELETE").uri(&uri).body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let stock_uri = format!("/haras-pro/veterinary/stocks/{}", stock["id"].as_str().unwrap());
    let resp = farm
        .app
        .clone()
        .oneshot(Request::builder().method("DELETE").uri(&stock_uri).body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = farm
        .app
        .clone()
        .oneshot(Request::builder().method("DELETE").uri(&uri).body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
