//! End-to-end tests through the path/payload front end

use iou_gateway::{ApiError, RestApi};
use iou_settlement::{ClearMode, Config};
use serde_json::{json, Value};

fn api(database: Value) -> RestApi {
    RestApi::from_database_json(Config::default(), &database.to_string()).unwrap()
}

fn value(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}

fn user(name: &str, owes: Value, owed_by: Value, balance: f64) -> Value {
    json!({"name": name, "owes": owes, "owed_by": owed_by, "balance": balance})
}

fn empty(name: &str) -> Value {
    user(name, json!({}), json!({}), 0.0)
}

#[test]
fn no_users() {
    let api = api(json!({"users": []}));
    let response = api.get("/users", None).unwrap();
    assert_eq!(value(&response), json!({"users": []}));
}

#[test]
fn add_user() {
    let mut api = api(json!({"users": []}));
    let response = api.post("/add", Some(r#"{"user": "Adam"}"#)).unwrap();
    assert_eq!(value(&response), empty("Adam"));
}

#[test]
fn add_duplicate_user_conflicts() {
    let mut api = api(json!({"users": [empty("Adam")]}));
    let err = api.post("/add", Some(r#"{"user": "Adam"}"#)).unwrap_err();
    assert_eq!(err.status_code(), 409);
}

#[test]
fn get_single_user() {
    let api = api(json!({"users": [empty("Adam"), empty("Bob")]}));
    let response = api.get("/users", Some(r#"{"users": ["Bob"]}"#)).unwrap();
    assert_eq!(value(&response), json!({"users": [empty("Bob")]}));
}

#[test]
fn get_skips_unknown_and_sorts() {
    let api = api(json!({"users": [empty("Chuck"), empty("Bob"), empty("Adam")]}));

    let response = api
        .get("/users", Some(r#"{"users": ["Chuck", "Ghost", "Adam"]}"#))
        .unwrap();
    assert_eq!(value(&response), json!({"users": [empty("Adam"), empty("Chuck")]}));

    let all = api.get("/users", None).unwrap();
    let names: Vec<Value> = value(&all)["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].clone())
        .collect();
    assert_eq!(names, vec![json!("Chuck"), json!("Bob"), json!("Adam")]);
}

#[test]
fn both_users_have_zero_balance() {
    let mut api = api(json!({"users": [empty("Adam"), empty("Bob")]}));
    let response = api
        .post("/iou", Some(r#"{"lender": "Adam", "borrower": "Bob", "amount": 3.0}"#))
        .unwrap();
    assert_eq!(
        value(&response),
        json!({"users": [
            user("Adam", json!({}), json!({"Bob": 3.0}), 3.0),
            user("Bob", json!({"Adam": 3.0}), json!({}), -3.0),
        ]})
    );
}

#[test]
fn borrower_has_negative_balance() {
    let mut api = api(json!({"users": [
        empty("Adam"),
        user("Bob", json!({"Chuck": 3.0}), json!({}), -3.0),
        user("Chuck", json!({}), json!({"Bob": 3.0}), 3.0),
    ]}));
    let response = api
        .post("/iou", Some(r#"{"lender": "Adam", "borrower": "Bob", "amount": 3.0}"#))
        .unwrap();
    assert_eq!(
        value(&response),
        json!({"users": [
            user("Adam", json!({}), json!({"Bob": 3.0}), 3.0),
            user("Bob", json!({"Adam": 3.0, "Chuck": 3.0}), json!({}), -6.0),
        ]})
    );
}

#[test]
fn lender_has_negative_balance() {
    let mut api = api(json!({"users": [
        empty("Adam"),
        user("Bob", json!({"Chuck": 3.0}), json!({}), -3.0),
        user("Chuck", json!({}), json!({"Bob": 3.0}), 3.0),
    ]}));
    let response = api
        .post("/iou", Some(r#"{"lender": "Bob", "borrower": "Adam", "amount": 3.0}"#))
        .unwrap();
    assert_eq!(
        value(&response),
        json!({"users": [
            user("Adam", json!({"Bob": 3.0}), json!({}), -3.0),
            user("Bob", json!({"Chuck": 3.0}), json!({"Adam": 3.0}), 0.0),
        ]})
    );
}

#[test]
fn lender_owes_borrower() {
    let mut api = api(json!({"users": [
        user("Adam", json!({"Bob": 3.0}), json!({}), -3.0),
        user("Bob", json!({}), json!({"Adam": 3.0}), 3.0),
    ]}));
    let response = api
        .post("/iou", Some(r#"{"lender": "Adam", "borrower": "Bob", "amount": 2.0}"#))
        .unwrap();
    assert_eq!(
        value(&response),
        json!({"users": [
            user("Adam", json!({"Bob": 1.0}), json!({}), -1.0),
            user("Bob", json!({}), json!({"Adam": 1.0}), 1.0),
        ]})
    );
}

#[test]
fn lender_owes_borrower_less_than_new_loan() {
    let mut api = api(json!({"users": [
        user("Adam", json!({"Bob": 3.0}), json!({}), -3.0),
        user("Bob", json!({}), json!({"Adam": 3.0}), 3.0),
    ]}));
    let response = api
        .post("/iou", Some(r#"{"lender": "Adam", "borrower": "Bob", "amount": 4.0}"#))
        .unwrap();
    assert_eq!(
        value(&response),
        json!({"users": [
            user("Adam", json!({}), json!({"Bob": 1.0}), 1.0),
            user("Bob", json!({"Adam": 1.0}), json!({}), -1.0),
        ]})
    );
}

#[test]
fn lender_owes_borrower_same_as_new_loan() {
    let mut api = api(json!({"users": [
        user("Adam", json!({"Bob": 3.0}), json!({}), -3.0),
        user("Bob", json!({}), json!({"Adam": 3.0}), 3.0),
    ]}));
    let response = api
        .post("/iou", Some(r#"{"lender": "Adam", "borrower": "Bob", "amount": 3.0}"#))
        .unwrap();
    assert_eq!(
        value(&response),
        json!({"users": [empty("Adam"), empty("Bob")]})
    );
}

#[test]
fn pair_scoped_cancel_keeps_other_debts() {
    let mut config = Config::default();
    config.netting.clear_mode = ClearMode::PairScoped;
    let database = json!({"users": [
        user("Adam", json!({"Bob": 3.0, "Chuck": 1.0}), json!({}), -4.0),
        user("Bob", json!({}), json!({"Adam": 3.0}), 3.0),
        user("Chuck", json!({}), json!({"Adam": 1.0}), 1.0),
    ]});
    let mut api = RestApi::from_database_json(config, &database.to_string()).unwrap();

    let response = api
        .post("/iou", Some(r#"{"lender": "Adam", "borrower": "Bob", "amount": 3.0}"#))
        .unwrap();
    assert_eq!(
        value(&response),
        json!({"users": [
            user("Adam", json!({"Chuck": 1.0}), json!({}), -1.0),
            empty("Bob"),
        ]})
    );
}

#[test]
fn iou_errors_map_to_statuses() {
    let mut api = api(json!({"users": [empty("Adam"), empty("Bob")]}));

    let cases = [
        (r#"{"lender": "Ghost", "borrower": "Bob", "amount": 5}"#, 404),
        (r#"{"lender": "Adam", "borrower": "Bob", "amount": 0}"#, 400),
        (r#"{"lender": "Adam", "borrower": "Bob", "amount": -5}"#, 400),
        (r#"{"lender": "Adam", "borrower": "Bob"}"#, 400),
        (r#"{"lender": "Adam", "borrower": "Adam", "amount": 5}"#, 400),
        (r#"{"borrower": "Bob", "amount": 5}"#, 400),
    ];

    for (payload, status) in cases {
        let err: ApiError = api.post("/iou", Some(payload)).unwrap_err();
        assert_eq!(err.status_code(), status, "payload {}", payload);
    }

    // Nothing moved
    let response = api.get("/users", None).unwrap();
    assert_eq!(
        value(&response),
        json!({"users": [empty("Adam"), empty("Bob")]})
    );
}

#[test]
fn rejections_show_up_in_metrics() {
    let mut api = api(json!({"users": [empty("Adam"), empty("Bob")]}));

    let requests = [
        ("/iou", r#"{"lender": "Adam", "borrower": "Bob", "amount": 0}"#),
        ("/iou", r#"{"lender": "Adam", "borrower": "Bob"}"#),
        ("/iou", r#"{"lender": "Adam", "borrower": "Adam", "amount": 5}"#),
        ("/add", r#"{"user": "Chuck", "owes": {"Bob": -1}}"#),
        ("/iou", r#"{"lender": "Ghost", "borrower": "Bob", "amount": 5}"#),
    ];
    for (path, payload) in requests {
        api.post(path, Some(payload)).unwrap_err();
    }

    let text = api.get("/metrics", None).unwrap();
    assert!(text.contains(r#"iou_rejections_total{reason="validation"} 4"#), "{}", text);
    assert!(text.contains(r#"iou_rejections_total{reason="not_found"} 1"#), "{}", text);
    assert!(text.contains("iou_users_total 2"), "{}", text);
}

#[test]
fn invalid_seed_database_rejected() {
    let duplicate = json!({"users": [empty("Adam"), empty("Adam")]});
    let err = RestApi::from_database_json(Config::default(), &duplicate.to_string()).unwrap_err();
    assert_eq!(err.status_code(), 409);

    let negative = json!({"users": [user("Adam", json!({"Bob": -1.0}), json!({}), 0.0)]});
    let err = RestApi::from_database_json(Config::default(), &negative.to_string()).unwrap_err();
    assert_eq!(err.status_code(), 400);
}
