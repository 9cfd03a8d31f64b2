use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`

use volleyscout::{
    rotation::{Side, Slot},
    stats::{ContactType, MainStat},
    Lineup, PendingSelection,
};

/// Lineup with opponent jerseys 1-6 and home jerseys 11-16, slot order OH1..RS2
#[allow(dead_code)]
pub fn numbered_lineup(opponent_name: &str) -> Lineup {
    let mut lineup = Lineup {
        opponent_name: opponent_name.to_string(),
        serving_first: Side::Opponent,
        ..Lineup::default()
    };
    for (index, slot) in [Slot::OH1, Slot::OH2, Slot::MB1, Slot::MB2, Slot::RS1, Slot::RS2]
        .into_iter()
        .enumerate()
    {
        lineup.opponent.assign(slot, (index + 1).to_string());
        lineup.home.assign(slot, (index + 11).to_string());
    }
    lineup
}

#[allow(dead_code)]
pub fn selection(main: MainStat, contact: ContactType) -> PendingSelection {
    PendingSelection::new(Some(main), Some(contact))
}

/// Sends one request through the router and decodes the JSON body, if any
#[allow(dead_code)]
pub async fn request_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let request = builder
        .body(Body::from(body.unwrap_or_default().to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
