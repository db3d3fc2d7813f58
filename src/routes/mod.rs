use std::sync::Arc;

use axum::Router;

use crate::ReadingStore;

mod data;
mod health;
mod insert;

// ---

/// Shared state for every route: the reading store behind a trait object,
/// so route tests can swap in an in-memory store.
pub type AppState = Arc<dyn ReadingStore>;

pub fn router(store: AppState) -> Router {
    // ---
    Router::new()
        .merge(data::router())
        .merge(insert::router())
        .merge(health::router())
        .with_state(store)
}

#[cfg(test)]
mod tests {
    // ---
    use std::sync::Arc;

    use crate::store::mock::{InsertedRow, MemoryStore};
    use crate::ReadingStore;

    use super::router;

    /// Serve the full router on an ephemeral port and return its base URL.
    async fn spawn_app(store: Arc<MemoryStore>) -> String {
        // ---
        let app = router(store);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn health_responds_ok() {
        // ---
        let base = spawn_app(Arc::new(MemoryStore::new())).await;

        let res = reqwest::get(format!("{base}/health")).await.unwrap();

        assert_eq!(res.status(), 200);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn data_returns_the_most_recent_reading() {
        // ---
        let mem = Arc::new(MemoryStore::new());
        mem.insert_reading(4, 1, 36.6, 2).await.unwrap();
        mem.insert_reading(4, 2, 88.0, 2).await.unwrap();
        let base = spawn_app(mem.clone()).await;

        let res = reqwest::get(format!("{base}/data")).await.unwrap();

        assert_eq!(res.status(), 200);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["patientId"], 4);
        assert_eq!(body["metric"], 2);
        assert_eq!(body["value"], 88.0);
        assert_eq!(body["stateId"], 2);
    }

    #[tokio::test]
    async fn data_is_not_found_while_no_readings_exist() {
        // ---
        let base = spawn_app(Arc::new(MemoryStore::new())).await;

        let res = reqwest::get(format!("{base}/data")).await.unwrap();

        assert_eq!(res.status(), 404);
    }

    #[tokio::test]
    async fn data_reports_storage_failure() {
        // ---
        let mem = Arc::new(MemoryStore::new());
        mem.set_failing(true);
        let base = spawn_app(mem.clone()).await;

        let res = reqwest::get(format!("{base}/data")).await.unwrap();

        assert_eq!(res.status(), 500);
    }

    #[tokio::test]
    async fn insert_data_stores_the_row_exactly_as_given() {
        // ---
        let mem = Arc::new(MemoryStore::new());
        let base = spawn_app(mem.clone()).await;

        let res = reqwest::Client::new()
            .post(format!("{base}/insertData"))
            .json(&serde_json::json!({
                "patientId": 7,
                "metric": 2,
                "value": 88,
                "state": 1
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), 200);
        assert_eq!(
            mem.rows(),
            vec![InsertedRow {
                patient_id: 7,
                metric: 2,
                value: 88.0,
                state_id: 1,
            }]
        );
    }

    #[tokio::test]
    async fn insert_data_reports_storage_failure_without_a_row() {
        // ---
        let mem = Arc::new(MemoryStore::new());
        mem.set_failing(true);
        let base = spawn_app(mem.clone()).await;

        let res = reqwest::Client::new()
            .post(format!("{base}/insertData"))
            .json(&serde_json::json!({
                "patientId": 7,
                "metric": 2,
                "value": 88,
                "state": 1
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), 500);
        assert!(mem.rows().is_empty());
    }
}
