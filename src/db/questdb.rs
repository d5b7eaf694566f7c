//! QuestDB storage for emitted signals

use crate::config;
use crate::models::signal::{DerivedMetrics, SignalLabel, SignalOutput};
use crate::models::snapshot::SessionState;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_postgres::{Client, NoTls};

pub struct QuestDatabase {
    client: Arc<RwLock<Option<Client>>>,
}

fn label_str(label: SignalLabel) -> &'static str {
    match label {
        SignalLabel::Wait => "WAIT",
        SignalLabel::Buy => "BUY",
        SignalLabel::StrongBuy => "STRONG_BUY",
        SignalLabel::Sell => "SELL",
        SignalLabel::StrongSell => "STRONG_SELL",
        SignalLabel::Mixed => "MIXED",
    }
}

fn parse_label(raw: &str) -> SignalLabel {
    match raw {
        "BUY" => SignalLabel::Buy,
        "STRONG_BUY" => SignalLabel::StrongBuy,
        "SELL" => SignalLabel::Sell,
        "STRONG_SELL" => SignalLabel::StrongSell,
        "MIXED" => SignalLabel::Mixed,
        _ => SignalLabel::Wait,
    }
}

fn session_str(session: SessionState) -> &'static str {
    match session {
        SessionState::Live => "LIVE",
        SessionState::Closed => "CLOSED",
        SessionState::Offline => "OFFLINE",
    }
}

fn parse_session(raw: &str) -> SessionState {
    match raw {
        "LIVE" => SessionState::Live,
        "CLOSED" => SessionState::Closed,
        _ => SessionState::Offline,
    }
}

impl QuestDatabase {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let questdb_url = config::get_questdb_url();
        let (client, connection) = tokio_postgres::connect(&questdb_url, NoTls)
            .await
            .map_err(|e| {
                Box::new(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    format!("Failed to open QuestDB connection: {}", e),
                )) as Box<dyn std::error::Error + Send + Sync>
            })?;

        // The connection future drives IO on its own task
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "QuestDB connection task failed");
            }
        });

        let db = Self {
            client: Arc::new(RwLock::new(Some(client))),
        };

        db.init_schema().await?;

        Ok(db)
    }

    async fn init_schema(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let client = self.client.read().await;
        if let Some(ref c) = *client {
            // Designated timestamp leads the column list; PARTITION BY follows it
            c.execute(
                "CREATE TABLE IF NOT EXISTS signals (
                    timestamp TIMESTAMP,
                    id LONG,
                    symbol SYMBOL,
                    label SYMBOL,
                    confidence INT,
                    price DOUBLE,
                    session SYMBOL,
                    rationale STRING,
                    metrics_json STRING
                ) TIMESTAMP(timestamp) PARTITION BY DAY",
                &[],
            )
            .await
            .map_err(|e| {
                Box::new(std::io::Error::other(format!(
                    "Failed to initialize signals table: {}",
                    e
                ))) as Box<dyn std::error::Error + Send + Sync>
            })?;
        }

        Ok(())
    }

    /// Store an emitted signal in QuestDB
    pub async fn store_signal(
        &self,
        signal: &SignalOutput,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let client = self.client.read().await;
        if let Some(ref c) = *client {
            let metrics_json = serde_json::to_string(&signal.metrics).map_err(|e| {
                Box::new(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("Failed to serialize metrics: {}", e),
                )) as Box<dyn std::error::Error + Send + Sync>
            })?;

            // No auto-increment in QuestDB; the millisecond timestamp doubles as id
            let id = signal.timestamp.timestamp_millis();
            // pgwire wants naive timestamps
            let timestamp_naive = signal.timestamp.naive_utc();

            c.execute(
                "INSERT INTO signals (timestamp, id, symbol, label, confidence, price, session, rationale, metrics_json)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
                &[
                    &timestamp_naive,
                    &id,
                    &signal.symbol,
                    &label_str(signal.label),
                    &signal.confidence,
                    &signal.price,
                    &session_str(signal.session),
                    &signal.rationale,
                    &metrics_json,
                ],
            )
            .await
            .map_err(|e| {
                Box::new(std::io::Error::other(format!("Failed to insert signal: {}", e)))
                    as Box<dyn std::error::Error + Send + Sync>
            })?;
        }

        Ok(())
    }

    /// Get signals, optionally filtered by symbol, ordered newest first
    pub async fn get_signals(
        &self,
        symbol: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<SignalOutput>, Box<dyn std::error::Error + Send + Sync>> {
        let client = self.client.read().await;
        if let Some(ref c) = *client {
            let query = match (symbol, limit) {
                (Some(_), Some(limit)) => format!(
                    "SELECT symbol, label, confidence, price, session, rationale, metrics_json, timestamp
                     FROM signals
                     WHERE symbol = $1
                     ORDER BY timestamp DESC
                     LIMIT {}",
                    limit
                ),
                (Some(_), None) => {
                    "SELECT symbol, label, confidence, price, session, rationale, metrics_json, timestamp
                     FROM signals
                     WHERE symbol = $1
                     ORDER BY timestamp DESC"
                        .to_string()
                }
                (None, Some(limit)) => format!(
                    "SELECT symbol, label, confidence, price, session, rationale, metrics_json, timestamp
                     FROM signals
                     ORDER BY timestamp DESC
                     LIMIT {}",
                    limit
                ),
                (None, None) => {
                    "SELECT symbol, label, confidence, price, session, rationale, metrics_json, timestamp
                     FROM signals
                     ORDER BY timestamp DESC"
                        .to_string()
                }
            };

            let rows = if let Some(sym) = symbol {
                c.query(&query, &[&sym]).await
            } else {
                c.query(&query, &[]).await
            }
            .map_err(|e| {
                Box::new(std::io::Error::other(format!(
                    "Failed to fetch signals: {}",
                    e
                ))) as Box<dyn std::error::Error + Send + Sync>
            })?;

            let mut signals = Vec::new();
            for row in rows {
                let symbol: String = row.get(0);
                let label_raw: String = row.get(1);
                let confidence: i32 = row.get(2);
                let price: f64 = row.get(3);
                let session_raw: String = row.get(4);
                let rationale: String = row.get(5);
                let metrics_json: String = row.get(6);
                let timestamp_naive: chrono::NaiveDateTime = row.get(7);
                let timestamp = DateTime::from_naive_utc_and_offset(timestamp_naive, Utc);

                let metrics: DerivedMetrics =
                    serde_json::from_str(&metrics_json).map_err(|e| {
                        Box::new(std::io::Error::new(
                            std::io::ErrorKind::InvalidData,
                            format!("Failed to deserialize metrics: {}", e),
                        )) as Box<dyn std::error::Error + Send + Sync>
                    })?;

                signals.push(SignalOutput {
                    symbol,
                    label: parse_label(&label_raw),
                    confidence,
                    rationale,
                    metrics,
                    price,
                    session: parse_session(&session_raw),
                    volume_strength: None,
                    timestamp,
                });
            }

            Ok(signals)
        } else {
            Ok(Vec::new())
        }
    }

    /// Check if the QuestDB connection is available
    pub async fn is_available(&self) -> bool {
        let client = self.client.read().await;
        client.is_some()
    }
}
