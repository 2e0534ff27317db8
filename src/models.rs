use serde::{Deserialize, Serialize};

/// Canonical view of one client's rental status, derived fresh from every
/// fetched response and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecord {
    pub name: String,
    pub bike: String,
    pub tariff: String,
    pub comment: String,
    pub debt: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_payment_amount: Option<String>,
    /// Always `DD.MM.YYYY` when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_payment_date: Option<String>,
    /// `last_payment_date + 7 days`, present iff the last payment date parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_payment_date: Option<String>,
}

impl Default for ClientRecord {
    fn default() -> Self {
        Self {
            name: "Клиент".to_string(),
            bike: "Велосипед".to_string(),
            tariff: "0".to_string(),
            comment: String::new(),
            debt: 0.0,
            last_payment_amount: None,
            last_payment_date: None,
            next_payment_date: None,
        }
    }
}

impl ClientRecord {
    /// Positive debt is the sole trigger for the overdue presentation state.
    pub fn overdue(&self) -> bool {
        self.debt > 0.0
    }
}

#[derive(Debug, Serialize)]
pub struct ClientStatusResponse {
    pub overdue: bool,
    #[serde(flatten)]
    pub client: ClientRecord,
}

impl From<ClientRecord> for ClientStatusResponse {
    fn from(client: ClientRecord) -> Self {
        Self {
            overdue: client.overdue(),
            client,
        }
    }
}
