use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// The persisted ledger document: a running balance plus every record that
/// contributed to it. The whole document is written to disk on each mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    /// Current funds. Incrementally maintained, never recomputed from the
    /// record list.
    pub balance: f64,
    /// All records in insertion order. Listing re-sorts by date.
    pub expenses: Vec<Record>,
}

/// One ledger entry (expense or income).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Generated at creation, immutable, sole lookup key.
    pub id: Uuid,
    pub description: String,
    /// Wire convention: positive = expense, negative = income.
    pub amount: f64,
    /// Set server-side at creation (RFC 3339), immutable.
    pub date: DateTime<Utc>,
    /// Optional receipt image, nullable.
    pub photo_base64: Option<String>,
    /// Serialized as the `isIncome` boolean for wire compatibility.
    #[serde(rename = "isIncome", with = "is_income")]
    pub kind: RecordKind,
}

/// Whether a record adds to or subtracts from the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Income,
    Expense,
}

impl RecordKind {
    pub fn is_income(self) -> bool {
        matches!(self, RecordKind::Income)
    }
}

/// Serde adapter mapping `RecordKind` to the `isIncome` boolean used by the
/// file format and HTTP responses.
mod is_income {
    use super::RecordKind;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(kind: &RecordKind, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(kind.is_income())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RecordKind, D::Error> {
        Ok(if bool::deserialize(deserializer)? {
            RecordKind::Income
        } else {
            RecordKind::Expense
        })
    }
}

/// Body of POST /initial-balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetInitialBalanceRequest {
    pub amount: Option<f64>,
}

/// Body of POST /add-income.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddIncomeRequest {
    pub amount: Option<f64>,
    pub description: Option<String>,
}

/// Body of POST /expenses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseRequest {
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub photo_base64: Option<String>,
}

/// Body of PUT /expenses/:id. Any subset of fields may be supplied; only the
/// supplied ones are changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpenseRequest {
    pub description: Option<String>,
    pub amount: Option<f64>,
    /// `null` clears the stored photo; an absent field leaves it untouched.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub photo_base64: Option<Option<String>>,
}

/// Distinguishes an absent JSON field (outer `None`) from an explicit `null`
/// (`Some(None)`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialBalanceResponse {
    pub success: bool,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddIncomeResponse {
    pub success: bool,
    pub new_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Response of DELETE /reset-expenses-only: the record list is emptied but the
/// balance is reported unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearExpensesResponse {
    pub message: String,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
