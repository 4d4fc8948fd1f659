use crate::storage::LedgerStore;
use chrono::Utc;
use shared::{
    AddIncomeRequest, CreateExpenseRequest, Ledger, Record, RecordKind, SetInitialBalanceRequest,
    UpdateExpenseRequest,
};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Description used when an income is added without one.
const DEFAULT_INCOME_DESCRIPTION: &str = "manual income";

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("invalid amount")]
    InvalidAmount,
    #[error("missing fields or invalid amount")]
    InvalidInput,
    #[error("expense {0} not found")]
    NotFound(Uuid),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// All ledger operations. Every mutation locks the store, updates the
/// in-memory document, and persists the whole file before releasing the lock.
#[derive(Clone)]
pub struct LedgerService {
    store: LedgerStore,
}

impl LedgerService {
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    /// Current balance. No side effect.
    pub async fn balance(&self) -> f64 {
        self.store.document().await.balance
    }

    /// All records sorted by date descending (most recent first). Full
    /// re-sort on every call; ties keep their stored relative order.
    pub async fn list_records(&self) -> Vec<Record> {
        let document = self.store.document().await;
        let mut records = document.expenses.clone();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        records
    }

    /// Overwrite the balance unconditionally. Existing records are not
    /// adjusted for. Rejects a missing or negative amount.
    pub async fn set_initial_balance(
        &self,
        request: SetInitialBalanceRequest,
    ) -> Result<f64, LedgerError> {
        let amount = request
            .amount
            .filter(|a| *a >= 0.0)
            .ok_or(LedgerError::InvalidAmount)?;

        let mut document = self.store.document().await;
        document.balance = amount;
        self.store.persist(&document)?;
        info!("Initial balance set to {}", document.balance);
        Ok(document.balance)
    }

    /// Record an income. Stored with a negated amount and the income flag so
    /// it shows up in the record list; the balance goes up by `amount`.
    pub async fn add_income(&self, request: AddIncomeRequest) -> Result<f64, LedgerError> {
        let amount = request
            .amount
            .filter(|a| *a > 0.0)
            .ok_or(LedgerError::InvalidAmount)?;
        let description = request
            .description
            .unwrap_or_else(|| DEFAULT_INCOME_DESCRIPTION.to_string());

        let record = Record {
            id: Uuid::new_v4(),
            description,
            amount: -amount,
            date: Utc::now(),
            photo_base64: None,
            kind: RecordKind::Income,
        };

        let mut document = self.store.document().await;
        document.expenses.push(record);
        document.balance += amount;
        self.store.persist(&document)?;
        info!("Income of {} recorded, new balance {}", amount, document.balance);
        Ok(document.balance)
    }

    /// Record an expense. The balance goes down by `amount`. Rejects a
    /// missing/empty description and a missing or non-positive amount.
    pub async fn add_expense(&self, request: CreateExpenseRequest) -> Result<Record, LedgerError> {
        let description = request
            .description
            .filter(|d| !d.is_empty())
            .ok_or(LedgerError::InvalidInput)?;
        let amount = request
            .amount
            .filter(|a| *a > 0.0)
            .ok_or(LedgerError::InvalidInput)?;

        let record = Record {
            id: Uuid::new_v4(),
            description,
            amount,
            date: Utc::now(),
            photo_base64: request.photo_base64,
            kind: RecordKind::Expense,
        };

        let mut document = self.store.document().await;
        document.expenses.push(record.clone());
        document.balance -= amount;
        self.store.persist(&document)?;
        info!("Expense of {} recorded, new balance {}", amount, document.balance);
        Ok(record)
    }

    /// Partial update: only supplied fields change. A new amount shifts the
    /// balance by `old - new`; income amounts are stored negative, so the
    /// same rule reverses and reapplies their contribution too.
    pub async fn update_record(
        &self,
        id: Uuid,
        request: UpdateExpenseRequest,
    ) -> Result<Record, LedgerError> {
        let mut guard = self.store.document().await;
        let document = &mut *guard;

        let record = document
            .expenses
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(LedgerError::NotFound(id))?;

        if let Some(description) = request.description.filter(|d| !d.is_empty()) {
            record.description = description;
        }
        if let Some(amount) = request.amount {
            document.balance += record.amount - amount;
            record.amount = amount;
        }
        if let Some(photo) = request.photo_base64 {
            record.photo_base64 = photo;
        }
        let updated = record.clone();

        self.store.persist(&guard)?;
        info!("Record {} updated", id);
        Ok(updated)
    }

    /// Remove a record, adding its amount back to the balance (the inverse
    /// of its original contribution).
    pub async fn delete_record(&self, id: Uuid) -> Result<(), LedgerError> {
        let mut document = self.store.document().await;
        let index = document
            .expenses
            .iter()
            .position(|r| r.id == id)
            .ok_or(LedgerError::NotFound(id))?;

        let record = document.expenses.remove(index);
        document.balance += record.amount;
        self.store.persist(&document)?;
        info!("Record {} deleted, new balance {}", id, document.balance);
        Ok(())
    }

    /// Empty the record list without touching the balance. The balance then
    /// reflects history that is no longer listed; that divergence is the
    /// documented behavior of this operation.
    pub async fn clear_records(&self) -> Result<f64, LedgerError> {
        let mut document = self.store.document().await;
        document.expenses.clear();
        self.store.persist(&document)?;
        info!("Records cleared, balance kept at {}", document.balance);
        Ok(document.balance)
    }

    /// Restore the empty initial document: zero balance, no records.
    pub async fn reset(&self) -> Result<(), LedgerError> {
        let mut document = self.store.document().await;
        *document = Ledger::default();
        self.store.persist(&document)?;
        info!("Ledger reset");
        Ok(())
    }
}
