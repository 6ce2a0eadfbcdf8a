use chrono::{Local, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::error::{ReadFailure, StoreError, ValidationError, WriteFailure};
use crate::models::{Transaction, TransactionFilter};

/// On-disk layout. Field names are part of the data file format.
#[derive(Serialize)]
struct Snapshot<'a> {
    transacoes: &'a [Transaction],
    categorias: &'a [String],
}

#[derive(Deserialize)]
struct StoredState {
    #[serde(default)]
    transacoes: Vec<Transaction>,
    #[serde(default)]
    categorias: Vec<String>,
}

/// Owner of all transactions, backed by a single JSON file.
///
/// Every mutation rewrites the whole file before returning. A mutation whose
/// write fails is undone, so the in-memory state always matches the last
/// successful write.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    transactions: Vec<Transaction>,
    categories: Vec<String>,
}

impl Store {
    /// Load state from `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no data file yet, starting empty");
                return Ok(Self {
                    path,
                    transactions: Vec::new(),
                    categories: Vec::new(),
                });
            }
            Err(e) => {
                return Err(StoreError::StorageRead {
                    path,
                    source: ReadFailure::Io(e),
                })
            }
        };

        let state: StoredState = match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(e) => {
                return Err(StoreError::StorageRead {
                    path,
                    source: ReadFailure::Json(e),
                })
            }
        };

        let categories = derive_categories(&state.transacoes);
        if categories != state.categorias {
            warn!(
                stored = state.categorias.len(),
                derived = categories.len(),
                "stored category list disagrees with transactions, using derived list"
            );
        }

        info!(
            path = %path.display(),
            transactions = state.transacoes.len(),
            categories = categories.len(),
            "loaded data file"
        );

        Ok(Self {
            path,
            transactions: state.transacoes,
            categories,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record a new expense from raw user input and persist it.
    pub fn add_transaction(
        &mut self,
        amount: &str,
        category: &str,
        description: &str,
        recurring: bool,
    ) -> Result<Transaction, StoreError> {
        let category = category.trim();
        if category.is_empty() {
            return Err(ValidationError::MissingField("category").into());
        }
        let amount = parse_amount(amount)?;
        let txn = Transaction::new(
            amount,
            category.to_string(),
            description.trim().to_string(),
            recurring,
        );
        self.commit(txn.clone())?;
        Ok(txn)
    }

    /// Persist an already-built transaction, e.g. one with an explicit timestamp.
    pub fn insert(&mut self, txn: Transaction) -> Result<(), StoreError> {
        if txn.category.trim().is_empty() {
            return Err(ValidationError::MissingField("category").into());
        }
        validate_amount(txn.amount)?;
        self.commit(txn)
    }

    fn commit(&mut self, txn: Transaction) -> Result<(), StoreError> {
        let new_category = !self.categories.contains(&txn.category);
        if new_category {
            self.categories.push(txn.category.clone());
        }
        self.transactions.push(txn);

        if let Err(e) = self.save() {
            self.transactions.pop();
            if new_category {
                self.categories.pop();
            }
            warn!(error = %e, "write failed, transaction rolled back");
            return Err(e);
        }
        Ok(())
    }

    /// All transactions in insertion order, narrowed by `filter`.
    pub fn list_transactions(&self, filter: &TransactionFilter) -> Vec<&Transaction> {
        self.list_transactions_at(filter, Local::now().naive_local())
    }

    pub fn list_transactions_at(
        &self,
        filter: &TransactionFilter,
        now: NaiveDateTime,
    ) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|t| filter.matches(t, now))
            .collect()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Known categories in first-seen order.
    pub fn list_categories(&self) -> &[String] {
        &self.categories
    }

    fn save(&self) -> Result<(), StoreError> {
        let snapshot = Snapshot {
            transacoes: &self.transactions,
            categorias: &self.categories,
        };
        write_atomic(&self.path, &snapshot).map_err(|source| StoreError::StorageWrite {
            path: self.path.clone(),
            source,
        })?;
        debug!(
            path = %self.path.display(),
            transactions = self.transactions.len(),
            "saved data file"
        );
        Ok(())
    }
}

/// Amounts are whole cents.
pub const MAX_DECIMALS: u32 = 2;

/// Exclusive upper bound on a single amount (10^12). Amounts under it with at
/// most two decimals are exact as `f64`, and their sums cannot overflow `Decimal`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Parse a user-entered amount. A lone comma is accepted as the decimal separator.
pub fn parse_amount(raw: &str) -> Result<Decimal, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::MissingField("amount"));
    }
    let normalized = if !raw.contains('.') && raw.matches(',').count() == 1 {
        raw.replace(',', ".")
    } else {
        raw.to_string()
    };
    let amount = Decimal::from_str(&normalized)
        .map_err(|_| ValidationError::InvalidAmount(raw.to_string()))?;
    validate_amount(amount)?;
    Ok(amount)
}

fn validate_amount(amount: Decimal) -> Result<(), ValidationError> {
    if amount < Decimal::ZERO {
        return Err(ValidationError::NegativeAmount);
    }
    if amount.normalize().scale() > MAX_DECIMALS {
        return Err(ValidationError::TooManyDecimals {
            value: amount.to_string(),
            max: MAX_DECIMALS,
        });
    }
    if amount >= MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge(amount.to_string()));
    }
    Ok(())
}

fn derive_categories(transactions: &[Transaction]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for txn in transactions {
        if !categories.contains(&txn.category) {
            categories.push(txn.category.clone());
        }
    }
    categories
}

/// Write to a sibling temp file, then rename over the target.
fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), WriteFailure> {
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let result = write_pretty(&temp_path, value).and_then(|()| {
        fs::rename(&temp_path, path)?;
        Ok(())
    });
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_pretty<T: Serialize>(path: &Path, value: &T) -> Result<(), WriteFailure> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut writer, formatter);
    value.serialize(&mut ser)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests;
