use crate::domain::payment::PaymentRecord;
use crate::domain::ports::RecordStore;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, IteratorMode, Options};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Column Family holding payment records keyed by arrival sequence.
pub const CF_RECORDS: &str = "records";

/// A persistent record store implementation using RocksDB.
///
/// Keys are big-endian `u64` sequence numbers, so RocksDB's byte ordering is
/// arrival ordering and a reverse scan yields the most recent record first.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>` and counter).
#[derive(Clone)]
pub struct RocksDbRecordStore {
    db: Arc<DB>,
    next_seq: Arc<AtomicU64>,
}

impl RocksDbRecordStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures the "records" column family exists and resumes the sequence after
    /// the highest key already stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_records = ColumnFamilyDescriptor::new(CF_RECORDS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_records])?;

        let next_seq = {
            let cf = records_cf(&db)?;
            match db.iterator_cf(cf, IteratorMode::End).next() {
                Some(item) => {
                    let (key, _) = item?;
                    decode_seq(&key)? + 1
                }
                None => 0,
            }
        };

        Ok(Self {
            db: Arc::new(db),
            next_seq: Arc::new(AtomicU64::new(next_seq)),
        })
    }
}

fn records_cf(db: &DB) -> Result<&rocksdb::ColumnFamily> {
    db.cf_handle(CF_RECORDS).ok_or_else(|| {
        PaymentError::InternalError(Box::new(std::io::Error::other(
            "Records column family not found",
        )))
    })
}

fn decode_seq(key: &[u8]) -> Result<u64> {
    let bytes: [u8; 8] = key.try_into().map_err(|_| {
        PaymentError::StoreError(format!("Unexpected record key length {}", key.len()))
    })?;
    Ok(u64::from_be_bytes(bytes))
}

#[async_trait]
impl RecordStore for RocksDbRecordStore {
    async fn append(&self, record: PaymentRecord) -> Result<()> {
        let cf = records_cf(&self.db)?;
        let value = serde_json::to_vec(&record).map_err(|e| {
            PaymentError::InternalError(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization error: {}", e),
            )))
        })?;

        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        self.db.put_cf(cf, seq.to_be_bytes(), value)?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<PaymentRecord>> {
        let cf = records_cf(&self.db)?;

        let mut records = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::End) {
            let (_key, value) = item.map_err(|e| {
                PaymentError::InternalError(Box::new(std::io::Error::other(format!(
                    "RocksDB iteration error: {}",
                    e
                ))))
            })?;
            let record: PaymentRecord = serde_json::from_slice(&value).map_err(|e| {
                PaymentError::InternalError(Box::new(std::io::Error::other(format!(
                    "Failed to deserialize payment record: {}",
                    e
                ))))
            })?;
            records.push(record);
        }

        Ok(records)
    }
}
