use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row, TransactionBehavior};
use tracing::debug;

use super::super::domain::{
    AccountNumber, DiscountTier, Offer, OfferStatus, Region, TicketNumber,
};
use super::{OfferStore, StoreError};

const SELECT_COLUMNS: &str = "SELECT account_number, discount_offer, status, ticket_number, region, date_processed
     FROM discount_offers";

/// Durable store on a single SQLite database file.
pub struct SqliteOfferStore {
    conn: Mutex<Connection>,
}

impl SqliteOfferStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening sqlite offer store");
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("sqlite connection mutex poisoned".to_string()))
    }
}

fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS discount_offers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            account_number TEXT NOT NULL,
            discount_offer TEXT NOT NULL,
            status TEXT NOT NULL,
            ticket_number TEXT NOT NULL,
            region TEXT NOT NULL,
            date_processed TEXT NOT NULL,
            CONSTRAINT unique_blocked_offer_discount
                UNIQUE (account_number, discount_offer, status)
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_discount_offers_account
         ON discount_offers(account_number)",
        [],
    )?;

    Ok(())
}

fn insert_row(conn: &Connection, offer: &Offer) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO discount_offers
         (account_number, discount_offer, status, ticket_number, region, date_processed)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            offer.account_number.as_str(),
            offer.discount_tier.label(),
            offer.status.code(),
            offer.ticket_number.as_str(),
            offer.region.label(),
            offer.date_processed.format("%Y-%m-%d").to_string(),
        ],
    )?;
    Ok(())
}

/// Raw column values, decoded after the query so bad rows surface as `Corrupt`.
struct StoredRow {
    account_number: String,
    discount_offer: String,
    status: String,
    ticket_number: String,
    region: String,
    date_processed: String,
}

impl StoredRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            account_number: row.get(0)?,
            discount_offer: row.get(1)?,
            status: row.get(2)?,
            ticket_number: row.get(3)?,
            region: row.get(4)?,
            date_processed: row.get(5)?,
        })
    }

    fn into_offer(self) -> Result<Offer, StoreError> {
        let discount_tier = DiscountTier::from_label(&self.discount_offer)
            .ok_or_else(|| StoreError::Corrupt(format!("discount '{}'", self.discount_offer)))?;
        let status = OfferStatus::from_code(&self.status)
            .ok_or_else(|| StoreError::Corrupt(format!("status '{}'", self.status)))?;
        let region = Region::from_label(&self.region)
            .ok_or_else(|| StoreError::Corrupt(format!("region '{}'", self.region)))?;
        let date_processed = NaiveDate::parse_from_str(&self.date_processed, "%Y-%m-%d")
            .map_err(|err| StoreError::Corrupt(format!("date '{}': {err}", self.date_processed)))?;

        Ok(Offer {
            account_number: AccountNumber(self.account_number),
            discount_tier,
            status,
            ticket_number: TicketNumber(self.ticket_number),
            region,
            date_processed,
        })
    }
}

fn query_offers(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<Offer>, StoreError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, StoredRow::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter().map(StoredRow::into_offer).collect()
}

fn count_for_account(conn: &Connection, account: &AccountNumber) -> Result<usize, StoreError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM discount_offers WHERE account_number = ?1",
        [account.as_str()],
        |row| row.get(0),
    )?;
    usize::try_from(count).map_err(|_| StoreError::Corrupt(format!("row count {count}")))
}

impl OfferStore for SqliteOfferStore {
    fn insert(&self, offer: Offer) -> Result<Offer, StoreError> {
        let conn = self.lock()?;
        insert_row(&conn, &offer)?;
        Ok(offer)
    }

    fn insert_if_unchanged(
        &self,
        offer: Offer,
        expected_prior: usize,
    ) -> Result<Offer, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let found = count_for_account(&tx, &offer.account_number)?;
        if found != expected_prior {
            return Err(StoreError::StaleSnapshot {
                expected: expected_prior,
                found,
            });
        }

        insert_row(&tx, &offer)?;
        tx.commit()?;
        Ok(offer)
    }

    fn query_by_account(&self, account: &AccountNumber) -> Result<Vec<Offer>, StoreError> {
        let conn = self.lock()?;
        query_offers(
            &conn,
            &format!("{SELECT_COLUMNS} WHERE account_number = ?1 ORDER BY id"),
            [account.as_str()],
        )
    }

    fn query_all(&self) -> Result<Vec<Offer>, StoreError> {
        let conn = self.lock()?;
        query_offers(&conn, &format!("{SELECT_COLUMNS} ORDER BY id"), [])
    }
}
