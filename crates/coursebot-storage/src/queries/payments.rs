// SPDX-FileCopyrightText: 2026 Coursebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Payment record operations.
//!
//! The payments table holds at most one row per user. Repeat purchases
//! are rejected; redelivery of an already-recorded transaction is an
//! idempotent no-op so at-least-once provider notifications are safe.

use coursebot_core::{CoursebotError, PaymentConfirmation, PaymentRecord, UserId};
use rusqlite::params;

use crate::database::Database;

/// Record a confirmed payment. `paid_at` is set server-side in UTC.
///
/// Returns `Ok(())` when the row was inserted, and also when the exact
/// same transaction was already recorded for this user (redelivery).
/// Returns [`CoursebotError::DuplicatePayment`] when the user already
/// has a payment with a different transaction id.
pub async fn record_payment(
    db: &Database,
    confirmation: &PaymentConfirmation,
) -> Result<(), CoursebotError> {
    let c = confirmation.clone();
    db.connection()
        .call(move |conn| {
            let existing: Option<String> = conn
                .query_row(
                    "SELECT transaction_id FROM payments WHERE user_id = ?1",
                    params![c.user_id.0],
                    |row| row.get(0),
                )
                .map(Some)
                .or_else(|e| match e {
                    rusqlite::Error::QueryReturnedNoRows => Ok(None),
                    other => Err(other),
                })?;

            match existing {
                Some(tx) if tx == c.transaction_id => Ok(()),
                Some(_) => Err(tokio_rusqlite::Error::Other(Box::new(
                    CoursebotError::DuplicatePayment { user_id: c.user_id },
                ))),
                None => {
                    conn.execute(
                        "INSERT INTO payments
                         (user_id, display_name, full_name, email, phone, paid_at,
                          transaction_id, amount_minor, currency)
                         VALUES (?1, ?2, ?3, ?4, ?5,
                                 strftime('%Y-%m-%dT%H:%M:%fZ', 'now'), ?6, ?7, ?8)",
                        params![
                            c.user_id.0,
                            c.display_name,
                            c.profile.full_name,
                            c.profile.email,
                            c.profile.phone,
                            c.transaction_id,
                            c.amount_minor,
                            c.currency,
                        ],
                    )?;
                    Ok(())
                }
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get the payment record for a user, if any.
pub async fn get_payment(
    db: &Database,
    user_id: UserId,
) -> Result<Option<PaymentRecord>, CoursebotError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT user_id, display_name, full_name, email, phone, paid_at,
                        transaction_id, amount_minor, currency
                 FROM payments WHERE user_id = ?1",
            )?;
            let result = stmt.query_row(params![user_id.0], |row| {
                Ok(PaymentRecord {
                    user_id: UserId(row.get(0)?),
                    display_name: row.get(1)?,
                    full_name: row.get(2)?,
                    email: row.get(3)?,
                    phone: row.get(4)?,
                    paid_at: row.get(5)?,
                    transaction_id: row.get(6)?,
                    amount_minor: row.get(7)?,
                    currency: row.get(8)?,
                })
            });
            match result {
                Ok(record) => Ok(Some(record)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Check whether a user has a recorded payment.
pub async fn has_paid(db: &Database, user_id: UserId) -> Result<bool, CoursebotError> {
    db.connection()
        .call(move |conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM payments WHERE user_id = ?1)",
                params![user_id.0],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursebot_core::CustomerProfile;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn make_confirmation(user_id: i64, tx: &str) -> PaymentConfirmation {
        PaymentConfirmation {
            user_id: UserId(user_id),
            display_name: Some("ivan".to_string()),
            profile: CustomerProfile {
                full_name: "Ivan Petrov".to_string(),
                email: "a@b.com".to_string(),
                phone: "+79211234567".to_string(),
            },
            transaction_id: tx.to_string(),
            amount_minor: 1_000_000,
            currency: "RUB".to_string(),
        }
    }

    #[tokio::test]
    async fn record_and_get_payment() {
        let (db, _dir) = setup_db().await;
        record_payment(&db, &make_confirmation(1, "tx-1")).await.unwrap();

        let record = get_payment(&db, UserId(1)).await.unwrap().unwrap();
        assert_eq!(record.full_name, "Ivan Petrov");
        assert_eq!(record.email, "a@b.com");
        assert_eq!(record.transaction_id, "tx-1");
        assert_eq!(record.amount_minor, 1_000_000);
        assert!(!record.paid_at.is_empty());

        assert!(has_paid(&db, UserId(1)).await.unwrap());
        assert!(!has_paid(&db, UserId(2)).await.unwrap());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_payment_for_unknown_user_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(get_payment(&db, UserId(99)).await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn same_transaction_redelivery_is_idempotent() {
        let (db, _dir) = setup_db().await;
        let confirmation = make_confirmation(1, "tx-1");
        record_payment(&db, &confirmation).await.unwrap();
        record_payment(&db, &confirmation).await.unwrap();

        let record = get_payment(&db, UserId(1)).await.unwrap().unwrap();
        assert_eq!(record.transaction_id, "tx-1");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn second_purchase_is_rejected_not_overwritten() {
        let (db, _dir) = setup_db().await;
        record_payment(&db, &make_confirmation(1, "tx-1")).await.unwrap();

        let err = record_payment(&db, &make_confirmation(1, "tx-2"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoursebotError::DuplicatePayment { user_id: UserId(1) }
        ));

        // The original audit trail survives.
        let record = get_payment(&db, UserId(1)).await.unwrap().unwrap();
        assert_eq!(record.transaction_id, "tx-1");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn payments_for_different_users_are_independent() {
        let (db, _dir) = setup_db().await;
        record_payment(&db, &make_confirmation(1, "tx-1")).await.unwrap();
        record_payment(&db, &make_confirmation(2, "tx-2")).await.unwrap();
        assert!(has_paid(&db, UserId(1)).await.unwrap());
        assert!(has_paid(&db, UserId(2)).await.unwrap());
        db.close().await.unwrap();
    }
}
