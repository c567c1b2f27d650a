// SPDX-FileCopyrightText: 2026 Coursebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Access invitation operations.
//!
//! At most one invitation row exists per user. Insertion uses
//! `ON CONFLICT DO NOTHING` followed by a read-back inside a single
//! writer-thread call, so two racing issuance attempts both observe the
//! first-written token.

use coursebot_core::{AccessInvitation, CoursebotError, UserId};
use rusqlite::params;

use crate::database::Database;

/// Get the stored invitation for a user, if any.
pub async fn get_invite(
    db: &Database,
    user_id: UserId,
) -> Result<Option<AccessInvitation>, CoursebotError> {
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT user_id, invite_token, issued_at FROM invites WHERE user_id = ?1",
                params![user_id.0],
                |row| {
                    Ok(AccessInvitation {
                        user_id: UserId(row.get(0)?),
                        invite_token: row.get(1)?,
                        issued_at: row.get(2)?,
                    })
                },
            );
            match result {
                Ok(invite) => Ok(Some(invite)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Store an invitation for a user unless one already exists, and return
/// whichever row ended up stored. `issued_at` is set server-side in UTC.
pub async fn insert_invite_if_absent(
    db: &Database,
    user_id: UserId,
    token: &str,
) -> Result<AccessInvitation, CoursebotError> {
    let token = token.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO invites (user_id, invite_token, issued_at)
                 VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
                 ON CONFLICT (user_id) DO NOTHING",
                params![user_id.0, token],
            )?;
            let stored = conn.query_row(
                "SELECT user_id, invite_token, issued_at FROM invites WHERE user_id = ?1",
                params![user_id.0],
                |row| {
                    Ok(AccessInvitation {
                        user_id: UserId(row.get(0)?),
                        invite_token: row.get(1)?,
                        issued_at: row.get(2)?,
                    })
                },
            )?;
            Ok(stored)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursebot_core::{CustomerProfile, PaymentConfirmation};
    use tempfile::tempdir;

    async fn setup_paid_user(user_id: i64) -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        // Invites reference payments, so seed a payment row first.
        crate::queries::payments::record_payment(
            &db,
            &PaymentConfirmation {
                user_id: UserId(user_id),
                display_name: None,
                profile: CustomerProfile {
                    full_name: "Ivan Petrov".to_string(),
                    email: "a@b.com".to_string(),
                    phone: "+79211234567".to_string(),
                },
                transaction_id: format!("tx-{user_id}"),
                amount_minor: 1_000_000,
                currency: "RUB".to_string(),
            },
        )
        .await
        .unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn get_invite_for_unknown_user_returns_none() {
        let (db, _dir) = setup_paid_user(1).await;
        assert!(get_invite(&db, UserId(1)).await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn insert_then_get_round_trips() {
        let (db, _dir) = setup_paid_user(1).await;
        let stored = insert_invite_if_absent(&db, UserId(1), "https://t.me/+abc")
            .await
            .unwrap();
        assert_eq!(stored.invite_token, "https://t.me/+abc");
        assert!(!stored.issued_at.is_empty());

        let fetched = get_invite(&db, UserId(1)).await.unwrap().unwrap();
        assert_eq!(fetched, stored);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn second_insert_keeps_first_token() {
        let (db, _dir) = setup_paid_user(1).await;
        let first = insert_invite_if_absent(&db, UserId(1), "https://t.me/+first")
            .await
            .unwrap();
        let second = insert_invite_if_absent(&db, UserId(1), "https://t.me/+second")
            .await
            .unwrap();
        assert_eq!(second.invite_token, "https://t.me/+first");
        assert_eq!(first, second);
        db.close().await.unwrap();
    }
}
