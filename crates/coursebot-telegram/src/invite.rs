// SPDX-FileCopyrightText: 2026 Coursebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram implementation of the group-invite provider.

use async_trait::async_trait;
use coursebot_core::{CoursebotError, GroupInviteProvider, UserId};
use teloxide::prelude::*;
use teloxide::types::ChatId;
use tracing::debug;

/// Issues single-use invite links into the students group.
///
/// Each link is member-limited to one join. Idempotent reuse is the
/// store's concern; this provider always mints a fresh link.
pub struct TelegramInviteProvider {
    bot: Bot,
    students_chat_id: ChatId,
}

impl TelegramInviteProvider {
    pub fn new(bot: Bot, students_chat_id: i64) -> Self {
        Self {
            bot,
            students_chat_id: ChatId(students_chat_id),
        }
    }
}

#[async_trait]
impl GroupInviteProvider for TelegramInviteProvider {
    async fn create_invite(&self, user_id: UserId) -> Result<String, CoursebotError> {
        let link = self
            .bot
            .create_chat_invite_link(self.students_chat_id)
            .member_limit(1)
            .await
            .map_err(|e| CoursebotError::Provider {
                message: format!("failed to create chat invite link: {e}"),
                source: Some(Box::new(e)),
            })?;
        debug!(user_id = user_id.0, "chat invite link created");
        Ok(link.invite_link)
    }
}
