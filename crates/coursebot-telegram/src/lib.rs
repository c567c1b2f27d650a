// SPDX-FileCopyrightText: 2026 Coursebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram transport layer for Coursebot.
//!
//! Wires teloxide long polling to the purchase conversation engine and
//! the access grant resolver, renders menus and conversation prompts,
//! and answers the payment provider's checkout callbacks.

pub mod commands;
pub mod handlers;
pub mod invite;
pub mod keyboard;
pub mod markdown;
pub mod pending;
pub mod texts;

use std::path::PathBuf;
use std::sync::Arc;

use coursebot_config::model::CoursebotConfig;
use coursebot_core::CoursebotError;
use coursebot_flow::PurchaseFlow;
use coursebot_payments::{AccessGrantResolver, Product};
use coursebot_storage::EntitlementStore;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use tracing::info;

use crate::invite::TelegramInviteProvider;
use crate::pending::PendingInvoices;

/// Shared handler dependencies, constructed once at startup and passed
/// into every update handler explicitly.
pub struct BotDeps {
    pub product: Product,
    pub provider_token: String,
    pub lecturer_info: String,
    pub cover_image: Option<PathBuf>,
    pub lecturer_image: Option<PathBuf>,
    pub flow: PurchaseFlow,
    pub resolver: AccessGrantResolver,
    /// Collected profiles awaiting provider confirmation. Set when an
    /// invoice is sent, consumed on confirmation, cleared when the user
    /// starts over or cancels.
    pub pending_invoices: PendingInvoices,
}

/// Run the bot until the process is stopped.
///
/// Requires `bot.token`, `payments.provider_token`, and
/// `group.students_chat_id` to be configured.
pub async fn serve(
    config: &CoursebotConfig,
    store: Arc<EntitlementStore>,
) -> Result<(), CoursebotError> {
    let token = config
        .bot
        .token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| CoursebotError::Config("bot.token is required to serve".into()))?;
    let provider_token = config
        .payments
        .provider_token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            CoursebotError::Config("payments.provider_token is required to serve".into())
        })?;
    let students_chat_id = config.group.students_chat_id.ok_or_else(|| {
        CoursebotError::Config("group.students_chat_id is required to serve".into())
    })?;

    let bot = Bot::new(token);
    let invites = TelegramInviteProvider::new(bot.clone(), students_chat_id);
    let resolver = AccessGrantResolver::new(store, Arc::new(invites));

    let deps = Arc::new(BotDeps {
        product: Product::from(&config.course),
        provider_token: provider_token.to_string(),
        lecturer_info: config.course.lecturer_bio.clone(),
        cover_image: config.media.cover_image.as_deref().map(PathBuf::from),
        lecturer_image: config.media.lecturer_image.as_deref().map(PathBuf::from),
        flow: PurchaseFlow::new(),
        resolver,
        pending_invoices: PendingInvoices::new(),
    });

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(handlers::handle_message))
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .branch(Update::filter_pre_checkout_query().endpoint(handlers::handle_pre_checkout));

    info!("starting Telegram long polling");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![deps])
        .default_handler(|_| async {})
        .error_handler(LoggingErrorHandler::with_custom_text("update handler failed"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
