// SPDX-FileCopyrightText: 2026 Coursebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Update handlers: message routing, the purchase conversation,
//! payment callbacks, and menu rendering.
//!
//! Handlers receive their collaborators through [`BotDeps`], built once
//! at startup; nothing here reaches for globals.

use std::sync::Arc;

use coursebot_core::{CoursebotError, CustomerProfile, FlowState, PaymentConfirmation, UserId};
use coursebot_flow::{FlowInput, FlowReply};
use coursebot_payments::{PaymentOutcome, compose_invoice};
use metrics::counter;
use teloxide::prelude::*;
use teloxide::types::{
    CallbackQuery, ChatId, ChatKind, InputFile, LabeledPrice, ParseMode, PreCheckoutQuery,
    ReplyMarkup, SuccessfulPayment, User,
};
use tracing::{debug, error, info, warn};

use crate::commands::{self, Command, MenuAction, Routed};
use crate::{BotDeps, keyboard, markdown, texts};

fn channel_err(message: &str, e: teloxide::RequestError) -> CoursebotError {
    CoursebotError::Channel {
        message: format!("{message}: {e}"),
        source: Some(Box::new(e)),
    }
}

fn is_private(msg: &Message) -> bool {
    matches!(msg.chat.kind, ChatKind::Private(_))
}

/// The name Telegram reports for a user, offered as the known-name
/// shortcut during the name step.
fn known_name(user: &User) -> String {
    user.full_name()
}

/// Send `text` as MarkdownV2, falling back to plain text when the
/// escaped form is rejected.
async fn send_markdown(
    bot: &Bot,
    chat_id: ChatId,
    text: &str,
    markup: Option<ReplyMarkup>,
) -> Result<(), CoursebotError> {
    let escaped = markdown::escape_markdown_v2(text);
    let mut request = bot
        .send_message(chat_id, &escaped)
        .parse_mode(ParseMode::MarkdownV2);
    if let Some(markup) = markup.clone() {
        request = request.reply_markup(markup);
    }
    if let Err(e) = request.await {
        warn!(error = %e, "MarkdownV2 send failed, retrying as plain text");
        let mut request = bot.send_message(chat_id, text);
        if let Some(markup) = markup {
            request = request.reply_markup(markup);
        }
        request
            .await
            .map_err(|e| channel_err("failed to send message", e))?;
    }
    Ok(())
}

/// The main menu keyboard for a user, switching the purchase/access row
/// on their entitlement.
async fn main_menu_for(
    deps: &BotDeps,
    user_id: UserId,
) -> Result<ReplyMarkup, CoursebotError> {
    let status = deps.resolver.entitlement_status(user_id).await?;
    Ok(keyboard::main_menu(status.has_paid).into())
}

/// The text shown to the user when a handler fails. Always the generic
/// apology: internal detail goes to the log, never into the chat.
fn failure_text(_error: &CoursebotError) -> &'static str {
    texts::GENERAL_ERROR
}

/// Best-effort delivery of the generic failure message. The transport
/// itself may be the failing part, so delivery errors only log.
async fn report_failure(bot: &Bot, chat_id: ChatId, error: &CoursebotError) {
    if let Err(e) = bot.send_message(chat_id, failure_text(error)).await {
        warn!(chat_id = chat_id.0, error = %e, "failed to deliver the error notice");
    }
}

/// Entry point for message updates. Failures are logged and answered
/// with the generic error message rather than left to time out silently.
pub async fn handle_message(
    bot: Bot,
    msg: Message,
    deps: Arc<BotDeps>,
) -> Result<(), CoursebotError> {
    let chat_id = msg.chat.id;
    if let Err(e) = process_message(&bot, msg, &deps).await {
        error!(chat_id = chat_id.0, error = %e, "message handler failed");
        report_failure(&bot, chat_id, &e).await;
    }
    Ok(())
}

async fn process_message(
    bot: &Bot,
    msg: Message,
    deps: &BotDeps,
) -> Result<(), CoursebotError> {
    // The bot only talks in DMs; the students group stays quiet.
    if !is_private(&msg) {
        return Ok(());
    }
    let Some(user) = msg.from.clone() else {
        return Ok(());
    };
    let user_id = UserId(user.id.0 as i64);
    let chat_id = msg.chat.id;
    counter!("coursebot_messages_total").increment(1);

    if let Some(payment) = msg.successful_payment() {
        return handle_successful_payment(bot, deps, chat_id, &user, payment).await;
    }

    if let Some(contact) = msg.contact() {
        if deps.flow.in_flow(user_id) {
            let reply = deps
                .flow
                .handle(user_id, FlowInput::ContactShared(contact.phone_number.clone()));
            return render_flow_reply(bot, deps, chat_id, user_id, reply).await;
        }
        return Ok(());
    }

    let Some(text) = msg.text() else {
        debug!(user_id = user_id.0, "ignoring unsupported message type");
        return Ok(());
    };

    // An active purchase conversation consumes everything except
    // slash commands.
    if deps.flow.in_flow(user_id) && !text.trim_start().starts_with('/') {
        let reply = deps.flow.handle(user_id, commands::flow_input(text));
        return render_flow_reply(bot, deps, chat_id, user_id, reply).await;
    }

    match commands::route(text) {
        Routed::Command(Command::Start) => {
            send_welcome(bot, deps, chat_id, user_id, texts::WELCOME_NEW).await
        }
        Routed::Command(Command::Help) => {
            let menu = main_menu_for(deps, user_id).await?;
            send_markdown(bot, chat_id, texts::HELP_TEXT, Some(menu)).await
        }
        Routed::Command(Command::Access) => check_access(bot, deps, chat_id, user_id).await,
        Routed::Command(Command::Cancel) => {
            let reply = deps.flow.handle(user_id, FlowInput::Cancel);
            match reply {
                FlowReply::NotInFlow => {
                    let menu = main_menu_for(deps, user_id).await?;
                    send_markdown(bot, chat_id, texts::WELCOME_BACK, Some(menu)).await
                }
                reply => render_flow_reply(bot, deps, chat_id, user_id, reply).await,
            }
        }
        Routed::UnknownCommand(command) => {
            debug!(user_id = user_id.0, command = %command, "unknown command");
            let menu = main_menu_for(deps, user_id).await?;
            send_markdown(bot, chat_id, texts::UNKNOWN_COMMAND, Some(menu)).await
        }
        Routed::Menu(MenuAction::AboutCourse) => {
            let text = if deps.product.description.is_empty() {
                deps.product.title.clone()
            } else {
                deps.product.description.clone()
            };
            send_markdown(bot, chat_id, &text, Some(keyboard::back_button().into())).await
        }
        Routed::Menu(MenuAction::AboutLecturer) => {
            send_about_lecturer(bot, deps, chat_id).await
        }
        Routed::Menu(MenuAction::PurchaseOrAccess) => {
            purchase_or_access(bot, deps, chat_id, user_id, &user).await
        }
        Routed::Plain(_) => {
            let menu = main_menu_for(deps, user_id).await?;
            send_markdown(bot, chat_id, texts::WELCOME_BACK, Some(menu)).await
        }
    }
}

/// Entry point for callback-query updates (the inline back button).
pub async fn handle_callback(
    bot: Bot,
    query: CallbackQuery,
    deps: Arc<BotDeps>,
) -> Result<(), CoursebotError> {
    let chat_id = query.message.as_ref().map(|m| m.chat().id);
    if let Err(e) = process_callback(&bot, query, &deps).await {
        error!(error = %e, "callback handler failed");
        if let Some(chat_id) = chat_id {
            report_failure(&bot, chat_id, &e).await;
        }
    }
    Ok(())
}

async fn process_callback(
    bot: &Bot,
    query: CallbackQuery,
    deps: &BotDeps,
) -> Result<(), CoursebotError> {
    bot.answer_callback_query(query.id.clone())
        .await
        .map_err(|e| channel_err("failed to answer callback query", e))?;

    let Some(chat_id) = query.message.as_ref().map(|m| m.chat().id) else {
        return Ok(());
    };
    let user_id = UserId(query.from.id.0 as i64);

    match query.data.as_deref() {
        Some(keyboard::BACK_CALLBACK) => {
            send_welcome(bot, deps, chat_id, user_id, texts::WELCOME_BACK).await
        }
        other => {
            debug!(user_id = user_id.0, data = ?other, "unknown callback payload");
            Ok(())
        }
    }
}

/// Entry point for pre-checkout queries. Approved unconditionally: no
/// fraud logic in scope, the provider does the charging.
pub async fn handle_pre_checkout(
    bot: Bot,
    query: PreCheckoutQuery,
) -> Result<(), CoursebotError> {
    debug!(user_id = query.from.id.0, "approving pre-checkout query");
    bot.answer_pre_checkout_query(query.id, true)
        .await
        .map_err(|e| channel_err("failed to answer pre-checkout query", e))?;
    Ok(())
}

async fn send_welcome(
    bot: &Bot,
    deps: &BotDeps,
    chat_id: ChatId,
    user_id: UserId,
    text: &str,
) -> Result<(), CoursebotError> {
    let menu = main_menu_for(deps, user_id).await?;
    match deps.cover_image.as_ref().filter(|p| p.exists()) {
        Some(path) => {
            bot.send_photo(chat_id, InputFile::file(path.clone()))
                .caption(markdown::escape_markdown_v2(text))
                .parse_mode(ParseMode::MarkdownV2)
                .reply_markup(menu)
                .await
                .map_err(|e| channel_err("failed to send welcome photo", e))?;
            Ok(())
        }
        None => send_markdown(bot, chat_id, text, Some(menu)).await,
    }
}

async fn send_about_lecturer(
    bot: &Bot,
    deps: &BotDeps,
    chat_id: ChatId,
) -> Result<(), CoursebotError> {
    let text = if deps.lecturer_info.is_empty() {
        texts::LECTURER_INFO_UNSET
    } else {
        deps.lecturer_info.as_str()
    };
    match deps.lecturer_image.as_ref().filter(|p| p.exists()) {
        Some(path) => {
            bot.send_photo(chat_id, InputFile::file(path.clone()))
                .caption(markdown::escape_markdown_v2(text))
                .parse_mode(ParseMode::MarkdownV2)
                .reply_markup(keyboard::back_button())
                .await
                .map_err(|e| channel_err("failed to send lecturer photo", e))?;
            Ok(())
        }
        None => send_markdown(bot, chat_id, text, Some(keyboard::back_button().into())).await,
    }
}

/// The purchase/access menu row: entitled users get their link, others
/// enter the purchase conversation.
async fn purchase_or_access(
    bot: &Bot,
    deps: &BotDeps,
    chat_id: ChatId,
    user_id: UserId,
    user: &User,
) -> Result<(), CoursebotError> {
    let status = deps.resolver.access_status(user_id).await?;
    if status.has_paid {
        let link = status.invite.map(|i| i.invite_token);
        let text = texts::already_purchased(link.as_deref());
        return send_markdown(bot, chat_id, &text, Some(keyboard::main_menu(true).into())).await;
    }
    // Starting over supersedes any invoice the user walked away from.
    deps.pending_invoices.clear(user_id);
    let reply = deps.flow.begin(user_id, Some(known_name(user)));
    render_flow_reply(bot, deps, chat_id, user_id, reply).await
}

async fn check_access(
    bot: &Bot,
    deps: &BotDeps,
    chat_id: ChatId,
    user_id: UserId,
) -> Result<(), CoursebotError> {
    let status = deps.resolver.access_status(user_id).await?;
    let (text, has_paid) = if status.has_paid {
        match status.invite {
            Some(invite) => (texts::access_granted(&invite.invite_token), true),
            None => (texts::ACCESS_SUCCESS_NO_LINK.to_string(), true),
        }
    } else {
        (
            texts::access_not_purchased(
                &deps.product.title,
                &texts::format_price(deps.product.price_minor),
                &deps.product.currency,
            ),
            false,
        )
    };
    send_markdown(bot, chat_id, &text, Some(keyboard::main_menu(has_paid).into())).await
}

/// Keyboard for repeating the current step's prompt after input the
/// step has no handler for.
fn reprompt_markup(state: FlowState, has_known_name: bool) -> ReplyMarkup {
    match state {
        FlowState::AwaitingName => keyboard::name_keyboard(has_known_name).into(),
        FlowState::AwaitingPhone => keyboard::phone_keyboard().into(),
        _ => keyboard::cancel_keyboard().into(),
    }
}

/// Render one conversation step result to the user.
async fn render_flow_reply(
    bot: &Bot,
    deps: &BotDeps,
    chat_id: ChatId,
    user_id: UserId,
    reply: FlowReply,
) -> Result<(), CoursebotError> {
    let (text, markup): (String, ReplyMarkup) = match reply {
        FlowReply::PromptEmail => (
            texts::PROMPT_EMAIL.to_string(),
            keyboard::cancel_keyboard().into(),
        ),
        FlowReply::InvalidEmail => (
            texts::INVALID_EMAIL.to_string(),
            keyboard::cancel_keyboard().into(),
        ),
        FlowReply::PromptName { known_name } => (
            texts::prompt_name(known_name.as_deref()),
            keyboard::name_keyboard(known_name.is_some()).into(),
        ),
        FlowReply::PromptCustomName => (
            texts::PROMPT_CUSTOM_NAME.to_string(),
            keyboard::cancel_keyboard().into(),
        ),
        FlowReply::PromptPhone => (
            texts::PROMPT_PHONE.to_string(),
            keyboard::phone_keyboard().into(),
        ),
        FlowReply::PromptManualPhone => (
            texts::PROMPT_MANUAL_PHONE.to_string(),
            keyboard::cancel_keyboard().into(),
        ),
        FlowReply::InvalidPhone => (
            texts::INVALID_PHONE.to_string(),
            keyboard::cancel_keyboard().into(),
        ),
        FlowReply::Reprompt(state) => (
            texts::USE_BUTTONS.to_string(),
            reprompt_markup(state, deps.flow.known_name(user_id).is_some()),
        ),
        FlowReply::Cancelled => {
            deps.pending_invoices.clear(user_id);
            let menu = main_menu_for(deps, user_id).await?;
            (texts::PAYMENT_CANCELLED.to_string(), menu)
        }
        FlowReply::NotInFlow => return Ok(()),
        FlowReply::Completed(profile) => {
            return send_invoice_for(bot, deps, chat_id, user_id, profile).await;
        }
    };
    send_markdown(bot, chat_id, &text, Some(markup)).await
}

/// Hand a completed profile to the payment provider as an invoice.
///
/// The conversation session is already gone; an issuance failure only
/// produces the generic payment-error message and the user re-initiates
/// the purchase.
async fn send_invoice_for(
    bot: &Bot,
    deps: &BotDeps,
    chat_id: ChatId,
    user_id: UserId,
    profile: CustomerProfile,
) -> Result<(), CoursebotError> {
    let invoice = compose_invoice(chat_id.0, &deps.product, &profile);
    let provider_data = serde_json::to_string(&invoice.provider_data)
        .map_err(|e| CoursebotError::Internal(format!("failed to serialize receipt: {e}")))?;
    let prices: Vec<LabeledPrice> = invoice
        .prices
        .iter()
        .map(|p| LabeledPrice {
            label: p.label.clone(),
            amount: p.amount_minor as _,
        })
        .collect();

    // Remember the collected profile until the provider confirms.
    deps.pending_invoices.set(user_id, profile);

    send_markdown(
        bot,
        chat_id,
        texts::PAYMENT_INFO_THANKS,
        Some(keyboard::main_menu(false).into()),
    )
    .await?;

    let sent = bot
        .send_invoice(
            chat_id,
            invoice.title,
            invoice.description,
            invoice.payload,
            invoice.currency,
            prices,
        )
        .provider_token(deps.provider_token.clone())
        .need_email(true)
        .send_email_to_provider(true)
        .provider_data(provider_data)
        .await;

    match sent {
        Ok(_) => {
            counter!("coursebot_invoices_sent_total").increment(1);
            info!(user_id = user_id.0, "invoice sent");
            Ok(())
        }
        Err(e) => {
            error!(user_id = user_id.0, error = %e, "failed to send invoice");
            deps.pending_invoices.clear(user_id);
            send_markdown(
                bot,
                chat_id,
                texts::PAYMENT_ERROR,
                Some(keyboard::main_menu(false).into()),
            )
            .await
        }
    }
}

async fn handle_successful_payment(
    bot: &Bot,
    deps: &BotDeps,
    chat_id: ChatId,
    user: &User,
    payment: &SuccessfulPayment,
) -> Result<(), CoursebotError> {
    let user_id = UserId(user.id.0 as i64);
    counter!("coursebot_payments_confirmed_total").increment(1);
    info!(
        user_id = user_id.0,
        transaction_id = %payment.provider_payment_charge_id,
        "payment confirmed by provider"
    );

    let profile = match deps.pending_invoices.take(user_id) {
        Some(profile) => profile,
        None => {
            // Restart between invoice and confirmation: the collected
            // profile is gone. Record what the transport still knows.
            warn!(user_id = user_id.0, "no pending profile for confirmed payment");
            CustomerProfile {
                full_name: known_name(user),
                email: String::new(),
                phone: String::new(),
            }
        }
    };

    let confirmation = PaymentConfirmation {
        user_id,
        display_name: user.username.clone(),
        profile,
        transaction_id: payment.provider_payment_charge_id.clone(),
        amount_minor: i64::from(payment.total_amount),
        currency: payment.currency.to_string(),
    };

    let text = match deps.resolver.confirm_payment(&confirmation).await? {
        PaymentOutcome::Granted(invite) => {
            texts::payment_success(&confirmation.transaction_id, &invite.invite_token)
        }
        PaymentOutcome::GrantedWithoutInvite => {
            texts::payment_success_no_link(&confirmation.transaction_id)
        }
        PaymentOutcome::AlreadyEntitled => {
            let status = deps.resolver.access_status(user_id).await?;
            let link = status.invite.map(|i| i.invite_token);
            texts::already_purchased(link.as_deref())
        }
    };
    send_markdown(bot, chat_id, &text, Some(keyboard::main_menu(true).into())).await
}
