// SPDX-FileCopyrightText: 2026 Coursebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Invoice composition with fiscalization data.
//!
//! Produces a transport-agnostic [`InvoiceRequest`] from the configured
//! course product and the collected customer profile. The receipt block
//! serializes to the JSON structure the payment provider expects in its
//! `provider_data` field; amounts there are formatted in major currency
//! units with two decimals, while line item prices stay in minor units.

use coursebot_config::model::CourseConfig;
use coursebot_core::CustomerProfile;
use serde::Serialize;

/// The product being invoiced, snapshotted from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub title: String,
    pub description: String,
    pub price_minor: i64,
    pub currency: String,
    pub tax_system_code: u8,
    pub vat_code: u8,
}

impl From<&CourseConfig> for Product {
    fn from(course: &CourseConfig) -> Self {
        Self {
            title: course.title.clone(),
            description: course.description.clone(),
            price_minor: course.price_minor,
            currency: course.currency.clone(),
            tax_system_code: course.tax_system_code,
            vat_code: course.vat_code,
        }
    }
}

/// One labeled price line on the invoice, in minor units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub label: String,
    pub amount_minor: i64,
}

/// A fully composed invoice ready for the transport to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceRequest {
    pub chat_id: i64,
    pub title: String,
    pub description: String,
    /// Opaque payload echoed back with payment updates.
    pub payload: String,
    pub currency: String,
    pub prices: Vec<LineItem>,
    /// The provider collects the customer email for receipt delivery.
    pub need_email: bool,
    pub send_email_to_provider: bool,
    /// Fiscalization data, serialized into the provider's JSON format.
    pub provider_data: ProviderData,
}

/// The `provider_data` JSON body carrying the fiscal receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderData {
    pub receipt: Receipt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub customer: ReceiptCustomer,
    pub items: Vec<ReceiptItem>,
    pub tax_system_code: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptCustomer {
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptItem {
    pub description: String,
    pub quantity: u32,
    pub amount: ReceiptAmount,
    pub vat_code: u8,
    pub payment_mode: &'static str,
    pub payment_subject: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptAmount {
    /// Major units with two decimals, e.g. "10000.00".
    pub value: String,
    pub currency: String,
}

/// Format a minor-unit amount as a major-unit decimal string.
pub fn format_major_units(amount_minor: i64) -> String {
    format!("{}.{:02}", amount_minor / 100, (amount_minor % 100).abs())
}

/// Compose an invoice for one chat from the product and customer profile.
pub fn compose_invoice(
    chat_id: i64,
    product: &Product,
    customer: &CustomerProfile,
) -> InvoiceRequest {
    InvoiceRequest {
        chat_id,
        title: product.title.clone(),
        description: product.description.clone(),
        payload: format!("course_payment_{chat_id}"),
        currency: product.currency.clone(),
        prices: vec![LineItem {
            label: "To pay".to_string(),
            amount_minor: product.price_minor,
        }],
        need_email: true,
        send_email_to_provider: true,
        provider_data: ProviderData {
            receipt: Receipt {
                customer: ReceiptCustomer {
                    full_name: customer.full_name.clone(),
                    email: customer.email.clone(),
                    phone: customer.phone.clone(),
                },
                items: vec![ReceiptItem {
                    description: product.title.clone(),
                    quantity: 1,
                    amount: ReceiptAmount {
                        value: format_major_units(product.price_minor),
                        currency: product.currency.clone(),
                    },
                    vat_code: product.vat_code,
                    payment_mode: "full_payment",
                    payment_subject: "commodity",
                }],
                tax_system_code: product.tax_system_code,
            },
        },
    }
}
