//! Order links - Routes a customer's order to the catalog owner's WhatsApp.

use crate::errors::{Error, Result};

const WHATSAPP_BASE_URL: &str = "https://wa.me";

/// Keeps only the decimal digits of a contact handle (`"+91 98765-43210"` → `"919876543210"`).
#[must_use]
pub fn contact_digits(handle: &str) -> String {
    handle.chars().filter(char::is_ascii_digit).collect()
}

/// Pre-filled message a customer sends when ordering a product.
#[must_use]
pub fn order_message(product_name: &str, price: f64, currency_symbol: &str) -> String {
    format!("Hi! I'm interested in ordering: {product_name} - {currency_symbol}{price}")
}

/// Builds a `wa.me` link that opens a chat with the owner, message already typed.
///
/// # Errors
/// Returns `Error::InvalidInput` if the handle contains no digits.
pub fn order_link(
    contact_handle: &str,
    product_name: &str,
    price: f64,
    currency_symbol: &str,
) -> Result<String> {
    let digits = contact_digits(contact_handle);
    if digits.is_empty() {
        return Err(Error::InvalidInput {
            message: format!("Contact handle '{contact_handle}' has no phone number digits"),
        });
    }

    let message = order_message(product_name, price, currency_symbol);
    Ok(format!(
        "{WHATSAPP_BASE_URL}/{digits}?text={}",
        urlencoding::encode(&message)
    ))
}
