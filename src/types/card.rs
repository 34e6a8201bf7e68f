//! Credit card value object
//!
//! Holds card data for merchant payments and validates the number with the
//! Luhn algorithm at construction. A card that fails the check never exists
//! as a value.

use crate::{Error, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde_json::{Map, Value};

/// Validated credit card
#[derive(Debug, Clone)]
pub struct Card {
    number: String,
    holder: String,
    exp_month: String,
    exp_year: String,
    cvv: String,
}

impl Card {
    /// Build a card from its number, holder name, `MM/YY` expiration date
    /// and CVV.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCard`] when the expiration date is not in
    /// `MM/YY` form or the number fails the Luhn check.
    pub fn new(
        number: impl Into<String>,
        holder: impl Into<String>,
        expiration: &str,
        cvv: impl Into<String>,
    ) -> Result<Self> {
        let number = number.into();

        let (exp_month, exp_year) = expiration
            .split_once('/')
            .ok_or_else(|| Error::invalid_card("expiration date must be in MM/YY format"))?;

        if !luhn_valid(&number) {
            return Err(Error::invalid_card(
                "The provided card number cannot be verified with the Luhn algorithm",
            ));
        }

        Ok(Self {
            number,
            holder: holder.into(),
            exp_month: exp_month.to_string(),
            exp_year: exp_year.to_string(),
            cvv: cvv.into(),
        })
    }

    /// Card number
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Holder name as printed on the card
    pub fn holder(&self) -> &str {
        &self.holder
    }

    /// Expiration date as a (month, year) pair
    pub fn expiration(&self) -> (&str, &str) {
        (&self.exp_month, &self.exp_year)
    }

    /// CVV number
    pub fn cvv(&self) -> &str {
        &self.cvv
    }

    /// Card fields keyed the way the payment endpoint expects them
    pub fn to_params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("accountNumber".to_string(), Value::from(self.number.clone()));
        params.insert("nameCard".to_string(), Value::from(self.holder.clone()));
        params.insert(
            "expirationMonth".to_string(),
            Value::from(self.exp_month.clone()),
        );
        params.insert(
            "expirationYear".to_string(),
            Value::from(self.exp_year.clone()),
        );
        params.insert("cvNumber".to_string(), Value::from(self.cvv.clone()));
        params
    }

    /// Encode the card as an opaque base64 token
    pub fn encode_token(&self) -> Result<String> {
        let json = serde_json::to_vec(&self.to_params())?;
        Ok(BASE64.encode(json))
    }

    /// Decode a base64 card token back into its parameter map
    pub fn decode_token(token: &str) -> Result<Map<String, Value>> {
        let bytes = BASE64
            .decode(token)
            .map_err(|e| Error::invalid_card(format!("card token is not valid base64: {}", e)))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Luhn checksum over a digits-only card number
fn luhn_valid(number: &str) -> bool {
    if number.is_empty() {
        return false;
    }

    let mut checksum = 0u32;

    for (i, ch) in number.chars().rev().enumerate() {
        let Some(digit) = ch.to_digit(10) else {
            return false;
        };

        checksum += if i % 2 == 1 {
            let doubled = digit * 2;
            if doubled >= 10 { doubled - 9 } else { doubled }
        } else {
            digit
        };
    }

    checksum % 10 == 0
}
