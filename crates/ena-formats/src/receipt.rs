//! Submission receipt well-formedness check.

use log::{debug, info};

use crate::error::{EnaError, Result};
use crate::model::XmlElement;
use crate::xml::parse_document;

/// Message returned for any receipt that does not parse.
pub const INVALID_RECEIPT_MESSAGE: &str = "ENA receipt is not a valid xml form.";

/// Parse progress of a receipt. `Parsed` and `Rejected` are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptState {
    Unparsed,
    Parsed(XmlElement),
    Rejected,
}

/// Receipt text plus its parse state.
#[derive(Debug, Clone)]
pub struct Receipt {
    text: String,
    state: ReceiptState,
}

impl Receipt {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            state: ReceiptState::Unparsed,
        }
    }

    pub fn state(&self) -> &ReceiptState {
        &self.state
    }

    /// Parse once; later calls return the stored outcome.
    ///
    /// No repair is attempted: any syntax problem rejects the whole receipt.
    pub fn parse(&mut self) -> Result<&XmlElement> {
        if self.state == ReceiptState::Unparsed {
            self.state = match parse_document(&self.text) {
                Ok(document) => {
                    info!("Receipt parsed with root <{}>", document.name);
                    ReceiptState::Parsed(document)
                }
                Err(e) => {
                    debug!("Rejecting receipt: {}", e);
                    ReceiptState::Rejected
                }
            };
        }

        match &self.state {
            ReceiptState::Parsed(document) => Ok(document),
            _ => Err(EnaError::Validation(INVALID_RECEIPT_MESSAGE.to_string())),
        }
    }

    /// Parse if needed and take the element tree.
    pub fn into_document(mut self) -> Result<XmlElement> {
        self.parse()?;
        match self.state {
            ReceiptState::Parsed(document) => Ok(document),
            _ => Err(EnaError::Validation(INVALID_RECEIPT_MESSAGE.to_string())),
        }
    }
}
