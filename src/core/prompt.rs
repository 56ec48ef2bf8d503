//! Recognition of interactive prompts in a child's error stream
//!
//! `git svn` asks for a password and for certificate-trust decisions on its
//! error stream, without a trailing newline, then blocks reading its input.
//! [`PromptScanner`] is fed one byte at a time and reports the first
//! recognized prompt of the current turn.

use crate::constants::*;

/// Classification of a recognized prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptSignal {
    /// Nothing recognized. Initial and terminal state of a session.
    #[default]
    None,
    /// The child asks for the transport password.
    PasswordRequested,
    /// Certificate trust with reject / temporary / permanent options.
    CertificateDecisionFull,
    /// Certificate trust with reject / temporary options only.
    CertificateDecisionLimited,
}

impl PromptSignal {
    /// Fixed answer for the certificate prompts; `None` for the others.
    ///
    /// The limited prompt has no permanent option, so it is accepted
    /// temporarily.
    pub fn fixed_response(self) -> Option<&'static str> {
        match self {
            PromptSignal::CertificateDecisionFull => Some(RESPONSE_ACCEPT_PERMANENTLY),
            PromptSignal::CertificateDecisionLimited => Some(RESPONSE_ACCEPT_TEMPORARILY),
            PromptSignal::None | PromptSignal::PasswordRequested => None,
        }
    }

    pub fn is_none(self) -> bool {
        self == PromptSignal::None
    }
}

/// Prompt phrases in priority order.
const PROMPTS: [(&str, PromptSignal); 3] = [
    (PROMPT_PASSWORD, PromptSignal::PasswordRequested),
    (PROMPT_CERTIFICATE_FULL, PromptSignal::CertificateDecisionFull),
    (PROMPT_CERTIFICATE_LIMITED, PromptSignal::CertificateDecisionLimited),
];

/// Rolling per-turn buffer of error-stream bytes.
///
/// The buffer is tested after every byte, so a phrase is always seen at the
/// moment its last byte arrives; only the tail needs checking.
#[derive(Debug, Default)]
pub struct PromptScanner {
    buffer: Vec<u8>,
}

impl PromptScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one byte and reports a prompt completed by it.
    pub fn feed(&mut self, byte: u8) -> PromptSignal {
        self.buffer.push(byte);
        PROMPTS
            .iter()
            .find(|(phrase, _)| self.buffer.ends_with(phrase.as_bytes()))
            .map(|(_, signal)| *signal)
            .unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
