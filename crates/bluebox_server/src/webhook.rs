//! Payment webhook signatures and event payloads.

use bluebox_error::{PaymentError, PaymentErrorKind};
use ring::hmac;
use serde::Deserialize;
use serde_json::Value;
use subtle::ConstantTimeEq;

/// Header carrying the hex HMAC-SHA256 of the raw body.
pub const SIGNATURE_HEADER: &str = "x-razorpay-signature";

/// Verifies webhook bodies against the shared secret.
///
/// ```
/// use bluebox_server::SignatureVerifier;
///
/// let verifier = SignatureVerifier::new("whsec");
/// let body = br#"{"event":"payment.captured"}"#;
/// let signature = verifier.sign(body);
/// assert!(verifier.verify(Some(&signature), body).is_ok());
/// assert!(verifier.verify(Some("00"), body).is_err());
/// ```
pub struct SignatureVerifier {
    key: hmac::Key,
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier").finish_non_exhaustive()
    }
}

impl SignatureVerifier {
    /// Verifier for `secret`.
    pub fn new(secret: &str) -> Self {
        Self {
            key: hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes()),
        }
    }

    /// Hex signature of `body`.
    pub fn sign(&self, body: &[u8]) -> String {
        hex::encode(hmac::sign(&self.key, body).as_ref())
    }

    /// Check the signature header against `body` in constant time.
    #[track_caller]
    pub fn verify(&self, signature: Option<&str>, body: &[u8]) -> Result<(), PaymentError> {
        let Some(signature) = signature.map(str::trim).filter(|s| !s.is_empty()) else {
            return Err(PaymentError::new(PaymentErrorKind::MissingSignature));
        };
        let expected = self.sign(body);
        let matches: bool = expected
            .as_bytes()
            .ct_eq(signature.to_ascii_lowercase().as_bytes())
            .into();
        if matches {
            Ok(())
        } else {
            Err(PaymentError::new(PaymentErrorKind::InvalidSignature))
        }
    }
}

/// Envelope of every webhook delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    /// Event name, e.g. `payment.captured`
    pub event: String,
    /// Event-specific body
    #[serde(default)]
    pub payload: Value,
}

/// `payload.payment.entity` of payment events.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentEntity {
    /// Payment identifier
    pub id: String,
    /// Amount in the smallest currency unit
    #[serde(default)]
    pub amount: Option<u64>,
    /// Failure description on `payment.failed`
    #[serde(default)]
    pub error_description: Option<String>,
    /// Checkout notes attached by the client
    #[serde(default)]
    pub notes: PaymentNotes,
}

/// Notes the checkout page attaches to a payment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentNotes {
    /// Account to upgrade
    #[serde(default)]
    pub user_id: Option<String>,
    /// `"monthly"` or `"yearly"`
    #[serde(default)]
    pub billing_cycle: Option<String>,
    /// Contact address for newly created records
    #[serde(default)]
    pub email: Option<String>,
}

impl WebhookEvent {
    /// Decode a verified body.
    #[track_caller]
    pub fn from_slice(body: &[u8]) -> Result<Self, PaymentError> {
        serde_json::from_slice(body)
            .map_err(|e| PaymentError::new(PaymentErrorKind::MalformedEvent(e.to_string())))
    }

    /// The payment entity, for payment events.
    #[track_caller]
    pub fn payment(&self) -> Result<PaymentEntity, PaymentError> {
        let entity = self
            .payload
            .pointer("/payment/entity")
            .cloned()
            .ok_or_else(|| {
                PaymentError::new(PaymentErrorKind::MalformedEvent(
                    "missing payload.payment.entity".to_string(),
                ))
            })?;
        serde_json::from_value(entity)
            .map_err(|e| PaymentError::new(PaymentErrorKind::MalformedEvent(e.to_string())))
    }
}
