use std::collections::HashMap;

use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::decode_header;
use jsonwebtoken::encode;
use jsonwebtoken::errors::Error as JsonWebTokenError;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;
use super::keys::SigningKeys;

/// Only the HMAC family is ever verified. Any other `alg` in a token header is
/// refused before a key is looked up.
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// JWT token handler for signing and verifying access tokens.
///
/// Signs with HS256 under the active key version, written to the `kid`
/// header. Verifies with whichever configured version the token names.
pub struct JwtHandler {
    active_version: String,
    encoding_key: EncodingKey,
    decoding_keys: HashMap<String, DecodingKey>,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a handler from a validated key ring.
    pub fn new(keys: &SigningKeys) -> Self {
        let decoding_keys = keys
            .iter()
            .map(|(version, secret)| (version.to_string(), DecodingKey::from_secret(secret)))
            .collect();

        Self {
            active_version: keys.active_version().to_string(),
            encoding_key: EncodingKey::from_secret(keys.active_secret()),
            decoding_keys,
            algorithm: Algorithm::HS256,
        }
    }

    /// Key version stamped on newly issued tokens.
    pub fn key_version(&self) -> &str {
        &self.active_version
    }

    /// Sign claims into a compact JWS string.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        let mut header = Header::new(self.algorithm);
        header.kid = Some(self.active_version.clone());

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify a token and return its claims.
    ///
    /// Checks run in a fixed order: structure, algorithm, key version,
    /// signature, then expiry. An expired token with a valid signature is
    /// reported as `TokenExpired`, never as `InvalidSignature`.
    ///
    /// # Errors
    /// * `Malformed` - Token cannot be parsed
    /// * `DisallowedAlgorithm` - Header declares a non-HMAC algorithm
    /// * `UnknownKeyVersion` - Header names a key version that is not configured
    /// * `InvalidSignature` - Signature does not match
    /// * `TokenExpired` - `exp` is not in the future
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        self.decode_at(token, Utc::now().timestamp())
    }

    /// Same as [`JwtHandler::decode`] with an explicit current Unix timestamp.
    pub fn decode_at(&self, token: &str, now: i64) -> Result<Claims, JwtError> {
        let header = decode_header(token).map_err(|e| JwtError::Malformed(e.to_string()))?;

        if !ACCEPTED_ALGORITHMS.contains(&header.alg) {
            return Err(JwtError::DisallowedAlgorithm(format!("{:?}", header.alg)));
        }

        let version = header.kid.unwrap_or_else(|| self.active_version.clone());
        let decoding_key = self
            .decoding_keys
            .get(&version)
            .ok_or_else(|| JwtError::UnknownKeyVersion(version.clone()))?;

        let mut validation = Validation::new(header.alg);
        // Expiry is checked below so that `exp == now` is already expired.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let token_data =
            decode::<Claims>(token, decoding_key, &validation).map_err(Self::classify)?;

        if token_data.claims.is_expired(now) {
            return Err(JwtError::TokenExpired);
        }

        Ok(token_data.claims)
    }

    fn classify(error: JsonWebTokenError) -> JwtError {
        match error.kind() {
            ErrorKind::InvalidSignature => JwtError::InvalidSignature,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                JwtError::DisallowedAlgorithm(error.to_string())
            }
            ErrorKind::ExpiredSignature => JwtError::TokenExpired,
            _ => JwtError::Malformed(error.to_string()),
        }
    }
}
