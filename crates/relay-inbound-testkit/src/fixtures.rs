//! Test fixtures and helpers.
//!
//! A [`RelayFixture`] stands in for a relay operator: it owns an Ed25519
//! key, derives its submitter address from it, and signs batches over
//! [`sign_bytes`]. [`SignedBatch::open`] plays the transaction layer on the
//! other side, reconstructing the batch from the transported bytes and
//! checking the signature against freshly computed sign bytes.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};

use relay_inbound_core::{
    canonical_bytes, decode_batch, sign_bytes, InboundBatch, MessageContainer, Peer, Submitter,
};

/// A relay identity that builds and signs batches for one peer.
pub struct RelayFixture {
    pub signing_key: SigningKey,
    pub peer: Peer,
}

impl RelayFixture {
    /// Create a fixture with a random key.
    pub fn new(peer: impl Into<Peer>) -> Self {
        let mut rng = rand::thread_rng();
        Self {
            signing_key: SigningKey::generate(&mut rng),
            peer: peer.into(),
        }
    }

    /// Create with a deterministic key from seed.
    pub fn with_seed(seed: [u8; 32], peer: impl Into<Peer>) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&seed),
            peer: peer.into(),
        }
    }

    /// The submitter address: the relay's raw public key bytes.
    pub fn submitter(&self) -> Submitter {
        Submitter::from_bytes(self.signing_key.verifying_key().to_bytes().to_vec())
    }

    /// Build a batch from `(message, num)` pairs.
    pub fn batch(&self, messages: &[(&str, i64)], ack: i64) -> InboundBatch {
        let container = MessageContainer {
            messages: Some(messages.iter().map(|(m, _)| m.to_string()).collect()),
            nums: Some(messages.iter().map(|(_, n)| *n).collect()),
            ack,
        };
        InboundBatch::build(self.peer.clone(), container, self.submitter())
    }

    /// Build a batch with absent message lists (an ack-only delivery).
    pub fn ack_only(&self, ack: i64) -> InboundBatch {
        InboundBatch::build(
            self.peer.clone(),
            MessageContainer {
                messages: None,
                nums: None,
                ack,
            },
            self.submitter(),
        )
    }

    /// Sign a batch for transport.
    pub fn sign(&self, batch: &InboundBatch) -> SignedBatch {
        let signature = self.signing_key.sign(&sign_bytes(batch));
        SignedBatch {
            bytes: canonical_bytes(batch),
            signature: signature.to_bytes(),
            public_key: self.signing_key.verifying_key().to_bytes(),
        }
    }
}

/// A batch as it travels: canonical bytes plus the relay's signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedBatch {
    pub bytes: Vec<u8>,
    pub signature: [u8; 64],
    pub public_key: [u8; 32],
}

impl SignedBatch {
    /// Reconstruct the batch and check its signature.
    ///
    /// Returns `None` if the bytes do not decode, the signature does not
    /// verify, or the batch names a submitter other than the signing key.
    pub fn open(&self) -> Option<InboundBatch> {
        let batch = decode_batch(&self.bytes).ok()?;
        let key = VerifyingKey::from_bytes(&self.public_key).ok()?;
        let signature = Signature::from_bytes(&self.signature);

        key.verify(&sign_bytes(&batch), &signature).ok()?;

        if batch.submitter.as_bytes() != self.public_key.as_slice() {
            return None;
        }
        Some(batch)
    }
}

/// Create several relay fixtures with distinct deterministic keys.
pub fn multi_relay_fixtures(count: usize) -> Vec<RelayFixture> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            RelayFixture::with_seed(seed, format!("chain-{}", i))
        })
        .collect()
}
