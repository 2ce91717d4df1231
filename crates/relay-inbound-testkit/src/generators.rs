//! Proptest generators for property-based testing.

use proptest::prelude::*;

use relay_inbound_core::{InboundBatch, MessageContainer, Peer, Submitter, ValidationError};

/// Generate a non-empty peer identifier.
pub fn peer() -> impl Strategy<Value = Peer> {
    "[a-z][a-z0-9-]{0,15}".prop_map(Peer::from)
}

/// Generate a non-empty submitter address.
pub fn submitter() -> impl Strategy<Value = Submitter> {
    prop::collection::vec(any::<u8>(), 1..=32).prop_map(Submitter::from)
}

/// Generate a non-empty opaque message.
pub fn message() -> impl Strategy<Value = String> {
    "[ -~]{1,64}"
}

/// Generate a valid sequence number.
pub fn seq() -> impl Strategy<Value = i64> {
    0i64..=i64::MAX
}

/// Generate an absent or explicitly empty list.
pub fn absent_or_empty<T: std::fmt::Debug + Clone + 'static>() -> impl Strategy<Value = Option<Vec<T>>> {
    prop_oneof![Just(None), Just(Some(Vec::new()))]
}

/// Parameters for a structurally valid batch.
#[derive(Debug, Clone)]
pub struct BatchParams {
    pub peer: Peer,
    pub messages: Vec<(String, i64)>,
    pub ack: i64,
    pub submitter: Submitter,
}

impl Arbitrary for BatchParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            peer(),
            prop::collection::vec((message(), seq()), 0..16),
            0i64..=i64::MAX,
            submitter(),
        )
            .prop_map(|(peer, messages, ack, submitter)| BatchParams {
                peer,
                messages,
                ack,
                submitter,
            })
            .boxed()
    }
}

/// Build a batch from parameters.
pub fn batch_from_params(params: &BatchParams) -> InboundBatch {
    let container = MessageContainer {
        messages: Some(params.messages.iter().map(|(m, _)| m.clone()).collect()),
        nums: Some(params.messages.iter().map(|(_, n)| *n).collect()),
        ack: params.ack,
    };
    InboundBatch::build(params.peer.clone(), container, params.submitter.clone())
}

/// Generate any batch, well-formed or not.
///
/// Covers empty fields, negative values, mismatched lengths and absent lists.
pub fn any_batch() -> impl Strategy<Value = InboundBatch> {
    (
        ".{0,12}",
        prop::option::of(prop::collection::vec(".{0,12}", 0..8)),
        prop::option::of(prop::collection::vec(any::<i64>(), 0..8)),
        any::<i64>(),
        prop::collection::vec(any::<u8>(), 0..24),
    )
        .prop_map(|(peer, messages, nums, ack, submitter)| InboundBatch {
            peer: Peer::new(peer),
            messages,
            nums,
            ack,
            submitter: Submitter::from(submitter),
        })
}

/// The single invariant a generated batch breaks.
#[derive(Debug, Clone, Copy)]
pub enum Violation {
    Submitter,
    Peer,
    Length,
    Message,
    Sequence,
    Ack,
}

fn violation() -> impl Strategy<Value = Violation> {
    prop_oneof![
        Just(Violation::Submitter),
        Just(Violation::Peer),
        Just(Violation::Length),
        Just(Violation::Message),
        Just(Violation::Sequence),
        Just(Violation::Ack),
    ]
}

/// Generate a batch that breaks exactly one invariant, with the error the
/// validator must report for it.
pub fn single_violation() -> impl Strategy<Value = (InboundBatch, ValidationError)> {
    (
        any::<BatchParams>(),
        violation(),
        any::<prop::sample::Index>(),
        i64::MIN..0,
    )
        .prop_map(|(mut params, violation, slot, negative)| {
            // Slot-level violations need at least one slot.
            if params.messages.is_empty() {
                params.messages.push(("m".to_string(), 0));
            }
            let index = slot.index(params.messages.len());
            let mut batch = batch_from_params(&params);

            let expected = match violation {
                Violation::Submitter => {
                    batch.submitter = Submitter::empty();
                    ValidationError::InvalidSubmitter
                }
                Violation::Peer => {
                    batch.peer = Peer::default();
                    ValidationError::EmptyPeer
                }
                Violation::Length => {
                    let nums = batch.nums.get_or_insert_with(Vec::new);
                    nums.pop();
                    ValidationError::LengthMismatch {
                        messages: params.messages.len(),
                        nums: params.messages.len() - 1,
                    }
                }
                Violation::Message => {
                    if let Some(messages) = batch.messages.as_mut() {
                        messages[index].clear();
                    }
                    ValidationError::EmptyMessage { index }
                }
                Violation::Sequence => {
                    if let Some(nums) = batch.nums.as_mut() {
                        nums[index] = negative;
                    }
                    ValidationError::NegativeSequence {
                        index,
                        num: negative,
                    }
                }
                Violation::Ack => {
                    batch.ack = negative;
                    ValidationError::NegativeAck(negative)
                }
            };

            (batch, expected)
        })
}
