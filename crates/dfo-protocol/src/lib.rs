//! # dfo-protocol: stream event contract
//!
//! Typed model and tolerant decoding for the channel, routing-queue, case,
//! message, thread and contact lifecycle events published on the DFO
//! platform stream.
//!
//! This is a pure contract crate without a runtime or logging. Decoding
//! is synchronous and every decode returns an independently owned tree, so
//! records can be decoded on any thread.
//!
//! ## Module Overview
//!
//! - [`classification`]: `EventObject` / `EventType` name tables
//! - [`timestamp`]: `Timestamp`, RFC-3339 or `{seconds, nanos}` on the wire
//! - [`change`]: `FieldChange`, scalar change values coerced to text
//! - [`entity`]: payload sub-entities (brand, channel, case, message, ...)
//! - [`envelope`]: `EventEnvelope`, `EventData`, case/contact aliasing
//! - [`decode`]: raw bytes to envelope
//! - [`ids`]: opaque identifier wrappers
//! - [`error`]: `DecodeError`, `DecodeCategory`

pub mod change;
pub mod classification;
pub mod decode;
pub mod entity;
pub mod envelope;
pub mod error;
pub mod ids;
pub mod timestamp;

pub use change::{ChangeValueError, FieldChange};
pub use classification::{EventObject, EventType};
pub use decode::{decode, decode_value};
pub use entity::{
    Abandon, AfterContactWork, AgentContact, Brand, Case, Channel, ContentRemoved,
    CustomerContact, EndUserIdentity, Interaction, Message, MessageContent, MessagePayload,
    ReactionStatistics, Recipient, RecipientCustomer, ReplyToMessage, RoutingQueue, SubQueue,
    Tag, Thread, User,
};
pub use envelope::{EventData, EventEnvelope, reconcile_case};
pub use error::{DecodeCategory, DecodeError, DecodeResult};
pub use ids::{EventId, SequenceToken};
pub use timestamp::{Timestamp, TimestampError};
