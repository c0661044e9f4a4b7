// Transport boundary: envelope format and the domain-event codec.
//
// The core never reads envelope internals; it consumes decoded DomainEvents.
// This module pins down the contract the transport has to meet.

pub mod envelope;

pub use envelope::{DecodeError, MessageAdapter, TransportMessage};
