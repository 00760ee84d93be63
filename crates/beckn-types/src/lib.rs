//! Shared wire entities, the context envelope and the error taxonomy used
//! by every crate in the workspace. Nothing in this crate talks to the
//! network or to storage; it is pure domain vocabulary.

mod context;
mod entities;
mod envelope;
mod errors;

pub use context::{parse_iso8601_duration, Context, ContextBuilder};
pub use entities::{
    Billing, Catalog, Descriptor, Fulfillment, Intent, Item, ItemTime, Payment, PaymentStatus, Price, Provider,
    Quantity, Quote, QuoteBreakupLine, Subscriber, SubscriberDomain, SubscriberStatus, SubscriberType, Tag,
    TagGroup, TransactionLogEntry, TransactionStatus,
};
pub use envelope::{Ack, AckResponse, AckStatus, AckValue, Envelope};
pub use errors::{codes, BecknError, ErrorKind, WireError};
