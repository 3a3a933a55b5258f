//! Event intake: wire types, the submit handle and the single-consumer loop.
//!
//! Transports submit [`InboundEvent`]s through a cloneable [`EventHandle`].
//! One [`EventLoop`] task owns the dispatcher and handles them strictly in
//! arrival order, so catalog mutations never interleave.

mod handle;
mod runner;
mod types;

pub use handle::{EventEnvelope, EventHandle, EventLoopError};
pub use runner::{create_event_loop, EventLoop};
pub use types::{
    Button, ButtonAction, DispatchOutcome, InboundEvent, OperatorId, OperatorMessage,
    OutboundMessage, Prompt, SearchRequest,
};
