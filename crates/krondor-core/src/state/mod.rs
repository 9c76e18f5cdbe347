//! Bit-addressed event store
//!
//! Free functions over a [`SaveBuffer`](crate::SaveBuffer). [`event`]
//! holds the addressing primitives; the remaining modules are offset
//! calculators over the ranges in [`offsets`].

pub mod dialog;
pub mod encounter;
pub mod event;
pub mod money;
pub mod offsets;
pub mod skill;
pub mod world;

pub use event::{
    complex_location, read_event, read_event_bool, set_event_dialog_action, set_event_flag,
    set_event_flag_false, set_event_flag_true, EventAddress, EventPointer,
    COMPLEX_EVENT_THRESHOLD,
};
pub use offsets::FlagRange;
