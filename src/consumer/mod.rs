//! Consumer Module - the reading side of the relay
//!
//! - `CursorStore`: durable `(cursor, epoch)` record
//! - `AggregateState`: per-queue signed counts, totals and lag
//! - `EventSource`: where pages come from (HTTP or in-process)
//! - `Poller`: the fixed-delay cycle tying them together
//!
//! # Cycle
//!
//! ```text
//! ┌──────────┐   ┌──────────────┐   ┌───────────┐   ┌──────────────┐
//! │ poll     │──►│ epoch check  │──►│ aggregate │──►│ save cursor  │
//! │ (after)  │   │ reset on new │   │ batch     │   │ temp+rename  │
//! └──────────┘   └──────────────┘   └───────────┘   └──────────────┘
//! ```

mod aggregator;
mod cursor;
mod poller;
mod source;

pub use aggregator::AggregateState;
pub use cursor::{CursorState, CursorStore, START_CURSOR};
pub use poller::{ConsumerSnapshot, CycleOutcome, Poller};
pub use source::{EventSource, HttpEventSource, LocalEventSource};
