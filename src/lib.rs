// Cuke - event plumbing for a cucumber-style BDD runner
//
// Parsers, compilers, runners and formatters publish and observe test-run
// lifecycle events through a registry-checked, synchronous bus.

// Re-export the event core
pub use cuke_events::*;

// Step, data table and doc string values
pub use cuke_types;

// Environment-controlled logging
pub use cuke_log as log;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Bus,
        BusBuilder,
        BusConfig,
        BusError,
        DataTable,
        DispatchPolicy,
        DocString,
        Event,
        EventId,
        EventType,
        Handler,
        HandlerError,
        HandlerResult,
        Location,
        MultilineArgument,
        Registry,
        Step,
        Value,
        event_type,
        handler_fn,
        lifecycle,
        values,
    };
}
