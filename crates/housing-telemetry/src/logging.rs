//! Structured logging helpers.
//!
//! Every ledger log line carries a `component` field plus the identifiers
//! of what it is about:
//! - `member`: member address (hex)
//! - `unit`: housing unit reference
//! - `project`: project reference
//! - `amount`: escrow amount, where relevant

/// Log a ledger event with a component tag.
#[macro_export]
macro_rules! log_event {
    ($level:ident, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a member-related event with standard fields.
#[macro_export]
macro_rules! log_member_event {
    ($level:ident, $component:expr, $msg:expr, $member:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = $component,
            member = %$member,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a unit-related event with standard fields.
#[macro_export]
macro_rules! log_unit_event {
    ($level:ident, $component:expr, $msg:expr, $unit:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = $component,
            unit = %$unit,
            $($($field)*,)?
            $msg
        )
    };
}
