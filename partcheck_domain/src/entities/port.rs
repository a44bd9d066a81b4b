// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! The port interface: the single abstraction the Resize operator consumes
//! to talk to its neighbors in the dataflow graph.
//!
//! Ports are owned by the host scheduler, not by Resize — this crate only
//! defines the contract. A concrete single-slot channel implementation
//! lives in the `partcheck` infrastructure crate, since wiring two
//! processors together (possibly across threads) is a runtime concern, not
//! a domain one.

use crate::value_objects::Chunk;

/// An input port: the receiving end of a single-slot channel from an
/// upstream processor.
///
/// # Invariants
///
/// After [`InputPort::pull`] returns `Some`, [`InputPort::has_data`] is
/// `false` until the upstream processor pushes again.
pub trait InputPort: Send + Sync {
    /// Whether the upstream processor has closed this port and will never
    /// push again.
    fn is_finished(&self) -> bool;

    /// Whether a chunk is currently queued and ready to [`pull`](InputPort::pull).
    fn has_data(&self) -> bool;

    /// Signals upstream that this processor wants data on this port.
    fn set_needed(&self);

    /// Signals upstream that this processor currently has no use for data
    /// on this port.
    fn set_not_needed(&self);

    /// Removes and returns the queued chunk, if any.
    fn pull(&self) -> Option<Chunk>;

    /// Closes the port from this side. No further pulls will be attempted.
    fn close(&self);
}

/// An output port: the sending end of a single-slot channel to a
/// downstream processor.
///
/// # Invariants
///
/// After [`OutputPort::push`] succeeds, [`OutputPort::can_push`] is `false`
/// until the downstream processor pulls.
pub trait OutputPort: Send + Sync {
    /// Whether this port has been closed (downstream will pull no more).
    fn is_finished(&self) -> bool;

    /// Whether the single slot is free to accept a chunk right now.
    fn can_push(&self) -> bool;

    /// Deposits a chunk into the slot. Returns `false` if the slot was
    /// already occupied or the port was finished — callers are expected to
    /// have checked [`can_push`](OutputPort::can_push) first and treat this
    /// as a logic error if it happens.
    fn push(&self, chunk: Chunk) -> bool;

    /// Closes this output. No further pushes will be attempted.
    fn finish(&self);
}
