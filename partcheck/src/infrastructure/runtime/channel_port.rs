// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! A single-slot channel implementing the domain's [`InputPort`]/[`OutputPort`]
//! contract, backed by a `crossbeam_channel::bounded(1)` pair plus a small
//! amount of shared state for the flags ports need beyond plain send/recv
//! (`finished`, `needed`).

use crossbeam::channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};
use partcheck_domain::entities::{InputPort, OutputPort};
use partcheck_domain::value_objects::Chunk;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

struct Slot {
    receiver: Receiver<Chunk>,
    sender: Sender<Chunk>,
    /// Upstream has sent its last chunk and will send no more.
    upstream_finished: AtomicBool,
    /// Downstream has closed the input side and will pull no more.
    input_closed: AtomicBool,
    /// Downstream has closed the output side and will push no more.
    output_finished: AtomicBool,
    needed: AtomicBool,
}

/// Creates one connected `(InputPort, OutputPort)` pair sharing a single
/// one-chunk slot.
pub fn channel() -> (Arc<ChannelInput>, Arc<ChannelOutput>) {
    let (sender, receiver) = bounded(1);
    let slot = Arc::new(Slot {
        receiver,
        sender,
        upstream_finished: AtomicBool::new(false),
        input_closed: AtomicBool::new(false),
        output_finished: AtomicBool::new(false),
        needed: AtomicBool::new(true),
    });
    (
        Arc::new(ChannelInput { slot: slot.clone() }),
        Arc::new(ChannelOutput { slot }),
    )
}

pub struct ChannelInput {
    slot: Arc<Slot>,
}

impl InputPort for ChannelInput {
    fn is_finished(&self) -> bool {
        self.slot.input_closed.load(Ordering::Acquire)
            || (self.slot.upstream_finished.load(Ordering::Acquire) && self.slot.receiver.is_empty())
    }

    fn has_data(&self) -> bool {
        !self.slot.receiver.is_empty()
    }

    fn set_needed(&self) {
        self.slot.needed.store(true, Ordering::Release);
    }

    fn set_not_needed(&self) {
        self.slot.needed.store(false, Ordering::Release);
    }

    fn pull(&self) -> Option<Chunk> {
        match self.slot.receiver.try_recv() {
            Ok(chunk) => Some(chunk),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    fn close(&self) {
        self.slot.input_closed.store(true, Ordering::Release);
    }
}

pub struct ChannelOutput {
    slot: Arc<Slot>,
}

impl ChannelOutput {
    /// Marks this end as the upstream's last chunk boundary — called by the
    /// producing side, not by Resize. Exposed for test fixtures and
    /// production nodes that feed a Resize input directly.
    pub fn mark_upstream_finished(&self) {
        self.slot.upstream_finished.store(true, Ordering::Release);
    }
}

impl OutputPort for ChannelOutput {
    fn is_finished(&self) -> bool {
        self.slot.output_finished.load(Ordering::Acquire)
    }

    fn can_push(&self) -> bool {
        !self.slot.output_finished.load(Ordering::Acquire) && self.slot.sender.is_empty()
    }

    fn push(&self, chunk: Chunk) -> bool {
        match self.slot.sender.try_send(chunk) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => false,
        }
    }

    fn finish(&self) {
        self.slot.output_finished.store(true, Ordering::Release);
    }
}

/// Whether the input side currently wants data, as last set by
/// [`InputPort::set_needed`]/[`InputPort::set_not_needed`]. Exposed for
/// tests asserting Resize primes upstream demand correctly; production
/// producers poll it to decide whether to keep generating chunks.
pub fn is_needed(input: &ChannelInput) -> bool {
    input.slot.needed.load(Ordering::Acquire)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_then_pull_round_trips_one_chunk() {
        let (input, output) = channel();
        assert!(output.can_push());
        assert!(output.push(Chunk::new(b"x".to_vec())));
        assert!(!output.can_push());
        assert!(input.has_data());
        assert_eq!(input.pull().unwrap().into_bytes(), b"x".to_vec());
        assert!(!input.has_data());
    }

    #[test]
    fn finished_producer_with_empty_slot_reports_input_finished() {
        let (input, output) = channel();
        output.mark_upstream_finished();
        assert!(input.is_finished());
    }

    #[test]
    fn set_needed_flips_observable_flag() {
        let (input, _output) = channel();
        input.set_not_needed();
        assert!(!is_needed(&input));
        input.set_needed();
        assert!(is_needed(&input));
    }
}
