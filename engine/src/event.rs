use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::JoinHandle,
};

use crossbeam_channel::Receiver;

use crate::{error::EngineResult, table::RainbowTable};

/// An event to track the progress of the generation of a rainbow table.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Overall progress of the rainbow table generation in percent.
    Progress(f64),
    /// The nth batch of chains is being computed.
    Batch {
        batch_number: usize,
        batch_count: usize,
    },
}

/// A handle on a rainbow table being generated on another thread.
pub struct TableHandle {
    pub(crate) thread_handle: JoinHandle<EngineResult<RainbowTable>>,
    pub(crate) receiver: Receiver<Event>,
    pub(crate) cancel: Arc<AtomicBool>,
}

impl TableHandle {
    /// Returns the generated rainbow table.
    /// Blocks until the table is finished or cancelled.
    pub fn join(self) -> EngineResult<RainbowTable> {
        self.thread_handle.join().unwrap()
    }

    /// Blocks until an event is received.
    /// Returns `None` once the generation thread is done.
    pub fn recv(&self) -> Option<Event> {
        self.receiver.recv().ok()
    }

    /// Asks the generation to stop at the next batch boundary.
    /// A cancelled build discards all partial chains and joins with
    /// [`EngineError::Cancelled`](crate::EngineError::Cancelled).
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_finished(&self) -> bool {
        self.thread_handle.is_finished()
    }
}
