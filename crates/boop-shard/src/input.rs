//! Input bindings — the revocable push capability handed to the caller.
//!
//! The binder half is a plain `mpsc::Sender`, so revocation is the
//! channel's own disconnect semantics: tearing down the entity's INPUT
//! component drops the receiver and every later `provide` raises
//! [`ShardError::RevokedInput`].  The shard side buffers drained data so
//! queue emptiness can be probed without consuming anything.

use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, Sender, channel};

use boop_mind::InputDatum;

use crate::error::{ShardError, ShardResult};

// ── InputBinder ───────────────────────────────────────────────────────────────

/// The caller's half of an input binding: push data toward the bound
/// entity.  Cloneable, so a dispatcher can fan the capability out.
#[derive(Clone)]
pub struct InputBinder {
    tx: Sender<InputDatum>,
}

impl InputBinder {
    /// Queue one datum for the bound entity.
    ///
    /// Fails with [`ShardError::RevokedInput`] once the entity's input
    /// component has been destroyed or replaced.
    pub fn provide(&self, input: InputDatum) -> ShardResult<()> {
        self.tx.send(input).map_err(|_| ShardError::RevokedInput)
    }
}

// ── InputChannel ──────────────────────────────────────────────────────────────

/// The shard's half: receiver plus a peekable buffer.
pub(crate) struct InputChannel {
    rx: Receiver<InputDatum>,
    buf: VecDeque<InputDatum>,
}

impl InputChannel {
    /// Open a fresh binding, returning the shard half and the binder.
    pub(crate) fn open() -> (InputChannel, InputBinder) {
        let (tx, rx) = channel();
        (InputChannel { rx, buf: VecDeque::new() }, InputBinder { tx })
    }

    /// Pull everything currently sitting in the channel into the buffer.
    fn pump(&mut self) {
        while let Ok(d) = self.rx.try_recv() {
            self.buf.push_back(d);
        }
    }

    /// `true` if the queue holds undrained data — the `"input"` wait
    /// condition.
    pub(crate) fn ready(&mut self) -> bool {
        self.pump();
        !self.buf.is_empty()
    }

    /// Take every buffered datum, oldest first.
    pub(crate) fn drain(&mut self) -> Vec<InputDatum> {
        self.pump();
        self.buf.drain(..).collect()
    }
}
