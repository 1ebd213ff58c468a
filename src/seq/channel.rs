//! Bridges between sequences and tokio channels
//!
//! The channel source blocks the calling thread until an element arrives,
//! the channel closes or the cancellation token fires. Channel sinks run the
//! upstream on tokio's blocking pool and must be started inside a runtime.
use std::task::{Context, Poll};

use futures::executor::block_on;
use log::{debug, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::core::{Request, Seq};
use crate::cancel::CancellationToken;
use crate::seq_configuration::ChannelConfig;

/// Receiving half of a channel a [`ChannelSource`] can read from
pub trait Inbound {
    type Item;
    fn poll_recv(&mut self, cx: &mut Context<'_>) -> Poll<Option<Self::Item>>;
}

impl<T> Inbound for mpsc::Receiver<T> {
    type Item = T;

    fn poll_recv(&mut self, cx: &mut Context<'_>) -> Poll<Option<T>> {
        mpsc::Receiver::poll_recv(self, cx)
    }
}

impl<T> Inbound for mpsc::UnboundedReceiver<T> {
    type Item = T;

    fn poll_recv(&mut self, cx: &mut Context<'_>) -> Poll<Option<T>> {
        mpsc::UnboundedReceiver::poll_recv(self, cx)
    }
}

// ================================
// Channel Source
// ================================

pub struct ChannelSource<R> {
    pub(crate) rx: R,
    pub(crate) cancel: CancellationToken,
    pub(crate) finished: bool,
}

impl<R: Inbound> ChannelSource<R> {
    fn recv_one(&mut self) -> Option<R::Item> {
        let rx = &mut self.rx;
        let cancel = &self.cancel;
        block_on(async {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("channel source: cancelled");
                    None
                }
                item = std::future::poll_fn(|cx| rx.poll_recv(cx)) => {
                    if item.is_none() {
                        debug!("channel source: channel closed");
                    }
                    item
                }
            }
        })
    }
}

impl<R: Inbound> Seq for ChannelSource<R> {
    type Item = R::Item;

    fn next(&mut self, request: Request) -> Vec<R::Item> {
        let limit = request.count();
        let mut out = Vec::new();
        while !self.finished && limit.map_or(true, |n| out.len() < n) {
            match self.recv_one() {
                Some(item) => out.push(item),
                None => self.finished = true,
            }
        }
        out
    }
}

/// Pull from `rx` until it closes or `cancel` fires
pub fn from_channel<R: Inbound>(rx: R, cancel: CancellationToken) -> ChannelSource<R> {
    ChannelSource { rx, cancel, finished: false }
}

// ================================
// Channel Sinks
// ================================

/// Pull `batch_size` at a time and hand each element to `push` until upstream
/// comes back short, `push` refuses or `cancel` fires
fn pump<S, P>(mut seq: S, batch_size: usize, cancel: &CancellationToken, mut push: P)
where
    S: Seq,
    P: FnMut(S::Item) -> bool,
{
    loop {
        if cancel.is_cancelled() {
            debug!("channel sink: cancelled");
            return;
        }
        let batch = seq.next(Request::Count(batch_size));
        let short = batch.len() < batch_size;
        for item in batch {
            if !push(item) {
                debug!("channel sink: stopped by receiver or cancellation");
                return;
            }
        }
        if short {
            debug!("channel sink: upstream exhausted");
            return;
        }
    }
}

/// Watch the pump so a panicking upstream is reported instead of looking
/// like an exhausted one to the receiver
fn supervise(pump: JoinHandle<()>) {
    tokio::spawn(async move {
        match pump.await {
            Ok(()) => {}
            Err(e) if e.is_panic() => warn!("channel sink: upstream panicked, closing channel early"),
            Err(e) => debug!("channel sink: pump task ended abnormally: {}", e),
        }
    });
}

pub trait ChannelSeqExt: Seq + Sized {
    /// One element at a time into a single-slot channel
    fn to_channel(self, cancel: CancellationToken) -> mpsc::Receiver<Self::Item>
    where
        Self: Send + 'static,
        Self::Item: Send + 'static,
    {
        self.to_channel_with(cancel, ChannelConfig::default())
    }

    /// `size` elements per pull into a channel buffering `size` elements
    fn to_buffered_channel(self, cancel: CancellationToken, size: usize) -> mpsc::Receiver<Self::Item>
    where
        Self: Send + 'static,
        Self::Item: Send + 'static,
    {
        self.to_channel_with(cancel, ChannelConfig::buffered(size))
    }

    fn to_channel_with(self, cancel: CancellationToken, config: ChannelConfig) -> mpsc::Receiver<Self::Item>
    where
        Self: Send + 'static,
        Self::Item: Send + 'static,
    {
        let (tx, rx) = mpsc::channel(config.capacity.max(1));
        let batch_size = config.batch_size.max(1);
        let handle = tokio::task::spawn_blocking(move || {
            pump(self, batch_size, &cancel, |item| {
                block_on(async {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => false,
                        sent = tx.send(item) => sent.is_ok(),
                    }
                })
            })
        });
        supervise(handle);
        rx
    }

    /// Never blocks on send; `batch_size` of the default config per pull
    fn to_unbounded_channel(self, cancel: CancellationToken) -> mpsc::UnboundedReceiver<Self::Item>
    where
        Self: Send + 'static,
        Self::Item: Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let batch_size = ChannelConfig::default().batch_size;
        let handle = tokio::task::spawn_blocking(move || {
            pump(self, batch_size, &cancel, |item| {
                !cancel.is_cancelled() && tx.send(item).is_ok()
            })
        });
        supervise(handle);
        rx
    }
}

impl<S: Seq> ChannelSeqExt for S {}
