//! Receivers for confirmed falls (alarm, display, paging).

use crossbeam_channel::Sender;
use tracing::{error, warn};

use crate::posture::FallConfirmed;

/// Collaborator notified once per latch cycle.
pub trait EventSink {
    fn fall_confirmed(&mut self, event: &FallConfirmed);
}

impl<F> EventSink for F
where
    F: FnMut(&FallConfirmed),
{
    fn fall_confirmed(&mut self, event: &FallConfirmed) {
        self(event)
    }
}

/// Raises the alarm through the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn fall_confirmed(&mut self, event: &FallConfirmed) {
        error!(
            "🚨 FALL DETECTED | value={:.2} | side={} | sample={}",
            event.indicator.rounded(),
            event.side.name(),
            event.sample_index,
        );
    }
}

/// Hands events to another thread, e.g. an alarm player.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<FallConfirmed>,
}

impl ChannelSink {
    pub fn new(tx: Sender<FallConfirmed>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelSink {
    fn fall_confirmed(&mut self, event: &FallConfirmed) {
        if self.tx.send(*event).is_err() {
            warn!("fall event receiver disconnected; sample {} not delivered", event.sample_index);
        }
    }
}
