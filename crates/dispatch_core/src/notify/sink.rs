//! Notification sinks and store observers.

use super::event::{Notification, StoreEvent};
use log::info;
use std::cell::RefCell;
use std::rc::Rc;

/// Receives toasts emitted after successful mutations.
pub trait NotificationSink {
    fn notify(&mut self, notification: &Notification);
}

/// Receives every committed store event, e.g. to trigger a re-render.
pub trait StoreObserver {
    fn on_event(&mut self, event: &StoreEvent);
}

/// Writes toasts to the core log. Default sink when no UI is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&mut self, notification: &Notification) {
        info!(
            "event=notification module=notify status=ok notification_id={} emergency_id={} title={:?}",
            notification.id, notification.emergency_id, notification.title
        );
    }
}

/// Buffers toasts in memory; clones share the same buffer.
///
/// Hand one clone to the store and keep another to drain delivered toasts.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    delivered: Rc<RefCell<Vec<Notification>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.delivered.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.delivered.borrow().is_empty()
    }

    /// Removes and returns delivered toasts in delivery order.
    pub fn drain(&self) -> Vec<Notification> {
        self.delivered.borrow_mut().drain(..).collect()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&mut self, notification: &Notification) {
        self.delivered.borrow_mut().push(notification.clone());
    }
}

/// Buffers store events; clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    events: Rc<RefCell<Vec<StoreEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<StoreEvent> {
        self.events.borrow().clone()
    }
}

impl StoreObserver for RecordingObserver {
    fn on_event(&mut self, event: &StoreEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
