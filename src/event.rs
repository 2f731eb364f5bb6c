// Copyright (c) Sienna Satterwhite, Skiplayer Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

//! Structural events reported to an external observer.
//!
//! A sink receives events by value and never sees the list itself, so an
//! observer can render or record the structure but cannot steer a search,
//! insertion or removal.

use std::fmt::Debug;

use tracing::trace;

use crate::{
    key::SentinelKey,
    node::NodeId,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Event<K> {
    NodeCreated {
        id: NodeId,
        key: SentinelKey<K>,
        layer: usize,
        column: usize,
    },
    NodeMoved {
        id: NodeId,
        column: usize,
        layer: usize,
    },
    NodeDeleted {
        id: NodeId,
    },
    Connected {
        from: NodeId,
        to: NodeId,
        directed: bool,
    },
    Disconnected {
        from: NodeId,
        to: NodeId,
    },
    Highlighted {
        id: NodeId,
        on: bool,
    },
    Message(String),
}

pub trait EventSink<K> {
    fn emit(&mut self, event: Event<K>);

    /// An inactive sink lets the list skip building events and keeping
    /// node columns up to date.
    fn is_active(&self) -> bool {
        true
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl<K> EventSink<K> for NoopSink {
    #[inline]
    fn emit(&mut self, _event: Event<K>) {}

    #[inline]
    fn is_active(&self) -> bool {
        false
    }
}

/// Emits `event()` only when the sink is listening.
#[inline]
pub(crate) fn notify<K, S: EventSink<K> + ?Sized>(sink: &mut S, event: impl FnOnce() -> Event<K>) {
    if sink.is_active() {
        sink.emit(event());
    }
}

/// Records events in arrival order.
#[derive(Debug, Clone)]
pub struct EventLog<K> {
    events: Vec<Event<K>>,
}

impl<K> EventLog<K> {
    pub fn new() -> Self {
        EventLog { events: Vec::new() }
    }

    pub fn events(&self) -> &[Event<K>] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<Event<K>> {
        std::mem::take(&mut self.events)
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.events.iter().filter_map(|e| match e {
            | Event::Message(text) => Some(text.as_str()),
            | _ => None,
        })
    }
}

impl<K> Default for EventLog<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> EventSink<K> for EventLog<K> {
    fn emit(&mut self, event: Event<K>) {
        self.events.push(event);
    }
}

/// Forwards events to `tracing` at trace level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl<K: Debug> EventSink<K> for TracingSink {
    fn emit(&mut self, event: Event<K>) {
        match event {
            | Event::NodeCreated {
                id,
                key,
                layer,
                column,
            } => trace!(%id, ?key, layer, column, "node created"),
            | Event::NodeMoved { id, column, layer } => trace!(%id, column, layer, "node moved"),
            | Event::NodeDeleted { id } => trace!(%id, "node deleted"),
            | Event::Connected { from, to, directed } => {
                trace!(%from, %to, directed, "connected")
            },
            | Event::Disconnected { from, to } => trace!(%from, %to, "disconnected"),
            | Event::Highlighted { id, on } => trace!(%id, on, "highlighted"),
            | Event::Message(text) => trace!("{}", text),
        }
    }
}

impl<K, S: EventSink<K> + ?Sized> EventSink<K> for &mut S {
    #[inline]
    fn emit(&mut self, event: Event<K>) {
        (**self).emit(event)
    }

    #[inline]
    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}

impl<K, S: EventSink<K> + ?Sized> EventSink<K> for Box<S> {
    #[inline]
    fn emit(&mut self, event: Event<K>) {
        (**self).emit(event)
    }

    #[inline]
    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}
