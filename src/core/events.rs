//! UI event dispatch with explicit handler registration
//!
//! Pages register the handlers they need and keep the returned
//! [`HandlerToken`]s. Dropping a token (or calling [`HandlerToken::dispose`])
//! unregisters its handler, so leaving a page is enough to detach it.
//!
//! # Ordering
//!
//! ```text
//! post(A) ──▶ queue [A] ──▶ run_until_idle ──▶ handler(A) ... await ... done
//!                                          └─▶ post(B) from handler(A)
//!                           queue [B] ──────▶ handler(B) ... done
//! ```
//!
//! Events are processed one at a time in FIFO order; every matching handler
//! is awaited to completion before the next event is popped.
//!
//! # Usage
//!
//! ```rust,ignore
//! let dispatcher = Dispatcher::new();
//! let _token = dispatcher.register(EventKind::NewBillClicked, |_| {
//!     async move { Ok(()) }.boxed()
//! })?;
//! dispatcher.post(UiEvent::NewBillClicked)?;
//! let report = dispatcher.run_until_idle().await?;
//! ```

use crate::core::error::{BilledError, BilledResult};
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use uuid::Uuid;

/// A file picked in the file input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedFile {
    pub name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size: u64,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mime_type: None,
            size: 0,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// The element a click landed on, reduced to its attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementRef {
    pub tag: String,
    pub attributes: IndexMap<String, String>,
}

impl ElementRef {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: IndexMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Raw values of the new bill form, as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewBillForm {
    pub expense_type: String,
    pub expense_name: String,
    pub datepicker: String,
    pub amount: String,
    pub vat: String,
    pub pct: String,
    pub commentary: String,
}

/// Events produced by user interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum UiEvent {
    /// The eye icon of a bill row was clicked
    IconEyeClicked { target: ElementRef },
    /// The proof-of-purchase modal was dismissed
    ModalClosed,
    /// The "new bill" button was clicked
    NewBillClicked,
    /// A file was picked in the file input
    FileChanged { file: SelectedFile },
    /// The new bill form was submitted
    FormSubmitted { form: NewBillForm },
}

/// Discriminant used to route events to handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    IconEyeClicked,
    ModalClosed,
    NewBillClicked,
    FileChanged,
    FormSubmitted,
}

impl UiEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            UiEvent::IconEyeClicked { .. } => EventKind::IconEyeClicked,
            UiEvent::ModalClosed => EventKind::ModalClosed,
            UiEvent::NewBillClicked => EventKind::NewBillClicked,
            UiEvent::FileChanged { .. } => EventKind::FileChanged,
            UiEvent::FormSubmitted { .. } => EventKind::FormSubmitted,
        }
    }
}

/// Envelope wrapping a queued event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the event was posted
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: UiEvent,
}

impl EventEnvelope {
    pub fn new(event: UiEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Asynchronous event handler
pub type Handler = Arc<dyn Fn(UiEvent) -> BoxFuture<'static, BilledResult<()>> + Send + Sync>;

struct Registration {
    id: u64,
    kind: EventKind,
    handler: Handler,
}

type Registry = Mutex<Vec<Registration>>;

/// Disposer returned by [`Dispatcher::register`]
///
/// The handler stays registered for as long as the token lives.
#[must_use = "dropping the token unregisters the handler"]
pub struct HandlerToken {
    id: u64,
    kind: EventKind,
    registry: Weak<Registry>,
}

impl HandlerToken {
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Unregister the handler now
    pub fn dispose(self) {
        drop(self);
    }
}

impl Drop for HandlerToken {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        if let Ok(mut registrations) = registry.lock() {
            registrations.retain(|r| r.id != self.id);
        }
    }
}

impl std::fmt::Debug for HandlerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerToken")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Outcome of a [`Dispatcher::run_until_idle`] pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Events popped from the queue
    pub processed: usize,
    /// Handler invocations that completed successfully
    pub handled: usize,
    /// Handler invocations that returned an error
    pub failed: usize,
}

/// Single-consumer event queue plus handler registry
///
/// The dispatcher is cheap to clone (Arc internally); handlers may capture a
/// clone to post follow-up events.
#[derive(Clone, Default)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    queue: Arc<Mutex<VecDeque<EventEnvelope>>>,
    next_id: Arc<AtomicU64>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one kind of event
    pub fn register<F>(&self, kind: EventKind, handler: F) -> BilledResult<HandlerToken>
    where
        F: Fn(UiEvent) -> BoxFuture<'static, BilledResult<()>> + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut registrations = self
            .registry
            .lock()
            .map_err(|e| BilledError::internal(format!("handler registry poisoned: {}", e)))?;
        registrations.push(Registration {
            id,
            kind,
            handler: Arc::new(handler),
        });

        Ok(HandlerToken {
            id,
            kind,
            registry: Arc::downgrade(&self.registry),
        })
    }

    /// Number of live registrations for a kind
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.registry
            .lock()
            .map(|regs| regs.iter().filter(|r| r.kind == kind).count())
            .unwrap_or(0)
    }

    /// Queue an event; it runs on the next [`run_until_idle`](Self::run_until_idle)
    pub fn post(&self, event: UiEvent) -> BilledResult<Uuid> {
        let envelope = EventEnvelope::new(event);
        let id = envelope.id;
        self.queue
            .lock()
            .map_err(|e| BilledError::internal(format!("event queue poisoned: {}", e)))?
            .push_back(envelope);
        Ok(id)
    }

    /// Process queued events until the queue is empty
    ///
    /// Handler failures are terminal for the event that triggered them: they
    /// are logged and counted, and processing moves on to the next event.
    pub async fn run_until_idle(&self) -> BilledResult<DispatchReport> {
        let mut report = DispatchReport::default();

        while let Some(envelope) = self.pop()? {
            let handlers = self.handlers_for(envelope.event.kind())?;
            tracing::debug!(
                event_id = %envelope.id,
                kind = ?envelope.event.kind(),
                handlers = handlers.len(),
                "dispatching UI event"
            );

            for handler in handlers {
                match handler(envelope.event.clone()).await {
                    Ok(()) => report.handled += 1,
                    Err(e) => {
                        tracing::error!(
                            event_id = %envelope.id,
                            error = %e,
                            code = e.error_code(),
                            "UI event handler failed"
                        );
                        report.failed += 1;
                    }
                }
            }
            report.processed += 1;
        }

        Ok(report)
    }

    fn pop(&self) -> BilledResult<Option<EventEnvelope>> {
        Ok(self
            .queue
            .lock()
            .map_err(|e| BilledError::internal(format!("event queue poisoned: {}", e)))?
            .pop_front())
    }

    fn handlers_for(&self, kind: EventKind) -> BilledResult<Vec<Handler>> {
        let registrations = self
            .registry
            .lock()
            .map_err(|e| BilledError::internal(format!("handler registry poisoned: {}", e)))?;
        Ok(registrations
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| Arc::clone(&r.handler))
            .collect())
    }
}
