//! Modal lifecycle controller.
//!
//! ```text
//! Closed ──open()──▶ Opening ──content settled──▶ Open ──close()──▶ Closing
//!   ▲                                                                  │
//!   └──────────────────── CLOSE_DELAY_MS, overlay detached ◀───────────┘
//! ```
//!
//! An open runs, in order: CSS options → mount (attach + first-time content)
//! → visual open → dismissal listeners → nested trigger discovery →
//! `m-modal` notification.  The skeleton is built once per instance and the
//! content is inserted at most once; later opens only re-attach and re-show.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use futures::future::{LocalBoxFuture, Shared};
use futures::FutureExt;
use gloo_timers::callback::Timeout;
use uuid::Uuid;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, Node};

use crate::config::{ContentSource, ModalConfig, Presentation, ScanRoot};
use crate::constants::{CLOSE_DELAY_MS, INSTANCE_ID_ATTR};
use crate::content::Collaborators;
use crate::discovery;
use crate::errors::{ModalError, Result};
use crate::events::{self, Listener};
use crate::overlay::Skeleton;
use crate::page::{self, PageMember};
use crate::{debug_log, dom_utils, error_log, presentation, warn_log};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModalId(Uuid);

impl ModalId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ModalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Closed,
    Opening,
    Open,
    Closing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContentState {
    Empty,
    /// A resolution is in flight; other mounts wait on it instead of starting
    /// another.
    Loading,
    Inserted,
}

/// In-flight content resolution, awaited by every concurrent mount.
type PendingContent = Shared<LocalBoxFuture<'static, Result<Node>>>;

pub(crate) struct ModalInner {
    id: ModalId,
    config: ModalConfig,
    collaborators: Collaborators,
    document: Document,
    skeleton: Skeleton,
    phase: Cell<Phase>,
    content: Cell<ContentState>,
    loading: RefCell<Option<PendingContent>>,
    /// Bumped by every open so a superseded open stands down after mounting.
    open_seq: Cell<u64>,
    destroyed: Cell<bool>,
    pending_detach: RefCell<Option<Timeout>>,
    dismissal: RefCell<Vec<Listener>>,
    trigger: RefCell<Option<Listener>>,
}

/// Upgrade to a strong reference unless the instance is gone or destroyed.
fn alive(this: &Weak<ModalInner>) -> Option<Rc<ModalInner>> {
    this.upgrade().filter(|inner| !inner.destroyed.get())
}

impl ModalInner {
    fn apply_options(&self) -> Result<()> {
        presentation::apply(&self.document, &self.config.presentation)
    }

    /// Attach the overlay and, the first time only, resolve and insert the
    /// content.  A mount that finds a resolution in flight waits for it, so
    /// every caller returns only once the content has settled.  The overlay
    /// stays attached when resolution fails so the close control keeps working.
    async fn mount(this: &Weak<ModalInner>) -> Result<()> {
        let pending = {
            let Some(inner) = alive(this) else {
                return Ok(());
            };
            inner.skeleton.attach(&inner.document)?;

            if inner.content.get() == ContentState::Inserted {
                return Ok(());
            }
            let Some(source) = inner.config.content.clone() else {
                return Ok(());
            };
            inner.pending_content(source)
        };

        let resolved = pending.clone().await;

        // the instance may have been dropped or destroyed while we waited
        let Some(inner) = alive(this) else {
            debug_log!("m-modal: instance went away while loading content");
            return Ok(());
        };
        inner.settle_content(&pending, resolved)
    }

    /// Join the resolution in flight or start one.
    fn pending_content(&self, source: ContentSource) -> PendingContent {
        if let Some(pending) = self.loading.borrow().as_ref() {
            return pending.clone();
        }
        let document = self.document.clone();
        let collaborators = self.collaborators.clone();
        let pending = async move { source.resolve(&document, &collaborators).await }
            .boxed_local()
            .shared();
        *self.loading.borrow_mut() = Some(pending.clone());
        self.content.set(ContentState::Loading);
        pending
    }

    /// The first waiter to wake inserts (or resets on error); later waiters
    /// of the same resolution find it already settled.
    fn settle_content(&self, pending: &PendingContent, resolved: Result<Node>) -> Result<()> {
        let current = self
            .loading
            .borrow()
            .as_ref()
            .map_or(false, |loading| loading.ptr_eq(pending));
        if current {
            self.loading.borrow_mut().take();
        }
        match resolved {
            Ok(node) => {
                if current {
                    self.skeleton.insert_content(&node)?;
                    self.content.set(ContentState::Inserted);
                    debug_log!("m-modal {}: content inserted", self.id);
                }
                Ok(())
            }
            Err(err) => {
                if current {
                    self.content.set(ContentState::Empty);
                }
                Err(err)
            }
        }
    }

    async fn open(this: Weak<ModalInner>) -> Result<()> {
        let seq = {
            let Some(inner) = alive(&this) else {
                return Ok(());
            };
            match inner.phase.get() {
                Phase::Open | Phase::Opening => return Ok(()),
                Phase::Closing => inner.cancel_detach(),
                Phase::Closed => {}
            }
            inner.phase.set(Phase::Opening);
            let seq = inner.open_seq.get() + 1;
            inner.open_seq.set(seq);
            if let Err(err) = inner.apply_options() {
                inner.phase.set(Phase::Closed);
                return Err(err);
            }
            seq
        };

        let mounted = Self::mount(&this).await;

        let Some(inner) = alive(&this) else {
            return mounted;
        };
        // a close(), or a close() followed by a newer open(), happened while
        // the content was loading; the newest call finishes the sequence
        if inner.phase.get() != Phase::Opening || inner.open_seq.get() != seq {
            return mounted;
        }
        inner.show()?;
        inner.wire_dismissal()?;
        mounted?;

        let nested = discovery::discover_triggers(
            &ScanRoot::Element(inner.skeleton.wrapper.clone()),
            &inner.collaborators,
        )?;
        if !nested.is_empty() {
            debug_log!("m-modal {}: {} nested trigger(s) wired", inner.id, nested.len());
        }
        events::dispatch_opened(&inner.document, &inner.skeleton.wrapper, &inner.id.to_string())?;
        Ok(())
    }

    fn show(self: &Rc<Self>) -> Result<()> {
        let member: Weak<dyn PageMember> = Rc::downgrade(self) as Weak<dyn PageMember>;
        page::register_open(self.id, member)?;
        self.skeleton.set_active(true);
        self.phase.set(Phase::Open);
        Ok(())
    }

    fn close(self: &Rc<Self>) {
        match self.phase.get() {
            Phase::Closed | Phase::Closing => return,
            Phase::Opening | Phase::Open => {}
        }
        self.phase.set(Phase::Closing);
        if let Err(err) = page::register_closed(&self.id) {
            warn_log!("m-modal {}: could not release page state: {}", self.id, err);
        }
        self.skeleton.set_active(false);

        let weak = Rc::downgrade(self);
        let timeout = Timeout::new(CLOSE_DELAY_MS, move || {
            if let Some(inner) = weak.upgrade() {
                inner.finish_close();
            }
        });
        *self.pending_detach.borrow_mut() = Some(timeout);
    }

    fn finish_close(&self) {
        let _fired = self.pending_detach.borrow_mut().take();
        if self.phase.get() != Phase::Closing {
            return;
        }
        self.skeleton.detach();
        self.phase.set(Phase::Closed);
        debug_log!("m-modal {}: detached", self.id);
    }

    /// Dropping the `Timeout` clears it.
    fn cancel_detach(&self) {
        self.pending_detach.borrow_mut().take();
    }

    fn wire_dismissal(self: &Rc<Self>) -> Result<()> {
        if !self.dismissal.borrow().is_empty() {
            return Ok(());
        }

        let weak = Rc::downgrade(self);
        let on_backdrop = Listener::attach(self.skeleton.overlay.as_ref(), "click", move |event: Event| {
            if let Some(inner) = weak.upgrade() {
                if inner.skeleton.is_backdrop_target(event.target().as_ref()) {
                    inner.close();
                }
            }
        })?;

        let weak = Rc::downgrade(self);
        let on_close = Listener::attach(self.skeleton.close.as_ref(), "click", move |_event: Event| {
            if let Some(inner) = weak.upgrade() {
                inner.close();
            }
        })?;

        self.dismissal.borrow_mut().extend([on_backdrop, on_close]);
        Ok(())
    }

    fn wire_trigger(self: &Rc<Self>, trigger: &Element) -> Result<()> {
        if self.trigger.borrow().is_some() {
            return Ok(());
        }
        let weak = Rc::downgrade(self);
        let listener = Listener::attach(trigger.as_ref(), "click", move |event: Event| {
            event.prevent_default();
            spawn_open(weak.clone());
        })?;
        *self.trigger.borrow_mut() = Some(listener);
        Ok(())
    }

    fn destroy(&self) {
        if self.destroyed.replace(true) {
            return;
        }
        self.release_page_state();
        self.cancel_detach();
        self.loading.borrow_mut().take();
        self.skeleton.set_active(false);
        self.skeleton.detach();
        self.phase.set(Phase::Closed);
        self.dismissal.borrow_mut().clear();
        self.trigger.borrow_mut().take();
        debug_log!("m-modal {}: destroyed", self.id);
    }

    fn release_page_state(&self) {
        if page::is_registered(&self.id) {
            if let Err(err) = page::register_closed(&self.id) {
                warn_log!("m-modal {}: could not release page state: {}", self.id, err);
            }
        }
    }
}

impl PageMember for ModalInner {
    fn presentation(&self) -> Presentation {
        self.config.presentation.clone()
    }

    fn close_from_page(self: Rc<Self>) {
        self.close();
    }
}

impl Drop for ModalInner {
    fn drop(&mut self) {
        if !self.destroyed.get() {
            self.release_page_state();
            self.skeleton.detach();
        }
    }
}

/// Fire-and-forget open used by trigger clicks and `openNow`.
fn spawn_open(this: Weak<ModalInner>) {
    spawn_local(async move {
        if let Err(err) = ModalInner::open(this).await {
            error_log!("m-modal: open failed: {}", err);
        }
    });
}

/// Handle to one modal instance.
///
/// Clones share the same instance.  When the last handle is dropped the
/// overlay is detached and all of its listeners are removed; hand the
/// instance to the page with [`Modal::keep_alive`] if nothing else owns it.
#[wasm_bindgen]
#[derive(Clone)]
pub struct Modal {
    inner: Rc<ModalInner>,
}

impl Modal {
    pub fn new(config: ModalConfig) -> Result<Self> {
        Self::with_collaborators(config, Collaborators::default())
    }

    pub fn with_collaborators(config: ModalConfig, collaborators: Collaborators) -> Result<Self> {
        let document = dom_utils::document()?;
        let skeleton = Skeleton::build(&document)?;
        let id = ModalId::new();
        skeleton.overlay.set_attribute(INSTANCE_ID_ATTR, &id.to_string())?;

        let inner = Rc::new(ModalInner {
            id,
            config,
            collaborators,
            document,
            skeleton,
            phase: Cell::new(Phase::Closed),
            content: Cell::new(ContentState::Empty),
            loading: RefCell::new(None),
            open_seq: Cell::new(0),
            destroyed: Cell::new(false),
            pending_detach: RefCell::new(None),
            dismissal: RefCell::new(Vec::new()),
            trigger: RefCell::new(None),
        });
        let modal = Self { inner };

        if modal.inner.config.auto_discover {
            let found = discovery::discover_triggers(&modal.inner.config.scan_root, &modal.inner.collaborators)?;
            debug_log!("m-modal {}: discovered {} trigger(s)", id, found.len());
        }
        if !modal.inner.config.skip_auto_wire {
            if let Some(trigger) = modal.inner.config.trigger.clone() {
                modal.inner.wire_trigger(&trigger)?;
            }
        }
        if modal.inner.config.open_immediately {
            spawn_open(Rc::downgrade(&modal.inner));
        }
        Ok(modal)
    }

    /// Run the full open sequence.  Content errors are returned after the
    /// overlay has been shown, so the user can still dismiss it.
    pub async fn open(&self) -> Result<()> {
        ModalInner::open(Rc::downgrade(&self.inner)).await
    }

    /// Attach the overlay and insert content if that has not happened yet,
    /// without showing it.
    pub async fn mount(&self) -> Result<()> {
        if self.inner.destroyed.get() {
            return Err(ModalError::configuration("modal has been destroyed"));
        }
        ModalInner::mount(&Rc::downgrade(&self.inner)).await
    }

    pub fn apply_options(&self) -> Result<()> {
        self.inner.apply_options()
    }

    /// Start closing: page state and the active class are released now, the
    /// overlay is detached after [`CLOSE_DELAY_MS`].
    pub fn close(&self) {
        self.inner.close();
    }

    /// Detach immediately and drop every listener.  The instance ignores
    /// further opens.
    pub fn destroy(&self) {
        self.inner.destroy();
    }

    /// Transfer ownership to the page coordinator.
    pub fn keep_alive(self) {
        page::adopt(self);
    }

    pub fn id(&self) -> ModalId {
        self.inner.id
    }

    pub fn phase(&self) -> Phase {
        self.inner.phase.get()
    }

    pub fn is_open(&self) -> bool {
        self.inner.skeleton.is_active()
    }

    pub fn content_inserted(&self) -> bool {
        self.inner.content.get() == ContentState::Inserted
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.get()
    }

    pub fn is_attached(&self) -> bool {
        self.inner.skeleton.is_attached()
    }

    pub fn config(&self) -> &ModalConfig {
        &self.inner.config
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.inner.skeleton
    }

    pub fn overlay(&self) -> Element {
        self.inner.skeleton.overlay.clone()
    }

    pub fn wrapper(&self) -> Element {
        self.inner.skeleton.wrapper.clone()
    }

    pub fn inner_container(&self) -> Element {
        self.inner.skeleton.inner.clone()
    }
}

impl fmt::Debug for Modal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Modal")
            .field("id", &self.inner.id)
            .field("phase", &self.inner.phase.get())
            .field("content", &self.inner.content.get())
            .finish()
    }
}
