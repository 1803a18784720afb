//! Page coordinator: the single owner of page-wide modal state.
//!
//! Every open modal registers here.  The coordinator keeps a stack of open
//! instances and derives the shared effects from it:
//!
//! * scrolling on `<html>` is blocked while the stack is non-empty,
//! * the CSS custom properties follow the topmost modal,
//! * one document-level `keydown` listener closes the topmost modal on Escape.
//!
//! It also owns the instances created by trigger discovery, which have no
//! other owner on the Rust side.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::KeyboardEvent;

use crate::config::Presentation;
use crate::errors::Result;
use crate::modal::{Modal, ModalId};
use crate::{debug_log, dom_utils, presentation};

/// What the coordinator needs from an open modal.
pub(crate) trait PageMember {
    fn presentation(&self) -> Presentation;
    fn close_from_page(self: Rc<Self>);
}

/// Ordered set of open entries, most recently opened last.
#[derive(Debug, Clone)]
pub struct OpenStack<K, V> {
    entries: Vec<(K, V)>,
}

impl<K: PartialEq, V> Default for OpenStack<K, V> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<K: PartialEq, V> OpenStack<K, V> {
    /// Put `key` on top.  Re-pushing an open key moves it to the top instead
    /// of duplicating it.
    pub fn push(&mut self, key: K, value: V) {
        self.remove(&key);
        self.entries.push((key, value));
    }

    pub fn remove(&mut self, key: &K) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(k, _)| k != key);
        before != self.entries.len()
    }

    pub fn top(&self) -> Option<&(K, V)> {
        self.entries.last()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn retain(&mut self, keep: impl FnMut(&(K, V)) -> bool) {
        self.entries.retain(keep);
    }
}

pub fn is_escape_key(key: &str, key_code: u32) -> bool {
    matches!(key, "Escape" | "Esc") || key_code == 27
}

#[derive(Default)]
struct PageState {
    open: OpenStack<ModalId, Weak<dyn PageMember>>,
    escape_listener: Option<Closure<dyn FnMut(KeyboardEvent)>>,
    discovered: Vec<Modal>,
}

impl PageState {
    /// Topmost entry that is still alive, pruning dropped instances.
    fn top_member(&mut self) -> Option<Rc<dyn PageMember>> {
        self.open.retain(|(_, weak)| weak.strong_count() > 0);
        self.open.top().and_then(|(_, weak)| weak.upgrade())
    }
}

thread_local! {
    static PAGE: RefCell<PageState> = RefCell::new(PageState::default());
}

fn ensure_escape_listener() -> Result<()> {
    let installed = PAGE.with(|page| page.borrow().escape_listener.is_some());
    if installed {
        return Ok(());
    }

    let document = dom_utils::document()?;
    let cb = Closure::<dyn FnMut(_)>::wrap(Box::new(move |event: KeyboardEvent| {
        if !is_escape_key(&event.key(), event.key_code()) {
            return;
        }
        // release the borrow before closing, close() re-enters the coordinator
        let top = PAGE.with(|page| page.borrow_mut().top_member());
        if let Some(member) = top {
            member.close_from_page();
        }
    }));
    document.add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref())?;
    PAGE.with(|page| page.borrow_mut().escape_listener = Some(cb));
    debug_log!("m-modal: escape listener installed");
    Ok(())
}

/// Record `id` as the topmost open modal and block page scrolling.
pub(crate) fn register_open(id: ModalId, member: Weak<dyn PageMember>) -> Result<()> {
    ensure_escape_listener()?;
    PAGE.with(|page| page.borrow_mut().open.push(id, member));
    presentation::block_scroll(&dom_utils::document()?)
}

/// Forget `id`; unblock scrolling when nothing is left open, otherwise hand
/// the CSS variables back to the new top.
pub(crate) fn register_closed(id: &ModalId) -> Result<()> {
    let next = PAGE.with(|page| {
        let mut page = page.borrow_mut();
        page.open.remove(id);
        page.top_member()
    });

    let document = dom_utils::document()?;
    match next {
        Some(member) => {
            presentation::apply(&document, &member.presentation())?;
            presentation::block_scroll(&document)?;
        }
        None => presentation::unblock_scroll(&document)?,
    }
    Ok(())
}

pub fn open_count() -> usize {
    PAGE.with(|page| page.borrow().open.len())
}

pub fn is_registered(id: &ModalId) -> bool {
    PAGE.with(|page| page.borrow().open.contains(id))
}

pub fn topmost() -> Option<ModalId> {
    PAGE.with(|page| page.borrow().open.keys().last().cloned())
}

/// Keep a discovered instance alive for the lifetime of the page.
pub(crate) fn adopt(modal: Modal) {
    PAGE.with(|page| page.borrow_mut().discovered.push(modal));
}

pub fn discovered_count() -> usize {
    PAGE.with(|page| page.borrow().discovered.len())
}

/// Destroy and drop every discovered instance, e.g. before swapping out the
/// page content in a single-page app.
pub fn release_discovered() {
    let released = PAGE.with(|page| std::mem::take(&mut page.borrow_mut().discovered));
    if !released.is_empty() {
        debug_log!("m-modal: releasing {} discovered modal(s)", released.len());
    }
    for modal in released {
        modal.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn escape_key_variants() {
        assert!(is_escape_key("Escape", 0));
        assert!(is_escape_key("Esc", 0));
        assert!(is_escape_key("", 27));
        assert!(!is_escape_key("Enter", 13));
    }

    #[test]
    fn push_moves_existing_key_to_top() {
        let mut stack = OpenStack::default();
        stack.push(1, "a");
        stack.push(2, "b");
        stack.push(1, "a2");
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.top(), Some(&(1, "a2")));
        assert!(stack.remove(&1));
        assert_eq!(stack.top(), Some(&(2, "b")));
        assert!(!stack.remove(&1));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Open(u8),
        Close(u8),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![(0u8..6).prop_map(Op::Open), (0u8..6).prop_map(Op::Close)]
    }

    proptest! {
        #[test]
        fn stack_matches_model(ops in proptest::collection::vec(op_strategy(), 0..64)) {
            let mut stack: OpenStack<u8, ()> = OpenStack::default();
            let mut model: Vec<u8> = Vec::new();

            for op in ops {
                match op {
                    Op::Open(k) => {
                        stack.push(k, ());
                        model.retain(|m| *m != k);
                        model.push(k);
                    }
                    Op::Close(k) => {
                        stack.remove(&k);
                        model.retain(|m| *m != k);
                    }
                }
                let keys: Vec<u8> = stack.keys().copied().collect();
                prop_assert_eq!(&keys, &model);
                prop_assert_eq!(stack.top().map(|(k, _)| *k), model.last().copied());
                // scroll stays blocked exactly while something is open
                prop_assert_eq!(stack.is_empty(), model.is_empty());
            }
        }
    }
}
