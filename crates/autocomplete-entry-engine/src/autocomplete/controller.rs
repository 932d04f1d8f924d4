use log::{debug, trace};

use crate::autocomplete::{
    GeometryService, HandleValue, Key, KeyCommand, OpenSession, Scheduler, Session, SessionView,
    Ticket, anchor, commit, key_binding, locate_in_block, prefix_matches,
};
use crate::document::EditorState;

/// Compute the session for a document from scratch
///
/// Each step short-circuits to `Session::Closed`: the caret must be collapsed
/// and not on an entity, a trigger must be located before it, and the
/// environment must be able to place the list.
pub fn evaluate<G: GeometryService>(
    state: &EditorState,
    vocabulary: &[String],
    geometry: &G,
) -> Session {
    let selection = state.selection();
    if !selection.is_collapsed() {
        return Session::Closed;
    }
    let focus = selection.focus;
    let Some(block) = state.focus_block() else {
        return Session::Closed;
    };
    if block.entity_at(focus.offset).is_some() {
        return Session::Closed;
    }

    let Some(found) = locate_in_block(block, focus.offset) else {
        return Session::Closed;
    };
    let suggestions = prefix_matches(vocabulary, &found.compare_text);
    let Some(anchor) = anchor::resolve(found.trigger_offset, focus.offset, state, geometry) else {
        return Session::Closed;
    };

    Session::Open(OpenSession {
        block: focus.block,
        trigger_offset: found.trigger_offset,
        focus_offset: focus.offset,
        selection_index: 0,
        suggestions,
        anchor,
    })
}

/// Owns the document and the autocomplete session
///
/// Hosts feed every document change through `on_change` (or the deferred
/// pair `on_change_deferred`/`run_deferred`) and route key presses through
/// `handle_key` before applying their own editing behaviour.
#[derive(Debug, Default)]
pub struct EditorCore {
    state: EditorState,
    session: Session,
    vocabulary: Vec<String>,
    scheduler: Scheduler,
}

impl EditorCore {
    pub fn new(state: EditorState, vocabulary: Vec<String>) -> Self {
        Self {
            state,
            session: Session::Closed,
            vocabulary,
            scheduler: Scheduler::default(),
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn view(&self) -> Option<SessionView<'_>> {
        self.session.view()
    }

    /// Replace the document and re-evaluate the session immediately
    pub fn on_change<G: GeometryService>(&mut self, state: EditorState, geometry: &G) {
        self.scheduler.invalidate();
        self.state = state;
        self.refresh(geometry);
    }

    /// Evaluate the current document again, e.g. after the layout moved
    ///
    /// Supersedes any pending deferred evaluation.
    pub fn reevaluate<G: GeometryService>(&mut self, geometry: &G) {
        self.scheduler.invalidate();
        self.refresh(geometry);
    }

    /// Run `edit` on the current document, then `on_change`
    pub fn apply<G: GeometryService>(
        &mut self,
        edit: impl FnOnce(EditorState) -> EditorState,
        geometry: &G,
    ) {
        let state = std::mem::take(&mut self.state);
        self.on_change(edit(state), geometry);
    }

    /// Replace the document and schedule the evaluation for later
    ///
    /// The session closes right away so no command can act on offsets of
    /// the previous document; `run_deferred` reopens it.
    pub fn on_change_deferred(&mut self, state: EditorState) -> Ticket {
        self.state = state;
        self.close();
        self.scheduler.schedule()
    }

    pub fn apply_deferred(&mut self, edit: impl FnOnce(EditorState) -> EditorState) -> Ticket {
        let state = std::mem::take(&mut self.state);
        self.on_change_deferred(edit(state))
    }

    pub fn pending_evaluation(&self) -> Option<Ticket> {
        self.scheduler.pending()
    }

    /// Evaluate for `ticket` unless a newer change superseded it
    pub fn run_deferred<G: GeometryService>(&mut self, ticket: Ticket, geometry: &G) -> bool {
        if !self.scheduler.take(ticket) {
            trace!("Dropping superseded autocomplete evaluation");
            return false;
        }
        self.refresh(geometry);
        true
    }

    pub fn handle_key(&mut self, key: Key) -> HandleValue {
        match key_binding(key, &self.session) {
            Some(command) => self.handle_command(command),
            None => HandleValue::NotHandled,
        }
    }

    pub fn handle_command(&mut self, command: KeyCommand) -> HandleValue {
        let Some(selection_index) = self.session.as_open().map(|open| open.selection_index) else {
            return HandleValue::NotHandled;
        };
        match command {
            KeyCommand::Commit => self.commit(selection_index),
            KeyCommand::SelectNext => self.session.select_next(),
            KeyCommand::SelectPrevious => self.session.select_previous(),
            KeyCommand::Cancel => {
                self.cancel();
                HandleValue::Handled
            }
        }
    }

    /// Commit the suggestion at `index`, as a pointer selection would
    pub fn commit(&mut self, index: usize) -> HandleValue {
        let Some(open) = self.session.as_open() else {
            return HandleValue::NotHandled;
        };
        if index >= open.suggestions.len() {
            return HandleValue::NotHandled;
        }

        let state = std::mem::take(&mut self.state);
        self.state = commit(state, &self.session, index);
        self.close();
        HandleValue::Handled
    }

    pub fn cancel(&mut self) {
        self.close();
    }

    fn close(&mut self) {
        if self.session.is_open() {
            debug!("Autocomplete session closed");
        }
        self.session = Session::Closed;
    }

    fn refresh<G: GeometryService>(&mut self, geometry: &G) {
        let session = evaluate(&self.state, &self.vocabulary, geometry);
        trace!("Evaluated autocomplete at version {}", self.state.version());

        match (&self.session, &session) {
            (Session::Closed, Session::Open(open)) => debug!(
                "Autocomplete session opened at {} with {} suggestions",
                open.trigger_offset,
                open.suggestions.len()
            ),
            (Session::Open(_), Session::Closed) => debug!("Autocomplete session closed"),
            _ => {}
        }
        self.session = session;
    }
}
