//! Terminal app state
//!
//! Wraps the view-model with the bits only the terminal needs: list
//! selection, status line, help popup and the queue of requests for the
//! runtime worker.

use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::{
    Action, ActiveTab, DashboardEvent, DashboardViewModel, FetchTicket, NotifyLevel, ViewState,
};
use crate::domain::{status, Appointment, AppointmentId, AppointmentStatus, DashboardError, Theme};
use crate::infrastructure::RuntimeEvent;

const STATUS_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: NotifyLevel,
    pub since: Instant,
}

pub struct App {
    pub view_model: DashboardViewModel,
    pub theme: Theme,
    pub source_name: String,
    pub persist_status: bool,
    pub selected: usize,
    pub help_open: bool,
    pub should_quit: bool,
    status: Option<StatusMessage>,
    view_events: Receiver<DashboardEvent>,
    pending_fetch: Option<FetchTicket>,
    pending_persist: Vec<(AppointmentId, AppointmentStatus)>,
}

impl App {
    /// Build the app and queue the initial fetch
    pub fn new(theme: Theme, source_name: impl Into<String>, persist_status: bool) -> Self {
        let (tx, rx) = mpsc::channel();
        let mut view_model = DashboardViewModel::new();
        view_model.subscribe(Box::new(tx));
        let pending_fetch = view_model.initialize();

        Self {
            view_model,
            theme,
            source_name: source_name.into(),
            persist_status,
            selected: 0,
            help_open: false,
            should_quit: false,
            status: None,
            view_events: rx,
            pending_fetch,
            pending_persist: Vec::new(),
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>, level: NotifyLevel) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            since: Instant::now(),
        });
    }

    pub fn status_text(&self) -> Option<(&str, NotifyLevel)> {
        self.status
            .as_ref()
            .map(|status| (status.text.as_str(), status.level))
    }

    pub fn on_tick(&mut self) {
        if let Some(status) = self.status.as_ref() {
            if status.since.elapsed() > STATUS_TTL {
                self.status = None;
            }
        }
    }

    pub fn take_fetch_request(&mut self) -> Option<FetchTicket> {
        self.pending_fetch.take()
    }

    pub fn take_persist_requests(&mut self) -> Vec<(AppointmentId, AppointmentStatus)> {
        std::mem::take(&mut self.pending_persist)
    }

    pub fn selected_appointment(&self) -> Option<&Appointment> {
        self.view_model.visible_appointment(self.selected)
    }

    pub fn visible_len(&self) -> usize {
        self.view_model.visible_appointments().len()
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Quit => self.quit(),
            Action::ToggleHelp => self.help_open = !self.help_open,
            Action::SetTab(tab) => self.switch_tab(tab),
            Action::NextTab => self.switch_tab(self.view_model.active_tab().next()),
            Action::PrevTab => self.switch_tab(self.view_model.active_tab().prev()),
            Action::SelectNext => {
                let len = self.visible_len();
                if len > 0 {
                    self.selected = (self.selected + 1).min(len - 1);
                }
            }
            Action::SelectPrev => self.selected = self.selected.saturating_sub(1),
            Action::UpdateSelected(status) => self.update_selected(status),
            Action::Refresh => match self.view_model.refresh() {
                Some(ticket) => {
                    self.pending_fetch = Some(ticket);
                    self.set_status("Refreshing…", NotifyLevel::Info);
                }
                None if self.view_model.is_fetching() => {
                    self.set_status("Already loading", NotifyLevel::Warn)
                }
                None => {}
            },
            Action::Notify(text, level) => self.set_status(text, level),
        }
        self.drain_view_events();
    }

    pub fn apply_runtime_event(&mut self, event: RuntimeEvent) {
        match event {
            RuntimeEvent::AppointmentsLoaded { ticket, result } => {
                self.view_model.apply_fetch(ticket, result);
            }
            RuntimeEvent::StatusPersisted { id, status } => {
                tracing::debug!(%id, %status, "status persisted");
            }
            RuntimeEvent::PersistFailed { id, message } => {
                tracing::warn!(%id, error = %message, "status not persisted");
                self.set_status(format!("Saving {id} failed: {message}"), NotifyLevel::Warn);
            }
            RuntimeEvent::Error { message } => self.set_status(message, NotifyLevel::Error),
        }
        self.drain_view_events();
    }

    /// Stop accepting results; a late fetch completion is dropped
    pub fn quit(&mut self) {
        self.view_model.dismiss();
        self.should_quit = true;
    }

    fn switch_tab(&mut self, tab: ActiveTab) {
        match self.view_model.set_active_tab(tab) {
            Ok(()) => {}
            Err(err) => self.report(err),
        }
    }

    fn update_selected(&mut self, new_status: AppointmentStatus) {
        let Some(id) = self.selected_appointment().map(Appointment::id) else {
            self.set_status("No appointment selected", NotifyLevel::Warn);
            return;
        };
        match self.view_model.update_status(id, new_status) {
            Ok(stats) => {
                self.set_status(
                    format!(
                        "{id} → {} ({} of {} {})",
                        status::label_for(new_status),
                        stats.count(new_status),
                        stats.total,
                        new_status,
                    ),
                    NotifyLevel::Info,
                );
                if self.persist_status {
                    self.pending_persist.push((id, new_status));
                }
            }
            Err(err) => self.report(err),
        }
    }

    fn report(&mut self, err: DashboardError) {
        let level = match err {
            DashboardError::NotReady(_) => NotifyLevel::Warn,
            _ => NotifyLevel::Error,
        };
        self.set_status(err.to_string(), level);
    }

    fn drain_view_events(&mut self) {
        while let Ok(event) = self.view_events.try_recv() {
            match event {
                DashboardEvent::StateChanged(ViewState::Ready) => {
                    let total = self.view_model.stats().total;
                    self.set_status(format!("Loaded {total} appointments"), NotifyLevel::Info);
                }
                DashboardEvent::StateChanged(ViewState::Error(message)) => {
                    self.set_status(format!("Load failed: {message}"), NotifyLevel::Error);
                }
                DashboardEvent::StateChanged(ViewState::Loading) => {}
                DashboardEvent::TabChanged(_) => self.selected = 0,
                DashboardEvent::StatsChanged(_) => {}
            }
        }
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

/// Map a key press to an action
pub fn action_for_key(key: KeyEvent, help_open: bool) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::None;
    }

    if help_open {
        return match key.code {
            KeyCode::Char('?') | KeyCode::Esc => Action::ToggleHelp,
            KeyCode::Char('q') => Action::Quit,
            _ => Action::None,
        };
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), mods) if mods.contains(KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => Action::Quit,
        (KeyCode::Char('?'), _) => Action::ToggleHelp,
        (KeyCode::Char('r'), _) => Action::Refresh,
        (KeyCode::Tab, _) | (KeyCode::Right, _) | (KeyCode::Char('l'), _) => Action::NextTab,
        (KeyCode::BackTab, _) | (KeyCode::Left, _) | (KeyCode::Char('h'), _) => Action::PrevTab,
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => Action::SelectNext,
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => Action::SelectPrev,
        (KeyCode::Char('p'), _) => Action::UpdateSelected(AppointmentStatus::Pending),
        (KeyCode::Char('a'), _) => Action::UpdateSelected(AppointmentStatus::Confirmed),
        (KeyCode::Char('x'), _) => Action::UpdateSelected(AppointmentStatus::Cancelled),
        (KeyCode::Char('d'), _) => Action::UpdateSelected(AppointmentStatus::Completed),
        (KeyCode::Char(c), _) => match ActiveTab::from_shortcut(c) {
            Some(tab) => Action::SetTab(tab),
            None => Action::None,
        },
        _ => Action::None,
    }
}
