//! Dashboard view-model
//!
//! Single source of truth for what the dashboard shows during one screen
//! lifetime: the appointment collection, its derived stats, the active tab
//! and the coarse loading state. It performs no I/O itself; the owner asks
//! it for a [`FetchTicket`], runs the fetch wherever it likes, and hands
//! the result back through [`DashboardViewModel::apply_fetch`].

use std::fmt;

use crate::core::observer::DashboardObserver;
use crate::domain::{Appointment, AppointmentId, AppointmentStatus, DashboardError, Stats};

/// Coarse view state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Ready,
    Error(String),
}

impl ViewState {
    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Loading => "loading",
            ViewState::Ready => "ready",
            ViewState::Error(_) => "in error",
        }
    }
}

/// Filter selector for the appointment list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveTab {
    #[default]
    All,
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl ActiveTab {
    pub const ALL: [ActiveTab; 5] = [
        ActiveTab::All,
        ActiveTab::Pending,
        ActiveTab::Confirmed,
        ActiveTab::Cancelled,
        ActiveTab::Completed,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ActiveTab::All => "All",
            ActiveTab::Pending => "Pending",
            ActiveTab::Confirmed => "Confirmed",
            ActiveTab::Cancelled => "Cancelled",
            ActiveTab::Completed => "Completed",
        }
    }

    pub fn shortcut(&self) -> char {
        match self {
            ActiveTab::All => '1',
            ActiveTab::Pending => '2',
            ActiveTab::Confirmed => '3',
            ActiveTab::Cancelled => '4',
            ActiveTab::Completed => '5',
        }
    }

    pub fn from_shortcut(c: char) -> Option<Self> {
        Self::ALL.iter().copied().find(|tab| tab.shortcut() == c)
    }

    /// The status this tab narrows to, `None` for `All`
    pub fn status(&self) -> Option<AppointmentStatus> {
        match self {
            ActiveTab::All => None,
            ActiveTab::Pending => Some(AppointmentStatus::Pending),
            ActiveTab::Confirmed => Some(AppointmentStatus::Confirmed),
            ActiveTab::Cancelled => Some(AppointmentStatus::Cancelled),
            ActiveTab::Completed => Some(AppointmentStatus::Completed),
        }
    }

    pub fn includes(&self, appointment: &Appointment) -> bool {
        self.status()
            .map_or(true, |status| appointment.status() == status)
    }

    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|tab| tab == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        let idx = Self::ALL.iter().position(|tab| tab == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Pairs a fetch request with its completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

pub struct DashboardViewModel {
    state: ViewState,
    appointments: Vec<Appointment>,
    stats: Stats,
    active_tab: ActiveTab,
    generation: u64,
    in_flight: Option<FetchTicket>,
    dismissed: bool,
    observers: Vec<Box<dyn DashboardObserver>>,
}

impl fmt::Debug for DashboardViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashboardViewModel")
            .field("state", &self.state)
            .field("appointments", &self.appointments.len())
            .field("stats", &self.stats)
            .field("active_tab", &self.active_tab)
            .field("in_flight", &self.in_flight)
            .field("dismissed", &self.dismissed)
            .finish()
    }
}

impl Default for DashboardViewModel {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardViewModel {
    pub fn new() -> Self {
        Self {
            state: ViewState::Loading,
            appointments: Vec::new(),
            stats: Stats::default(),
            active_tab: ActiveTab::default(),
            generation: 0,
            in_flight: None,
            dismissed: false,
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn DashboardObserver>) {
        self.observers.push(observer);
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == ViewState::Ready
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The fetch failure, if the last load failed
    pub fn error(&self) -> Option<DashboardError> {
        match &self.state {
            ViewState::Error(message) => Some(DashboardError::FetchFailed(message.clone())),
            _ => None,
        }
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn active_tab(&self) -> ActiveTab {
        self.active_tab
    }

    /// Appointments matching the active tab, in collection order
    pub fn visible_appointments(&self) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|appointment| self.active_tab.includes(appointment))
            .collect()
    }

    pub fn visible_appointment(&self, index: usize) -> Option<&Appointment> {
        self.appointments
            .iter()
            .filter(|appointment| self.active_tab.includes(appointment))
            .nth(index)
    }

    /// Start the initial fetch.
    ///
    /// Returns `None` when a fetch has already been started for this
    /// view-model (in flight or finished) or after dismissal.
    pub fn initialize(&mut self) -> Option<FetchTicket> {
        if self.dismissed {
            return None;
        }
        if self.generation > 0 {
            tracing::debug!(
                generation = self.generation,
                "initialize ignored: fetch already started"
            );
            return None;
        }
        Some(self.begin_fetch())
    }

    /// Reload from the provider, returning to `Loading`.
    ///
    /// Ignored while a fetch is in flight.
    pub fn refresh(&mut self) -> Option<FetchTicket> {
        if self.dismissed || self.in_flight.is_some() {
            return None;
        }
        self.set_state(ViewState::Loading);
        Some(self.begin_fetch())
    }

    /// Apply a fetch completion. Returns whether it was applied.
    ///
    /// Completions for a superseded ticket, or arriving after
    /// [`dismiss`](Self::dismiss), are dropped.
    pub fn apply_fetch<E: fmt::Display>(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Appointment>, E>,
    ) -> bool {
        if self.dismissed {
            tracing::debug!(generation = ticket.0, "discarding fetch after dismiss");
            return false;
        }
        if self.in_flight != Some(ticket) {
            tracing::debug!(generation = ticket.0, "discarding stale fetch");
            return false;
        }
        self.in_flight = None;

        match result {
            Ok(appointments) => {
                tracing::info!(count = appointments.len(), "appointments loaded");
                self.appointments = appointments;
                self.recompute_stats();
                self.set_state(ViewState::Ready);
            }
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(error = %message, "appointment fetch failed");
                self.appointments.clear();
                self.recompute_stats();
                self.set_state(ViewState::Error(message));
            }
        }
        true
    }

    /// Change one appointment's status and return the recomputed stats.
    ///
    /// Fails without touching any state when not `Ready` or when `id` is
    /// unknown.
    pub fn update_status(
        &mut self,
        id: AppointmentId,
        status: AppointmentStatus,
    ) -> Result<Stats, DashboardError> {
        self.ensure_ready()?;
        let Some(appointment) = self
            .appointments
            .iter_mut()
            .find(|appointment| appointment.id() == id)
        else {
            tracing::warn!(%id, "status update for unknown appointment");
            return Err(DashboardError::NotFound(id));
        };

        let previous = appointment.status();
        appointment.set_status(status);
        tracing::info!(%id, from = %previous, to = %status, "appointment status updated");
        self.recompute_stats();
        Ok(self.stats.clone())
    }

    /// Like [`update_status`](Self::update_status), for an unparsed status
    pub fn update_status_raw(
        &mut self,
        id: AppointmentId,
        status: &str,
    ) -> Result<Stats, DashboardError> {
        let status: AppointmentStatus = status.parse().inspect_err(|err| {
            tracing::warn!(%id, error = %err, "rejected status update");
        })?;
        self.update_status(id, status)
    }

    pub fn set_active_tab(&mut self, tab: ActiveTab) -> Result<(), DashboardError> {
        self.ensure_ready()?;
        if self.active_tab == tab {
            return Ok(());
        }
        self.active_tab = tab;
        for observer in &mut self.observers {
            observer.on_tab_changed(tab);
        }
        Ok(())
    }

    /// Tear down: any fetch still in flight is discarded on completion
    pub fn dismiss(&mut self) {
        self.dismissed = true;
        self.in_flight = None;
        self.observers.clear();
    }

    fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        let ticket = FetchTicket(self.generation);
        self.in_flight = Some(ticket);
        tracing::info!(generation = ticket.0, "fetching appointments");
        ticket
    }

    fn ensure_ready(&self) -> Result<(), DashboardError> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(DashboardError::NotReady(self.state.name()))
        }
    }

    fn recompute_stats(&mut self) {
        self.stats = Stats::from_appointments(&self.appointments);
        for observer in &mut self.observers {
            observer.on_stats_changed(&self.stats);
        }
    }

    fn set_state(&mut self, state: ViewState) {
        self.state = state;
        for observer in &mut self.observers {
            observer.on_state_changed(&self.state);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use chrono::{TimeZone, Utc};

    use super::*;

    fn appointment(id: u64, status: AppointmentStatus) -> Appointment {
        Appointment::new(
            id,
            format!("Dr. {id}"),
            "General",
            Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap(),
            status,
        )
    }

    fn ready(appointments: Vec<Appointment>) -> DashboardViewModel {
        let mut vm = DashboardViewModel::new();
        let ticket = vm.initialize().unwrap();
        assert!(vm.apply_fetch(ticket, Ok::<_, String>(appointments)));
        vm
    }

    #[derive(Default)]
    struct Recorder {
        states: Vec<ViewState>,
        totals: Vec<usize>,
        tabs: Vec<ActiveTab>,
    }

    struct Shared(Rc<RefCell<Recorder>>);

    impl DashboardObserver for Shared {
        fn on_state_changed(&mut self, state: &ViewState) {
            self.0.borrow_mut().states.push(state.clone());
        }
        fn on_stats_changed(&mut self, stats: &Stats) {
            self.0.borrow_mut().totals.push(stats.total);
        }
        fn on_tab_changed(&mut self, tab: ActiveTab) {
            self.0.borrow_mut().tabs.push(tab);
        }
    }

    #[test]
    fn starts_loading_and_rejects_mutations() {
        let mut vm = DashboardViewModel::new();
        assert_eq!(vm.state(), &ViewState::Loading);
        assert_eq!(
            vm.update_status(AppointmentId(1), AppointmentStatus::Confirmed),
            Err(DashboardError::NotReady("loading"))
        );
        assert_eq!(
            vm.set_active_tab(ActiveTab::Pending),
            Err(DashboardError::NotReady("loading"))
        );
    }

    #[test]
    fn second_initialize_is_a_no_op() {
        let mut vm = DashboardViewModel::new();
        let first = vm.initialize();
        assert!(first.is_some());
        assert!(vm.initialize().is_none());
        assert!(vm.is_fetching());

        vm.apply_fetch(first.unwrap(), Ok::<_, String>(vec![]));
        assert!(vm.initialize().is_none());
    }

    #[test]
    fn completion_after_dismiss_is_discarded() {
        let mut vm = DashboardViewModel::new();
        let ticket = vm.initialize().unwrap();
        vm.dismiss();
        let applied = vm.apply_fetch(
            ticket,
            Ok::<_, String>(vec![appointment(1, AppointmentStatus::Pending)]),
        );
        assert!(!applied);
        assert!(vm.appointments().is_empty());
        assert_eq!(vm.state(), &ViewState::Loading);
    }

    #[test]
    fn stale_ticket_is_discarded() {
        let mut vm = ready(vec![appointment(1, AppointmentStatus::Pending)]);
        let old = FetchTicket(1);
        let fresh = vm.refresh().unwrap();
        assert_ne!(old, fresh);
        assert!(!vm.apply_fetch(old, Ok::<_, String>(vec![])));
        assert!(vm.apply_fetch(fresh, Ok::<_, String>(vec![])));
        assert_eq!(vm.stats().total, 0);
    }

    #[test]
    fn refresh_is_ignored_while_fetching() {
        let mut vm = DashboardViewModel::new();
        vm.initialize().unwrap();
        assert!(vm.refresh().is_none());
    }

    #[test]
    fn refresh_recovers_from_error() {
        let mut vm = DashboardViewModel::new();
        let ticket = vm.initialize().unwrap();
        vm.apply_fetch(ticket, Err::<Vec<Appointment>, _>("timeout"));
        assert_eq!(vm.error(), Some(DashboardError::FetchFailed("timeout".into())));

        let ticket = vm.refresh().unwrap();
        assert_eq!(vm.state(), &ViewState::Loading);
        vm.apply_fetch(
            ticket,
            Ok::<_, String>(vec![appointment(4, AppointmentStatus::Completed)]),
        );
        assert!(vm.is_ready());
        assert_eq!(vm.stats().count(AppointmentStatus::Completed), 1);
    }

    #[test]
    fn update_is_rejected_in_error_state() {
        let mut vm = DashboardViewModel::new();
        let ticket = vm.initialize().unwrap();
        vm.apply_fetch(ticket, Err::<Vec<Appointment>, _>("boom"));
        assert_eq!(
            vm.update_status(AppointmentId(1), AppointmentStatus::Pending),
            Err(DashboardError::NotReady("in error"))
        );
    }

    #[test]
    fn invalid_raw_status_leaves_state_untouched() {
        let mut vm = ready(vec![appointment(1, AppointmentStatus::Pending)]);
        let before = vm.appointments().to_vec();
        assert_eq!(
            vm.update_status_raw(AppointmentId(1), "postponed"),
            Err(DashboardError::InvalidStatus("postponed".into()))
        );
        assert_eq!(vm.appointments(), before.as_slice());
    }

    #[test]
    fn tab_filters_visible_appointments() {
        let mut vm = ready(vec![
            appointment(1, AppointmentStatus::Pending),
            appointment(2, AppointmentStatus::Confirmed),
            appointment(3, AppointmentStatus::Pending),
        ]);
        assert_eq!(vm.visible_appointments().len(), 3);

        vm.set_active_tab(ActiveTab::Pending).unwrap();
        let ids: Vec<u64> = vm.visible_appointments().iter().map(|a| a.id().0).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(vm.visible_appointment(1).map(|a| a.id()), Some(AppointmentId(3)));
        assert!(vm.visible_appointment(2).is_none());
    }

    #[test]
    fn observers_see_transitions_in_order() {
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let mut vm = DashboardViewModel::new();
        vm.subscribe(Box::new(Shared(recorder.clone())));

        let ticket = vm.initialize().unwrap();
        vm.apply_fetch(
            ticket,
            Ok::<_, String>(vec![appointment(1, AppointmentStatus::Pending)]),
        );
        vm.update_status(AppointmentId(1), AppointmentStatus::Cancelled)
            .unwrap();
        vm.set_active_tab(ActiveTab::Cancelled).unwrap();
        vm.set_active_tab(ActiveTab::Cancelled).unwrap();

        let recorder = recorder.borrow();
        assert_eq!(recorder.states, vec![ViewState::Ready]);
        assert_eq!(recorder.totals, vec![1, 1]);
        assert_eq!(recorder.tabs, vec![ActiveTab::Cancelled]);
    }

    #[test]
    fn tab_cycling_wraps() {
        assert_eq!(ActiveTab::Completed.next(), ActiveTab::All);
        assert_eq!(ActiveTab::All.prev(), ActiveTab::Completed);
        assert_eq!(ActiveTab::from_shortcut('3'), Some(ActiveTab::Confirmed));
        assert_eq!(ActiveTab::from_shortcut('9'), None);
    }
}
