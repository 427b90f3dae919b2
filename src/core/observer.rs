//! Observer interface between the view-model and the presentation layer

use std::sync::mpsc::Sender;

use crate::core::view_model::{ActiveTab, ViewState};
use crate::domain::Stats;

/// Callbacks fired synchronously after the view-model commits a change
pub trait DashboardObserver {
    fn on_state_changed(&mut self, _state: &ViewState) {}

    fn on_stats_changed(&mut self, _stats: &Stats) {}

    fn on_tab_changed(&mut self, _tab: ActiveTab) {}
}

/// Owned snapshot of a view-model change, for channel-based observers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    StateChanged(ViewState),
    StatsChanged(Stats),
    TabChanged(ActiveTab),
}

/// Forward every change into a channel; a closed receiver is ignored
impl DashboardObserver for Sender<DashboardEvent> {
    fn on_state_changed(&mut self, state: &ViewState) {
        let _ = self.send(DashboardEvent::StateChanged(state.clone()));
    }

    fn on_stats_changed(&mut self, stats: &Stats) {
        let _ = self.send(DashboardEvent::StatsChanged(stats.clone()));
    }

    fn on_tab_changed(&mut self, tab: ActiveTab) {
        let _ = self.send(DashboardEvent::TabChanged(tab));
    }
}
