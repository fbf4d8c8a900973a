// Copyright 2026 Waitlist Dashboard Contributors
// Licensed under the Apache License, Version 2.0

use crate::filters::{ColumnFilter, FilterCriteria, row_passes};
use crate::ids::ProviderId;
use crate::model::ServiceProvider;

pub const NOTICE_FILTERS_APPLIED: &str = "Filters applied successfully!";
pub const NOTICE_FILTERS_CLEARED: &str = "Filters cleared.";
pub const NOTICE_USER_UPDATED: &str = "User updated successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Browse,
    Edit(ProviderId),
}

/// Focusable regions of the page, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneKind {
    Filters,
    Search,
    Table,
}

impl PaneKind {
    pub const ALL: [Self; 3] = [Self::Filters, Self::Search, Self::Table];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
}

/// Transient feedback banner. Cleared on a timer by the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: &str) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.to_owned(),
        }
    }

    pub fn info(message: &str) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.to_owned(),
        }
    }
}

/// Page-shell state: the applied filters, the committed search query, the
/// active mode, and the current notice. Draft inputs (sidebar form, search
/// box, edit form) live with the terminal layer and only land here once
/// applied or committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub mode: AppMode,
    pub focus: PaneKind,
    pub criteria: FilterCriteria,
    pub filters: Vec<ColumnFilter>,
    pub query: String,
    pub notice: Option<Notice>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: AppMode::Browse,
            focus: PaneKind::Table,
            criteria: FilterCriteria::default(),
            filters: Vec::new(),
            query: String::new(),
            notice: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    NextPane,
    PrevPane,
    OpenEdit(ProviderId),
    CancelEdit,
    FinishEdit,
    ApplyFilters(FilterCriteria),
    ClearFilters,
    CommitSearch(String),
    ClearNotice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ModeChanged(AppMode),
    FocusChanged(PaneKind),
    FiltersChanged,
    QueryChanged,
    NoticePosted(Notice),
    NoticeCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::NextPane => self.rotate_focus(1),
            AppCommand::PrevPane => self.rotate_focus(-1),
            AppCommand::OpenEdit(id) => {
                self.mode = AppMode::Edit(id);
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::CancelEdit => {
                self.mode = AppMode::Browse;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::FinishEdit => {
                self.mode = AppMode::Browse;
                vec![
                    AppEvent::ModeChanged(self.mode),
                    self.post_notice(Notice::success(NOTICE_USER_UPDATED)),
                ]
            }
            AppCommand::ApplyFilters(criteria) => {
                self.filters = criteria.to_column_filters();
                self.criteria = criteria;
                vec![
                    AppEvent::FiltersChanged,
                    self.post_notice(Notice::success(NOTICE_FILTERS_APPLIED)),
                ]
            }
            AppCommand::ClearFilters => {
                self.criteria = FilterCriteria::default();
                self.filters.clear();
                let mut events = vec![AppEvent::FiltersChanged];
                if !self.query.is_empty() {
                    self.query.clear();
                    events.push(AppEvent::QueryChanged);
                }
                events.push(self.post_notice(Notice::info(NOTICE_FILTERS_CLEARED)));
                events
            }
            AppCommand::CommitSearch(query) => {
                if query == self.query {
                    return Vec::new();
                }
                self.query = query;
                vec![AppEvent::QueryChanged]
            }
            AppCommand::ClearNotice => {
                self.notice = None;
                vec![AppEvent::NoticeCleared]
            }
        }
    }

    /// Whether a record survives the applied column filters and the
    /// committed global query.
    pub fn row_visible(&self, provider: &ServiceProvider) -> bool {
        row_passes(provider, &self.filters, &self.query)
    }

    fn rotate_focus(&mut self, delta: isize) -> Vec<AppEvent> {
        let panes = PaneKind::ALL;
        let current = panes
            .iter()
            .position(|pane| *pane == self.focus)
            .unwrap_or(0) as isize;
        let len = panes.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.focus = panes[next];
        vec![AppEvent::FocusChanged(self.focus)]
    }

    fn post_notice(&mut self, notice: Notice) -> AppEvent {
        self.notice = Some(notice.clone());
        AppEvent::NoticePosted(notice)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AppCommand, AppEvent, AppMode, AppState, NOTICE_FILTERS_APPLIED, NOTICE_FILTERS_CLEARED,
        NOTICE_USER_UPDATED, Notice, NoticeKind, PaneKind,
    };
    use crate::filters::FilterCriteria;
    use crate::ids::ProviderId;
    use crate::model::OnboardingStatus;
    use std::collections::BTreeSet;

    #[test]
    fn focus_rotation_wraps() {
        let mut state = AppState::default();
        assert_eq!(state.focus, PaneKind::Table);

        let events = state.dispatch(AppCommand::NextPane);
        assert_eq!(state.focus, PaneKind::Filters);
        assert_eq!(events, vec![AppEvent::FocusChanged(PaneKind::Filters)]);

        state.dispatch(AppCommand::PrevPane);
        assert_eq!(state.focus, PaneKind::Table);
    }

    #[test]
    fn apply_filters_stores_criteria_and_posts_success() {
        let mut state = AppState::default();
        let criteria = FilterCriteria {
            status: BTreeSet::from([OnboardingStatus::Onboarded]),
            ..FilterCriteria::default()
        };

        let events = state.dispatch(AppCommand::ApplyFilters(criteria.clone()));
        assert_eq!(state.criteria, criteria);
        assert_eq!(state.filters.len(), 1);
        assert_eq!(
            events,
            vec![
                AppEvent::FiltersChanged,
                AppEvent::NoticePosted(Notice::success(NOTICE_FILTERS_APPLIED)),
            ],
        );
    }

    #[test]
    fn clear_filters_resets_everything_and_posts_info() {
        let mut state = AppState::default();
        state.dispatch(AppCommand::ApplyFilters(FilterCriteria {
            postcode: "SW1".to_owned(),
            ..FilterCriteria::default()
        }));

        let events = state.dispatch(AppCommand::ClearFilters);
        assert!(state.criteria.is_empty());
        assert!(state.filters.is_empty());
        assert_eq!(
            events,
            vec![
                AppEvent::FiltersChanged,
                AppEvent::NoticePosted(Notice::info(NOTICE_FILTERS_CLEARED)),
            ],
        );
        assert_eq!(
            state.notice.as_ref().map(|notice| notice.kind),
            Some(NoticeKind::Info)
        );
    }

    #[test]
    fn clear_filters_also_resets_the_committed_query() {
        let mut state = AppState::default();
        state.dispatch(AppCommand::CommitSearch("ada".to_owned()));

        let events = state.dispatch(AppCommand::ClearFilters);
        assert!(state.query.is_empty());
        assert_eq!(
            events,
            vec![
                AppEvent::FiltersChanged,
                AppEvent::QueryChanged,
                AppEvent::NoticePosted(Notice::info(NOTICE_FILTERS_CLEARED)),
            ],
        );
    }

    #[test]
    fn commit_search_is_a_no_op_when_the_query_is_unchanged() {
        let mut state = AppState::default();
        let events = state.dispatch(AppCommand::CommitSearch("ada".to_owned()));
        assert_eq!(events, vec![AppEvent::QueryChanged]);
        assert_eq!(state.query, "ada");

        let repeat = state.dispatch(AppCommand::CommitSearch("ada".to_owned()));
        assert!(repeat.is_empty());
    }

    #[test]
    fn edit_lifecycle_posts_the_update_notice_only_on_finish() {
        let mut state = AppState::default();
        let id = ProviderId::new(4);

        state.dispatch(AppCommand::OpenEdit(id));
        assert_eq!(state.mode, AppMode::Edit(id));

        let cancelled = state.dispatch(AppCommand::CancelEdit);
        assert_eq!(state.mode, AppMode::Browse);
        assert_eq!(cancelled, vec![AppEvent::ModeChanged(AppMode::Browse)]);
        assert!(state.notice.is_none());

        state.dispatch(AppCommand::OpenEdit(id));
        let finished = state.dispatch(AppCommand::FinishEdit);
        assert_eq!(
            finished,
            vec![
                AppEvent::ModeChanged(AppMode::Browse),
                AppEvent::NoticePosted(Notice::success(NOTICE_USER_UPDATED)),
            ],
        );
    }

    #[test]
    fn clear_notice_drops_the_banner() {
        let mut state = AppState::default();
        state.dispatch(AppCommand::FinishEdit);
        assert!(state.notice.is_some());

        let events = state.dispatch(AppCommand::ClearNotice);
        assert!(state.notice.is_none());
        assert_eq!(events, vec![AppEvent::NoticeCleared]);
    }
}
