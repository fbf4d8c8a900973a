// Copyright 2026 Waitlist Dashboard Contributors
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::{Date, Month};
use waitlist_app::{
    AppCommand, AppEvent, AppMode, AppState, FilterCriteria, FormErrors, FormField, Notice,
    NoticeKind, OnboardingStatus, PaneKind, ProviderFormInput, ProviderId, SEARCH_DEBOUNCE,
    SearchBox, ServiceOffering, ServiceProvider, VendorType,
};

pub const PAGE_SIZE: usize = 10;
const NOTICE_TTL: Duration = Duration::from_secs(3);
const NO_RESULTS_LABEL: &str = "No results.";
const SEARCH_PLACEHOLDER: &str = "Search User by email, name...";
const DATE_RANGE_ERROR: &str = "Start date must be on or before end date";

const NAV_LINKS: [&str; 5] = [
    "Service Dashboard",
    "Finance Forecast",
    "Human Resources",
    "Users",
    "Compliances & Verification",
];
const ACTIVE_NAV_LINK: &str = "Human Resources";

/// Data access used by the event loop. Production wires an in-memory store
/// behind this; tests substitute a fake.
pub trait AppRuntime {
    fn load_providers(&mut self) -> Result<Vec<ServiceProvider>>;
    fn update_provider(&mut self, provider: ServiceProvider) -> Result<()>;
}

/// Timer messages delivered back to the event loop. Both carry the token
/// they were scheduled with; a stale token means the timer was superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalEvent {
    ClearNotice { token: u64 },
    CommitSearch { token: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableColumn {
    Select,
    Email,
    Phone,
    Postcode,
    VendorType,
    ServiceOffering,
    SignupDate,
    Status,
    Actions,
}

impl TableColumn {
    const ALL: [Self; 9] = [
        Self::Select,
        Self::Email,
        Self::Phone,
        Self::Postcode,
        Self::VendorType,
        Self::ServiceOffering,
        Self::SignupDate,
        Self::Status,
        Self::Actions,
    ];

    const fn label(self) -> &'static str {
        match self {
            Self::Select => "",
            Self::Email => "EMAIL",
            Self::Phone => "PHONE NUMBER",
            Self::Postcode => "POSTCODE",
            Self::VendorType => "VENDOR TYPE",
            Self::ServiceOffering => "SERVICE OFFERING",
            Self::SignupDate => "SIGNUP DATE",
            Self::Status => "STATUS",
            Self::Actions => "ACTIONS",
        }
    }

    /// Interior data columns, in display order. The select and actions
    /// columns are pinned chrome and never scroll out of view.
    const DATA: [Self; 7] = [
        Self::Email,
        Self::Phone,
        Self::Postcode,
        Self::VendorType,
        Self::ServiceOffering,
        Self::SignupDate,
        Self::Status,
    ];

    const fn is_sortable(self) -> bool {
        !matches!(self, Self::Select | Self::Actions)
    }

    const fn min_width(self) -> u16 {
        match self {
            Self::Select => 3,
            Self::Email => 22,
            Self::Phone => 14,
            Self::Postcode => 10,
            Self::VendorType => 12,
            Self::ServiceOffering => 16,
            Self::SignupDate => 11,
            Self::Status => 10,
            Self::Actions => 7,
        }
    }

    fn constraint(self) -> Constraint {
        match self {
            Self::Select | Self::Actions => Constraint::Length(self.min_width()),
            _ => Constraint::Min(self.min_width()),
        }
    }
}

/// How many data columns fit beside the pinned select/actions columns at
/// the given table width. Always at least one, however cramped.
fn data_column_capacity(width: u16) -> usize {
    let fixed = 2
        + TableColumn::Select.min_width()
        + TableColumn::Actions.min_width()
        + 2;
    let mut remaining = usize::from(width.saturating_sub(fixed));
    let mut count = 0;
    for column in TableColumn::DATA {
        let needed = usize::from(column.min_width()) + 1;
        if remaining < needed {
            break;
        }
        remaining -= needed;
        count += 1;
    }
    count.max(1)
}

/// The columns to render: select pinned leading, actions pinned trailing,
/// and a window of `capacity` data columns scrolled so the cursor column
/// stays in view.
fn column_window(cursor_col: usize, capacity: usize) -> Vec<TableColumn> {
    let capacity = capacity.clamp(1, TableColumn::DATA.len());
    let slot = cursor_col.clamp(1, TableColumn::DATA.len()) - 1;
    let max_offset = TableColumn::DATA.len() - capacity;
    let offset = slot.saturating_sub(capacity - 1).min(max_offset);

    let mut columns = Vec::with_capacity(capacity + 2);
    columns.push(TableColumn::Select);
    columns.extend_from_slice(&TableColumn::DATA[offset..offset + capacity]);
    columns.push(TableColumn::Actions);
    columns
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SortSpec {
    column: TableColumn,
    direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TableUiState {
    cursor_row: usize,
    cursor_col: usize,
    sort: Option<SortSpec>,
    page_index: usize,
    selected: BTreeSet<ProviderId>,
}

impl Default for TableUiState {
    fn default() -> Self {
        Self {
            cursor_row: 0,
            cursor_col: 1,
            sort: None,
            page_index: 0,
            selected: BTreeSet::new(),
        }
    }
}

/// Sidebar cursor targets, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SidebarField {
    Postcode,
    StatusOnboarded,
    StatusRejected,
    StartDate,
    EndDate,
    VendorIndependent,
    VendorCompany,
    OfferingHousekeeping,
    OfferingWindowCleaning,
    OfferingCarValet,
    FilterButton,
    ClearButton,
}

impl SidebarField {
    const ALL: [Self; 12] = [
        Self::Postcode,
        Self::StatusOnboarded,
        Self::StatusRejected,
        Self::StartDate,
        Self::EndDate,
        Self::VendorIndependent,
        Self::VendorCompany,
        Self::OfferingHousekeeping,
        Self::OfferingWindowCleaning,
        Self::OfferingCarValet,
        Self::FilterButton,
        Self::ClearButton,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SidebarUiState {
    criteria: FilterCriteria,
    cursor: usize,
    error: Option<String>,
}

impl Default for SidebarUiState {
    fn default() -> Self {
        Self {
            criteria: FilterCriteria::default(),
            cursor: 0,
            error: None,
        }
    }
}

impl SidebarUiState {
    fn field(&self) -> SidebarField {
        SidebarField::ALL[self.cursor.min(SidebarField::ALL.len() - 1)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateBound {
    Start,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct DatePickerUiState {
    visible: bool,
    bound: Option<DateBound>,
    selected: Option<Date>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct EditUiState {
    provider_id: ProviderId,
    email_title: String,
    form: ProviderFormInput,
    field_index: usize,
    errors: FormErrors,
}

impl EditUiState {
    fn field(&self) -> FormField {
        FormField::ALL[self.field_index.min(FormField::ALL.len() - 1)]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ViewData {
    providers: Vec<ServiceProvider>,
    table: TableUiState,
    sidebar: SidebarUiState,
    date_picker: DatePickerUiState,
    search: SearchBox,
    edit: Option<EditUiState>,
    notice_token: u64,
    search_debounce: Duration,
}

impl Default for ViewData {
    fn default() -> Self {
        Self {
            providers: Vec::new(),
            table: TableUiState::default(),
            sidebar: SidebarUiState::default(),
            date_picker: DatePickerUiState::default(),
            search: SearchBox::default(),
            edit: None,
            notice_token: 0,
            search_debounce: SEARCH_DEBOUNCE,
        }
    }
}

pub fn run_app<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    search_debounce: Duration,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData {
        search_debounce,
        ..ViewData::default()
    };
    let (internal_tx, internal_rx) = mpsc::channel();

    refresh_view_data(runtime, &mut view_data)?;

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key)? {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn refresh_view_data<R: AppRuntime>(runtime: &mut R, view_data: &mut ViewData) -> Result<()> {
    view_data.providers = runtime.load_providers()?;
    Ok(())
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearNotice { token } if token == view_data.notice_token => {
                state.dispatch(AppCommand::ClearNotice);
            }
            InternalEvent::ClearNotice { .. } => {}
            InternalEvent::CommitSearch { token } => {
                if let Some(query) = view_data.search.take_commit(token) {
                    apply_app_events(state, view_data, None, AppCommand::CommitSearch(query));
                }
            }
        }
    }
}

fn schedule_notice_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(NOTICE_TTL);
        let _ = sender.send(InternalEvent::ClearNotice { token });
    });
}

fn schedule_search_commit(internal_tx: &Sender<InternalEvent>, token: u64, delay: Duration) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(delay);
        let _ = sender.send(InternalEvent::CommitSearch { token });
    });
}

/// Dispatches a command and applies the event fallout: notices arm a
/// clear timer, filter or query changes drop back to the first page.
fn apply_app_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: Option<&Sender<InternalEvent>>,
    command: AppCommand,
) -> Vec<AppEvent> {
    let events = state.dispatch(command);
    for event in &events {
        match event {
            AppEvent::NoticePosted(_) => {
                view_data.notice_token = view_data.notice_token.wrapping_add(1);
                if let Some(tx) = internal_tx {
                    schedule_notice_clear(tx, view_data.notice_token);
                }
            }
            AppEvent::FiltersChanged | AppEvent::QueryChanged => {
                view_data.table.page_index = 0;
            }
            _ => {}
        }
    }
    clamp_table_cursor(state, view_data);
    events
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> Result<bool> {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    if view_data.date_picker.visible {
        handle_date_picker_key(view_data, key);
        return Ok(false);
    }

    if matches!(state.mode, AppMode::Edit(_)) {
        handle_edit_key(state, runtime, view_data, internal_tx, key)?;
        return Ok(false);
    }

    match key.code {
        KeyCode::Tab => {
            apply_app_events(state, view_data, Some(internal_tx), AppCommand::NextPane);
            return Ok(false);
        }
        KeyCode::BackTab => {
            apply_app_events(state, view_data, Some(internal_tx), AppCommand::PrevPane);
            return Ok(false);
        }
        _ => {}
    }

    match state.focus {
        PaneKind::Table => handle_table_key(state, view_data, internal_tx, key),
        PaneKind::Search => {
            handle_search_key(view_data, internal_tx, key);
            Ok(false)
        }
        PaneKind::Filters => {
            handle_sidebar_key(state, view_data, internal_tx, key);
            Ok(false)
        }
    }
}

fn handle_table_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') => return Ok(true),
        KeyCode::Char('j') | KeyCode::Down => move_cursor_row(state, view_data, 1),
        KeyCode::Char('k') | KeyCode::Up => move_cursor_row(state, view_data, -1),
        KeyCode::Char('h') | KeyCode::Left => move_cursor_col(view_data, -1),
        KeyCode::Char('l') | KeyCode::Right => move_cursor_col(view_data, 1),
        KeyCode::Char('n') | KeyCode::Char(']') => turn_page(state, view_data, 1),
        KeyCode::Char('p') | KeyCode::Char('[') => turn_page(state, view_data, -1),
        KeyCode::Char('s') => cycle_sort(state, view_data),
        KeyCode::Char(' ') => toggle_row_selection(state, view_data),
        KeyCode::Char('a') => toggle_page_selection(state, view_data),
        KeyCode::Enter => open_edit_for_cursor(state, view_data, internal_tx),
        _ => {}
    }
    Ok(false)
}

fn handle_search_key(view_data: &mut ViewData, internal_tx: &Sender<InternalEvent>, key: KeyEvent) {
    match key.code {
        KeyCode::Char(ch) => {
            let token = view_data.search.push_char(ch);
            schedule_search_commit(internal_tx, token, view_data.search_debounce);
        }
        KeyCode::Backspace => {
            let token = view_data.search.pop_char();
            schedule_search_commit(internal_tx, token, view_data.search_debounce);
        }
        KeyCode::Left => view_data.search.move_cursor_left(),
        KeyCode::Right => view_data.search.move_cursor_right(),
        _ => {}
    }
}

fn handle_sidebar_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let field = view_data.sidebar.field();

    if field == SidebarField::Postcode {
        match key.code {
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                view_data.sidebar.criteria.postcode.push(ch);
                return;
            }
            KeyCode::Backspace => {
                view_data.sidebar.criteria.postcode.pop();
                return;
            }
            _ => {}
        }
    }

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            view_data.sidebar.cursor = (view_data.sidebar.cursor + 1) % SidebarField::ALL.len();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            view_data.sidebar.cursor = view_data
                .sidebar
                .cursor
                .checked_sub(1)
                .unwrap_or(SidebarField::ALL.len() - 1);
        }
        KeyCode::Char(' ') => toggle_sidebar_checkbox(view_data, field),
        KeyCode::Enter => match field {
            SidebarField::StartDate => open_date_picker(view_data, DateBound::Start),
            SidebarField::EndDate => open_date_picker(view_data, DateBound::End),
            SidebarField::FilterButton => apply_sidebar_filters(state, view_data, internal_tx),
            SidebarField::ClearButton => clear_sidebar_filters(state, view_data, internal_tx),
            _ => toggle_sidebar_checkbox(view_data, field),
        },
        KeyCode::Delete => {
            // Clears a picked date without opening the picker.
            match field {
                SidebarField::StartDate => view_data.sidebar.criteria.start_date = None,
                SidebarField::EndDate => view_data.sidebar.criteria.end_date = None,
                _ => {}
            }
        }
        _ => {}
    }
}

fn toggle_sidebar_checkbox(view_data: &mut ViewData, field: SidebarField) {
    let criteria = &mut view_data.sidebar.criteria;
    match field {
        SidebarField::StatusOnboarded => toggle_set(&mut criteria.status, OnboardingStatus::Onboarded),
        SidebarField::StatusRejected => toggle_set(&mut criteria.status, OnboardingStatus::Rejected),
        SidebarField::VendorIndependent => {
            toggle_set(&mut criteria.vendor_type, VendorType::Independent)
        }
        SidebarField::VendorCompany => toggle_set(&mut criteria.vendor_type, VendorType::Company),
        SidebarField::OfferingHousekeeping => {
            toggle_set(&mut criteria.service_offering, ServiceOffering::Housekeeping)
        }
        SidebarField::OfferingWindowCleaning => {
            toggle_set(&mut criteria.service_offering, ServiceOffering::WindowCleaning)
        }
        SidebarField::OfferingCarValet => {
            toggle_set(&mut criteria.service_offering, ServiceOffering::CarValet)
        }
        _ => {}
    }
}

fn toggle_set<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if !set.remove(&value) {
        set.insert(value);
    }
}

fn apply_sidebar_filters(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    if !view_data.sidebar.criteria.date_range_is_ordered() {
        view_data.sidebar.error = Some(DATE_RANGE_ERROR.to_owned());
        return;
    }
    view_data.sidebar.error = None;
    let criteria = view_data.sidebar.criteria.clone();
    apply_app_events(
        state,
        view_data,
        Some(internal_tx),
        AppCommand::ApplyFilters(criteria),
    );
}

fn clear_sidebar_filters(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    view_data.sidebar = SidebarUiState::default();
    view_data.search.reset();
    apply_app_events(state, view_data, Some(internal_tx), AppCommand::ClearFilters);
}

fn open_date_picker(view_data: &mut ViewData, bound: DateBound) {
    let current = match bound {
        DateBound::Start => view_data.sidebar.criteria.start_date,
        DateBound::End => view_data.sidebar.criteria.end_date,
    };
    view_data.date_picker = DatePickerUiState {
        visible: true,
        bound: Some(bound),
        selected: Some(current.unwrap_or(default_picker_date())),
    };
}

fn default_picker_date() -> Date {
    Date::from_calendar_date(2025, Month::January, 1).expect("January 1 exists")
}

fn handle_date_picker_key(view_data: &mut ViewData, key: KeyEvent) {
    let (Some(bound), Some(current)) = (view_data.date_picker.bound, view_data.date_picker.selected)
    else {
        view_data.date_picker = DatePickerUiState::default();
        return;
    };

    let next = match key.code {
        KeyCode::Esc => {
            view_data.date_picker = DatePickerUiState::default();
            return;
        }
        KeyCode::Enter => {
            match bound {
                DateBound::Start => view_data.sidebar.criteria.start_date = Some(current),
                DateBound::End => view_data.sidebar.criteria.end_date = Some(current),
            }
            view_data.sidebar.error = None;
            view_data.date_picker = DatePickerUiState::default();
            return;
        }
        KeyCode::Char('h') | KeyCode::Left => shift_date_by_days(current, -1),
        KeyCode::Char('l') | KeyCode::Right => shift_date_by_days(current, 1),
        KeyCode::Char('j') | KeyCode::Down => shift_date_by_days(current, 7),
        KeyCode::Char('k') | KeyCode::Up => shift_date_by_days(current, -7),
        KeyCode::Char('H') => shift_date_by_months(current, -1),
        KeyCode::Char('L') => shift_date_by_months(current, 1),
        KeyCode::Char('[') => shift_date_by_years(current, -1),
        KeyCode::Char(']') => shift_date_by_years(current, 1),
        _ => None,
    };

    if let Some(date) = next {
        view_data.date_picker.selected = Some(date);
    }
}

fn shift_date_by_days(date: Date, days: i64) -> Option<Date> {
    date.checked_add(time::Duration::days(days))
}

fn shift_date_by_years(date: Date, years: i32) -> Option<Date> {
    shift_date_by_months(date, years.saturating_mul(12))
}

fn shift_date_by_months(date: Date, months: i32) -> Option<Date> {
    let base_month = i32::from(date.month() as u8);
    let total_month = base_month - 1 + months;
    let year = date.year() + total_month.div_euclid(12);
    let month_number = (total_month.rem_euclid(12) + 1) as u8;
    let month = Month::try_from(month_number).ok()?;
    let max_day = last_day_of_month(year, month)?;
    let clamped_day = date.day().min(max_day);
    Date::from_calendar_date(year, month, clamped_day).ok()
}

fn last_day_of_month(year: i32, month: Month) -> Option<u8> {
    let (next_year, next_month) = if month == Month::December {
        (year + 1, Month::January)
    } else {
        let next = Month::try_from((month as u8) + 1).ok()?;
        (year, next)
    };

    let first_next_month = Date::from_calendar_date(next_year, next_month, 1).ok()?;
    let last = first_next_month - time::Duration::days(1);
    Some(last.day())
}

fn handle_edit_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> Result<()> {
    let Some(edit) = view_data.edit.as_mut() else {
        state.dispatch(AppCommand::CancelEdit);
        return Ok(());
    };

    match key.code {
        KeyCode::Esc => {
            view_data.edit = None;
            apply_app_events(state, view_data, Some(internal_tx), AppCommand::CancelEdit);
        }
        KeyCode::Enter => submit_edit(state, runtime, view_data, internal_tx)?,
        KeyCode::Tab | KeyCode::Down => {
            edit.field_index = (edit.field_index + 1) % FormField::ALL.len();
        }
        KeyCode::BackTab | KeyCode::Up => {
            edit.field_index = edit
                .field_index
                .checked_sub(1)
                .unwrap_or(FormField::ALL.len() - 1);
        }
        KeyCode::Left => cycle_edit_choice(edit, -1),
        KeyCode::Right => cycle_edit_choice(edit, 1),
        KeyCode::Backspace => {
            match edit.field() {
                FormField::Email => {
                    edit.form.email.pop();
                }
                FormField::Phone => {
                    edit.form.phone.pop();
                }
                FormField::Postcode => {
                    edit.form.postcode.pop();
                }
                _ => {}
            };
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            match edit.field() {
                FormField::Email => edit.form.email.push(ch),
                FormField::Phone => edit.form.phone.push(ch),
                FormField::Postcode => edit.form.postcode.push(ch),
                _ => {}
            }
        }
        _ => {}
    }
    Ok(())
}

fn cycle_edit_choice(edit: &mut EditUiState, delta: isize) {
    match edit.field() {
        FormField::VendorType => {
            edit.form.vendor_type = cycle_variant(&VendorType::ALL, edit.form.vendor_type, delta);
        }
        FormField::ServiceOffering => {
            edit.form.service_offering =
                cycle_variant(&ServiceOffering::ALL, edit.form.service_offering, delta);
        }
        FormField::Status => {
            edit.form.status = cycle_variant(&OnboardingStatus::ALL, edit.form.status, delta);
        }
        _ => {}
    }
}

fn cycle_variant<T: Copy + PartialEq>(all: &[T], current: T, delta: isize) -> T {
    let index = all.iter().position(|value| *value == current).unwrap_or(0) as isize;
    let len = all.len() as isize;
    all[(index + delta).rem_euclid(len) as usize]
}

fn open_edit_for_cursor(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let rows = visible_rows(state, &view_data.providers, view_data.table.sort);
    let page = page_slice(&rows, view_data.table.page_index);
    let Some(provider) = page.get(view_data.table.cursor_row) else {
        return;
    };

    view_data.edit = Some(EditUiState {
        provider_id: provider.id,
        email_title: provider.email.clone(),
        form: ProviderFormInput::from_provider(provider),
        field_index: 0,
        errors: FormErrors::new(),
    });
    let id = provider.id;
    apply_app_events(state, view_data, Some(internal_tx), AppCommand::OpenEdit(id));
}

/// Validates and saves the edit form. Validation failures stay in the modal
/// as field errors; a successful save closes it and posts the notice.
fn submit_edit<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) -> Result<()> {
    let Some(edit) = view_data.edit.as_mut() else {
        return Ok(());
    };

    if let Err(errors) = edit.form.validate() {
        edit.errors = errors;
        return Ok(());
    }
    edit.errors = FormErrors::new();

    let Some(original) = view_data
        .providers
        .iter()
        .find(|provider| provider.id == edit.provider_id)
    else {
        view_data.edit = None;
        apply_app_events(state, view_data, Some(internal_tx), AppCommand::CancelEdit);
        return Ok(());
    };

    let updated = edit.form.apply_to(original);
    runtime.update_provider(updated)?;
    refresh_view_data(runtime, view_data)?;

    view_data.edit = None;
    apply_app_events(state, view_data, Some(internal_tx), AppCommand::FinishEdit);
    Ok(())
}

fn move_cursor_row(state: &AppState, view_data: &mut ViewData, delta: isize) {
    let rows_on_page = rows_on_current_page(state, view_data);
    if rows_on_page == 0 {
        view_data.table.cursor_row = 0;
        return;
    }
    let current = view_data.table.cursor_row as isize;
    let next = (current + delta).clamp(0, rows_on_page as isize - 1);
    view_data.table.cursor_row = next as usize;
}

fn move_cursor_col(view_data: &mut ViewData, delta: isize) {
    let len = TableColumn::ALL.len() as isize;
    let next = (view_data.table.cursor_col as isize + delta).clamp(0, len - 1);
    view_data.table.cursor_col = next as usize;
}

fn turn_page(state: &AppState, view_data: &mut ViewData, delta: isize) {
    let total = visible_rows(state, &view_data.providers, view_data.table.sort).len();
    let pages = page_count(total);
    let next = (view_data.table.page_index as isize + delta).clamp(0, pages as isize - 1);
    view_data.table.page_index = next as usize;
    view_data.table.cursor_row = 0;
}

fn cycle_sort(state: &AppState, view_data: &mut ViewData) {
    let column = TableColumn::ALL[view_data.table.cursor_col];
    if !column.is_sortable() {
        return;
    }

    view_data.table.sort = next_sort(view_data.table.sort, column);
    view_data.table.page_index = 0;
    clamp_table_cursor(state, view_data);
}

/// Asc, then desc, then back to the seed order. Sorting a different column
/// starts over at asc.
fn next_sort(current: Option<SortSpec>, column: TableColumn) -> Option<SortSpec> {
    match current {
        Some(sort) if sort.column == column => match sort.direction {
            SortDirection::Asc => Some(SortSpec {
                column,
                direction: SortDirection::Desc,
            }),
            SortDirection::Desc => None,
        },
        _ => Some(SortSpec {
            column,
            direction: SortDirection::Asc,
        }),
    }
}

fn toggle_row_selection(state: &AppState, view_data: &mut ViewData) {
    let rows = visible_rows(state, &view_data.providers, view_data.table.sort);
    let page = page_slice(&rows, view_data.table.page_index);
    if let Some(provider) = page.get(view_data.table.cursor_row) {
        let id = provider.id;
        if !view_data.table.selected.remove(&id) {
            view_data.table.selected.insert(id);
        }
    }
}

fn toggle_page_selection(state: &AppState, view_data: &mut ViewData) {
    let rows = visible_rows(state, &view_data.providers, view_data.table.sort);
    let page = page_slice(&rows, view_data.table.page_index);
    let all_selected = !page.is_empty()
        && page
            .iter()
            .all(|provider| view_data.table.selected.contains(&provider.id));

    for provider in page {
        if all_selected {
            view_data.table.selected.remove(&provider.id);
        } else {
            view_data.table.selected.insert(provider.id);
        }
    }
}

fn clamp_table_cursor(state: &AppState, view_data: &mut ViewData) {
    let total = visible_rows(state, &view_data.providers, view_data.table.sort).len();
    let pages = page_count(total);
    view_data.table.page_index = view_data.table.page_index.min(pages - 1);

    let rows_on_page = rows_on_current_page(state, view_data);
    if rows_on_page == 0 {
        view_data.table.cursor_row = 0;
    } else {
        view_data.table.cursor_row = view_data.table.cursor_row.min(rows_on_page - 1);
    }
}

fn rows_on_current_page(state: &AppState, view_data: &ViewData) -> usize {
    let rows = visible_rows(state, &view_data.providers, view_data.table.sort);
    page_slice(&rows, view_data.table.page_index).len()
}

/// The projection pipeline: column filters and the global query narrow the
/// seed-ordered records, then the active sort reorders them stably.
fn visible_rows(
    state: &AppState,
    providers: &[ServiceProvider],
    sort: Option<SortSpec>,
) -> Vec<ServiceProvider> {
    let mut rows: Vec<ServiceProvider> = providers
        .iter()
        .filter(|provider| state.row_visible(provider))
        .cloned()
        .collect();

    if let Some(spec) = sort {
        rows.sort_by(|a, b| {
            let ordering = compare_by_column(spec.column, a, b);
            match spec.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }
    rows
}

fn compare_by_column(column: TableColumn, a: &ServiceProvider, b: &ServiceProvider) -> Ordering {
    match column {
        TableColumn::Email => a.email.cmp(&b.email),
        TableColumn::Phone => a.phone.cmp(&b.phone),
        TableColumn::Postcode => a.postcode.cmp(&b.postcode),
        TableColumn::VendorType => a.vendor_type.as_str().cmp(b.vendor_type.as_str()),
        TableColumn::ServiceOffering => a.service_offering.as_str().cmp(b.service_offering.as_str()),
        TableColumn::SignupDate => a.signup_date.cmp(&b.signup_date),
        TableColumn::Status => a.status.as_str().cmp(b.status.as_str()),
        TableColumn::Select | TableColumn::Actions => Ordering::Equal,
    }
}

fn page_count(total_rows: usize) -> usize {
    total_rows.div_ceil(PAGE_SIZE).max(1)
}

fn page_slice(rows: &[ServiceProvider], page_index: usize) -> &[ServiceProvider] {
    let start = page_index.saturating_mul(PAGE_SIZE).min(rows.len());
    let end = (start + PAGE_SIZE).min(rows.len());
    &rows[start..end]
}

fn can_prev_page(page_index: usize) -> bool {
    page_index > 0
}

fn can_next_page(page_index: usize, total_rows: usize) -> bool {
    page_index + 1 < page_count(total_rows)
}

fn header_label(column: TableColumn, sort: Option<SortSpec>) -> String {
    let mut label = column.label().to_owned();
    if let Some(spec) = sort
        && spec.column == column
    {
        label.push_str(match spec.direction {
            SortDirection::Asc => " ↑",
            SortDirection::Desc => " ↓",
        });
    }
    label
}

fn pagination_line(page_index: usize, total_rows: usize) -> String {
    let pages = page_count(total_rows);
    let mut parts = Vec::with_capacity(pages + 2);
    parts.push(if can_prev_page(page_index) {
        "< Previous".to_owned()
    } else {
        "  Previous".to_owned()
    });
    for page in 0..pages {
        if page == page_index {
            parts.push(format!("[{}]", page + 1));
        } else {
            parts.push(format!(" {} ", page + 1));
        }
    }
    parts.push(if can_next_page(page_index, total_rows) {
        "Next >".to_owned()
    } else {
        "Next  ".to_owned()
    });
    parts.join(" ")
}

fn checkbox_mark(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    render_nav_header(frame, layout[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(1)])
        .split(layout[1]);

    render_sidebar(frame, body[0], state, view_data);

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(body[1]);

    render_search_bar(frame, main[0], state, view_data);
    render_table(frame, main[1], state, view_data);
    render_pagination(frame, main[2], state, view_data);

    render_notice_bar(frame, layout[2], state);

    if matches!(state.mode, AppMode::Edit(_)) {
        render_edit_modal(frame, view_data);
    }

    if view_data.date_picker.visible {
        render_date_picker(frame, view_data);
    }
}

fn render_nav_header(frame: &mut ratatui::Frame<'_>, area: Rect) {
    let mut spans = Vec::with_capacity(NAV_LINKS.len() * 2);
    for link in NAV_LINKS {
        let style = if link == ACTIVE_NAV_LINK {
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(link, style));
        spans.push(Span::raw("   "));
    }

    let header = Paragraph::new(Line::from(spans))
        .block(Block::default().title("waitlist").borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_sidebar(frame: &mut ratatui::Frame<'_>, area: Rect, state: &AppState, view_data: &ViewData) {
    let focused = state.focus == PaneKind::Filters;
    let sidebar = &view_data.sidebar;
    let criteria = &sidebar.criteria;
    let cursor = |field: SidebarField| {
        if focused && sidebar.field() == field {
            "> "
        } else {
            "  "
        }
    };

    let mut lines = vec![
        Line::from(Span::styled(
            "User Management",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::from(Span::styled("Postcode", Style::default().fg(Color::Gray))),
        Line::raw(format!(
            "{}{}",
            cursor(SidebarField::Postcode),
            if criteria.postcode.is_empty() {
                "ZIP".to_owned()
            } else {
                criteria.postcode.clone()
            },
        )),
        Line::raw(""),
        Line::from(Span::styled(
            "Registration Status",
            Style::default().fg(Color::Gray),
        )),
        Line::raw(format!(
            "{}{} Onboarded",
            cursor(SidebarField::StatusOnboarded),
            checkbox_mark(criteria.status.contains(&OnboardingStatus::Onboarded)),
        )),
        Line::raw(format!(
            "{}{} Rejected",
            cursor(SidebarField::StatusRejected),
            checkbox_mark(criteria.status.contains(&OnboardingStatus::Rejected)),
        )),
        Line::raw(""),
        Line::from(Span::styled(
            "Date Registered",
            Style::default().fg(Color::Gray),
        )),
        Line::raw(format!(
            "{}Start: {}",
            cursor(SidebarField::StartDate),
            criteria
                .start_date
                .map(waitlist_app::format_signup_date)
                .unwrap_or_else(|| "Start".to_owned()),
        )),
        Line::raw(format!(
            "{}End:   {}",
            cursor(SidebarField::EndDate),
            criteria
                .end_date
                .map(waitlist_app::format_signup_date)
                .unwrap_or_else(|| "End".to_owned()),
        )),
    ];

    if let Some(error) = &sidebar.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    lines.extend([
        Line::raw(""),
        Line::from(Span::styled("Vendor Type", Style::default().fg(Color::Gray))),
        Line::raw(format!(
            "{}{} Independent",
            cursor(SidebarField::VendorIndependent),
            checkbox_mark(criteria.vendor_type.contains(&VendorType::Independent)),
        )),
        Line::raw(format!(
            "{}{} Company",
            cursor(SidebarField::VendorCompany),
            checkbox_mark(criteria.vendor_type.contains(&VendorType::Company)),
        )),
        Line::raw(""),
        Line::from(Span::styled(
            "Service Offering",
            Style::default().fg(Color::Gray),
        )),
        Line::raw(format!(
            "{}{} Housekeeping",
            cursor(SidebarField::OfferingHousekeeping),
            checkbox_mark(criteria.service_offering.contains(&ServiceOffering::Housekeeping)),
        )),
        Line::raw(format!(
            "{}{} Window Cleaning",
            cursor(SidebarField::OfferingWindowCleaning),
            checkbox_mark(
                criteria
                    .service_offering
                    .contains(&ServiceOffering::WindowCleaning)
            ),
        )),
        Line::raw(format!(
            "{}{} Car Valet",
            cursor(SidebarField::OfferingCarValet),
            checkbox_mark(criteria.service_offering.contains(&ServiceOffering::CarValet)),
        )),
        Line::raw(""),
        Line::raw(format!("{}[ Filter ]", cursor(SidebarField::FilterButton))),
        Line::raw(format!(
            "{}[ Clear Filters ]",
            cursor(SidebarField::ClearButton)
        )),
    ]);

    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let sidebar_widget = Paragraph::new(lines).block(
        Block::default()
            .title("filters")
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(sidebar_widget, area);
}

fn render_search_bar(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData,
) {
    let focused = state.focus == PaneKind::Search;
    let buffer = view_data.search.buffer();
    let content = if buffer.is_empty() && !focused {
        Span::styled(SEARCH_PLACEHOLDER, Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(buffer.to_owned())
    };

    let line = Line::from(vec![
        Span::styled(
            "Service Providers",
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Customers", Style::default().fg(Color::Gray)),
        Span::raw("   "),
        content,
    ]);

    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let search = Paragraph::new(line).block(
        Block::default()
            .title("search")
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(search, area);
}

/// Cell text for every rendered row, aligned with `columns`. An empty page
/// yields a single placeholder row carrying the no-results label.
fn table_body_text(
    page: &[ServiceProvider],
    columns: &[TableColumn],
    selected: &BTreeSet<ProviderId>,
) -> Vec<Vec<String>> {
    if page.is_empty() {
        let mut cells = vec![String::new(); columns.len()];
        if let Some(slot) = cells.get_mut(1) {
            *slot = NO_RESULTS_LABEL.to_owned();
        }
        return vec![cells];
    }

    page.iter()
        .map(|provider| {
            columns
                .iter()
                .map(|column| cell_text(*column, provider, selected))
                .collect()
        })
        .collect()
}

fn render_table(frame: &mut ratatui::Frame<'_>, area: Rect, state: &AppState, view_data: &ViewData) {
    let rows_all = visible_rows(state, &view_data.providers, view_data.table.sort);
    let page = page_slice(&rows_all, view_data.table.page_index);
    let focused = state.focus == PaneKind::Table;

    let capacity = data_column_capacity(area.width);
    let columns = column_window(view_data.table.cursor_col, capacity);
    let cursor_column = TableColumn::ALL[view_data.table.cursor_col];

    let header_cells = columns.iter().map(|column| {
        Cell::from(header_label(*column, view_data.table.sort)).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    });
    let header = Row::new(header_cells);

    let body_text = table_body_text(page, &columns, &view_data.table.selected);
    let body_rows: Vec<Row<'_>> = body_text
        .into_iter()
        .enumerate()
        .map(|(row_index, cells)| {
            let provider = page.get(row_index);
            let selected_row = provider.is_some() && focused && row_index == view_data.table.cursor_row;
            let cells = cells
                .into_iter()
                .zip(&columns)
                .map(|(text, column)| {
                    let mut style = match provider {
                        Some(provider) => cell_style(*column, provider),
                        None => Style::default().fg(Color::DarkGray),
                    };
                    if selected_row {
                        style = style.bg(Color::DarkGray);
                    }
                    if selected_row && *column == cursor_column {
                        style = Style::default()
                            .fg(Color::Black)
                            .bg(Color::Cyan)
                            .add_modifier(Modifier::BOLD);
                    }
                    Cell::from(text).style(style)
                })
                .collect::<Vec<_>>();
            Row::new(cells)
        })
        .collect();

    let widths: Vec<Constraint> = columns.iter().map(|column| column.constraint()).collect();

    let title = format!("providers r:{}", rows_all.len());
    let table = Table::new(body_rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn cell_text(
    column: TableColumn,
    provider: &ServiceProvider,
    selected: &BTreeSet<ProviderId>,
) -> String {
    match column {
        TableColumn::Select => checkbox_mark(selected.contains(&provider.id)).to_owned(),
        TableColumn::Email => provider.email.clone(),
        TableColumn::Phone => provider.phone.clone(),
        TableColumn::Postcode => provider.postcode.clone(),
        TableColumn::VendorType => provider.vendor_type.as_str().to_owned(),
        TableColumn::ServiceOffering => provider.service_offering.as_str().to_owned(),
        TableColumn::SignupDate => provider.signup_date_display(),
        TableColumn::Status => provider.status.as_str().to_owned(),
        TableColumn::Actions => "edit".to_owned(),
    }
}

fn cell_style(column: TableColumn, provider: &ServiceProvider) -> Style {
    if column == TableColumn::Status {
        return match provider.status {
            OnboardingStatus::Onboarded => Style::default().fg(Color::Green),
            OnboardingStatus::Rejected => Style::default().fg(Color::Red),
            OnboardingStatus::Unset => Style::default().fg(Color::Gray),
        };
    }
    Style::default()
}

fn render_pagination(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData,
) {
    let total = visible_rows(state, &view_data.providers, view_data.table.sort).len();
    let line = pagination_line(view_data.table.page_index, total);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_notice_bar(frame: &mut ratatui::Frame<'_>, area: Rect, state: &AppState) {
    let (text, style) = match &state.notice {
        Some(Notice { kind, message }) => {
            let color = match kind {
                NoticeKind::Success => Color::Green,
                NoticeKind::Info => Color::Blue,
            };
            (message.clone(), Style::default().fg(color))
        }
        None => (
            "tab pane  j/k move  s sort  n/p page  enter edit  ctrl-q quit".to_owned(),
            Style::default().fg(Color::DarkGray),
        ),
    };

    let bar = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(bar, area);
}

fn render_edit_modal(frame: &mut ratatui::Frame<'_>, view_data: &ViewData) {
    let Some(edit) = &view_data.edit else {
        return;
    };

    let area = centered_rect(56, 62, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = Vec::with_capacity(FormField::ALL.len() * 2 + 2);
    for field in FormField::ALL {
        let cursor = if edit.field() == field { "> " } else { "  " };
        let value = match field {
            FormField::Email => edit.form.email.clone(),
            FormField::Phone => edit.form.phone.clone(),
            FormField::Postcode => edit.form.postcode.clone(),
            FormField::VendorType => format!("< {} >", edit.form.vendor_type.as_str()),
            FormField::ServiceOffering => format!("< {} >", edit.form.service_offering.as_str()),
            FormField::Status => format!("< {} >", edit.form.status.as_str()),
        };
        lines.push(Line::raw(format!("{cursor}{}: {value}", field.label())));
        if let Some(error) = edit.errors.get(&field) {
            lines.push(Line::from(Span::styled(
                format!("    {error}"),
                Style::default().fg(Color::Red),
            )));
        }
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "enter save  esc cancel  ←/→ choice",
        Style::default().fg(Color::DarkGray),
    )));

    let title = format!("Edit User: {}", edit.email_title);
    let modal = Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(modal, area);
}

fn render_date_picker(frame: &mut ratatui::Frame<'_>, view_data: &ViewData) {
    let area = centered_rect(44, 26, frame.area());
    frame.render_widget(Clear, area);

    let picker = &view_data.date_picker;
    let bound = match picker.bound {
        Some(DateBound::Start) => "Start",
        Some(DateBound::End) => "End",
        None => "date",
    };
    let selected = picker
        .selected
        .map(waitlist_app::format_signup_date)
        .unwrap_or_default();

    let text = format!(
        "{bound}: {selected}\n\nh/l day  j/k week  H/L month  [/] year\nenter pick  esc cancel",
    );
    let widget = Paragraph::new(text).block(Block::default().title("date").borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
