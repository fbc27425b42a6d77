//! TUI front end.
//!
//! Renders the event listing as a table with a capacity gauge per row, a
//! details/profile pane, a history log and a command input line. Every server
//! call runs as a spawned task so the screen keeps redrawing; results come
//! back over a channel, and loads are tagged with request tickets and applied
//! only while still current.

use crate::cli::format_gauge;
use crate::commands::{ClientCommand, HELP, parse_command};
use crate::prompts::{
    PromptSequence, event_prompts, login_prompts, registration_prompts, signup_prompts,
    to_event_form, to_login_form, to_registration, to_signup_form,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use event_hub::api::{ApiResult, SharedApi};
use event_hub::capacity::{CapacityBoard, CapacitySnapshot, FillLevel};
use event_hub::models::{Event, EventId, Profile, ProfileImage};
use event_hub::registration::{RegistrationFlow, RegistrationResult, SubmitOutcome};
use event_hub::registration::flow::SUBMITTING_MESSAGE;
use event_hub::request::RequestTicket;
use event_hub::views::add_event::submit_event;
use event_hub::views::listing::{guard_navigation, logout};
use event_hub::views::{
    AddEventOutcome, AvatarSource, EventDetails, EventForm, ListingState, ListingView,
    LoginRequired, ProfileState, ProfileView, Route,
};
use event_hub::SessionStore;
use ratatui::{
    DefaultTerminal, Frame,
    crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    layout::{Alignment, Constraint, Flex, Layout, Margin, Position, Rect},
    style::{Style, Stylize},
    symbols::scrollbar,
    text::{Line, Span, Text},
    widgets::{
        Block, Cell, Clear, List, ListDirection, ListItem, Padding, Paragraph, Row, Scrollbar,
        ScrollbarOrientation, Table, Wrap, block,
    },
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

mod widgets;

use widgets::{ScrollableList, UserInput};

const MAX_LOG_RECORDS: usize = 1024;
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Results delivered by background tasks
enum AppEvent {
    Listing(RequestTicket, ApiResult<Vec<Event>>),
    Profile(RequestTicket, ApiResult<Profile>),
    Count {
        board: Board,
        event_id: EventId,
        ticket: RequestTicket,
        result: ApiResult<u32>,
    },
    /// A registration submission came back
    Registration(Box<RegistrationFlow>, RegistrationResult<SubmitOutcome>),
    /// An Add Event submission came back; the form is kept for a retry
    AddEvent(EventForm, AddEventOutcome),
    Login(Result<Route, String>),
    Signup(Result<Route, String>),
    /// A profile change was confirmed or refused by the server
    ProfileChanged(ProfileChange, ApiResult<()>),
    /// The registration success message has been shown long enough
    RegistrationClosed(String),
}

/// Profile changes made from the TUI
enum ProfileChange {
    Delete(EventId),
    Unregister(EventId),
    UploadImage(ProfileImage),
    ClearImage,
}

impl ProfileChange {
    fn done_message(&self) -> &'static str {
        match self {
            ProfileChange::Delete(_) => "Event deleted.",
            ProfileChange::Unregister(_) => "Registration cancelled.",
            ProfileChange::UploadImage(_) => "Profile picture updated.",
            ProfileChange::ClearImage => "Profile picture removed.",
        }
    }
}

/// Which capacity board a count belongs to
#[derive(Clone, Copy)]
enum Board {
    Listing,
    Profile,
}

/// What the right-hand pane shows
#[derive(Clone, Copy, PartialEq)]
enum Pane {
    Empty,
    Details(EventId),
    Profile,
}

/// Form being collected through the input line
enum FormPurpose {
    Register,
    AddEvent,
    Login,
    Signup,
}

struct ActiveForm {
    purpose: FormPurpose,
    prompts: PromptSequence,
}

#[derive(Clone)]
enum RecordKind {
    Ack,
    Alert,
    Error,
    Info,
    You,
}

/// A timestamped history entry
#[derive(Clone)]
struct Record {
    datetime: DateTime<Utc>,
    kind: RecordKind,
    content: String,
}

impl Record {
    fn new(kind: RecordKind, content: String) -> Self {
        Self {
            datetime: Utc::now(),
            kind,
            content,
        }
    }
}

impl From<Record> for ListItem<'_> {
    fn from(val: Record) -> Self {
        let repr = match val.kind {
            RecordKind::Ack => "ACK".light_blue(),
            RecordKind::Alert => "ALERT".light_magenta(),
            RecordKind::Error => "ERROR".light_red(),
            RecordKind::Info => "INFO".light_yellow(),
            RecordKind::You => "YOU".light_green(),
        };

        let msg = vec![
            format!("[{} ", val.datetime.format("%H:%M:%S")).into(),
            Span::styled(format!("{repr:5}"), repr.style),
            format!("]: {}", val.content).into(),
        ];

        ListItem::new(Line::from(msg))
    }
}

fn fill_style(level: FillLevel) -> Style {
    match level {
        FillLevel::Low => Style::default().light_green(),
        FillLevel::Moderate => Style::default().light_yellow(),
        FillLevel::High => Style::default().light_red(),
        FillLevel::Full => Style::default().red().bold(),
    }
}

fn make_gauge_cell(capacities: &CapacityBoard, event: &Event) -> Cell<'static> {
    match capacities.snapshot(event.id) {
        Some(snapshot) => make_snapshot_cell(snapshot),
        None => Cell::new(Text::from("loading...").alignment(Alignment::Right)),
    }
}

fn make_snapshot_cell(snapshot: &CapacitySnapshot) -> Cell<'static> {
    let gauge = format!(
        "{} {}",
        format_gauge(snapshot.rounded_percentage()),
        snapshot.slots_label()
    );
    Cell::new(Text::from(Span::styled(gauge, fill_style(snapshot.fill_level()))))
}

fn make_event_row(
    position: usize,
    event: &Event,
    capacities: &CapacityBoard,
    selected: bool,
) -> Row<'static> {
    let time = event
        .time
        .map_or_else(|| "TBA".to_string(), |time| time.format("%H:%M").to_string());
    let row = Row::new(vec![
        Cell::new(Text::from(position.to_string()).alignment(Alignment::Right)),
        Cell::new(Text::from(event.title.clone())),
        Cell::new(Text::from(format!("{} {}", event.date, time))),
        Cell::new(Text::from(event.location.clone())),
        Cell::new(Text::from(event.event_type.clone())),
        Cell::new(Text::from(event.capacity.to_string()).alignment(Alignment::Right)),
        make_gauge_cell(capacities, event),
    ]);

    if selected { row.bold().white() } else { row }
}

/// Spawn one count fetch per event, reporting back on `tx`
fn spawn_counts(
    api: &SharedApi,
    tx: &mpsc::UnboundedSender<AppEvent>,
    board: Board,
    capacities: &mut CapacityBoard,
    events: &[Event],
) {
    capacities.retain_events(events);
    for event in events {
        let ticket = capacities.mount(event.id, event.capacity);
        let api = Arc::clone(api);
        let tx = tx.clone();
        let event_id = event.id;
        tokio::spawn(async move {
            let result = api.registration_count(event_id).await;
            let _ = tx.send(AppEvent::Count {
                board,
                event_id,
                ticket,
                result,
            });
        });
    }
}

/// TUI App state
pub struct TuiApp {
    api: SharedApi,
    session: SessionStore,
    success_delay: Duration,
    default_username: String,
    listing: ListingView,
    profile: ProfileView,
    pane: Pane,
    /// Form being answered in the input line, if any
    form: Option<ActiveForm>,
    /// Open registration modal, kept across a failed submission
    registration: Option<RegistrationFlow>,
    /// Add Event answers kept across a failed submission
    event_form: EventForm,
    /// Whether to display the help menu window
    show_help_menu: bool,
    /// Helps scroll through the help menu window if the terminal is small
    help_handle: ScrollableList,
    /// History of recorded messages
    log_handle: ScrollableList,
    /// Current value of the input box
    user_input: UserInput,
    tx: mpsc::UnboundedSender<AppEvent>,
    rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl TuiApp {
    pub fn new(
        api: SharedApi,
        session: SessionStore,
        api_url: &str,
        success_delay: Duration,
    ) -> Self {
        // Fill help menu with help text lines
        let mut help_handle = ScrollableList::new(MAX_LOG_RECORDS);
        help_handle.push("".into());
        for line in HELP.lines() {
            help_handle.push(line.to_string().into());
        }
        help_handle.push("".into());
        help_handle.jump_to_first();

        let (tx, rx) = mpsc::unbounded_channel();
        let profile = ProfileView::new(&session, api_url);

        Self {
            api,
            session,
            success_delay,
            default_username: whoami::username(),
            listing: ListingView::new(),
            profile,
            pane: Pane::Empty,
            form: None,
            registration: None,
            event_form: EventForm::default(),
            show_help_menu: false,
            help_handle,
            log_handle: ScrollableList::new(MAX_LOG_RECORDS),
            user_input: UserInput::new(),
            tx,
            rx,
        }
    }

    /// Add log message
    fn add_log(&mut self, kind: RecordKind, content: impl Into<String>) {
        let record = Record::new(kind, content.into());
        self.log_handle.push(record.into());
    }

    fn login_prompt(&mut self, reason: LoginRequired) {
        self.add_log(RecordKind::Alert, format!("{}. Type 'login' to sign in.", reason));
    }

    // ------------------------------------------------------------------
    // Background loads
    // ------------------------------------------------------------------

    fn spawn_listing_load(&mut self) {
        let ticket = self.listing.begin_load();
        let token = self.session.get_token();
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.list_events(token.as_deref()).await;
            let _ = tx.send(AppEvent::Listing(ticket, result));
        });
    }

    fn spawn_profile_load(&mut self) {
        let Some((token, ticket)) = self.profile.begin_load(&self.session) else {
            self.pane = Pane::Empty;
            self.login_prompt(LoginRequired);
            return;
        };
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.fetch_profile(&token).await;
            let _ = tx.send(AppEvent::Profile(ticket, result));
        });
    }

    fn refresh_profile_counts(&mut self) {
        let created = self.profile.created_events().to_vec();
        spawn_counts(
            &self.api,
            &self.tx,
            Board::Profile,
            &mut self.profile.capacities,
            &created,
        );
    }

    fn handle_app_event(&mut self, app_event: AppEvent) {
        match app_event {
            AppEvent::Listing(ticket, result) => {
                if !self.listing.apply(ticket, result) {
                    return;
                }
                match self.listing.state() {
                    ListingState::Error(message) => {
                        let message = message.clone();
                        self.add_log(RecordKind::Error, message);
                    }
                    ListingState::Empty => self.add_log(RecordKind::Info, "No events available."),
                    ListingState::Loading | ListingState::Populated(_) => {}
                }
                let events = self.listing.events().to_vec();
                spawn_counts(
                    &self.api,
                    &self.tx,
                    Board::Listing,
                    &mut self.listing.capacities,
                    &events,
                );
            }
            AppEvent::Profile(ticket, result) => {
                if !self.profile.apply(ticket, result) {
                    return;
                }
                if let ProfileState::Error(message) = self.profile.state() {
                    let message = message.clone();
                    self.add_log(RecordKind::Error, message);
                }
                self.refresh_profile_counts();
            }
            AppEvent::Count {
                board,
                event_id,
                ticket,
                result,
            } => {
                let capacities = match board {
                    Board::Listing => &mut self.listing.capacities,
                    Board::Profile => &mut self.profile.capacities,
                };
                capacities.apply(event_id, ticket, result);
            }
            AppEvent::Registration(flow, outcome) => self.registration_submitted(*flow, outcome),
            AppEvent::AddEvent(form, outcome) => self.event_submitted(form, outcome),
            AppEvent::Login(result) => match result {
                Ok(_) => {
                    self.add_log(RecordKind::Ack, "Logged in.");
                    self.spawn_listing_load();
                }
                Err(message) => self.add_log(RecordKind::Error, message),
            },
            AppEvent::Signup(result) => match result {
                Ok(_) => self.add_log(RecordKind::Ack, "Account created. Type 'login' to sign in."),
                Err(message) => self.add_log(RecordKind::Error, message),
            },
            AppEvent::ProfileChanged(change, result) => self.profile_changed(change, result),
            AppEvent::RegistrationClosed(title) => {
                self.add_log(RecordKind::Info, format!("Closed registration for '{}'", title));
                self.spawn_listing_load();
            }
        }
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Handle one submitted input line. Returns `false` to exit.
    async fn handle_input(&mut self, input: String) -> bool {
        if self.form.is_some() {
            self.answer_form(&input);
            return true;
        }
        if input.trim().is_empty() {
            return true;
        }

        self.add_log(RecordKind::You, input.clone());
        match parse_command(&input) {
            Ok(ClientCommand::Quit) => false,
            Ok(command) => {
                self.handle_command(command).await;
                true
            }
            Err(e) => {
                self.add_log(RecordKind::Error, e.to_string());
                true
            }
        }
    }

    async fn handle_command(&mut self, command: ClientCommand) {
        match command {
            ClientCommand::Events => self.spawn_listing_load(),
            ClientCommand::Details(position) => {
                if let Some(event) = self.listed_event(position) {
                    self.pane = Pane::Details(event.id);
                }
            }
            ClientCommand::Register(position) => self.open_registration(position),
            ClientCommand::AddEvent => match guard_navigation(&self.session, Route::AddEvent) {
                Ok(_) => {
                    self.event_form = EventForm::default();
                    self.start_form(FormPurpose::AddEvent, event_prompts(&self.event_form));
                }
                Err(reason) => self.login_prompt(reason),
            },
            ClientCommand::Login => {
                let prompts = login_prompts(&self.default_username);
                self.start_form(FormPurpose::Login, prompts);
            }
            ClientCommand::Signup => self.start_form(FormPurpose::Signup, signup_prompts()),
            ClientCommand::Logout => {
                logout(&self.session);
                if self.pane == Pane::Profile {
                    self.pane = Pane::Empty;
                }
                self.add_log(RecordKind::Ack, "Logged out.");
                self.spawn_listing_load();
            }
            ClientCommand::Profile => match guard_navigation(&self.session, Route::Profile) {
                Ok(_) => {
                    self.pane = Pane::Profile;
                    self.spawn_profile_load();
                }
                Err(reason) => self.login_prompt(reason),
            },
            ClientCommand::Delete(position) => self.delete_event(position),
            ClientCommand::Unregister(position) => self.unregister(position),
            ClientCommand::Avatar(path) => self.upload_avatar(&path).await,
            ClientCommand::AvatarClear => self.spawn_profile_change(ProfileChange::ClearImage),
            ClientCommand::Help => self.show_help_menu = true,
            ClientCommand::Quit => {}
        }
    }

    fn listed_event(&mut self, position: usize) -> Option<Event> {
        let event = self.listing.event(position - 1).cloned();
        if event.is_none() {
            self.add_log(
                RecordKind::Error,
                format!("No event {} in the listing. Type 'events' to reload it.", position),
            );
        }
        event
    }

    fn start_form(&mut self, purpose: FormPurpose, prompts: PromptSequence) {
        self.add_log(
            RecordKind::Info,
            format!("{}: answer each field, Esc cancels", prompts.title()),
        );
        self.form = Some(ActiveForm { purpose, prompts });
    }

    fn cancel_form(&mut self) {
        if let Some(form) = self.form.take() {
            self.add_log(RecordKind::Info, format!("{} cancelled", form.prompts.title()));
        }
        self.registration = None;
    }

    fn answer_form(&mut self, input: &str) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        if let Err(message) = form.prompts.answer(input) {
            self.add_log(RecordKind::Error, message);
            return;
        }
        if !form.prompts.is_complete() {
            return;
        }

        let Some(ActiveForm { purpose, prompts }) = self.form.take() else {
            return;
        };
        match purpose {
            FormPurpose::Register => self.submit_registration(&prompts),
            FormPurpose::AddEvent => self.submit_add_event(&prompts),
            FormPurpose::Login => self.submit_login(&prompts),
            FormPurpose::Signup => self.submit_signup(&prompts),
        }
    }

    // ------------------------------------------------------------------
    // Form submissions
    // ------------------------------------------------------------------

    fn open_registration(&mut self, position: usize) {
        let Some(event) = self.listed_event(position) else {
            return;
        };
        match RegistrationFlow::open(event, &self.session, self.success_delay) {
            Ok(flow) => {
                self.pane = Pane::Details(flow.event().id);
                let prompts = registration_prompts(&flow.form);
                self.registration = Some(flow);
                self.start_form(FormPurpose::Register, prompts);
            }
            Err(reason) => self.login_prompt(reason),
        }
    }

    fn submit_registration(&mut self, prompts: &PromptSequence) {
        let Some(mut flow) = self.registration.take() else {
            return;
        };
        flow.form = to_registration(prompts);
        self.add_log(RecordKind::Info, SUBMITTING_MESSAGE);

        let api = Arc::clone(&self.api);
        let session = self.session.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = flow.submit(api.as_ref(), &session).await;
            let _ = tx.send(AppEvent::Registration(Box::new(flow), outcome));
        });
    }

    fn registration_submitted(
        &mut self,
        flow: RegistrationFlow,
        outcome: RegistrationResult<SubmitOutcome>,
    ) {
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(e) => {
                self.add_log(RecordKind::Error, e.to_string());
                return;
            }
        };

        match outcome {
            SubmitOutcome::Registered(notification) => {
                if let Some(feedback) = flow.feedback() {
                    let feedback = feedback.to_string();
                    self.add_log(RecordKind::Ack, feedback);
                }
                self.add_log(RecordKind::Alert, notification.message);

                let title = flow.event().title.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    if flow.finish().await.is_ok() {
                        let _ = tx.send(AppEvent::RegistrationClosed(title));
                    }
                });
            }
            SubmitOutcome::Failed(message) => {
                self.add_log(RecordKind::Error, message);
                let prompts = registration_prompts(&flow.form);
                self.registration = Some(flow);
                self.start_form(FormPurpose::Register, prompts);
            }
            SubmitOutcome::LoginRequired => self.login_prompt(LoginRequired),
        }
    }

    fn submit_add_event(&mut self, prompts: &PromptSequence) {
        let form = match to_event_form(prompts) {
            Ok(form) => form,
            Err(e) => {
                self.add_log(RecordKind::Error, e.to_string());
                return;
            }
        };
        self.add_log(RecordKind::Info, "Creating event...");

        let api = Arc::clone(&self.api);
        let session = self.session.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = submit_event(&form, api.as_ref(), &session).await;
            let _ = tx.send(AppEvent::AddEvent(form, outcome));
        });
    }

    fn event_submitted(&mut self, form: EventForm, outcome: AddEventOutcome) {
        match outcome {
            AddEventOutcome::Created { event, .. } => {
                self.event_form = EventForm::default();
                self.add_log(
                    RecordKind::Ack,
                    format!("Created '{}' ({})", event.title, event.event_code),
                );
                self.spawn_listing_load();
            }
            AddEventOutcome::Invalid(e) => self.reopen_event_form(form, e.to_string()),
            AddEventOutcome::Failed(message) => self.reopen_event_form(form, message),
            AddEventOutcome::LoginRequired(reason) => self.login_prompt(reason),
        }
    }

    /// Ask the Add Event fields again with the failed answers as defaults
    fn reopen_event_form(&mut self, form: EventForm, message: String) {
        self.add_log(RecordKind::Error, message);
        let prompts = event_prompts(&form);
        self.event_form = form;
        self.start_form(FormPurpose::AddEvent, prompts);
    }

    fn submit_login(&mut self, prompts: &PromptSequence) {
        let form = to_login_form(prompts);
        let api = Arc::clone(&self.api);
        let session = self.session.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = form.submit(api.as_ref(), &session).await;
            let _ = tx.send(AppEvent::Login(result));
        });
    }

    fn submit_signup(&mut self, prompts: &PromptSequence) {
        let form = to_signup_form(prompts);
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = form.submit(api.as_ref()).await;
            let _ = tx.send(AppEvent::Signup(result));
        });
    }

    // ------------------------------------------------------------------
    // Profile mutations
    // ------------------------------------------------------------------

    /// Send one profile change to the server in the background
    fn spawn_profile_change(&mut self, change: ProfileChange) {
        let Some(token) = self.profile.begin_mutation(&self.session) else {
            self.pane = Pane::Empty;
            self.login_prompt(LoginRequired);
            return;
        };

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = match &change {
                ProfileChange::Delete(event_id) => api.delete_event(&token, *event_id).await,
                ProfileChange::Unregister(event_id) => {
                    api.unregister_from_event(&token, *event_id).await
                }
                ProfileChange::UploadImage(image) => api
                    .upload_profile_picture(&token, image)
                    .await
                    .map(|_| ()),
                ProfileChange::ClearImage => api.clear_profile_picture(&token).await.map(|_| ()),
            };
            let _ = tx.send(AppEvent::ProfileChanged(change, result));
        });
    }

    fn profile_changed(&mut self, change: ProfileChange, result: ApiResult<()>) {
        if let Err(e) = result {
            self.add_log(
                RecordKind::Error,
                format!("The server did not accept the change: {}", e),
            );
            return;
        }

        match &change {
            ProfileChange::Delete(event_id) => self.profile.capacities.unmount(*event_id),
            ProfileChange::ClearImage => self.profile.forget_image(),
            ProfileChange::Unregister(_) | ProfileChange::UploadImage(_) => {}
        }
        self.pane = Pane::Profile;
        self.add_log(RecordKind::Ack, change.done_message());
        self.spawn_profile_load();
    }

    fn delete_event(&mut self, position: usize) {
        let Some(event_id) = self
            .profile
            .created_events()
            .get(position - 1)
            .map(|event| event.id)
        else {
            self.add_log(
                RecordKind::Error,
                format!("No created event {}. Type 'profile' first.", position),
            );
            return;
        };
        self.spawn_profile_change(ProfileChange::Delete(event_id));
    }

    fn unregister(&mut self, position: usize) {
        let Some(event_id) = self
            .profile
            .registered_events()
            .get(position - 1)
            .map(|event| event.id)
        else {
            self.add_log(
                RecordKind::Error,
                format!("No registration {}. Type 'profile' first.", position),
            );
            return;
        };
        self.spawn_profile_change(ProfileChange::Unregister(event_id));
    }

    async fn upload_avatar(&mut self, path: &Path) {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                self.add_log(
                    RecordKind::Error,
                    format!("Cannot read {}: {}", path.display(), e),
                );
                return;
            }
        };
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "avatar".to_string());
        let image = ProfileImage::from_file_name(file_name, bytes);
        self.profile.cache_image(&image);
        self.spawn_profile_change(ProfileChange::UploadImage(image));
    }

    // ------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------

    /// Render the events table
    fn draw_events(&self, frame: &mut Frame, area: Rect) {
        let highlighted = match self.pane {
            Pane::Details(event_id) => Some(event_id),
            _ => None,
        };
        let title = match self.listing.state() {
            ListingState::Loading => " events (loading...)  ".to_string(),
            ListingState::Error(message) => format!(" events ({})  ", message),
            ListingState::Empty => " events (none available)  ".to_string(),
            ListingState::Populated(events) => format!(" events ({})  ", events.len()),
        };

        let table = Table::new(
            self.listing.events().iter().enumerate().map(|(idx, event)| {
                make_event_row(
                    idx + 1,
                    event,
                    &self.listing.capacities,
                    highlighted == Some(event.id),
                )
            }),
            [
                Constraint::Max(3),
                Constraint::Fill(3),
                Constraint::Fill(2),
                Constraint::Fill(2),
                Constraint::Fill(2),
                Constraint::Max(8),
                Constraint::Fill(3),
            ],
        )
        .header(
            Row::new(vec!["#", "Title", "When", "Where", "Type", "Capacity", "Filled"]).bold(),
        )
        .block(Block::bordered().padding(Padding::horizontal(1)).title(title));
        frame.render_widget(table, area);
    }

    fn details_lines(&self, event_id: EventId) -> Vec<Line<'static>> {
        let Some(event) = self.listing.find(event_id) else {
            return vec!["This event is no longer listed.".into()];
        };
        let details = EventDetails::from(event);
        let mut lines: Vec<Line<'static>> = vec![details.title.clone().bold().into(), "".into()];
        for (label, value) in details.rows {
            lines.push(Line::from(vec![
                format!("{:>11}: ", label).light_blue(),
                value.into(),
            ]));
        }
        if let Some(snapshot) = self.listing.capacities.snapshot(event_id) {
            lines.push("".into());
            lines.push(Line::from(Span::styled(
                format_gauge(snapshot.rounded_percentage()),
                fill_style(snapshot.fill_level()),
            )));
            lines.push(snapshot.to_string().into());
        }
        lines
    }

    fn profile_lines(&self) -> Vec<Line<'static>> {
        let profile = match self.profile.state() {
            ProfileState::Loading => return vec!["Loading profile...".into()],
            ProfileState::RedirectToLogin => {
                return vec!["Log in to see your profile.".into()];
            }
            ProfileState::Error(message) => return vec![message.clone().light_red().into()],
            ProfileState::Loaded(profile) => profile,
        };

        let mut lines: Vec<Line<'static>> = vec![profile.username.clone().bold().into()];
        let fields = [
            ("Full Name", &profile.full_name),
            ("Email", &profile.email),
            ("Phone", &profile.phone_number),
            ("Location", &profile.location),
            ("Bio", &profile.bio),
            ("Interests", &profile.interests),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                lines.push(Line::from(vec![
                    format!("{:>9}: ", label).light_blue(),
                    value.clone().into(),
                ]));
            }
        }
        let avatar = match self.profile.avatar() {
            AvatarSource::Remote(url) => url,
            AvatarSource::Local(_) => "local copy (not on the server)".to_string(),
            AvatarSource::None => "none".to_string(),
        };
        lines.push(Line::from(vec!["   Avatar: ".light_blue(), avatar.into()]));

        lines.push("".into());
        lines.push("Created events".bold().into());
        if profile.created_events.is_empty() {
            lines.push("You haven't created any events yet.".into());
        }
        for (idx, event) in profile.created_events.iter().enumerate() {
            let mut spans = vec![Span::raw(format!("{:>2}. {}  ", idx + 1, event.title))];
            match self.profile.capacities.snapshot(event.id) {
                Some(snapshot) => spans.push(Span::styled(
                    format!(
                        "{} {}",
                        format_gauge(snapshot.rounded_percentage()),
                        snapshot.slots_label()
                    ),
                    fill_style(snapshot.fill_level()),
                )),
                None => spans.push(Span::raw("loading...")),
            }
            lines.push(Line::from(spans));
        }

        lines.push("".into());
        lines.push("Registered events".bold().into());
        if profile.registered_events.is_empty() {
            lines.push("You haven't registered for any events yet.".into());
        }
        for (idx, event) in profile.registered_events.iter().enumerate() {
            lines.push(
                format!(
                    "{:>2}. {}  {}  {}",
                    idx + 1,
                    event.title,
                    event.date,
                    event.location
                )
                .into(),
            );
        }
        lines
    }

    /// Render the details or profile pane
    fn draw_pane(&self, frame: &mut Frame, area: Rect) {
        let (title, lines) = match self.pane {
            Pane::Empty => (
                " details  ",
                vec![
                    "Type 'details N' to see an event.".into(),
                    "Type 'profile' to see your page.".into(),
                ],
            ),
            Pane::Details(event_id) => (" details  ", self.details_lines(event_id)),
            Pane::Profile => (" profile  ", self.profile_lines()),
        };
        let pane = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::bordered().padding(Padding::horizontal(1)).title(title));
        frame.render_widget(pane, area);
    }

    /// Render the log/history window with scrollbar
    fn draw_log(&mut self, frame: &mut Frame, area: Rect) {
        let log_records = self.log_handle.list_items.clone();
        let log_records = List::new(log_records)
            .direction(ListDirection::BottomToTop)
            .block(block::Block::bordered().title(" history  "));
        frame.render_stateful_widget(log_records, area, &mut self.log_handle.list_state);

        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .symbols(scrollbar::VERTICAL)
                .begin_symbol(None)
                .end_symbol(None),
            area.inner(Margin {
                vertical: 1,
                horizontal: 1,
            }),
            &mut self.log_handle.scroll_state,
        );
    }

    /// Render the user input area, prompting for the current form field
    fn draw_user_input(&self, frame: &mut Frame, area: Rect) {
        let current_field = self.form.as_ref().and_then(|form| form.prompts.current());
        let (title, masked) = match current_field {
            Some(field) => (format!(" {} ", field.prompt()).light_yellow(), field.is_secret()),
            None => {
                let who = if self.session.is_authenticated() {
                    "you"
                } else {
                    "guest"
                };
                (format!(" {}@event_hub  ", who).light_green(), false)
            }
        };
        let value = if masked {
            self.user_input.masked()
        } else {
            self.user_input.value.clone()
        };

        let user_input = Paragraph::new(value)
            .style(Style::default())
            .block(block::Block::bordered().title(title));
        frame.render_widget(user_input, area);
        frame.set_cursor_position(Position::new(
            area.x + self.user_input.char_idx as u16 + 1,
            area.y + 1,
        ));
    }

    /// Render the help/status bar at the bottom
    fn draw_help_bar(&self, frame: &mut Frame, area: Rect) {
        let status_indicator = if self.session.is_authenticated() {
            "● Logged in".green()
        } else {
            "● Guest".yellow()
        };
        let escape: Span = if self.form.is_some() {
            " to cancel the form".into()
        } else {
            " to exit".into()
        };

        let help_message = vec![
            status_indicator,
            " | press ".into(),
            "Tab".bold().white(),
            " to view help, press ".into(),
            "Enter".bold().white(),
            " to submit, or press ".into(),
            "Esc".bold().white(),
            escape,
        ];
        frame.render_widget(Paragraph::new(Line::from(help_message)), area);
    }

    /// Render the help menu overlay
    fn draw_help_menu(&mut self, frame: &mut Frame) {
        let vertical = Layout::vertical([Constraint::Max(36)]).flex(Flex::Center);
        let horizontal = Layout::horizontal([Constraint::Max(84)]).flex(Flex::Center);
        let [help_menu_area] = vertical.areas(frame.area());
        let [help_menu_area] = horizontal.areas(help_menu_area);
        frame.render_widget(Clear, help_menu_area);

        let help_items = self.help_handle.list_items.clone();
        let help_items = List::new(help_items)
            .direction(ListDirection::BottomToTop)
            .block(block::Block::bordered().title(" commands  "));
        frame.render_stateful_widget(
            help_items,
            help_menu_area,
            &mut self.help_handle.list_state,
        );

        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .symbols(scrollbar::VERTICAL)
                .begin_symbol(None)
                .end_symbol(None),
            help_menu_area.inner(Margin {
                vertical: 1,
                horizontal: 1,
            }),
            &mut self.help_handle.scroll_state,
        );
    }

    fn draw(&mut self, frame: &mut Frame) {
        let window = Layout::vertical([
            Constraint::Min(6),    // Events, pane and log
            Constraint::Length(3), // User input area
            Constraint::Length(1), // Help bar
        ]);
        let [top_area, user_input_area, help_area] = window.areas(frame.area());

        let [view_area, log_area] =
            Layout::vertical([Constraint::Percentage(65), Constraint::Percentage(35)])
                .areas(top_area);
        let [events_area, pane_area] =
            Layout::horizontal([Constraint::Percentage(62), Constraint::Percentage(38)])
                .areas(view_area);

        self.draw_events(frame, events_area);
        self.draw_pane(frame, pane_area);
        self.draw_log(frame, log_area);
        self.draw_user_input(frame, user_input_area);
        self.draw_help_bar(frame, help_area);

        if self.show_help_menu {
            self.draw_help_menu(frame);
        }
    }

    /// Run the TUI application until Esc or `quit`
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        self.add_log(RecordKind::Info, "Welcome to Event Hub. Press Tab for help.");
        self.spawn_listing_load();

        loop {
            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(POLL_TIMEOUT)?
                && let TermEvent::Key(KeyEvent {
                    code,
                    modifiers,
                    kind,
                    ..
                }) = event::read()?
                && kind == KeyEventKind::Press
            {
                match modifiers {
                    KeyModifiers::CONTROL => match code {
                        KeyCode::Home => self.log_handle.jump_to_first(),
                        KeyCode::End => self.log_handle.jump_to_last(),
                        KeyCode::Char('c') => return Ok(()),
                        _ => {}
                    },
                    KeyModifiers::NONE | KeyModifiers::SHIFT => match code {
                        KeyCode::Enter => {
                            let user_input = self.user_input.submit();
                            if !self.handle_input(user_input).await {
                                return Ok(());
                            }
                        }
                        KeyCode::Char(to_insert) => self.user_input.input(to_insert),
                        KeyCode::Backspace => self.user_input.backspace(),
                        KeyCode::Delete => self.user_input.delete(),
                        KeyCode::Left => self.user_input.move_left(),
                        KeyCode::Right => self.user_input.move_right(),
                        KeyCode::Up => {
                            if self.show_help_menu {
                                self.help_handle.move_up();
                            } else {
                                self.log_handle.move_up();
                            }
                        }
                        KeyCode::Down => {
                            if self.show_help_menu {
                                self.help_handle.move_down();
                            } else {
                                self.log_handle.move_down();
                            }
                        }
                        KeyCode::Home => self.user_input.jump_to_first(),
                        KeyCode::End => self.user_input.jump_to_last(),
                        KeyCode::Tab => self.show_help_menu = !self.show_help_menu,
                        KeyCode::Esc => {
                            if self.show_help_menu {
                                self.show_help_menu = false;
                            } else if self.form.is_some() {
                                self.user_input.submit();
                                self.cancel_form();
                            } else {
                                return Ok(());
                            }
                        }
                        _ => {}
                    },
                    _ => {}
                }
            }

            while let Ok(app_event) = self.rx.try_recv() {
                self.handle_app_event(app_event);
            }
        }
    }
}
