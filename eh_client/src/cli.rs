//! Line-oriented front end.
//!
//! Reads one command per line, collects forms field by field and prints each
//! page as plain text. Generic over its input and output so whole sessions
//! can be scripted.

use crate::commands::{ClientCommand, HELP, parse_command};
use crate::prompts::{
    PromptSequence, event_prompts, login_prompts, registration_prompts, signup_prompts,
    to_event_form, to_login_form, to_registration, to_signup_form,
};
use anyhow::{Context, Result};
use event_hub::api::SharedApi;
use event_hub::capacity::CapacityBoard;
use event_hub::models::{Event, ProfileImage};
use event_hub::registration::{RegistrationFlow, SubmitOutcome};
use event_hub::registration::flow::SUBMITTING_MESSAGE;
use event_hub::views::add_event::submit_event;
use event_hub::views::listing::{guard_navigation, logout};
use event_hub::views::{
    AddEventOutcome, AvatarSource, EventDetails, EventForm, ListingState, ListingView,
    LoginRequired, ProfileState, ProfileView, Route,
};
use event_hub::SessionStore;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

/// Interactive shell over one session
pub struct Shell<R, W> {
    api: SharedApi,
    session: SessionStore,
    success_delay: Duration,
    default_username: String,
    listing: ListingView,
    profile: ProfileView,
    input: Lines<R>,
    out: W,
}

impl<R, W> Shell<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    /// # Arguments
    ///
    /// * `api_url` - Base URL, used to resolve relative profile picture paths
    /// * `success_delay` - How long a successful registration stays on screen
    pub fn new(
        api: SharedApi,
        session: SessionStore,
        api_url: &str,
        success_delay: Duration,
        input: R,
        out: W,
    ) -> Self {
        let profile = ProfileView::new(&session, api_url);
        Self {
            api,
            session,
            success_delay,
            default_username: whoami::username(),
            listing: ListingView::new(),
            profile,
            input: input.lines(),
            out,
        }
    }

    /// Username offered as the login default
    pub fn with_default_username(mut self, username: impl Into<String>) -> Self {
        self.default_username = username.into();
        self
    }

    /// Output written so far
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Run until `quit` or end of input
    pub async fn run(&mut self) -> Result<()> {
        writeln!(self.out, "Event Hub. Type 'help' for commands.")?;
        self.show_events().await?;

        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;
            let Some(line) = self.read_line().await? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            match parse_command(&line) {
                Ok(ClientCommand::Quit) => break,
                Ok(command) => self.execute(command).await?,
                Err(e) => writeln!(self.out, "{}", e)?,
            }
        }

        writeln!(self.out, "Bye.")?;
        Ok(())
    }

    async fn read_line(&mut self) -> Result<Option<String>> {
        self.input
            .next_line()
            .await
            .context("Failed to read input")
    }

    /// Ask every field of `prompts`. Returns `false` if input ended first.
    async fn collect(&mut self, prompts: &mut PromptSequence) -> Result<bool> {
        writeln!(self.out, "== {} ==", prompts.title())?;
        while let Some(field) = prompts.current() {
            write!(self.out, "{}", field.prompt())?;
            self.out.flush()?;
            let Some(line) = self.read_line().await? else {
                return Ok(false);
            };
            if let Err(message) = prompts.answer(&line) {
                writeln!(self.out, "{}", message)?;
            }
        }
        Ok(true)
    }

    /// Run one parsed command
    pub async fn execute(&mut self, command: ClientCommand) -> Result<()> {
        match command {
            ClientCommand::Events => self.show_events().await,
            ClientCommand::Details(position) => self.show_details(position),
            ClientCommand::Register(position) => self.register(position).await,
            ClientCommand::AddEvent => self.add_event().await,
            ClientCommand::Login => self.login().await,
            ClientCommand::Signup => self.signup().await,
            ClientCommand::Logout => {
                logout(&self.session);
                writeln!(self.out, "Logged out.")?;
                self.show_events().await
            }
            ClientCommand::Profile => self.show_profile().await,
            ClientCommand::Delete(position) => self.delete_event(position).await,
            ClientCommand::Unregister(position) => self.unregister(position).await,
            ClientCommand::Avatar(path) => self.upload_avatar(&path).await,
            ClientCommand::AvatarClear => self.clear_avatar().await,
            ClientCommand::Help => {
                write!(self.out, "{}", HELP)?;
                Ok(())
            }
            ClientCommand::Quit => Ok(()),
        }
    }

    fn login_prompt(&mut self, reason: LoginRequired) -> Result<()> {
        writeln!(self.out, "{}. Type 'login' to sign in.", reason)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Listing
    // ------------------------------------------------------------------

    async fn show_events(&mut self) -> Result<()> {
        self.listing
            .load_with_capacities(&self.api, &self.session)
            .await;

        match self.listing.state() {
            ListingState::Loading => writeln!(self.out, "Loading events...")?,
            ListingState::Error(message) => writeln!(self.out, "{}", message)?,
            ListingState::Empty => writeln!(self.out, "No events available.")?,
            ListingState::Populated(events) => {
                for (idx, event) in events.iter().enumerate() {
                    write_event_line(&mut self.out, idx + 1, event, &self.listing.capacities)?;
                }
            }
        }
        Ok(())
    }

    fn listed_event(&mut self, position: usize) -> Result<Option<Event>> {
        let event = self.listing.event(position - 1).cloned();
        if event.is_none() {
            writeln!(
                self.out,
                "No event {} in the listing. Type 'events' to reload it.",
                position
            )?;
        }
        Ok(event)
    }

    fn show_details(&mut self, position: usize) -> Result<()> {
        let Some(event) = self.listed_event(position)? else {
            return Ok(());
        };

        let details = EventDetails::from(&event);
        writeln!(self.out, "== {} ==", details.title)?;
        for (label, value) in &details.rows {
            writeln!(self.out, "{:>12}: {}", label, value)?;
        }
        if let Some(snapshot) = self.listing.capacities.snapshot(event.id) {
            writeln!(self.out, "{:>12}: {}", "Filled", format_gauge(snapshot.rounded_percentage()))?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    async fn register(&mut self, position: usize) -> Result<()> {
        let Some(event) = self.listed_event(position)? else {
            return Ok(());
        };

        let mut flow = match RegistrationFlow::open(event, &self.session, self.success_delay) {
            Ok(flow) => flow,
            Err(reason) => return self.login_prompt(reason),
        };
        writeln!(self.out, "Registering for '{}'", flow.event().title)?;

        loop {
            let mut prompts = registration_prompts(&flow.form);
            if !self.collect(&mut prompts).await? {
                return Ok(());
            }
            flow.form = to_registration(&prompts);

            writeln!(self.out, "{}", SUBMITTING_MESSAGE)?;
            let outcome = match flow.submit(self.api.as_ref(), &self.session).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    writeln!(self.out, "{}", e)?;
                    return Ok(());
                }
            };

            match outcome {
                SubmitOutcome::Registered(notification) => {
                    if let Some(feedback) = flow.feedback() {
                        writeln!(self.out, "{}", feedback)?;
                    }
                    writeln!(self.out, "{}", notification.message)?;
                    break;
                }
                SubmitOutcome::Failed(message) => {
                    writeln!(self.out, "{}", message)?;
                    if !self.confirm_resubmit().await? {
                        return Ok(());
                    }
                }
                SubmitOutcome::LoginRequired => return self.login_prompt(LoginRequired),
            }
        }

        if let Ok(Route::Listing) = flow.finish().await {
            self.show_events().await?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Add event
    // ------------------------------------------------------------------

    async fn add_event(&mut self) -> Result<()> {
        if let Err(reason) = guard_navigation(&self.session, Route::AddEvent) {
            return self.login_prompt(reason);
        }

        let mut form = EventForm::default();
        loop {
            let mut prompts = event_prompts(&form);
            if !self.collect(&mut prompts).await? {
                return Ok(());
            }
            form = match to_event_form(&prompts) {
                Ok(form) => form,
                Err(e) => {
                    writeln!(self.out, "{}", e)?;
                    return Ok(());
                }
            };

            match submit_event(&form, self.api.as_ref(), &self.session).await {
                AddEventOutcome::Created { event, .. } => {
                    writeln!(self.out, "Created '{}' ({})", event.title, event.event_code)?;
                    return self.show_events().await;
                }
                AddEventOutcome::Invalid(e) => writeln!(self.out, "{}", e)?,
                AddEventOutcome::Failed(message) => writeln!(self.out, "{}", message)?,
                AddEventOutcome::LoginRequired(reason) => return self.login_prompt(reason),
            }

            if !self.confirm_resubmit().await? {
                return Ok(());
            }
        }
    }

    /// Ask whether to reopen a failed form with its previous answers
    async fn confirm_resubmit(&mut self) -> Result<bool> {
        write!(self.out, "Edit and resubmit? [y/N]: ")?;
        self.out.flush()?;
        let answer = self.read_line().await?.unwrap_or_default();
        Ok(answer.trim().eq_ignore_ascii_case("y"))
    }

    // ------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------

    async fn login(&mut self) -> Result<()> {
        let mut prompts = login_prompts(&self.default_username);
        if !self.collect(&mut prompts).await? {
            return Ok(());
        }

        match to_login_form(&prompts)
            .submit(self.api.as_ref(), &self.session)
            .await
        {
            Ok(_) => {
                writeln!(self.out, "Logged in.")?;
                self.show_events().await?;
            }
            Err(message) => writeln!(self.out, "{}", message)?,
        }
        Ok(())
    }

    async fn signup(&mut self) -> Result<()> {
        let mut prompts = signup_prompts();
        if !self.collect(&mut prompts).await? {
            return Ok(());
        }

        match to_signup_form(&prompts).submit(self.api.as_ref()).await {
            Ok(_) => writeln!(self.out, "Account created. Type 'login' to sign in.")?,
            Err(message) => writeln!(self.out, "{}", message)?,
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Profile
    // ------------------------------------------------------------------

    async fn show_profile(&mut self) -> Result<()> {
        if let Err(reason) = guard_navigation(&self.session, Route::Profile) {
            return self.login_prompt(reason);
        }
        if self
            .profile
            .load_with_capacities(&self.api, &self.session)
            .await
            .is_some()
        {
            return self.login_prompt(LoginRequired);
        }
        self.print_profile()
    }

    fn print_profile(&mut self) -> Result<()> {
        let profile = match self.profile.state() {
            ProfileState::Loading => {
                writeln!(self.out, "Loading profile...")?;
                return Ok(());
            }
            ProfileState::RedirectToLogin => return self.login_prompt(LoginRequired),
            ProfileState::Error(message) => {
                writeln!(self.out, "{}", message)?;
                return Ok(());
            }
            ProfileState::Loaded(profile) => profile.clone(),
        };

        writeln!(self.out, "== {} ==", profile.username)?;
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
                writeln!(self.out, "{:>10}: {}", label, value)?;
            }
        }
        let avatar = match self.profile.avatar() {
            AvatarSource::Remote(url) => url,
            AvatarSource::Local(_) => "local copy (not on the server)".to_string(),
            AvatarSource::None => "none".to_string(),
        };
        writeln!(self.out, "{:>10}: {}", "Avatar", avatar)?;

        writeln!(self.out, "-- Created events --")?;
        if profile.created_events.is_empty() {
            writeln!(self.out, "You haven't created any events yet.")?;
        }
        for (idx, event) in profile.created_events.iter().enumerate() {
            write_event_line(&mut self.out, idx + 1, event, &self.profile.capacities)?;
        }

        writeln!(self.out, "-- Registered events --")?;
        if profile.registered_events.is_empty() {
            writeln!(self.out, "You haven't registered for any events yet.")?;
        }
        for (idx, event) in profile.registered_events.iter().enumerate() {
            writeln!(
                self.out,
                "{:>3}. {} | {} | {}",
                idx + 1,
                event.title,
                event.date,
                event.location
            )?;
        }
        Ok(())
    }

    /// Report a profile mutation and reprint the page
    fn after_mutation(&mut self, applied: bool, done: &str) -> Result<()> {
        if applied {
            writeln!(self.out, "{}", done)?;
            self.print_profile()
        } else if matches!(self.profile.state(), ProfileState::RedirectToLogin) {
            self.login_prompt(LoginRequired)
        } else {
            writeln!(self.out, "The server did not accept the change. See the log for details.")?;
            Ok(())
        }
    }

    async fn delete_event(&mut self, position: usize) -> Result<()> {
        let Some(event_id) = self
            .profile
            .created_events()
            .get(position - 1)
            .map(|event| event.id)
        else {
            writeln!(self.out, "No created event {}. Type 'profile' first.", position)?;
            return Ok(());
        };

        let applied = self
            .profile
            .delete_event(self.api.as_ref(), &self.session, event_id)
            .await;
        self.after_mutation(applied, "Event deleted.")
    }

    async fn unregister(&mut self, position: usize) -> Result<()> {
        let Some(event_id) = self
            .profile
            .registered_events()
            .get(position - 1)
            .map(|event| event.id)
        else {
            writeln!(self.out, "No registration {}. Type 'profile' first.", position)?;
            return Ok(());
        };

        let applied = self
            .profile
            .unregister(self.api.as_ref(), &self.session, event_id)
            .await;
        self.after_mutation(applied, "Registration cancelled.")
    }

    async fn upload_avatar(&mut self, path: &Path) -> Result<()> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                writeln!(self.out, "Cannot read {}: {}", path.display(), e)?;
                return Ok(());
            }
        };
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "avatar".to_string());
        let image = ProfileImage::from_file_name(file_name, bytes);

        let applied = self
            .profile
            .upload_image(self.api.as_ref(), &self.session, &image)
            .await;
        self.after_mutation(applied, "Profile picture updated.")
    }

    async fn clear_avatar(&mut self) -> Result<()> {
        let applied = self
            .profile
            .clear_image(self.api.as_ref(), &self.session)
            .await;
        self.after_mutation(applied, "Profile picture removed.")
    }
}

/// Text gauge, e.g. `[#######---] 70%`
pub fn format_gauge(percentage: u8) -> String {
    let filled = usize::from(percentage.min(100)) / 10;
    format!(
        "[{}{}] {}%",
        "#".repeat(filled),
        "-".repeat(10 - filled),
        percentage
    )
}

fn write_event_line<W: Write>(
    out: &mut W,
    position: usize,
    event: &Event,
    capacities: &CapacityBoard,
) -> Result<()> {
    let time = event
        .time
        .map_or_else(|| "TBA".to_string(), |time| time.format("%H:%M").to_string());
    writeln!(
        out,
        "{:>3}. {} | {} {} | {} | {}",
        position, event.title, event.date, time, event.location, event.event_type
    )?;

    match capacities.snapshot(event.id) {
        Some(snapshot) => writeln!(
            out,
            "     {} {}",
            format_gauge(snapshot.rounded_percentage()),
            snapshot
        )?,
        None => writeln!(out, "     Capacity: {} | loading...", event.capacity)?,
    }
    Ok(())
}
