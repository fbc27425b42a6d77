use std::{fmt, path::PathBuf};

/// Command reference shown by `help` and the TUI help overlay
pub const HELP: &str = "\
events
        Reload the event listing with capacity for every event.
details <n>
        Show everything about event <n> of the listing.
register <n>
        Register for event <n>. Requires login.
add-event
        Create a new event. Requires login.
login
        Log in with a username and password.
signup
        Create an account.
logout
        Forget the stored session.
profile
        Show your profile, created events and registrations. Requires login.
delete <n>
        Delete created event <n> from your profile.
unregister <n>
        Cancel registration <n> from your profile.
avatar <path>
        Upload an image file as your profile picture.
avatar clear
        Remove your profile picture.
help
        Show this help.
quit
        Exit.

In a form, a blank answer keeps the value in parentheses and '-' clears an
optional field.
";

/// Commands accepted by the CLI and the TUI input line.
///
/// Positions are 1-based, as printed next to each listed event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    /// Reload and print the event listing
    Events,
    /// Show the details of a listed event
    Details(usize),
    /// Open the registration form for a listed event
    Register(usize),
    /// Open the Add Event form
    AddEvent,
    Login,
    Signup,
    Logout,
    /// Load and show the profile page
    Profile,
    /// Delete one of the user's created events (profile position)
    Delete(usize),
    /// Unregister from one of the user's registrations (profile position)
    Unregister(usize),
    /// Upload a new profile picture
    Avatar(PathBuf),
    /// Remove the profile picture
    AvatarClear,
    Help,
    Quit,
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Command needs a position and none was given.
    MissingPosition(&'static str),
    /// Position is not a number of 1 or more.
    InvalidPosition(String),
    /// Avatar command missing a path or `clear`.
    MissingAvatarPath,
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPosition(command) => write!(
                f,
                "'{}' needs an event number (e.g., '{} 1')",
                command, command
            ),
            Self::InvalidPosition(value) => write!(
                f,
                "Invalid event number '{}'. Use the number shown next to the event",
                value
            ),
            Self::MissingAvatarPath => {
                write!(f, "Use 'avatar PATH' to upload a picture or 'avatar clear'")
            }
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{}'. Type 'help' to see available commands",
                cmd
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a command line into a [`ClientCommand`].
///
/// # Examples
///
/// ```
/// use eh_client::commands::{ClientCommand, parse_command};
///
/// assert_eq!(parse_command("events"), Ok(ClientCommand::Events));
/// assert_eq!(parse_command("register 2"), Ok(ClientCommand::Register(2)));
/// ```
pub fn parse_command(input: &str) -> Result<ClientCommand, ParseError> {
    let trimmed = input.trim();

    match trimmed.to_lowercase().as_str() {
        "events" | "ls" => return Ok(ClientCommand::Events),
        "add-event" | "add" => return Ok(ClientCommand::AddEvent),
        "login" => return Ok(ClientCommand::Login),
        "signup" => return Ok(ClientCommand::Signup),
        "logout" => return Ok(ClientCommand::Logout),
        "profile" => return Ok(ClientCommand::Profile),
        "help" | "?" => return Ok(ClientCommand::Help),
        "quit" | "exit" => return Ok(ClientCommand::Quit),
        _ => {}
    }

    let parts: Vec<&str> = trimmed.split_ascii_whitespace().collect();
    match parts.first().map(|cmd| cmd.to_lowercase()).as_deref() {
        Some("details") => parse_position(&parts, "details").map(ClientCommand::Details),
        Some("register") => parse_position(&parts, "register").map(ClientCommand::Register),
        Some("delete") => parse_position(&parts, "delete").map(ClientCommand::Delete),
        Some("unregister") => {
            parse_position(&parts, "unregister").map(ClientCommand::Unregister)
        }
        Some("avatar") => parse_avatar_command(trimmed, &parts),
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}

/// Parse the 1-based position after a command word
fn parse_position(parts: &[&str], command: &'static str) -> Result<usize, ParseError> {
    let value = parts.get(1).ok_or(ParseError::MissingPosition(command))?;
    match value.parse::<usize>() {
        Ok(position) if position > 0 => Ok(position),
        _ => Err(ParseError::InvalidPosition(value.to_string())),
    }
}

/// Parse "avatar clear" or "avatar PATH"; the path may contain spaces
fn parse_avatar_command(trimmed: &str, parts: &[&str]) -> Result<ClientCommand, ParseError> {
    match parts.get(1) {
        Some(word) if parts.len() == 2 && word.eq_ignore_ascii_case("clear") => {
            Ok(ClientCommand::AvatarClear)
        }
        Some(_) => {
            let path = trimmed["avatar".len()..].trim();
            Ok(ClientCommand::Avatar(PathBuf::from(path)))
        }
        None => Err(ParseError::MissingAvatarPath),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Single-word command tests ===

    #[test]
    fn test_parse_events() {
        assert_eq!(parse_command("events"), Ok(ClientCommand::Events));
        assert_eq!(parse_command("ls"), Ok(ClientCommand::Events));
    }

    #[test]
    fn test_parse_session_commands() {
        assert_eq!(parse_command("login"), Ok(ClientCommand::Login));
        assert_eq!(parse_command("signup"), Ok(ClientCommand::Signup));
        assert_eq!(parse_command("logout"), Ok(ClientCommand::Logout));
    }

    #[test]
    fn test_parse_pages() {
        assert_eq!(parse_command("add-event"), Ok(ClientCommand::AddEvent));
        assert_eq!(parse_command("profile"), Ok(ClientCommand::Profile));
        assert_eq!(parse_command("help"), Ok(ClientCommand::Help));
        assert_eq!(parse_command("quit"), Ok(ClientCommand::Quit));
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(parse_command("EVENTS"), Ok(ClientCommand::Events));
        assert_eq!(parse_command("Register 3"), Ok(ClientCommand::Register(3)));
    }

    // === Whitespace handling ===

    #[test]
    fn test_parse_with_surrounding_whitespace() {
        assert_eq!(parse_command("  profile  "), Ok(ClientCommand::Profile));
        assert_eq!(parse_command("  details   4 "), Ok(ClientCommand::Details(4)));
    }

    // === Positional commands ===

    #[test]
    fn test_parse_positions() {
        assert_eq!(parse_command("details 1"), Ok(ClientCommand::Details(1)));
        assert_eq!(parse_command("register 2"), Ok(ClientCommand::Register(2)));
        assert_eq!(parse_command("delete 3"), Ok(ClientCommand::Delete(3)));
        assert_eq!(parse_command("unregister 4"), Ok(ClientCommand::Unregister(4)));
    }

    #[test]
    fn test_parse_missing_position() {
        assert_eq!(
            parse_command("register"),
            Err(ParseError::MissingPosition("register"))
        );
    }

    #[test]
    fn test_parse_zero_position() {
        assert!(matches!(
            parse_command("details 0"),
            Err(ParseError::InvalidPosition(_))
        ));
    }

    #[test]
    fn test_parse_non_numeric_position() {
        assert!(matches!(
            parse_command("delete abc"),
            Err(ParseError::InvalidPosition(_))
        ));
        assert!(matches!(
            parse_command("delete -1"),
            Err(ParseError::InvalidPosition(_))
        ));
    }

    // === Avatar command tests ===

    #[test]
    fn test_parse_avatar_clear() {
        assert_eq!(parse_command("avatar clear"), Ok(ClientCommand::AvatarClear));
    }

    #[test]
    fn test_parse_avatar_path_with_spaces() {
        assert_eq!(
            parse_command("avatar /home/me/My Pictures/me.png"),
            Ok(ClientCommand::Avatar(PathBuf::from(
                "/home/me/My Pictures/me.png"
            )))
        );
    }

    #[test]
    fn test_parse_avatar_without_path() {
        assert_eq!(parse_command("avatar"), Err(ParseError::MissingAvatarPath));
    }

    // === Error cases ===

    #[test]
    fn test_parse_unrecognized_command() {
        assert!(matches!(
            parse_command("dance"),
            Err(ParseError::UnrecognizedCommand(_))
        ));
    }

    #[test]
    fn test_parse_empty_string() {
        assert!(matches!(
            parse_command("   "),
            Err(ParseError::UnrecognizedCommand(_))
        ));
    }

    // === Error message tests ===

    #[test]
    fn test_error_message_missing_position() {
        let msg = ParseError::MissingPosition("delete").to_string();
        assert!(msg.contains("'delete 1'"));
    }

    #[test]
    fn test_error_message_unrecognized_command() {
        let msg = ParseError::UnrecognizedCommand("xyz".to_string()).to_string();
        assert!(msg.contains("Unrecognized command"));
        assert!(msg.contains("xyz"));
        assert!(msg.contains("help"));
    }
}
