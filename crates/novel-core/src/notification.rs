//! Notification ids, display settings and delivery.
//!
//! Every user-visible outcome of a command maps to one [`NotificationId`]. How each id is
//! displayed is a user setting ([`NotificationDisplay`]) that can also be changed from the
//! notification itself.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// How long a status bar notification stays visible.
pub const STATUS_BAR_TIMEOUT: Duration = Duration::from_secs(3);

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationLevel {
    /// Informational.
    Information,
    /// Error.
    Error,
}

/// Identifier of a notification message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NotificationId {
    /// The document was copied as HTML.
    #[serde(rename = "infoCopyAsHTML")]
    InfoCopyAsHtml,
    /// The document was copied as ruby-only text.
    #[serde(rename = "infoCopyAsRubyOnly")]
    InfoCopyAsRubyOnly,
    /// The command does not apply to the document's language.
    #[serde(rename = "errorInvalidLanguageId")]
    ErrorInvalidLanguageId,
    /// The edit target spans several lines.
    #[serde(rename = "errorEditNotSingleLine")]
    ErrorEditNotSingleLine,
    /// The edit target contains reserved annotation characters.
    #[serde(rename = "errorEditContainSpecialCharacter")]
    ErrorEditContainSpecialCharacter,
    /// The host rejected the edit.
    #[serde(rename = "errorEditOther")]
    ErrorEditOther,
    /// The clipboard did not hold the copied text afterwards.
    #[serde(rename = "errorCopyClipboard")]
    ErrorCopyClipboard,
}

impl NotificationId {
    /// Every notification id.
    pub const ALL: [NotificationId; 7] = [
        NotificationId::InfoCopyAsHtml,
        NotificationId::InfoCopyAsRubyOnly,
        NotificationId::ErrorInvalidLanguageId,
        NotificationId::ErrorEditNotSingleLine,
        NotificationId::ErrorEditContainSpecialCharacter,
        NotificationId::ErrorEditOther,
        NotificationId::ErrorCopyClipboard,
    ];

    /// Setting key of the id.
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationId::InfoCopyAsHtml => "infoCopyAsHTML",
            NotificationId::InfoCopyAsRubyOnly => "infoCopyAsRubyOnly",
            NotificationId::ErrorInvalidLanguageId => "errorInvalidLanguageId",
            NotificationId::ErrorEditNotSingleLine => "errorEditNotSingleLine",
            NotificationId::ErrorEditContainSpecialCharacter => "errorEditContainSpecialCharacter",
            NotificationId::ErrorEditOther => "errorEditOther",
            NotificationId::ErrorCopyClipboard => "errorCopyClipboard",
        }
    }

    /// Severity of the id.
    pub fn level(self) -> NotificationLevel {
        match self {
            NotificationId::InfoCopyAsHtml | NotificationId::InfoCopyAsRubyOnly => {
                NotificationLevel::Information
            }
            _ => NotificationLevel::Error,
        }
    }

    /// English message text.
    pub fn default_message(self) -> &'static str {
        match self {
            NotificationId::InfoCopyAsHtml => {
                "Successfully converted the text file to HTML and copied it to the clipboard."
            }
            NotificationId::InfoCopyAsRubyOnly => {
                "Successfully converted the text file to ruby only and copied it to the clipboard."
            }
            NotificationId::ErrorInvalidLanguageId => "The document language was invalid.",
            NotificationId::ErrorEditNotSingleLine => "Cannot apply the edit across lines.",
            NotificationId::ErrorEditContainSpecialCharacter => {
                "Cannot apply the edit to the text that contains special characters."
            }
            NotificationId::ErrorEditOther => "Failed to apply the edit.",
            NotificationId::ErrorCopyClipboard => "Failed to copy to the clipboard.",
        }
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a notification is displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationDisplay {
    /// A message with choices.
    #[default]
    Show,
    /// A transient status bar message.
    StatusBar,
    /// Nothing.
    None,
}

/// Per-id display settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationSettings {
    /// Display per id; missing ids use [`NotificationDisplay::Show`].
    pub display: BTreeMap<NotificationId, NotificationDisplay>,
}

impl NotificationSettings {
    /// Display setting of `id`.
    pub fn display(&self, id: NotificationId) -> NotificationDisplay {
        self.display.get(&id).copied().unwrap_or_default()
    }

    /// Change the display setting of `id`.
    pub fn set_display(&mut self, id: NotificationId, display: NotificationDisplay) {
        self.display.insert(id, display);
    }
}

/// A choice offered with a shown notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationChoice {
    /// Dismiss.
    Ok,
    /// Dismiss and use the status bar from now on.
    ShowInStatusBar,
    /// Dismiss and suppress from now on.
    DoNotShowAgain,
}

impl NotificationChoice {
    /// All choices in display order.
    pub const ALL: [NotificationChoice; 3] = [
        NotificationChoice::Ok,
        NotificationChoice::ShowInStatusBar,
        NotificationChoice::DoNotShowAgain,
    ];

    /// Button title.
    pub fn title(self) -> &'static str {
        match self {
            NotificationChoice::Ok => "OK",
            NotificationChoice::ShowInStatusBar => "Show in the status bar.",
            NotificationChoice::DoNotShowAgain => "Don't show again.",
        }
    }
}

/// Host UI used to display notifications.
pub trait NotificationHost {
    /// Show a message with `choices`; returns the picked one, `None` if dismissed.
    fn show_message(
        &mut self,
        level: NotificationLevel,
        message: &str,
        choices: &[NotificationChoice],
    ) -> Option<NotificationChoice>;

    /// Show a transient status bar message.
    fn show_status_bar_message(&mut self, message: &str, timeout: Duration);
}

/// What [`NotificationService::notify`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// The id is disabled.
    Suppressed,
    /// Shown in the status bar.
    StatusBar,
    /// Shown as a message; carries the user's choice.
    Shown(Option<NotificationChoice>),
}

/// Delivers notifications according to the settings.
#[derive(Debug, Clone, Default)]
pub struct NotificationService {
    settings: NotificationSettings,
}

impl NotificationService {
    /// Create a service with `settings`.
    pub fn new(settings: NotificationSettings) -> Self {
        Self { settings }
    }

    /// Current settings.
    pub fn settings(&self) -> &NotificationSettings {
        &self.settings
    }

    /// Replace the settings (configuration change).
    pub fn set_settings(&mut self, settings: NotificationSettings) {
        self.settings = settings;
    }

    /// Display `id` through `host`, updating the settings if the user asks to.
    pub fn notify<H: NotificationHost + ?Sized>(
        &mut self,
        id: NotificationId,
        host: &mut H,
    ) -> NotificationOutcome {
        let message = id.default_message();

        match self.settings.display(id) {
            NotificationDisplay::None => NotificationOutcome::Suppressed,
            NotificationDisplay::StatusBar => {
                host.show_status_bar_message(message, STATUS_BAR_TIMEOUT);
                NotificationOutcome::StatusBar
            }
            NotificationDisplay::Show => {
                let choice = host.show_message(id.level(), message, &NotificationChoice::ALL);
                match choice {
                    Some(NotificationChoice::ShowInStatusBar) => {
                        self.settings.set_display(id, NotificationDisplay::StatusBar);
                    }
                    Some(NotificationChoice::DoNotShowAgain) => {
                        self.settings.set_display(id, NotificationDisplay::None);
                    }
                    Some(NotificationChoice::Ok) | None => {}
                }
                if let Some(choice) = choice {
                    debug!(%id, ?choice, "notification answered");
                }
                NotificationOutcome::Shown(choice)
            }
        }
    }
}
