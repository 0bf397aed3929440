/// A binary confirmation shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Message content of the prompt.
    pub message: String,
    /// Label of the button that opens system settings.
    pub confirm: String,
    /// Label of the button that closes the prompt.
    pub dismiss: String,
}

/// The user's answer to a [`Prompt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptChoice {
    /// Open the system location settings.
    OpenSettings,
    /// Close the prompt without doing anything.
    Dismiss,
}

/// Modal and transient UI feedback supplied by the host.
pub trait UserFeedback: Send + Sync {
    /// Show a modal confirmation. The answer arrives later through
    /// [`LocationGateController::on_prompt_answered`].
    ///
    /// [`LocationGateController::on_prompt_answered`]: crate::LocationGateController::on_prompt_answered
    fn prompt(&self, prompt: &Prompt);

    /// Show a short non-blocking message.
    fn notify(&self, message: &str);

    /// Open the system location settings screen.
    fn open_location_settings(&self);
}
