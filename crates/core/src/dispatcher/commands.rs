//! Slash-command parsing.

/// A recognized chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Add,
    /// `/edit [title]`
    Edit(Option<String>),
    /// `/delete <title>`
    Delete(Option<String>),
    Cancel,
    /// Any other slash command.
    Unknown(String),
}

impl Command {
    /// Parse `text` as a command. Returns `None` for plain text.
    ///
    /// A `@botname` suffix on the command word is ignored.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let body = text.strip_prefix('/')?;

        let (word, rest) = match body.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (body, ""),
        };
        let name = word.split('@').next().unwrap_or(word).to_lowercase();
        if name.is_empty() {
            return None;
        }
        let argument = (!rest.is_empty()).then(|| rest.to_string());

        Some(match name.as_str() {
            "start" => Command::Start,
            "add" => Command::Add,
            "edit" => Command::Edit(argument),
            "delete" => Command::Delete(argument),
            "cancel" => Command::Cancel,
            _ => Command::Unknown(name),
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Command::Start => "start",
            Command::Add => "add",
            Command::Edit(_) => "edit",
            Command::Delete(_) => "delete",
            Command::Cancel => "cancel",
            Command::Unknown(name) => name,
        }
    }
}
