use std::fmt::{self, Display, Formatter};

pub const DEFAULT_WAITING_MESSAGE: &str = "Waiting for the next tool update...";

const MISSING: &str = "-";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusItem {
    pub label: String,
    pub value: String,
}

impl StatusItem {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// An item whose value shows `-` when unknown or empty.
    pub fn or_missing(label: impl Into<String>, value: Option<&str>) -> Self {
        let value = value.filter(|v| !v.is_empty()).unwrap_or(MISSING);
        Self::new(label, value)
    }
}

/// The Status / Turn pair shown when a game supplies no items of its own.
pub fn default_status_items(status: Option<&str>, turn: Option<&str>) -> Vec<StatusItem> {
    vec![
        StatusItem::or_missing("Status", status),
        StatusItem::or_missing("Turn", turn),
    ]
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShellBody {
    /// A payload arrived that is not this game's snapshot.
    Waiting(String),
    /// The game-specific board, already rendered.
    Board(String),
}

impl ShellBody {
    pub fn is_waiting(&self) -> bool {
        matches!(self, ShellBody::Waiting(_))
    }
}

/// Everything the shell shows for one payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShellView {
    pub title: String,
    pub subtitle: Option<String>,
    pub announcement: String,
    pub status_items: Vec<StatusItem>,
    pub error: Option<String>,
    pub body: ShellBody,
    pub instructions: Vec<String>,
}

impl ShellView {
    pub fn status_value(&self, label: &str) -> Option<&str> {
        self.status_items
            .iter()
            .find(|item| item.label == label)
            .map(|item| item.value.as_str())
    }
}

impl Display for ShellView {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        if let Some(subtitle) = &self.subtitle {
            writeln!(f, "{}", subtitle)?;
        }

        if !self.announcement.is_empty() {
            writeln!(f, "> {}", self.announcement)?;
        }

        if !self.status_items.is_empty() {
            let strip = self
                .status_items
                .iter()
                .map(|item| format!("{}: {}", item.label, item.value))
                .collect::<Vec<_>>()
                .join(" | ");
            writeln!(f, "{}", strip)?;
        }

        if let Some(error) = &self.error {
            writeln!(f, "! {}", error)?;
        }

        match &self.body {
            ShellBody::Waiting(message) => writeln!(f, "{}", message)?,
            ShellBody::Board(board) => write!(f, "{}", board)?,
        }

        for line in &self.instructions {
            writeln!(f, "* {}", line)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_status_items_show_missing() {
        let items = default_status_items(Some("in_progress"), None);

        assert_eq!(
            items,
            vec![StatusItem::new("Status", "in_progress"), StatusItem::new("Turn", "-")]
        );
    }

    #[test]
    fn test_display_layout() {
        let view = ShellView {
            title: "Mancala MCP".to_string(),
            subtitle: None,
            announcement: "Turn: player.".to_string(),
            status_items: default_status_items(Some("in_progress"), Some("player")),
            error: Some("Pit is empty.".to_string()),
            body: ShellBody::Waiting(DEFAULT_WAITING_MESSAGE.to_string()),
            instructions: vec!["Opponent pits are mirrored.".to_string()],
        };

        assert_eq!(
            view.to_string(),
            "Mancala MCP\n\
             > Turn: player.\n\
             Status: in_progress | Turn: player\n\
             ! Pit is empty.\n\
             Waiting for the next tool update...\n\
             * Opponent pits are mirrored.\n"
        );
        assert_eq!(view.status_value("Turn"), Some("player"));
    }
}
