use snapshot::STATUS_GAME_OVER;

/// Live-region text for screen readers.
///
/// Priority: a rejected action, then game over, then whose turn it is, then
/// the raw status. Empty when nothing is known.
pub fn announcement(status: Option<&str>, turn: Option<&str>, error: Option<&str>) -> String {
    let status = status.filter(|s| !s.is_empty());
    let turn = turn.filter(|t| !t.is_empty());

    if let Some(error) = error.filter(|e| !e.is_empty()) {
        return format!("Action rejected: {}", error);
    }

    if status == Some(STATUS_GAME_OVER) {
        return "Game over.".to_string();
    }

    if let Some(turn) = turn {
        return format!("Turn: {}.", turn);
    }

    match status {
        Some(status) => format!("Status: {}.", status),
        None => String::new(),
    }
}
