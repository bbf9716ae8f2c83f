use snapshot::{Snapshot, SnapshotDecoder};

use crate::StatusItem;

/// The game-specific half of a widget: copy, status strip and board.
///
/// Implementations hold no game logic. They only present what the decoder
/// produced for the latest snapshot.
pub trait GameView {
    type Decoder: SnapshotDecoder;

    fn decoder(&self) -> &Self::Decoder;

    fn title(&self) -> &str;

    fn subtitle(&self) -> Option<&str> {
        None
    }

    fn waiting_message(&self) -> Option<&str> {
        None
    }

    fn instructions(&self) -> Vec<String> {
        Vec::new()
    }

    /// Widgets outside a session never request display modes.
    fn session_game(&self) -> bool {
        true
    }

    fn status<'a>(&self, snapshot: &'a Snapshot) -> Option<&'a str> {
        snapshot.status()
    }

    fn turn<'a>(&self, snapshot: &'a Snapshot) -> Option<&'a str> {
        snapshot.turn()
    }

    /// Identity used to reset display-mode memory between games.
    fn game_key(&self, snapshot: Option<&Snapshot>) -> String {
        let discriminant = self.decoder().shape().discriminant;
        game_key(discriminant, snapshot)
    }

    /// `None` keeps the shell's Status / Turn pair.
    fn status_items(
        &self,
        _snapshot: Option<&Snapshot>,
        _decoded: &<Self::Decoder as SnapshotDecoder>::Decoded,
    ) -> Option<Vec<StatusItem>> {
        None
    }

    fn render_board(
        &self,
        snapshot: Option<&Snapshot>,
        decoded: &<Self::Decoder as SnapshotDecoder>::Decoded,
    ) -> String;
}

/// `gameId` when present, otherwise `<discriminant>:<status or unknown>`.
pub fn game_key(discriminant: &str, snapshot: Option<&Snapshot>) -> String {
    if let Some(game_id) = snapshot.and_then(Snapshot::game_id) {
        return game_id.to_string();
    }

    let status = snapshot.and_then(Snapshot::status).unwrap_or("unknown");
    format!("{}:{}", discriminant, status)
}
