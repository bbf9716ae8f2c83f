use serde_json::{Map, Value};

pub const STATUS_IN_PROGRESS: &str = "in_progress";
pub const STATUS_GAME_OVER: &str = "game_over";

/// The positional field that carries a family's compact state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateField {
    /// `state`, a compact text encoding.
    State,
    /// `fen`, chess piece placement.
    Fen,
    /// `rolls`, an array of die faces.
    Rolls,
}

impl StateField {
    pub fn name(&self) -> &'static str {
        match self {
            StateField::State => "state",
            StateField::Fen => "fen",
            StateField::Rolls => "rolls",
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            StateField::State | StateField::Fen => value.is_string(),
            StateField::Rolls => value.is_array(),
        }
    }

    fn to_text(self, value: &Value) -> Option<String> {
        match (self, value) {
            (StateField::State | StateField::Fen, Value::String(text)) => Some(text.clone()),
            (StateField::Rolls, Value::Array(items)) => Some(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(text) => text.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            _ => None,
        }
    }
}

/// Discriminant plus positional field expected by one widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnapshotShape {
    pub discriminant: &'static str,
    pub field: StateField,
}

impl SnapshotShape {
    pub const fn new(discriminant: &'static str, field: StateField) -> Self {
        Self {
            discriminant,
            field,
        }
    }

    pub fn is_snapshot(&self, payload: Option<&Value>) -> bool {
        let Some(payload) = payload else {
            return false;
        };

        payload.get("type").and_then(Value::as_str) == Some(self.discriminant)
            && payload.get(self.field.name()).is_some_and(|v| self.field.accepts(v))
    }

    /// Something arrived but it is not this widget's snapshot yet.
    pub fn is_waiting(&self, payload: Option<&Value>) -> bool {
        let payload = payload.filter(|value| !value.is_null());
        payload.is_some() && !self.is_snapshot(payload)
    }

    pub fn classify(&self, payload: Option<&Value>) -> Classification {
        match payload.filter(|value| !value.is_null()) {
            None => Classification::Empty,
            Some(payload) => match Snapshot::from_payload(payload, self) {
                Some(snapshot) => Classification::Snapshot(snapshot),
                None => Classification::Waiting,
            },
        }
    }
}

/// What the widget should show for the latest normalized payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Classification {
    /// Nothing has been delivered yet.
    Empty,
    /// A payload arrived that does not have this widget's shape.
    Waiting,
    Snapshot(Snapshot),
}

impl Classification {
    pub fn is_waiting(&self) -> bool {
        matches!(self, Classification::Waiting)
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            Classification::Snapshot(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}

/// A validated payload for one game family.
///
/// `state` holds the positional field as text; for array-shaped families the
/// entries are joined with `,`. Every other payload key stays reachable through
/// [`Snapshot::field`].
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    kind: String,
    state: String,
    fields: Map<String, Value>,
}

impl Snapshot {
    pub fn from_payload(payload: &Value, shape: &SnapshotShape) -> Option<Self> {
        if !shape.is_snapshot(Some(payload)) {
            return None;
        }

        let fields = payload.as_object()?.clone();
        let state = shape.field.to_text(fields.get(shape.field.name())?)?;

        Some(Self {
            kind: shape.discriminant.to_string(),
            state,
            fields,
        })
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// A string field; empty strings count as absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.field(name)
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
    }

    pub fn status(&self) -> Option<&str> {
        self.text("status")
    }

    pub fn turn(&self) -> Option<&str> {
        self.text("turn")
    }

    pub fn game_id(&self) -> Option<&str> {
        self.text("gameId")
    }

    pub fn last_move(&self) -> Option<&Map<String, Value>> {
        self.field("lastMove").and_then(Value::as_object)
    }

    pub fn legal(&self) -> Option<bool> {
        self.field("legal").and_then(Value::as_bool)
    }

    /// The engine's message for a rejected action, only when `legal` is `false`.
    pub fn rejection(&self) -> Option<&str> {
        match self.legal() {
            Some(false) => self.text("error"),
            _ => None,
        }
    }
}
