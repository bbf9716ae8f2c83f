use std::fmt::{self, Display, Formatter};

use serde_json::Value;
use snapshot::{parse_count, parse_list, Snapshot, SnapshotDecoder, SnapshotShape, StateField, SENTINEL};

pub const SHAPE: SnapshotShape = SnapshotShape::new("rpg_dice_roll", StateField::Rolls);

/// One tool call's worth of dice. Faces come from `rolls`; the die size,
/// dice count and total are read straight off the payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiceRoll {
    pub rolls: Vec<u64>,
    pub sides: u64,
    pub count: u64,
    pub total: Option<u64>,
}

impl DiceRoll {
    pub fn sum(&self) -> u64 {
        self.rolls.iter().sum()
    }
}

impl Display for DiceRoll {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.rolls.is_empty() {
            return writeln!(f, "[{}]", SENTINEL);
        }

        let dice = self.rolls.iter().map(|roll| format!("[{}]", roll)).collect::<Vec<_>>();
        writeln!(f, "{}", dice.join(" "))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DiceDecoder;

impl SnapshotDecoder for DiceDecoder {
    type Decoded = DiceRoll;

    fn shape(&self) -> SnapshotShape {
        SHAPE
    }

    /// Comma-joined faces. A face that is not a non-negative integer reads as 0.
    fn decode(&self, rolls: Option<&str>) -> DiceRoll {
        DiceRoll {
            rolls: parse_list(rolls)
                .iter()
                .map(|face| parse_count(Some(face.as_str())))
                .collect(),
            ..DiceRoll::default()
        }
    }

    fn decode_snapshot(&self, snapshot: Option<&Snapshot>) -> DiceRoll {
        let Some(snapshot) = snapshot else {
            return DiceRoll::default();
        };
        let number = |name: &str| snapshot.field(name).and_then(Value::as_u64);

        DiceRoll {
            sides: number("sides").unwrap_or_default(),
            count: number("count").unwrap_or_default(),
            total: number("total"),
            ..self.decode(Some(snapshot.state()))
        }
    }
}
