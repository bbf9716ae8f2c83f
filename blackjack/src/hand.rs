use snapshot::{parse_count, parse_list, Record};

pub const BLACKJACK: u64 = 21;

/// One player hand from the `cards@state@doubled@bet` record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Hand {
    pub cards: Vec<String>,
    pub state: String,
    pub doubled: bool,
    pub bet: u64,
}

impl Hand {
    /// A missing per-hand bet falls back to the table bet.
    pub fn from_record(record: &Record, table_bet: u64) -> Self {
        Self {
            cards: parse_list(record.component(0)),
            state: record.component(1).unwrap_or_default().to_string(),
            doubled: record.component(2) == Some("1"),
            bet: record
                .component(3)
                .map(|bet| parse_count(Some(bet)))
                .unwrap_or(table_bet),
        }
    }

    pub fn value(&self) -> u64 {
        hand_value(&self.cards)
    }

    pub fn is_active(&self) -> bool {
        self.state == "active"
    }
}

fn rank_value(rank: char) -> u64 {
    match rank {
        'A' => 11,
        'K' | 'Q' | 'J' | 'T' => 10,
        rank => rank.to_digit(10).filter(|value| *value >= 2).map_or(0, u64::from),
    }
}

/// Best total not over 21 where possible: aces count 11 and drop to 1 one at a
/// time while the hand is bust.
pub fn hand_value<S: AsRef<str>>(cards: &[S]) -> u64 {
    let mut total = 0;
    let mut aces = 0;

    for card in cards {
        let Some(rank) = card.as_ref().chars().next() else {
            continue;
        };
        total += rank_value(rank);
        if rank == 'A' {
            aces += 1;
        }
    }

    while total > BLACKJACK && aces > 0 {
        total -= 10;
        aces -= 1;
    }

    total
}

fn suit_symbol(suit: char) -> Option<char> {
    match suit {
        'S' => Some('♠'),
        'H' => Some('♥'),
        'D' => Some('♦'),
        'C' => Some('♣'),
        _ => None,
    }
}

/// `KS` -> `K♠`. Anything that is not a two-character card renders blank.
pub fn card_label(card: &str) -> String {
    let mut chars = card.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(rank), Some(suit), None) => match suit_symbol(suit) {
            Some(symbol) => format!("{}{}", rank, symbol),
            None => rank.to_string(),
        },
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hand_value() {
        assert_eq!(hand_value(&["AS", "AH"]), 12);
        assert_eq!(hand_value(&["KS", "QH"]), 20);
        assert_eq!(hand_value(&["AS", "KS", "5H"]), 16);
        assert_eq!(hand_value(&["AS", "KS"]), 21);
        assert_eq!(hand_value::<&str>(&[]), 0);
    }

    #[test]
    fn test_unknown_ranks_count_zero() {
        assert_eq!(hand_value(&["XS", "9D", ""]), 9);
    }

    #[test]
    fn test_card_label() {
        assert_eq!(card_label("KS"), "K♠");
        assert_eq!(card_label("TH"), "T♥");
        assert_eq!(card_label("9X"), "9");
        assert_eq!(card_label("10H"), "");
    }

    #[test]
    fn test_hand_from_record() {
        let hand = Hand::from_record(&Record::parse("AS,KH@blackjack@0"), 25);
        assert_eq!(hand.cards, vec!["AS", "KH"]);
        assert_eq!(hand.state, "blackjack");
        assert!(!hand.doubled);
        assert_eq!(hand.bet, 25);
        assert_eq!(hand.value(), 21);

        let doubled = Hand::from_record(&Record::parse("9C,2D,TS@stood@1@50"), 25);
        assert!(doubled.doubled);
        assert_eq!(doubled.bet, 50);
    }
}
