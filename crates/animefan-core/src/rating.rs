#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingLabel {
    pub value: u8,
    pub text: &'static str,
    pub color: &'static str,
    pub emoji: &'static str,
}

impl RatingLabel {
    pub fn caption(&self) -> String {
        format!("{} {}", self.emoji, self.text)
    }
}

const fn label(value: u8, text: &'static str, color: &'static str, emoji: &'static str) -> RatingLabel {
    RatingLabel {
        value,
        text,
        color,
        emoji,
    }
}

pub static RATING_LABELS: [RatingLabel; 10] = [
    label(1, "Ужасно", "#dc3545", "💀"),
    label(2, "Очень плохо", "#dc3545", "😫"),
    label(3, "Плохо", "#fd7e14", "😕"),
    label(4, "Ниже среднего", "#fd7e14", "😐"),
    label(5, "Средне", "#ffc107", "😶"),
    label(6, "Неплохо", "#ffc107", "🙂"),
    label(7, "Хорошо", "#20c997", "😊"),
    label(8, "Отлично", "#20c997", "😄"),
    label(9, "Великолепно", "#28a745", "🤩"),
    label(10, "Шедевр", "#28a745", "🏆"),
];

pub fn rating_label(value: i64) -> Option<&'static RatingLabel> {
    RATING_LABELS.iter().find(|label| i64::from(label.value) == value)
}

/// Slider values arrive as strings from the input element.
pub fn parse_rating(raw: &str) -> Option<&'static RatingLabel> {
    raw.trim().parse::<i64>().ok().and_then(rating_label)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        let worst = rating_label(1).unwrap();
        assert_eq!((worst.text, worst.color), ("Ужасно", "#dc3545"));

        let best = rating_label(10).unwrap();
        assert_eq!((best.text, best.color), ("Шедевр", "#28a745"));
        assert_eq!(best.caption(), "🏆 Шедевр");

        assert_eq!(rating_label(0), None);
        assert_eq!(rating_label(11), None);
    }

    #[test]
    fn test_every_slider_position_has_a_label() {
        for value in 1..=10 {
            assert_eq!(rating_label(value).map(|l| i64::from(l.value)), Some(value));
        }
        assert_eq!(parse_rating(" 7 ").map(|l| l.text), Some("Хорошо"));
        assert_eq!(parse_rating("seven"), None);
    }
}
