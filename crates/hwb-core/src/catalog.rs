//! Known review statuses and their notification templates.

use crate::{errors::Error, Result};

const STATUS_CHANGED: &str = "Изменен статус работы";
const STATUS_COMPLETED: &str = "У вас проверили работу";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusEntry {
    pub code: &'static str,
    pub headline: &'static str,
    pub verdict: &'static str,
}

pub const STATUSES: &[StatusEntry] = &[
    StatusEntry {
        code: "reviewing",
        headline: STATUS_CHANGED,
        verdict: "Работа взята в ревью.",
    },
    StatusEntry {
        code: "rejected",
        headline: STATUS_COMPLETED,
        verdict: "К сожалению в работе нашлись ошибки.",
    },
    StatusEntry {
        code: "approved",
        headline: STATUS_COMPLETED,
        verdict: "Ревьюеру всё понравилось, можно приступать к следующему уроку.",
    },
];

pub fn lookup(code: &str) -> Result<&'static StatusEntry> {
    STATUSES
        .iter()
        .find(|e| e.code == code)
        .ok_or_else(|| Error::UnknownStatus(code.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knows_exactly_three_codes() {
        assert_eq!(
            STATUSES.iter().map(|e| e.code).collect::<Vec<_>>(),
            vec!["reviewing", "rejected", "approved"]
        );
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(lookup("approved").unwrap().headline, STATUS_COMPLETED);
        assert!(matches!(lookup("Approved"), Err(Error::UnknownStatus(c)) if c == "Approved"));
    }
}
